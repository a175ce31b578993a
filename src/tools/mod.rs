//! Sandboxed workspace tools.
//!
//! - [`path`] confines paths to the workspace root
//! - [`command`] runs allow-listed commands with a timeout and output budget
//! - [`text`] reads and patches files by line range
//! - [`executor`] exposes the three as `read.file`, `write.file` and `bash.run`
//! - [`definitions`] describes those tools for a tool-calling model

pub mod command;
pub mod definitions;
pub mod executor;
pub mod path;
pub mod text;

pub use command::{CommandGate, CommandInvocation, CommandResult};
pub use definitions::{default_tools, ToolDefinition};
pub use executor::{ToolCall, ToolExecutor, ToolResult, BASH_RUN, READ_FILE, WRITE_FILE};
pub use path::{PathResolver, ResolvedPath};
pub use text::{EditRange, LineDocument, RangedTextEditor, ReplaceSummary, EMPTY_FILE_MESSAGE};
