//! Ward - sandboxed workspace tools for tool-calling agents.
//!
//! Confines file reads, line-range edits and allow-listed commands to a
//! single workspace root. Failures are typed [`error::WardError`]s that the
//! [`tools::ToolExecutor`] turns into plain text results.

pub mod error;
pub mod tools;
pub mod types;
pub mod util;

// Re-export core types for convenient access
pub use error::{WardError, WardResult};
pub use tools::{ToolCall, ToolExecutor, ToolResult};
pub use types::WorkspaceConfig;
