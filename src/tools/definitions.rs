//! Tool schemas for agent tool-calling layers.
//!
//! Each definition names a tool, describes when to use it, and gives a JSON
//! Schema for its arguments, in the shape most tool-calling APIs accept.
//!
//! ```rust
//! use ward::tools::definitions::default_tools;
//! use ward::types::config::WorkspaceConfig;
//!
//! let config = WorkspaceConfig::new(std::env::temp_dir()).unwrap();
//! let tools = default_tools(&config);
//! assert!(tools.iter().any(|t| t.name == "bash.run"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::executor::{BASH_RUN, READ_FILE, WRITE_FILE};
use crate::types::config::WorkspaceConfig;

/// A tool definition: name, description and argument schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// The unique name of the tool (e.g., "read.file").
    pub name: String,

    /// Human-readable description of what the tool does.
    pub description: String,

    /// JSON Schema for the arguments; always `"type": "object"`.
    pub input_schema: Value,
}

impl ToolDefinition {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Returns `read.file`, `write.file` and `bash.run` for `config`.
#[must_use]
pub fn default_tools(config: &WorkspaceConfig) -> Vec<ToolDefinition> {
    vec![
        read_file_tool(config),
        write_file_tool(),
        bash_run_tool(config),
    ]
}

#[must_use]
pub fn read_file_tool(config: &WorkspaceConfig) -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read a workspace file and show line numbers for easier surgical edits. \
         Pass start_line alone for a single line, or start_line and end_line for an \
         inclusive range. Long output is truncated and ends with '...'.",
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file, relative to the workspace root"
                },
                "start_line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "First line to show (1-indexed)"
                },
                "end_line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Last line to show (inclusive)"
                },
                "max_output_chars": {
                    "type": "integer",
                    "minimum": 0,
                    "default": config.default_max_output_chars(),
                    "description": "Character budget for the response"
                }
            },
            "required": ["path"]
        }),
    )
}

#[must_use]
pub fn write_file_tool() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Replace a specific line range in an existing workspace file with UTF-8 text. \
         The content is inserted verbatim, so end it with a newline to keep the next \
         line separate. Use read.file first to find the line numbers.",
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file, relative to the workspace root"
                },
                "content": {
                    "type": "string",
                    "description": "Text that replaces the range"
                },
                "start_line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "First line to replace (1-indexed)"
                },
                "end_line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Last line to replace (inclusive)"
                }
            },
            "required": ["path", "content", "start_line", "end_line"]
        }),
    )
}

#[must_use]
pub fn bash_run_tool(config: &WorkspaceConfig) -> ToolDefinition {
    let allowed: Vec<&str> = config.allowed_commands().iter().map(String::as_str).collect();
    ToolDefinition::new(
        BASH_RUN,
        format!(
            "Execute a limited command ({}) inside the workspace. No shell is involved: \
             pipes, redirects and substitutions are passed as plain arguments.",
            allowed.join(", ")
        ),
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Full command line, e.g. \"ls stages\""
                },
                "timeout_seconds": {
                    "type": "integer",
                    "minimum": 0,
                    "default": config.default_timeout().as_secs(),
                    "description": "Upper bound before the process is terminated"
                },
                "max_output_chars": {
                    "type": "integer",
                    "minimum": 0,
                    "default": config.default_max_output_chars(),
                    "description": "Long outputs are truncated to this many characters"
                }
            },
            "required": ["command"]
        }),
    )
}
