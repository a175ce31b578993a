//! Tool executor: the boundary between agent tool calls and the sandbox.
//!
//! Every outcome, including every [`WardError`], leaves this module as a
//! [`ToolResult`] carrying plain text, so a calling agent can treat a
//! failure as one more message to reason about.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::command::CommandGate;
use super::path::PathResolver;
use super::text::RangedTextEditor;
use crate::error::{WardError, WardResult};
use crate::types::config::WorkspaceConfig;

/// Name of the numbered file read tool.
pub const READ_FILE: &str = "read.file";
/// Name of the line-range replace tool.
pub const WRITE_FILE: &str = "write.file";
/// Name of the allow-listed command tool.
pub const BASH_RUN: &str = "bash.run";

/// Tool executor with workspace confinement.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    config: Arc<WorkspaceConfig>,
    resolver: PathResolver,
    gate: CommandGate,
    editor: RangedTextEditor,
}

#[derive(Debug, Clone)]
pub struct ToolCall {
    pub name: String,
    pub input: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResult {
    /// Tool executed successfully with output.
    Success(String),
    /// Tool execution failed with a descriptive message.
    Error(String),
}

impl ToolResult {
    /// The text carried by either variant.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Debug, Deserialize)]
struct ReadFileInput {
    path: String,
    start_line: Option<i64>,
    end_line: Option<i64>,
    max_output_chars: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WriteFileInput {
    path: String,
    content: String,
    start_line: Option<i64>,
    end_line: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct BashRunInput {
    command: String,
    timeout_seconds: Option<u64>,
    max_output_chars: Option<usize>,
}

impl ToolExecutor {
    pub fn new(config: Arc<WorkspaceConfig>) -> Self {
        Self {
            resolver: PathResolver::new(&config),
            gate: CommandGate::new(&config),
            editor: RangedTextEditor::new(),
            config,
        }
    }

    /// The configuration this executor was built from.
    #[must_use]
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub async fn execute(&self, call: ToolCall) -> ToolResult {
        debug!(tool = %call.name, "Executing tool call");
        let result = match call.name.as_str() {
            READ_FILE => self.read_file(&call.input).await,
            WRITE_FILE => self.write_file(&call.input).await,
            BASH_RUN => self.bash_run(&call.input).await,
            _ => return ToolResult::Error(format!("Unknown tool: {}", call.name)),
        };

        match result {
            Ok(text) => ToolResult::Success(text),
            Err(e) => {
                debug!(tool = %call.name, kind = e.kind(), error = %e, "Tool call failed");
                ToolResult::Error(describe(&call.name, &e))
            }
        }
    }

    async fn read_file(&self, input: &serde_json::Value) -> WardResult<String> {
        let input: ReadFileInput = decode(READ_FILE, input)?;
        let target = self.resolver.resolve(&input.path, false)?;
        let max_chars = input
            .max_output_chars
            .unwrap_or(self.config.default_max_output_chars());

        self.editor
            .read(
                &target,
                input.start_line.map(line_number),
                input.end_line.map(line_number),
                max_chars,
            )
            .await
    }

    async fn write_file(&self, input: &serde_json::Value) -> WardResult<String> {
        let input: WriteFileInput = decode(WRITE_FILE, input)?;
        let (Some(start_line), Some(end_line)) = (input.start_line, input.end_line) else {
            return Err(WardError::invalid_arguments(
                WRITE_FILE,
                "only line-range replacements are supported; provide start_line and end_line.",
            ));
        };

        // Files are never created here, so no parent directories either.
        let target = self.resolver.resolve(&input.path, false)?;
        let (start, end) = (line_number(start_line), line_number(end_line));

        let summary = self.editor.replace(&target, start, end, &input.content).await?;
        Ok(format!(
            "Replaced lines {start}-{end} in {} with {} characters.",
            input.path, summary.chars_written
        ))
    }

    async fn bash_run(&self, input: &serde_json::Value) -> WardResult<String> {
        let input: BashRunInput = decode(BASH_RUN, input)?;
        let timeout = input
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.config.default_timeout());
        let max_chars = input
            .max_output_chars
            .unwrap_or(self.config.default_max_output_chars());

        let result = self.gate.run(&input.command, timeout, max_chars).await?;
        Ok(result.render())
    }
}

/// Renders an error for the result channel. A missing write target gets a
/// hint, since `write.file` never creates files.
fn describe(tool: &str, error: &WardError) -> String {
    match error {
        WardError::NotFound { path } if tool == WRITE_FILE => format!(
            "File '{path}' does not exist yet; populate it before using write.file."
        ),
        _ => error.to_string(),
    }
}

fn decode<T: DeserializeOwned>(tool: &str, input: &serde_json::Value) -> WardResult<T> {
    serde_json::from_value(input.clone())
        .map_err(|e| WardError::invalid_arguments(tool, e.to_string()))
}

/// Negative line numbers become 0, which range validation rejects with
/// the file's current line count.
fn line_number(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}
