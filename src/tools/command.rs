//! Allow-listed command execution.
//!
//! [`CommandGate`] splits a command line into words, checks the program
//! against the allow-list, optionally rejects arguments that point outside
//! the workspace, and runs the argument vector directly (never through a
//! shell) with the workspace root as working directory.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ward::tools::CommandGate;
//! use ward::types::config::WorkspaceConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(WorkspaceConfig::new("/workspace")?);
//! let gate = CommandGate::new(&config);
//! let result = gate.run("ls stages", Duration::from_secs(5), 4000).await?;
//! println!("{}", result.render());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::path::PathResolver;
use crate::error::{WardError, WardResult};
use crate::types::config::WorkspaceConfig;
use crate::util::truncate_chars;

/// Each pipe keeps at most this many bytes per budgeted character.
/// UTF-8 needs up to 4 bytes per character; the rest is headroom for the
/// trim applied before rendering.
const CAPTURE_BYTES_PER_CHAR: usize = 8;

/// Lower bound on per-pipe capture so tiny budgets still see some output.
const MIN_CAPTURE_BYTES: usize = 4096;

/// A validated argument vector, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// The program name, as found in the allow-list.
    pub program: String,
    /// Arguments after the program name.
    pub args: Vec<String>,
}

/// Output of a completed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Captured stdout, trimmed.
    pub stdout: String,
    /// Captured stderr, trimmed.
    pub stderr: String,
    /// Combined rendering of stdout and stderr, within the output budget.
    pub output: String,
    /// Exit code, or `None` if the process was ended by a signal.
    pub exit_code: Option<i32>,
    /// Whether any output was cut to fit the budget.
    pub truncated: bool,
}

impl CommandResult {
    /// Renders the combined output followed by an exit-status note.
    #[must_use]
    pub fn render(&self) -> String {
        match self.exit_code {
            Some(code) => format!("{}\n(exit code {code})", self.output),
            None => format!("{}\n(terminated by signal)", self.output),
        }
    }

    /// Returns `true` if the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Validates and executes allow-listed commands inside the workspace.
#[derive(Debug, Clone)]
pub struct CommandGate {
    resolver: PathResolver,
    allowed: BTreeSet<String>,
    check_path_arguments: bool,
}

impl CommandGate {
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            resolver: PathResolver::new(config),
            allowed: config.allowed_commands().clone(),
            check_path_arguments: config.check_path_arguments(),
        }
    }

    /// Overrides the path-argument hardening set in the config.
    #[must_use]
    pub fn with_path_argument_check(mut self, enabled: bool) -> Self {
        self.check_path_arguments = enabled;
        self
    }

    /// Parses and validates `command_line` without running it.
    ///
    /// # Errors
    ///
    /// - [`WardError::MalformedCommand`] on unbalanced quotes
    /// - [`WardError::EmptyCommand`] if there are no words
    /// - [`WardError::CommandNotAllowed`] if the program is not allow-listed
    /// - [`WardError::PathEscape`] if hardening is on and an argument escapes
    pub fn prepare(&self, command_line: &str) -> WardResult<CommandInvocation> {
        let mut words = shell_words::split(command_line)
            .map_err(|e| WardError::malformed_command(e.to_string()))?;

        if words.is_empty() {
            return Err(WardError::EmptyCommand);
        }
        let program = words.remove(0);

        if !self.allowed.contains(&program) {
            warn!(
                program = %program,
                command = %command_line,
                "Security: command blocked by allow-list"
            );
            return Err(WardError::command_not_allowed(
                program,
                self.allowed.iter().cloned(),
            ));
        }

        if self.check_path_arguments {
            for arg in &words {
                self.check_argument(arg)?;
            }
        }

        Ok(CommandInvocation {
            program,
            args: words,
        })
    }

    /// Rejects an argument that names a path outside the workspace.
    ///
    /// Each whitespace-separated piece is checked on its own, so script
    /// arguments such as sed's `'1r /etc/passwd'` are covered.
    fn check_argument(&self, arg: &str) -> WardResult<()> {
        for piece in arg.split_whitespace() {
            let Some(value) = path_candidate(piece) else {
                continue;
            };
            self.resolver.contain(value).map_err(|e| {
                debug!(argument = %arg, piece = %piece, "Path argument rejected");
                e
            })?;
        }
        Ok(())
    }

    /// Validates and runs `command_line`.
    ///
    /// A non-zero exit status is not an error; it is reported in
    /// [`CommandResult::exit_code`]. On timeout the child is killed and
    /// reaped before the error is returned.
    ///
    /// # Errors
    ///
    /// Any error from [`CommandGate::prepare`], plus
    /// [`WardError::CommandTimeout`] and [`WardError::ExecutorFailure`].
    pub async fn run(
        &self,
        command_line: &str,
        timeout: Duration,
        max_output_chars: usize,
    ) -> WardResult<CommandResult> {
        let invocation = self.prepare(command_line)?;
        debug!(
            program = %invocation.program,
            args = ?invocation.args,
            timeout_ms = %timeout.as_millis(),
            "Running command"
        );

        // kill_on_drop covers every early return below.
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(self.resolver.root())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                warn!(command = %command_line, error = %e, "Command launch failed");
                WardError::executor_failure(command_line, e.to_string())
            })?;

        let capture = max_output_chars
            .saturating_mul(CAPTURE_BYTES_PER_CHAR)
            .max(MIN_CAPTURE_BYTES);

        let outcome = tokio::time::timeout(timeout, collect_output(&mut child, capture)).await;

        let (status, stdout, stderr) = match outcome {
            Ok(Ok(collected)) => collected,
            Ok(Err(e)) => {
                warn!(command = %command_line, error = %e, "Command execution failed");
                return Err(WardError::executor_failure(command_line, e.to_string()));
            }
            Err(_) => {
                // Kill and reap so nothing outlives the call.
                if let Err(e) = child.kill().await {
                    warn!(command = %command_line, error = %e, "Failed to kill timed out command");
                }
                warn!(
                    command = %command_line,
                    timeout_ms = %timeout.as_millis(),
                    "Command timed out and was killed"
                );
                return Err(WardError::command_timeout(command_line, timeout));
            }
        };

        Ok(build_result(status, &stdout, &stderr, max_output_chars))
    }

    /// The directory commands run in.
    #[must_use]
    pub fn working_dir(&self) -> PathBuf {
        self.resolver.root().to_path_buf()
    }
}

/// The part of a word that may name a path: `value` in `--flag=value`, the
/// attached value in `-Xvalue`, or the whole word otherwise.
fn path_candidate(piece: &str) -> Option<&str> {
    let value = if let Some(long) = piece.strip_prefix("--") {
        long.split_once('=')?.1
    } else if let Some(short) = piece.strip_prefix('-') {
        let (offset, _) = short.char_indices().nth(1)?;
        &short[offset..]
    } else {
        piece
    };
    (!value.is_empty()).then_some(value)
}

/// Reads both pipes to completion and waits for the child.
async fn collect_output(
    child: &mut Child,
    capture: usize,
) -> std::io::Result<(ExitStatus, Captured, Captured)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (stdout, stderr) = tokio::try_join!(read_capped(stdout, capture), read_capped(stderr, capture))?;
    let status = child.wait().await?;
    Ok((status, stdout, stderr))
}

/// Bytes kept from one pipe, and whether more were discarded.
#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    overflowed: bool,
}

/// Reads `reader` to EOF keeping at most `cap` bytes. The remainder is
/// drained so the child never blocks on a full pipe.
async fn read_capped<R>(reader: Option<R>, cap: usize) -> std::io::Result<Captured>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Captured::default();
    let Some(mut reader) = reader else {
        return Ok(captured);
    };

    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let room = cap.saturating_sub(captured.bytes.len());
        if n > room {
            captured.overflowed = true;
        }
        captured.bytes.extend_from_slice(&buf[..n.min(room)]);
    }
    Ok(captured)
}

fn build_result(
    status: ExitStatus,
    stdout: &Captured,
    stderr: &Captured,
    max_output_chars: usize,
) -> CommandResult {
    let stdout_text = String::from_utf8_lossy(&stdout.bytes).trim().to_string();
    let stderr_text = String::from_utf8_lossy(&stderr.bytes).trim().to_string();

    let mut combined = if stdout_text.is_empty() {
        "(no stdout)".to_string()
    } else {
        stdout_text.clone()
    };
    if !stderr_text.is_empty() {
        combined.push_str("\n[stderr]\n");
        combined.push_str(&stderr_text);
    }

    let (output, cut) = truncate_chars(&combined, max_output_chars);
    let truncated = cut || stdout.overflowed || stderr.overflowed;
    if truncated {
        warn!(
            max_chars = max_output_chars,
            "Command output truncated"
        );
    }

    CommandResult {
        stdout: stdout_text,
        stderr: stderr_text,
        output,
        exit_code: status.code(),
        truncated,
    }
}
