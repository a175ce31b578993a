//! Centralized error types for ward.
//!
//! Every failure a workspace tool can report is a variant of [`WardError`].
//! Tool callers never see these as panics: the executor renders them into
//! the textual result channel, so an agent can read the message and retry
//! with corrected arguments.
//!
//! # Example
//!
//! ```
//! use ward::error::{WardError, WardResult};
//!
//! fn check(path: &str) -> WardResult<()> {
//!     if path.starts_with("..") {
//!         return Err(WardError::path_escape(path));
//!     }
//!     Ok(())
//! }
//!
//! let err = check("../etc/passwd").unwrap_err();
//! assert!(err.is_security_related());
//! assert_eq!(err.kind(), "path_escape");
//! ```

use std::fmt;
use std::time::Duration;

/// Result type alias using `WardError`.
pub type WardResult<T> = Result<T, WardError>;

/// Error union for path resolution, command gating and ranged text editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WardError {
    // ============== Path Errors ==============
    /// The resolved path falls outside the workspace root.
    PathEscape {
        /// The path as supplied by the caller.
        path: String,
    },

    /// The target exists but cannot be used as a file.
    InvalidTarget {
        /// The path as supplied by the caller.
        path: String,
        /// Why the target was rejected.
        reason: String,
    },

    // ============== File Errors ==============
    /// The target file does not exist.
    NotFound {
        /// The path as supplied by the caller.
        path: String,
    },

    /// The target file has zero lines.
    EmptyFile {
        /// The path as supplied by the caller.
        path: String,
    },

    /// The requested line range violates `1 <= start <= end <= total`.
    InvalidRange {
        /// Requested first line.
        start: usize,
        /// Requested last line.
        end: usize,
        /// Current number of lines in the file.
        total: usize,
    },

    /// Any other I/O failure while reading or writing a file.
    FileIo {
        /// The path as supplied by the caller.
        path: String,
        /// Description of the I/O error.
        message: String,
    },

    // ============== Command Errors ==============
    /// The command line contained no tokens.
    EmptyCommand,

    /// The command line could not be split into words.
    MalformedCommand {
        /// Description of the parse failure.
        reason: String,
    },

    /// The program is not in the allow-list.
    CommandNotAllowed {
        /// The rejected program name.
        program: String,
        /// The allow-list, sorted.
        allowed: Vec<String>,
    },

    /// The command exceeded its wall-clock bound and was terminated.
    CommandTimeout {
        /// The command line that timed out.
        command: String,
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// The process could not be launched or awaited.
    ExecutorFailure {
        /// The command line being executed.
        command: String,
        /// Description of the OS-level failure.
        message: String,
    },

    // ============== Boundary Errors ==============
    /// Tool arguments were missing or had the wrong shape.
    InvalidArguments {
        /// The tool being invoked.
        tool: String,
        /// Description of the decoding failure.
        message: String,
    },
}

// ============== Constructor Methods ==============

impl WardError {
    /// Creates a path escape error.
    #[must_use]
    pub fn path_escape(path: impl Into<String>) -> Self {
        Self::PathEscape { path: path.into() }
    }

    /// Creates an invalid target error.
    #[must_use]
    pub fn invalid_target(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an empty file error.
    #[must_use]
    pub fn empty_file(path: impl Into<String>) -> Self {
        Self::EmptyFile { path: path.into() }
    }

    /// Creates an invalid range error.
    #[must_use]
    pub fn invalid_range(start: usize, end: usize, total: usize) -> Self {
        Self::InvalidRange { start, end, total }
    }

    /// Creates a file I/O error.
    #[must_use]
    pub fn file_io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileIo {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed command error.
    #[must_use]
    pub fn malformed_command(reason: impl Into<String>) -> Self {
        Self::MalformedCommand {
            reason: reason.into(),
        }
    }

    /// Creates a command-not-allowed error. The allow-list is sorted here.
    #[must_use]
    pub fn command_not_allowed<I, S>(program: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        allowed.sort();
        Self::CommandNotAllowed {
            program: program.into(),
            allowed,
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn command_timeout(command: impl Into<String>, timeout: Duration) -> Self {
        Self::CommandTimeout {
            command: command.into(),
            timeout,
        }
    }

    /// Creates an executor failure error.
    #[must_use]
    pub fn executor_failure(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutorFailure {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid arguments error.
    #[must_use]
    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

// ============== Category Methods ==============

impl WardError {
    /// Returns `true` if repeating the same call might succeed.
    ///
    /// Validation failures are deterministic and never retryable with the
    /// same input. Timeouts and OS-level failures may be transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CommandTimeout { .. } | Self::ExecutorFailure { .. } | Self::FileIo { .. }
        )
    }

    /// Returns `true` if this error is a sandbox policy rejection.
    #[must_use]
    pub fn is_security_related(&self) -> bool {
        matches!(
            self,
            Self::PathEscape { .. } | Self::CommandNotAllowed { .. }
        )
    }

    /// Returns a stable snake_case tag for this error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PathEscape { .. } => "path_escape",
            Self::InvalidTarget { .. } => "invalid_target",
            Self::NotFound { .. } => "not_found",
            Self::EmptyFile { .. } => "empty_file",
            Self::InvalidRange { .. } => "invalid_range",
            Self::FileIo { .. } => "file_io",
            Self::EmptyCommand => "empty_command",
            Self::MalformedCommand { .. } => "malformed_command",
            Self::CommandNotAllowed { .. } => "command_not_allowed",
            Self::CommandTimeout { .. } => "command_timeout",
            Self::ExecutorFailure { .. } => "executor_failure",
            Self::InvalidArguments { .. } => "invalid_arguments",
        }
    }
}

// ============== Display Implementation ==============

impl fmt::Display for WardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathEscape { path } => {
                write!(f, "Path '{path}' escapes the workspace root.")
            }
            Self::InvalidTarget { path, reason } => {
                write!(f, "Path '{path}' is not a usable file: {reason}.")
            }
            Self::NotFound { path } => {
                write!(f, "File '{path}' does not exist.")
            }
            Self::EmptyFile { path } => {
                write!(
                    f,
                    "File '{path}' is empty; unable to replace specific line ranges."
                )
            }
            Self::InvalidRange { start, end, total } => {
                write!(
                    f,
                    "Invalid range {start}-{end}. File currently has {total} lines."
                )
            }
            Self::FileIo { path, message } => {
                write!(f, "I/O error for '{path}': {message}")
            }
            Self::EmptyCommand => {
                write!(f, "Provide a command to run (e.g. 'ls stages').")
            }
            Self::MalformedCommand { reason } => {
                write!(f, "Could not parse command: {reason}.")
            }
            Self::CommandNotAllowed { program, allowed } => {
                write!(
                    f,
                    "Command '{program}' is not allowed. Valid options: {}.",
                    allowed.join(", ")
                )
            }
            Self::CommandTimeout { timeout, .. } => {
                write!(f, "Command timed out after {}s.", format_secs(*timeout))
            }
            Self::ExecutorFailure { message, .. } => {
                write!(f, "Failed to launch command: {message}")
            }
            Self::InvalidArguments { tool, message } => {
                write!(f, "Invalid arguments for {tool}: {message}")
            }
        }
    }
}

fn format_secs(d: Duration) -> String {
    if d.subsec_millis() == 0 {
        d.as_secs().to_string()
    } else {
        format!("{:.3}", d.as_secs_f64())
    }
}

impl std::error::Error for WardError {}

// ============== Unit Tests ==============
