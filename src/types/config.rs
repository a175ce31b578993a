//! Configuration types for ward.
//!
//! [`WorkspaceConfig`] carries the two process-wide values every tool
//! depends on: the workspace root and the command allow-list. It is built
//! once at startup, wrapped in an `Arc`, and handed to each component.
//!
//! Settings can come from a TOML file ([`ConfigFile`]) whose default
//! location is the platform config directory:
//!
//! ```toml
//! workspace_root = "/workspace"
//! allowed_commands = ["ls", "cat", "grep"]
//! check_path_arguments = true
//! timeout_seconds = 5
//! max_output_chars = 4000
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Programs permitted by default.
pub static DEFAULT_ALLOWED_COMMANDS: Lazy<BTreeSet<String>> = Lazy::new(|| {
    [
        "ls", "pwd", "cat", "head", "tail", "stat", "wc", "find", "grep", "sed",
    ]
    .into_iter()
    .map(String::from)
    .collect()
});

/// Default wall-clock bound for `bash.run`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default character budget for tool output.
pub const DEFAULT_MAX_OUTPUT_CHARS: usize = 4000;

/// Errors raised while building a [`WorkspaceConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The workspace root does not exist or cannot be resolved.
    #[error("workspace root {path:?} cannot be resolved: {source}")]
    RootUnresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workspace root is not a directory.
    #[error("workspace root {0:?} is not a directory")]
    RootNotDirectory(PathBuf),

    /// The config file could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ConfigFile`].
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Immutable sandbox configuration shared by all tools.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use ward::types::config::WorkspaceConfig;
///
/// let config = WorkspaceConfig::new("/workspace")?
///     .with_path_argument_check(true)
///     .with_default_timeout(Duration::from_secs(10));
/// assert!(config.is_allowed("ls"));
/// # Ok::<(), ward::types::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    root: PathBuf,
    allowed_commands: BTreeSet<String>,
    check_path_arguments: bool,
    default_timeout: Duration,
    default_max_output_chars: usize,
}

impl WorkspaceConfig {
    /// Creates a configuration rooted at `root` with the default allow-list.
    ///
    /// The root is canonicalized so that it is absolute and symlink-free.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist or is not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .map_err(|source| ConfigError::RootUnresolvable {
                path: root.to_path_buf(),
                source,
            })?;
        if !canonical.is_dir() {
            return Err(ConfigError::RootNotDirectory(canonical));
        }

        Ok(Self {
            root: canonical,
            allowed_commands: DEFAULT_ALLOWED_COMMANDS.clone(),
            check_path_arguments: false,
            default_timeout: DEFAULT_TIMEOUT,
            default_max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
        })
    }

    /// Replaces the allow-list.
    #[must_use]
    pub fn with_allowed_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables rejection of command arguments that point outside the root.
    #[must_use]
    pub fn with_path_argument_check(mut self, enabled: bool) -> Self {
        self.check_path_arguments = enabled;
        self
    }

    /// Sets the timeout used when a `bash.run` call omits one.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Sets the output budget used when a call omits `max_output_chars`.
    #[must_use]
    pub fn with_default_max_output_chars(mut self, max: usize) -> Self {
        self.default_max_output_chars = max;
        self
    }

    /// The canonical workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The allow-list, in sorted order.
    #[must_use]
    pub fn allowed_commands(&self) -> &BTreeSet<String> {
        &self.allowed_commands
    }

    /// Returns `true` if `program` may be executed.
    #[must_use]
    pub fn is_allowed(&self, program: &str) -> bool {
        self.allowed_commands.contains(program)
    }

    #[must_use]
    pub fn check_path_arguments(&self) -> bool {
        self.check_path_arguments
    }

    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    #[must_use]
    pub fn default_max_output_chars(&self) -> usize {
        self.default_max_output_chars
    }
}

/// On-disk configuration. Every field is optional; unset fields keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Directory all tools are confined to.
    pub workspace_root: Option<PathBuf>,
    /// Replacement allow-list.
    pub allowed_commands: Option<Vec<String>>,
    /// Reject command arguments that escape the workspace.
    pub check_path_arguments: Option<bool>,
    /// Default `bash.run` timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// Default output budget in characters.
    pub max_output_chars: Option<usize>,
}

impl ConfigFile {
    /// Loads a config file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the default config file path (`<config dir>/config.toml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        crate::util::get_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Builds a [`WorkspaceConfig`], preferring `root_override` over the file's root
    /// and falling back to `fallback_root` when neither is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen root is not an existing directory.
    pub fn into_workspace_config(
        self,
        root_override: Option<PathBuf>,
        fallback_root: &Path,
    ) -> Result<WorkspaceConfig, ConfigError> {
        let root = root_override
            .or(self.workspace_root)
            .unwrap_or_else(|| fallback_root.to_path_buf());

        let mut config = WorkspaceConfig::new(root)?;
        if let Some(commands) = self.allowed_commands {
            config = config.with_allowed_commands(commands);
        }
        if let Some(check) = self.check_path_arguments {
            config = config.with_path_argument_check(check);
        }
        if let Some(secs) = self.timeout_seconds {
            config = config.with_default_timeout(Duration::from_secs(secs));
        }
        if let Some(max) = self.max_output_chars {
            config = config.with_default_max_output_chars(max);
        }
        Ok(config)
    }
}
