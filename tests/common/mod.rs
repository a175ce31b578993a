//! Shared fixtures for ward integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use ward::tools::ToolExecutor;
use ward::types::config::WorkspaceConfig;

/// A throwaway workspace rooted in a temporary directory.
pub struct TestContext {
    /// Temporary directory used as the workspace root.
    pub temp_dir: tempfile::TempDir,
}

impl TestContext {
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            temp_dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// Returns the workspace root.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Default configuration rooted at this workspace.
    ///
    /// # Panics
    ///
    /// Panics if the root cannot be canonicalized.
    #[must_use]
    pub fn config(&self) -> WorkspaceConfig {
        WorkspaceConfig::new(self.temp_dir.path()).expect("failed to build config")
    }

    /// An executor over [`TestContext::config`].
    #[must_use]
    pub fn executor(&self) -> ToolExecutor {
        ToolExecutor::new(Arc::new(self.config()))
    }

    /// Creates a file in the workspace, including parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("failed to write file");
        path
    }

    /// Reads a workspace file back.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    #[must_use]
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.temp_dir.path().join(name)).expect("failed to read file")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
