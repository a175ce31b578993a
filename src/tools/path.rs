//! Workspace path confinement.
//!
//! [`PathResolver`] turns caller-supplied path strings into canonical paths
//! that are guaranteed, at resolution time, to lie inside the workspace
//! root. `.`, `..` and symlinks are resolved before the containment check,
//! including for paths that do not exist yet.

use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{WardError, WardResult};
use crate::types::config::WorkspaceConfig;

/// A canonical path inside the workspace root.
///
/// Containment is only guaranteed at the moment of resolution; the file may
/// be moved or replaced afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
    requested: String,
}

impl ResolvedPath {
    /// The canonical absolute path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// The path string the caller asked for, used in messages.
    #[must_use]
    pub fn requested(&self) -> &str {
        &self.requested
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Resolves paths against a fixed workspace root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            root: config.root().to_path_buf(),
        }
    }

    /// The canonical workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` to a file path inside the workspace.
    ///
    /// Relative paths are joined onto the root; absolute paths are taken as
    /// given and must still land inside it. With `ensure_parent` set, the
    /// parent directory chain is created once every check has passed.
    ///
    /// # Errors
    ///
    /// - [`WardError::PathEscape`] if the canonical path is outside the root
    /// - [`WardError::InvalidTarget`] if it is an existing directory or a
    ///   symlink that cannot be resolved
    /// - [`WardError::FileIo`] if parent directories cannot be created
    pub fn resolve(&self, path: &str, ensure_parent: bool) -> WardResult<ResolvedPath> {
        let canonical = self.contain(path)?;

        if canonical.is_dir() {
            debug!(path = %path, "Rejected directory target");
            return Err(WardError::invalid_target(path, "it is a directory"));
        }

        if ensure_parent {
            if let Some(parent) = canonical.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    WardError::file_io(path, format!("failed to create parent directories: {e}"))
                })?;
            }
        }

        Ok(ResolvedPath {
            path: canonical,
            requested: path.to_string(),
        })
    }

    /// Canonicalizes `path` and checks it is inside the root, without
    /// rejecting directories and without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Same as [`PathResolver::resolve`], minus the directory check.
    pub fn contain(&self, path: &str) -> WardResult<PathBuf> {
        let candidate = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.root.join(path)
        };

        let canonical = canonicalize_lenient(&candidate).map_err(|e| {
            debug!(path = %path, error = %e, "Symlink resolution failed");
            WardError::invalid_target(path, format!("cannot resolve symbolic link: {e}"))
        })?;

        if !canonical.starts_with(&self.root) {
            warn!(
                path = %path,
                canonical_path = %canonical.display(),
                root = %self.root.display(),
                "Security: path escapes workspace root"
            );
            return Err(WardError::path_escape(path));
        }

        Ok(canonical)
    }
}

/// Canonicalizes a path whose tail may not exist yet.
///
/// Walks the components in order. Existing symlinks are resolved with
/// `fs::canonicalize`; missing components are appended lexically, and `..`
/// pops the last resolved component. A symlink reached after a `..` is
/// therefore still followed.
fn canonicalize_lenient(candidate: &Path) -> std::io::Result<PathBuf> {
    let mut resolved = PathBuf::new();

    for component in candidate.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                // Unstatable components cannot be followed by the OS either,
                // so they are kept lexically.
                if let Ok(meta) = fs::symlink_metadata(&resolved) {
                    if meta.file_type().is_symlink() {
                        resolved = fs::canonicalize(&resolved)?;
                    }
                }
            }
        }
    }

    Ok(resolved)
}
