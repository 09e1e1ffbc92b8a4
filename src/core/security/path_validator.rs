use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::core::config::SecurityConfig;

/// Symlinks followed while resolving one path before giving up.
const MAX_SYMLINK_HOPS: usize = 40;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("path must not be empty")]
    EmptyPath,

    #[error("{path} is outside the allowed directories")]
    OutsideAllowedDirectories { path: String },

    #[error("Cannot resolve path '{path}': {error}")]
    CannotResolve { path: String, error: io::Error },
}

/// Allow-list of base directories for filesystem access.
///
/// Base directories are canonicalized once, when the policy is built. Bases
/// that do not exist are skipped.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    roots: Vec<PathBuf>,
}

impl PathPolicy {
    pub fn new(config: &SecurityConfig) -> Self {
        let roots = config
            .allowed_directories
            .iter()
            .filter_map(|dir| match dir.canonicalize() {
                Ok(root) => Some(root),
                Err(e) => {
                    warn!("Ignoring allowed directory {:?}: {}", dir, e);
                    None
                }
            })
            .collect();

        Self { roots }
    }

    /// The canonical allow-listed base directories.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve `input_path` to an absolute path inside the allow-list.
    ///
    /// The path does not need to exist. Relative paths are taken from the
    /// working directory, `.` and `..` are folded lexically, and the longest
    /// existing prefix is canonicalized so symlinks cannot point outside the
    /// allowed directories. Dangling symlinks are followed to their target.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let policy = PathPolicy::new(&config.security);
    /// let safe_path = policy.resolve("/tmp/notes/today.txt").await?;
    /// ```
    pub async fn resolve(&self, input_path: &str) -> Result<PathBuf, PathSecurityError> {
        let absolute = self.absolute(input_path)?;

        let resolved = canonicalize_existing_prefix(&absolute)
            .await
            .map_err(|error| cannot_resolve(input_path, error))?;

        self.contain(input_path, resolved)
    }

    /// Resolve `input_path` without following a symlink in its last component.
    ///
    /// Used for operations on the directory entry itself (delete): the parent
    /// is resolved like [`resolve`](Self::resolve) and the final name is
    /// appended unchanged.
    pub async fn resolve_entry(&self, input_path: &str) -> Result<PathBuf, PathSecurityError> {
        let absolute = self.absolute(input_path)?;

        let (Some(parent), Some(name)) = (absolute.parent(), absolute.file_name()) else {
            return self.resolve(input_path).await;
        };

        let mut resolved = canonicalize_existing_prefix(parent)
            .await
            .map_err(|error| cannot_resolve(input_path, error))?;
        resolved.push(name);

        self.contain(input_path, resolved)
    }

    fn absolute(&self, input_path: &str) -> Result<PathBuf, PathSecurityError> {
        if input_path.trim().is_empty() {
            return Err(PathSecurityError::EmptyPath);
        }

        absolutize(Path::new(input_path)).map_err(|error| cannot_resolve(input_path, error))
    }

    fn contain(&self, input_path: &str, resolved: PathBuf) -> Result<PathBuf, PathSecurityError> {
        if !self.roots.iter().any(|root| resolved.starts_with(root)) {
            return Err(PathSecurityError::OutsideAllowedDirectories {
                path: input_path.to_string(),
            });
        }

        Ok(resolved)
    }
}

fn cannot_resolve(input_path: &str, error: io::Error) -> PathSecurityError {
    PathSecurityError::CannotResolve {
        path: input_path.to_string(),
        error,
    }
}

/// Make `path` absolute and fold `.`/`..` without touching the filesystem.
fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Canonicalize the deepest resolvable ancestor and re-append the rest.
///
/// Ancestors that cannot be canonicalized (missing, or a file used as a
/// directory) are walked past, so the containment check still runs. A
/// component that is a dangling symlink is replaced by its target and the
/// walk starts over, so the returned path never goes through a link.
async fn canonicalize_existing_prefix(path: &Path) -> io::Result<PathBuf> {
    let mut pending = path.to_path_buf();
    let mut hops = 0;

    'restart: loop {
        let mut missing = Vec::new();
        let mut current = pending.clone();

        loop {
            match tokio::fs::canonicalize(&current).await {
                Ok(mut canonical) => {
                    for part in missing.iter().rev() {
                        canonical.push(part);
                    }
                    return Ok(canonical);
                }
                Err(e) => {
                    let is_link = tokio::fs::symlink_metadata(&current)
                        .await
                        .is_ok_and(|m| m.file_type().is_symlink());

                    if is_link {
                        hops += 1;
                        if hops > MAX_SYMLINK_HOPS {
                            return Err(io::Error::other("too many levels of symbolic links"));
                        }

                        let target = tokio::fs::read_link(&current).await?;
                        let base = current.parent().unwrap_or(Path::new("/"));
                        let mut next = absolutize(&base.join(target))?;
                        for part in missing.iter().rev() {
                            next.push(part);
                        }
                        pending = next;
                        continue 'restart;
                    }

                    let (Some(parent), Some(name)) = (current.parent(), current.file_name())
                    else {
                        return Err(e);
                    };
                    missing.push(name.to_os_string());
                    current = parent.to_path_buf();
                }
            }
        }
    }
}
