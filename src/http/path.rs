//! Request path resolution
//!
//! Turns the raw request target into a location under the served root and checks
//! whether a regular file lives there. Traversal segments are passed through as-is
//! unless confinement is enabled.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::logger;

/// Strip exactly one leading `/` from a request target
///
/// ```
/// use webworker::http::path::strip_leading_separator;
/// assert_eq!(strip_leading_separator("/page.html"), "page.html");
/// assert_eq!(strip_leading_separator("//etc/hosts"), "/etc/hosts");
/// assert_eq!(strip_leading_separator("page.html"), "page.html");
/// ```
pub fn strip_leading_separator(raw: &str) -> &str {
    raw.strip_prefix('/').unwrap_or(raw)
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    confine: bool,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            confine: false,
        }
    }

    /// Reject locations whose canonical form leaves the root
    #[must_use]
    pub fn confine_to_root(mut self, confine: bool) -> Self {
        self.confine = confine;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a storage-relative path under the root
    pub fn location(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Whether `location` names an existing regular file
    pub async fn exists(&self, location: &Path) -> bool {
        self.servable(location).await.is_some()
    }

    /// The path to open for `location`, or `None` when it is not servable
    ///
    /// When confined, this is the canonical path that passed the containment
    /// check, so the file opened later is the one that was checked.
    pub async fn servable(&self, location: &Path) -> Option<PathBuf> {
        let is_file = fs::metadata(location)
            .await
            .is_ok_and(|meta| meta.is_file());
        if !is_file {
            return None;
        }
        if self.confine {
            return self.contained(location).await;
        }
        Some(location.to_path_buf())
    }

    async fn contained(&self, location: &Path) -> Option<PathBuf> {
        let root = match fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "Root directory not accessible '{}': {e}",
                    self.root.display()
                ));
                return None;
            }
        };
        let target = fs::canonicalize(location).await.ok()?;
        if target.starts_with(&root) {
            return Some(target);
        }
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            location.display(),
            target.display()
        ));
        None
    }
}
