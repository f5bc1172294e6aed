//! Marketplace fetching
//!
//! Materializes a [`MarketplaceSource`] into a fresh temporary directory:
//! - `Github{repo}` expands to `https://github.com/<repo>.git` and is
//!   shallow-cloned, then stripped of `.git`
//! - `Git{url}` is shallow-cloned the same way
//! - `Local{path}` is copied recursively (symlinks followed one level)
//!
//! Every fetch runs under a timeout (default 300 s); on expiry the partial
//! destination is discarded with the temp directory and a timeout error is
//! returned.

pub mod git;

use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::debug;

use crate::common::fs::{copy_dir_recursive, CopyOptions};
use crate::error::{marketplace::io_at, FetchErrorKind, MarketplaceError, Result};
use crate::source::MarketplaceSource;

/// Default fetch timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// A fetched marketplace tree, rooted in a temporary directory that is
/// removed on drop unless the tree is persisted
#[derive(Debug)]
pub struct FetchedTree {
    temp: TempDir,
}

impl FetchedTree {
    /// Root of the fetched tree
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Move the tree to `dest`, creating parent directories.
    ///
    /// Prefers a same-filesystem rename; falls back to copy-and-delete when
    /// the rename crosses filesystems.
    pub fn persist_to(self, dest: &Path) -> io::Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        if fs::rename(self.temp.path(), dest).is_ok() {
            return Ok(());
        }
        copy_dir_recursive(self.temp.path(), dest, &CopyOptions::default())
        // the temp dir cleans up the source copy on drop
    }
}

/// Fetches marketplace sources into temporary directories
pub struct Fetcher {
    timeout: Duration,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Materialize `source` into a fresh temporary directory.
    pub fn fetch(&self, source: &MarketplaceSource) -> Result<FetchedTree> {
        let temp = TempDir::new_in(crate::temp::temp_dir_base())
            .map_err(|e| io_at(crate::temp::temp_dir_base().display().to_string(), &e))?;
        let deadline = Instant::now() + self.timeout;

        match source {
            MarketplaceSource::Github { .. } | MarketplaceSource::Git { .. } => {
                // clone_url is Some for both git-backed variants
                let url = source.clone_url().unwrap_or_default();
                debug!(url = %url, "cloning marketplace");
                self.clone_into(&url, temp.path(), deadline)?;
            }
            MarketplaceSource::Local { path } => {
                debug!(path = %path.display(), "copying local marketplace");
                self.copy_into(path, temp.path(), deadline)?;
            }
        }

        Ok(FetchedTree { temp })
    }

    fn clone_into(&self, url: &str, target: &Path, deadline: Instant) -> Result<()> {
        git::clone_tree(url, target, deadline).map_err(|failure| match failure {
            git::CloneFailure::TimedOut => MarketplaceError::FetchTimeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            },
            git::CloneFailure::Failed { kind, reason } => MarketplaceError::FetchFailed {
                url: url.to_string(),
                kind,
                reason,
            },
        })
    }

    fn copy_into(&self, path: &Path, target: &Path, deadline: Instant) -> Result<()> {
        if !path.is_dir() {
            return Err(MarketplaceError::FetchFailed {
                url: path.display().to_string(),
                kind: FetchErrorKind::RepositoryNotFound,
                reason: "local path is not a directory".to_string(),
            });
        }

        let options = CopyOptions::exclude_git().with_deadline(deadline);
        copy_dir_recursive(path, target, &options).map_err(|e| {
            if e.kind() == io::ErrorKind::TimedOut {
                MarketplaceError::FetchTimeout {
                    url: path.display().to_string(),
                    seconds: self.timeout.as_secs(),
                }
            } else {
                MarketplaceError::FetchFailed {
                    url: path.display().to_string(),
                    kind: FetchErrorKind::Other,
                    reason: e.to_string(),
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_marketplace_tree, create_temp_dir};

    #[test]
    fn test_fetch_local_copies_tree() {
        let temp = create_temp_dir();
        let root = create_marketplace_tree(&temp, "official", &["alpha"]);

        let fetcher = Fetcher::default();
        let fetched = fetcher
            .fetch(&MarketplaceSource::Local { path: root })
            .expect("fetch");

        assert!(fetched.root().join("marketplace.json").exists());
        assert!(fetched.root().join("bundles/alpha").exists());
    }

    #[test]
    fn test_fetch_local_excludes_git_dir() {
        let temp = create_temp_dir();
        let root = create_marketplace_tree(&temp, "official", &[]);
        std::fs::create_dir_all(root.join(".git")).expect("create .git");
        std::fs::write(root.join(".git/HEAD"), "ref: main").expect("write");

        let fetched = Fetcher::default()
            .fetch(&MarketplaceSource::Local { path: root })
            .expect("fetch");
        assert!(!fetched.root().join(".git").exists());
    }

    #[test]
    fn test_fetch_missing_local_path_fails() {
        let temp = create_temp_dir();
        let err = Fetcher::default()
            .fetch(&MarketplaceSource::Local {
                path: temp.path().join("nowhere"),
            })
            .unwrap_err();
        match err {
            MarketplaceError::FetchFailed { kind, url, .. } => {
                assert_eq!(kind, FetchErrorKind::RepositoryNotFound);
                assert!(url.contains("nowhere"));
            }
            other => panic!("expected FetchFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_local_timeout_cleans_up() {
        let temp = create_temp_dir();
        let root = create_marketplace_tree(&temp, "official", &["alpha", "beta"]);

        let fetcher = Fetcher::new(Duration::ZERO);
        let err = fetcher
            .fetch(&MarketplaceSource::Local { path: root })
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::FetchTimeout { .. }));
    }

    #[test]
    fn test_persist_moves_tree() {
        let temp = create_temp_dir();
        let root = create_marketplace_tree(&temp, "official", &["alpha"]);
        let dest_base = create_temp_dir();
        let dest = dest_base.path().join("marketplaces/official");

        let fetched = Fetcher::default()
            .fetch(&MarketplaceSource::Local { path: root })
            .expect("fetch");
        fetched.persist_to(&dest).expect("persist");

        assert!(dest.join("marketplace.json").exists());
    }
}
