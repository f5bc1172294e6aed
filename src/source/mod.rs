//! Marketplace source handling
//!
//! This module classifies user-supplied source strings into tagged
//! [`MarketplaceSource`] variants:
//! - Git URLs with an explicit scheme: `https://host/repo.git`, `ssh://...`
//! - SCP-style SSH: `git@host:owner/repo.git`
//! - Local directories: `./marketplaces/dev`, `/abs/path`, `~/path`
//! - GitHub shorthand: `owner/repo`
//!
//! Rules apply in that order; a string that looks like GitHub shorthand but
//! names an existing local directory classifies as `Local`, which favors the
//! developer-iteration case.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MarketplaceError, Result};

/// Schemes accepted for explicit git URLs
const GIT_SCHEMES: &[&str] = &["http", "https", "ssh", "git"];

/// How to obtain a marketplace's contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarketplaceSource {
    /// GitHub shorthand, expanded to `https://github.com/<repo>.git` at fetch time
    Github { repo: String },
    /// Git repository by URL (https, ssh, git, or SCP-style)
    Git { url: String },
    /// Local directory, stored canonicalized
    Local { path: PathBuf },
}

impl MarketplaceSource {
    /// Parse a user-supplied source string.
    ///
    /// `working_dir` anchors relative paths and the existing-directory check.
    pub fn parse(input: &str, working_dir: &Path) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(MarketplaceError::InvalidSource {
                input: input.to_string(),
                reason: "source must not be empty".to_string(),
            });
        }

        if let Some(source) = SchemeUrlParser::try_parse(input)? {
            return Ok(source);
        }
        if let Some(source) = SshParser::try_parse(input) {
            return Ok(source);
        }
        if let Some(source) = LocalPathParser::try_parse(input, working_dir) {
            return Ok(source);
        }
        if let Some(source) = GithubShorthandParser::try_parse(input) {
            return Ok(source);
        }

        Err(MarketplaceError::InvalidSource {
            input: input.to_string(),
            reason: "not a git URL, local directory, or owner/repo shorthand".to_string(),
        })
    }

    /// The URL a git clone of this source uses; `None` for local sources
    pub fn clone_url(&self) -> Option<String> {
        match self {
            Self::Github { repo } => Some(format!("https://github.com/{repo}.git")),
            Self::Git { url } => Some(url.clone()),
            Self::Local { .. } => None,
        }
    }
}

impl fmt::Display for MarketplaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Github { repo } => write!(f, "github:{repo}"),
            Self::Git { url } => f.write_str(url),
            Self::Local { path } => f.write_str(&path.display().to_string()),
        }
    }
}

/// Explicit-scheme URL parser (`scheme://...`)
struct SchemeUrlParser;

impl SchemeUrlParser {
    fn try_parse(input: &str) -> Result<Option<MarketplaceSource>> {
        let Some((scheme, _rest)) = input.split_once("://") else {
            return Ok(None);
        };
        if !GIT_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
            return Err(MarketplaceError::InvalidSource {
                input: input.to_string(),
                reason: format!("unsupported URL scheme '{scheme}' (supported: http, https, ssh, git)"),
            });
        }
        Ok(Some(MarketplaceSource::Git {
            url: input.to_string(),
        }))
    }
}

/// SCP-style SSH parser (`git@host:path`)
struct SshParser;

impl SshParser {
    fn try_parse(input: &str) -> Option<MarketplaceSource> {
        input.starts_with("git@").then(|| MarketplaceSource::Git {
            url: input.to_string(),
        })
    }
}

/// Local path parser: explicit prefixes, tilde, or an existing directory
struct LocalPathParser;

impl LocalPathParser {
    fn has_explicit_prefix(input: &str) -> bool {
        input.starts_with("./")
            || input.starts_with("../")
            || input == "."
            || input == ".."
            || input.starts_with('/')
            || input.starts_with('~')
    }

    fn expand_tilde(input: &str) -> Option<PathBuf> {
        let rest = input.strip_prefix('~')?;
        let home = dirs::home_dir()?;
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        Some(if rest.is_empty() {
            home
        } else {
            home.join(rest)
        })
    }

    fn try_parse(input: &str, working_dir: &Path) -> Option<MarketplaceSource> {
        let candidate = if input.starts_with('~') {
            Self::expand_tilde(input)?
        } else {
            PathBuf::from(input)
        };
        let anchored = if candidate.is_absolute() {
            candidate.clone()
        } else {
            working_dir.join(&candidate)
        };

        if Self::has_explicit_prefix(input) || anchored.is_dir() {
            let path = canonicalize_lenient(&anchored);
            return Some(MarketplaceSource::Local { path });
        }
        None
    }
}

/// GitHub shorthand parser (`owner/repo`)
struct GithubShorthandParser;

impl GithubShorthandParser {
    fn segment_ok(segment: &str) -> bool {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    }

    fn try_parse(input: &str) -> Option<MarketplaceSource> {
        let (owner, repo) = input.split_once('/')?;
        if repo.contains('/') || !Self::segment_ok(owner) || !Self::segment_ok(repo) {
            return None;
        }
        Some(MarketplaceSource::Github {
            repo: input.to_string(),
        })
    }
}

/// Canonicalize a path, falling back to lexical normalization and finally to
/// the unresolved absolute form when the target does not exist yet.
pub(crate) fn canonicalize_lenient(path: &Path) -> PathBuf {
    use normpath::PathExt;

    dunce::canonicalize(path)
        .or_else(|_| path.normalize().map(normpath::BasePathBuf::into_path_buf))
        .unwrap_or_else(|_| path.to_path_buf())
}
