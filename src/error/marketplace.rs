//! Marketplace error union
//!
//! Covers source parsing, fetching, manifest validation, state-file access,
//! and the add/remove/list/get operations. Configuration failures observed
//! mid-operation are wrapped via [`MarketplaceError::Config`] so callers see
//! a single union.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use super::config::ConfigError;

/// Classification of a failed fetch, derived from the underlying git error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    RepositoryNotFound,
    AuthenticationFailed,
    PermissionDenied,
    Network,
    Certificate,
    Ssl,
    Other,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RepositoryNotFound => "repository not found",
            Self::AuthenticationFailed => "authentication failed",
            Self::PermissionDenied => "permission denied",
            Self::Network => "network error",
            Self::Certificate => "certificate error",
            Self::Ssl => "ssl error",
            Self::Other => "error",
        };
        f.write_str(label)
    }
}

/// Errors produced by marketplace operations
#[derive(Error, Diagnostic, Debug)]
pub enum MarketplaceError {
    /// No marketplace matches the given name or source
    #[error("Marketplace '{target}' not found")]
    #[diagnostic(
        code(nova::marketplace::not_found),
        help("Run 'nova marketplace list' to see configured marketplaces")
    )]
    NotFound { target: String },

    /// The name exists in more than one scope and no scope was specified
    #[error("Marketplace '{name}' exists in multiple scopes: {scopes}")]
    #[diagnostic(
        code(nova::marketplace::ambiguous),
        help("Pass --scope to say which entry to operate on")
    )]
    Ambiguous { name: String, scopes: String },

    /// A marketplace with this name is already configured or installed
    #[error("Marketplace '{name}' already exists (source: {existing_source})")]
    #[diagnostic(
        code(nova::marketplace::already_exists),
        help("Remove the existing marketplace first, or pick a different one")
    )]
    AlreadyExists {
        name: String,
        existing_source: String,
    },

    /// The user-supplied source string matches no recognized form
    #[error("Invalid marketplace source '{input}': {reason}")]
    #[diagnostic(
        code(nova::marketplace::invalid_source),
        help("Valid forms: owner/repo, https://host/repo.git, git@host:repo.git, ./local/path")
    )]
    InvalidSource { input: String, reason: String },

    /// The fetched tree has no marketplace.json at its root
    #[error("No marketplace.json found in {dir}")]
    #[diagnostic(
        code(nova::manifest::missing),
        help("A marketplace must carry marketplace.json at its root")
    )]
    ManifestMissing { dir: String },

    /// marketplace.json is not syntactically valid JSON
    #[error("Invalid JSON in {path}: {detail}")]
    #[diagnostic(code(nova::manifest::json))]
    ManifestJson { path: String, detail: String },

    /// marketplace.json misses a required field or has it at the wrong type
    #[error("Invalid manifest {path}: missing or mistyped field '{field}'")]
    #[diagnostic(code(nova::manifest::schema))]
    ManifestSchema { path: String, field: String },

    /// Two bundles in the manifest declare the same name
    #[error("Invalid manifest {path}: duplicate bundle '{name}'")]
    #[diagnostic(code(nova::manifest::duplicate_bundle))]
    ManifestDuplicateBundle { path: String, name: String },

    /// A bundle's source path points outside the marketplace root
    #[error("Invalid manifest {path}: bundle '{bundle}' source '{source_path}' escapes the marketplace root")]
    #[diagnostic(code(nova::manifest::path_escape))]
    ManifestPathEscape {
        path: String,
        bundle: String,
        source_path: String,
    },

    /// Fetching the marketplace contents failed
    #[error("Failed to fetch {url}: {reason}")]
    #[diagnostic(
        code(nova::marketplace::fetch_failed),
        help("Check that the URL is correct and that you have access to the repository")
    )]
    FetchFailed {
        url: String,
        kind: FetchErrorKind,
        reason: String,
    },

    /// The fetch did not complete within the configured timeout
    #[error("Fetching {url} timed out after {seconds}s")]
    #[diagnostic(code(nova::marketplace::fetch_timeout))]
    FetchTimeout { url: String, seconds: u64 },

    /// The internal state file exists but cannot be interpreted
    #[error("Marketplace state file is corrupt: {path}")]
    #[diagnostic(
        code(nova::marketplace::state_corrupt),
        help("The state file is managed by Nova; restore it from a backup or delete it together with the marketplaces directory")
    )]
    StateCorrupt { path: String, detail: String },

    /// A mutation failed after the marketplace directory was created and
    /// compensation could not restore the previous state
    #[error("Marketplace '{name}' left inconsistent: {detail}")]
    #[diagnostic(code(nova::marketplace::inconsistent))]
    Inconsistent {
        name: String,
        marketplace_dir: String,
        state_path: String,
        detail: String,
    },

    /// An I/O failure outside the scope config files
    #[error("IO error at {path}: {message}")]
    #[diagnostic(code(nova::marketplace::io))]
    Io { path: String, message: String },

    /// A failure no other variant describes
    #[error("Internal error: {message}")]
    #[diagnostic(code(nova::marketplace::internal))]
    Internal { message: String },

    /// A configuration failure encountered during a marketplace operation
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

impl MarketplaceError {
    /// Exit code for the CLI wrapper; one code per error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidSource { .. } => 2,
            Self::NotFound { .. } | Self::Ambiguous { .. } => 3,
            Self::AlreadyExists { .. } => 4,
            Self::ManifestMissing { .. }
            | Self::ManifestJson { .. }
            | Self::ManifestSchema { .. }
            | Self::ManifestDuplicateBundle { .. }
            | Self::ManifestPathEscape { .. } => 5,
            Self::FetchFailed { .. } | Self::FetchTimeout { .. } => 6,
            Self::Config(e) => e.exit_code(),
            Self::StateCorrupt { .. }
            | Self::Inconsistent { .. }
            | Self::Io { .. }
            | Self::Internal { .. } => 70,
        }
    }
}

impl From<std::io::Error> for MarketplaceError {
    fn from(err: std::io::Error) -> Self {
        MarketplaceError::Io {
            path: "-".to_string(),
            message: err.to_string(),
        }
    }
}

/// I/O error tagged with the path it occurred at
pub fn io_at(path: impl Into<String>, err: &std::io::Error) -> MarketplaceError {
    MarketplaceError::Io {
        path: path.into(),
        message: err.to_string(),
    }
}
