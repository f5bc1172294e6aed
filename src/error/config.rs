//! Configuration error union
//!
//! Covers scope-file discovery, reading, validation, merging, and the
//! environment overlay. Each variant is tagged with the scope it originated
//! from so callers can point at the offending file without parsing text.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::Scope;

/// Errors produced while loading or mutating configuration
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    /// A scope file was explicitly demanded but does not exist.
    ///
    /// The normal `load()` path treats missing files as absent scopes, never
    /// as errors; this variant is only produced when a caller named the
    /// scope directly (e.g. `marketplace remove --scope project` outside a
    /// project).
    #[error("Configuration file for {scope} scope not found: {expected_path}")]
    #[diagnostic(code(nova::config::not_found))]
    NotFound { scope: Scope, expected_path: String },

    /// The scope file is not syntactically valid YAML
    #[error("Invalid YAML in {scope} configuration: {path}")]
    #[diagnostic(
        code(nova::config::yaml),
        help("Fix the YAML syntax; the location below points at the first problem")
    )]
    Yaml {
        scope: Scope,
        path: String,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    /// The scope file is valid YAML but violates the configuration schema
    #[error("Invalid {scope} configuration in {path}: {message}")]
    #[diagnostic(code(nova::config::validation))]
    Validation {
        scope: Scope,
        path: String,
        field: Option<String>,
        message: String,
    },

    /// An I/O failure other than not-found while reading or writing a scope file
    #[error("Failed to access {scope} configuration {path}: {message}")]
    #[diagnostic(code(nova::config::io))]
    Io {
        scope: Scope,
        path: String,
        message: String,
    },

    /// A recognized `NOVA_*` override variable carries an unusable value
    #[error("Invalid value for environment variable {variable}: {message}")]
    #[diagnostic(code(nova::config::invalid_env))]
    InvalidEnv { variable: String, message: String },

    /// No configuration location can be determined for the scope
    ///
    /// Produced when `$HOME` and the XDG variables are all unset; discovery
    /// refuses to guess a path.
    #[error("No configuration location available for {scope} scope")]
    #[diagnostic(
        code(nova::config::no_location),
        help("Set HOME, or XDG_CONFIG_HOME / XDG_DATA_HOME explicitly")
    )]
    NoLocation { scope: Scope },
}

impl ConfigError {
    /// Exit code for the CLI wrapper. All configuration failures share one
    /// code; the diagnostic output carries the detail.
    pub fn exit_code(&self) -> i32 {
        7
    }

    /// The scope the error originated from, where one applies
    pub fn scope(&self) -> Option<Scope> {
        match self {
            Self::NotFound { scope, .. }
            | Self::Yaml { scope, .. }
            | Self::Validation { scope, .. }
            | Self::Io { scope, .. }
            | Self::NoLocation { scope } => Some(*scope),
            Self::InvalidEnv { .. } => None,
        }
    }
}

/// Shorthand for a validation error with a named field
pub fn validation(
    scope: Scope,
    path: impl Into<String>,
    field: Option<&str>,
    message: impl Into<String>,
) -> ConfigError {
    ConfigError::Validation {
        scope,
        path: path.into(),
        field: field.map(str::to_string),
        message: message.into(),
    }
}
