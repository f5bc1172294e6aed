//! Error types and handling for Nova
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Two top-level unions cover the whole crate:
//! - [`ConfigError`]: failures while discovering, reading, validating, or
//!   merging scope configuration files
//! - [`MarketplaceError`]: failures in marketplace operations, wrapping
//!   [`ConfigError`] where a configuration failure surfaces mid-operation
//!
//! Every variant carries enough structured context (scope, path, name,
//! line/column where available) for a pretty-printer to produce an
//! actionable message. Exit codes for the CLI live on the error types so
//! `main` stays a thin mapping.

pub mod config;
pub mod marketplace;

pub use config::ConfigError;
pub use marketplace::{FetchErrorKind, MarketplaceError};

/// Result alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result alias for marketplace operations
pub type Result<T> = std::result::Result<T, MarketplaceError>;
