//! Layered configuration
//!
//! Nova reads up to three scope files (global, project, user), merges them
//! with a defined precedence, and applies environment overrides. This module
//! is organized by stage:
//! - [`scope`]: the `Scope` tag and the raw scope-file document
//! - [`entry`]: marketplace entries and name validation
//! - [`reader`]: loading and validating a single scope file
//! - [`merge`]: combining scopes into an [`EffectiveConfig`]
//! - [`env`]: the environment-variable overlay
//! - [`store`]: the [`ConfigStore`] seam and its implementations
//! - [`mutator`]: the only writer of scope files

pub mod entry;
pub mod env;
pub mod merge;
pub mod mutator;
pub mod reader;
pub mod scope;
pub mod store;

pub use entry::{check_marketplace_name, MarketplaceConfigEntry};
pub use env::DeployEnvironment;
pub use merge::{merge_scopes, EffectiveConfig};
pub use reader::{read_scope_file, ConfigWarning, LoadedScope};
pub use scope::{GlobalConfig, LogFormat, LoggingConfig, ProjectConfig, Scope, ScopeFile, UserConfig};
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore};
