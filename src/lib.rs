//! Nova - bundle manager core
//!
//! Nova manages bundles distributed through marketplaces: manifest-based
//! catalogs hosted in git repositories or on local filesystems. This crate
//! is the configuration and marketplace-acquisition core:
//! - [`config`]: layered configuration over global, project, and user scopes
//! - [`source`]: classification of user-supplied source strings
//! - [`fetch`]: materializing sources into local trees
//! - [`marketplace`]: manifest validation, state, and the service facade
//! - [`paths`]: XDG-style location discovery
//! - [`error`]: the two error unions everything returns
//!
//! The `nova` binary in this package is a thin CLI over these modules.

pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod marketplace;
pub mod paths;
pub mod source;
pub mod temp;

#[cfg(test)]
pub mod test_fixtures;
