//! Command implementations
//!
//! Thin wrappers over the core library: each command resolves paths, builds
//! the service, runs one operation, and renders the outcome for the
//! terminal.

pub mod completions;
pub mod config;
pub mod marketplace;
