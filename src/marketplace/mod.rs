//! Marketplace acquisition and management
//!
//! A marketplace is a catalog of bundles identified by the name declared in
//! its `marketplace.json`, distributed as a git repository or a local
//! directory. This module covers the whole life cycle:
//! - [`manifest`]: parsing and validating `marketplace.json`
//! - [`state`]: the internal record of installed marketplaces
//! - [`info`]: the public projection returned by operations
//! - [`service`]: the add/remove/list/get facade

pub mod info;
pub mod manifest;
pub mod service;
pub mod state;

pub use info::MarketplaceInfo;
pub use manifest::{BundleEntry, Contact, MarketplaceManifest, MANIFEST_FILE};
pub use service::Marketplace;
pub use state::{MarketplaceState, StateFile};
