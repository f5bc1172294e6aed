//! Public projection of a marketplace

use serde::Serialize;

use crate::source::MarketplaceSource;

/// What list/get/add/remove return about a marketplace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketplaceInfo {
    pub name: String,
    pub description: String,
    pub source: MarketplaceSource,
    pub bundle_count: usize,
}
