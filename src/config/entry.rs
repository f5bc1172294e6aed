//! Marketplace entries as they appear in scope configuration files

use serde::{Deserialize, Serialize};

use crate::source::MarketplaceSource;

/// Longest accepted marketplace name
pub const MAX_NAME_LEN: usize = 100;

/// One configured marketplace in a scope file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceConfigEntry {
    /// Unique name within the effective configuration
    pub name: String,

    /// How to obtain the marketplace contents
    pub source: MarketplaceSource,
}

/// Check a marketplace name against the naming rules.
///
/// Names are 1-100 characters of ASCII letters, digits, `_`, and `-`.
/// Returns a message describing the violation, or `None` when valid.
pub fn check_marketplace_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("marketplace name must not be empty".to_string());
    }
    if name.len() > MAX_NAME_LEN {
        return Some(format!(
            "marketplace name exceeds {MAX_NAME_LEN} characters"
        ));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Some(format!(
            "marketplace name '{name}' contains invalid character '{bad}' (allowed: letters, digits, '_', '-')"
        ));
    }
    None
}
