//! Internal marketplace state (data.json)
//!
//! One record per installed marketplace, keyed by name, kept under the data
//! directory and distinct from user-visible configuration. A missing file
//! reads as an empty map; a file that exists but cannot be interpreted is a
//! hard error. Writes are atomic.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::fs::atomic_write;
use crate::error::{MarketplaceError, Result};
use crate::source::MarketplaceSource;

/// One installed marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceState {
    /// The source the marketplace was acquired from
    pub source: MarketplaceSource,
    /// Absolute path of the materialized tree
    pub install_location: PathBuf,
    /// When the tree was last (re)written
    pub last_updated: DateTime<Utc>,
}

/// The state file contents, keyed by marketplace name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateFile {
    pub marketplaces: BTreeMap<String, MarketplaceState>,
}

impl StateFile {
    /// Read the state file; a missing file is an empty map.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(MarketplaceError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        serde_json::from_str(&content).map_err(|e| MarketplaceError::StateCorrupt {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }

    /// Rewrite the state file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| MarketplaceError::Internal {
                message: format!("failed to serialize state: {e}"),
            })?;
        atomic_write(path, &content).map_err(|e| MarketplaceError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&MarketplaceState> {
        self.marketplaces.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.marketplaces.contains_key(name)
    }

    pub fn insert(&mut self, name: String, state: MarketplaceState) {
        self.marketplaces.insert(name, state);
    }

    pub fn remove(&mut self, name: &str) -> Option<MarketplaceState> {
        self.marketplaces.remove(name)
    }
}
