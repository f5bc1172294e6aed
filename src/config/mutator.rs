//! Scope-file mutation
//!
//! The only writer of scope configuration files. Mutations follow
//! load-modify-save with an atomic temp-file-and-rename write, so a failed
//! write leaves the file unchanged. Unknown keys round-trip untouched;
//! comments are not preserved.

use std::path::Path;

use crate::common::fs::atomic_write;
use crate::config::entry::MarketplaceConfigEntry;
use crate::config::reader::read_scope_file;
use crate::config::scope::{Scope, ScopeFile};
use crate::error::{ConfigError, ConfigResult};

/// Append a marketplace entry to a scope file.
///
/// Creates the file (and parent directories) when absent. Fails when the
/// scope file already has an entry with the same name; uniqueness across
/// scopes is the caller's concern.
pub fn append_entry(
    scope: Scope,
    path: &Path,
    entry: MarketplaceConfigEntry,
) -> ConfigResult<()> {
    let mut file = read_scope_file(scope, path)?
        .map(|loaded| loaded.file)
        .unwrap_or_default();

    if file.marketplaces().iter().any(|m| m.name == entry.name) {
        return Err(ConfigError::Validation {
            scope,
            path: path.display().to_string(),
            field: Some("marketplaces".to_string()),
            message: format!(
                "marketplace '{}' already exists in the {scope} configuration",
                entry.name
            ),
        });
    }

    file.marketplaces.get_or_insert_with(Vec::new).push(entry);
    save_scope_file(scope, path, &file)
}

/// Remove the marketplace entry with the given name from a scope file.
///
/// An emptied list is kept as `marketplaces: []` rather than dropping the
/// key, so later loads see an explicit empty list instead of defaults.
/// Returns the removed entry.
pub fn remove_entry(
    scope: Scope,
    path: &Path,
    name: &str,
) -> ConfigResult<MarketplaceConfigEntry> {
    let mut file = read_scope_file(scope, path)?
        .map(|loaded| loaded.file)
        .ok_or_else(|| ConfigError::NotFound {
            scope,
            expected_path: path.display().to_string(),
        })?;

    let entries = file.marketplaces.get_or_insert_with(Vec::new);
    let position = entries.iter().position(|m| m.name == name).ok_or_else(|| {
        ConfigError::Validation {
            scope,
            path: path.display().to_string(),
            field: Some("marketplaces".to_string()),
            message: format!("no marketplace named '{name}' in the {scope} configuration"),
        }
    })?;
    let removed = entries.remove(position);

    save_scope_file(scope, path, &file)?;
    Ok(removed)
}

fn save_scope_file(scope: Scope, path: &Path, file: &ScopeFile) -> ConfigResult<()> {
    let content = serde_yaml::to_string(file).map_err(|e| ConfigError::Validation {
        scope,
        path: path.display().to_string(),
        field: None,
        message: format!("failed to serialize configuration: {e}"),
    })?;

    atomic_write(path, &content).map_err(|e| ConfigError::Io {
        scope,
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
