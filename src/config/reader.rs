//! Scope-file reader
//!
//! Loads and validates a single scope file. Outcomes:
//! - absent file: `Ok(None)` (an absent scope is not an error)
//! - empty file or YAML null document: `Ok(Some(default))`
//! - YAML syntax error: `ConfigError::Yaml` with line/column
//! - schema violation: `ConfigError::Validation` naming the field
//! - other I/O failure: `ConfigError::Io`
//!
//! Unknown top-level keys are preserved and reported through the warning
//! channel, never rejected.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::config::entry::check_marketplace_name;
use crate::config::scope::{Scope, ScopeFile};
use crate::error::{ConfigError, ConfigResult};

/// Top-level keys the schema currently knows
const KNOWN_KEYS: &[&str] = &["marketplaces", "logging"];

/// A non-fatal observation made while reading a scope file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub scope: Scope,
    pub path: String,
    pub key: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown key '{}' in {} configuration ({})",
            self.key, self.scope, self.path
        )
    }
}

/// A successfully read scope file together with its warnings
#[derive(Debug, Clone, Default)]
pub struct LoadedScope {
    pub file: ScopeFile,
    pub warnings: Vec<ConfigWarning>,
}

/// Read and validate one scope file.
pub fn read_scope_file(scope: Scope, path: &Path) -> ConfigResult<Option<LoadedScope>> {
    let display_path = path.display().to_string();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Io {
                scope,
                path: display_path,
                message: e.to_string(),
            });
        }
    };

    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| yaml_error(scope, &display_path, &e))?;

    if value.is_null() {
        return Ok(Some(LoadedScope::default()));
    }

    let file: ScopeFile =
        serde_yaml::from_value(value).map_err(|e| ConfigError::Validation {
            scope,
            path: display_path.clone(),
            field: None,
            message: e.to_string(),
        })?;

    validate_scope_file(scope, &display_path, &file)?;

    let warnings = unknown_key_warnings(scope, &display_path, &file);
    Ok(Some(LoadedScope { file, warnings }))
}

fn yaml_error(scope: Scope, path: &str, err: &serde_yaml::Error) -> ConfigError {
    let location = err.location();
    ConfigError::Yaml {
        scope,
        path: path.to_string(),
        line: location.as_ref().map(serde_yaml::Location::line),
        column: location.as_ref().map(serde_yaml::Location::column),
        message: err.to_string(),
    }
}

fn validate_scope_file(scope: Scope, path: &str, file: &ScopeFile) -> ConfigResult<()> {
    if file.logging.is_some() && scope != Scope::Global {
        return Err(ConfigError::Validation {
            scope,
            path: path.to_string(),
            field: Some("logging".to_string()),
            message: format!(
                "logging may only be configured in the global scope, not in the {scope} scope"
            ),
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for entry in file.marketplaces() {
        if let Some(message) = check_marketplace_name(&entry.name) {
            return Err(ConfigError::Validation {
                scope,
                path: path.to_string(),
                field: Some("marketplaces".to_string()),
                message,
            });
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation {
                scope,
                path: path.to_string(),
                field: Some("marketplaces".to_string()),
                message: format!(
                    "duplicate marketplace name '{}' in {scope} configuration",
                    entry.name
                ),
            });
        }
    }

    Ok(())
}

fn unknown_key_warnings(scope: Scope, path: &str, file: &ScopeFile) -> Vec<ConfigWarning> {
    file.extra
        .keys()
        .filter_map(serde_yaml::Value::as_str)
        .filter(|key| !KNOWN_KEYS.contains(key))
        .map(|key| ConfigWarning {
            scope,
            path: path.to_string(),
            key: key.to_string(),
        })
        .collect()
}
