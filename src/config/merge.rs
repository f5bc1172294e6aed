//! Scope merging
//!
//! Combines the three optional stored scopes into one [`EffectiveConfig`].
//! Precedence for scalar fields and maps is user > project > global, merging
//! maps recursively; absent and null values never override set values. The
//! `marketplaces` sequence is the sole exception: it is concatenated in
//! global, project, user order and then checked for cross-scope name
//! collisions.
//!
//! The merge is implemented pairwise over [`PartialConfig`] so it is
//! associative with the empty partial as identity.

use serde::Serialize;

use crate::config::entry::MarketplaceConfigEntry;
use crate::config::env::DeployEnvironment;
use crate::config::reader::ConfigWarning;
use crate::config::scope::{GlobalConfig, LoggingConfig, ProjectConfig, Scope, ScopeFile, UserConfig};
use crate::error::{ConfigError, ConfigResult};

/// A marketplace entry tagged with the scope it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedEntry {
    pub scope: Scope,
    pub entry: MarketplaceConfigEntry,
}

/// Intermediate merge state; an empty partial is the merge identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialConfig {
    pub marketplaces: Vec<ScopedEntry>,
    pub logging: Option<(Scope, LoggingConfig)>,
    pub extra: serde_yaml::Mapping,
}

impl PartialConfig {
    /// Lift one scope file into merge state
    pub fn from_scope(scope: Scope, file: &ScopeFile) -> Self {
        Self {
            marketplaces: file
                .marketplaces()
                .iter()
                .cloned()
                .map(|entry| ScopedEntry { scope, entry })
                .collect(),
            logging: file.logging.clone().map(|l| (scope, l)),
            extra: file.extra.clone(),
        }
    }

    /// Merge a higher-precedence partial over this one
    pub fn merge_over(self, overlay: Self) -> Self {
        let mut marketplaces = self.marketplaces;
        marketplaces.extend(overlay.marketplaces);
        Self {
            marketplaces,
            logging: overlay.logging.or(self.logging),
            extra: merge_mappings(self.extra, overlay.extra),
        }
    }

    /// Check cross-scope invariants and produce the effective configuration
    pub fn finalize(self) -> ConfigResult<EffectiveConfig> {
        for (i, a) in self.marketplaces.iter().enumerate() {
            if let Some(b) = self.marketplaces[i + 1..]
                .iter()
                .find(|b| b.entry.name == a.entry.name)
            {
                return Err(ConfigError::Validation {
                    scope: Scope::Effective,
                    path: String::new(),
                    field: Some("marketplaces".to_string()),
                    message: format!(
                        "marketplace '{}' is defined in both the {} and {} scopes",
                        a.entry.name, a.scope, b.scope
                    ),
                });
            }
        }

        Ok(EffectiveConfig {
            marketplaces: self.marketplaces.into_iter().map(|e| e.entry).collect(),
            logging: self.logging.map(|(_, l)| l),
            environment: None,
            strict: false,
            extra: self.extra,
            warnings: Vec::new(),
        })
    }
}

/// Recursively merge two YAML mappings; `overlay` wins on conflicts, nested
/// mappings merge field by field, and null overlay values never override.
/// Lists are replaced whole.
fn merge_mappings(
    mut base: serde_yaml::Mapping,
    overlay: serde_yaml::Mapping,
) -> serde_yaml::Mapping {
    for (key, overlay_value) in overlay {
        if overlay_value.is_null() {
            continue;
        }
        match (base.get_mut(&key), overlay_value) {
            (Some(serde_yaml::Value::Mapping(base_map)), serde_yaml::Value::Mapping(overlay_map)) => {
                let merged = merge_mappings(std::mem::take(base_map), overlay_map);
                *base_map = merged;
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
    base
}

/// The merged result of all present scopes, plus the environment overlay
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub marketplaces: Vec<MarketplaceConfigEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Deployment-mode tag from `NOVA_APP__ENVIRONMENT`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<DeployEnvironment>,

    /// Whether unknown-key warnings are promoted to errors
    #[serde(skip)]
    pub strict: bool,

    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,

    /// Unknown-key observations collected from the scope files
    #[serde(skip)]
    pub warnings: Vec<ConfigWarning>,
}

impl EffectiveConfig {
    /// Find a configured marketplace by name
    pub fn find_marketplace(&self, name: &str) -> Option<&MarketplaceConfigEntry> {
        self.marketplaces.iter().find(|m| m.name == name)
    }
}

/// Merge the three stored scopes in precedence order.
pub fn merge_scopes(
    global: Option<&GlobalConfig>,
    project: Option<&ProjectConfig>,
    user: Option<&UserConfig>,
) -> ConfigResult<EffectiveConfig> {
    let global = global
        .map(|g| PartialConfig::from_scope(Scope::Global, &g.0))
        .unwrap_or_default();
    let project = project
        .map(|p| PartialConfig::from_scope(Scope::Project, &p.0))
        .unwrap_or_default();
    let user = user
        .map(|u| PartialConfig::from_scope(Scope::User, &u.0))
        .unwrap_or_default();

    global.merge_over(project).merge_over(user).finalize()
}
