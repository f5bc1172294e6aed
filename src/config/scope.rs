//! Configuration scopes and the raw scope-file document
//!
//! Three scopes are stored on disk (global, project, user); `Effective`
//! denotes the merged result and is never written. All three stored scopes
//! share one underlying YAML schema ([`ScopeFile`]) in which every field is
//! optional, so an absent file, an empty file, and a partial file are all
//! valid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::entry::MarketplaceConfigEntry;

/// The layer a configuration file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    Project,
    User,
    /// The merged result of the three stored scopes; never stored itself
    Effective,
}

impl Scope {
    /// Whether this scope corresponds to a file on disk
    pub fn is_stored(self) -> bool {
        !matches!(self, Scope::Effective)
    }

    /// Stored scopes in precedence order, lowest first
    pub const STORED: [Scope; 3] = [Scope::Global, Scope::Project, Scope::User];
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Global => "global",
            Scope::Project => "project",
            Scope::User => "user",
            Scope::Effective => "effective",
        };
        f.write_str(name)
    }
}

/// Logging configuration, meaningful in the global scope only
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive for the subscriber (e.g. "info", "nova=debug")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Output format for the sink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<LogFormat>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Raw scope-file document, shared by all three stored scopes
///
/// Unknown top-level keys are preserved in `extra` and surfaced through the
/// reader's warning channel; they are never rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplaces: Option<Vec<MarketplaceConfigEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl ScopeFile {
    /// The marketplaces list, treating an absent key as empty
    pub fn marketplaces(&self) -> &[MarketplaceConfigEntry] {
        self.marketplaces.as_deref().unwrap_or_default()
    }
}

/// Global-scope configuration (`$XDG_CONFIG_HOME/nova/config.yaml`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalConfig(pub ScopeFile);

/// Project-scope configuration (`<project-root>/.nova/config.yaml`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig(pub ScopeFile);

/// User-scope configuration (`<project-root>/.nova/config.local.yaml`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserConfig(pub ScopeFile);
