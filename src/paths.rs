//! Path resolution for configuration and data locations
//!
//! Resolves the XDG-style locations Nova reads and writes:
//! - global config: `$XDG_CONFIG_HOME/nova/config.yaml` (fallback `~/.config/nova/config.yaml`)
//! - data root: `$XDG_DATA_HOME/nova` (fallback `~/.local/share/nova`),
//!   overridable with `NOVA_DATA_HOME`
//! - project config: nearest `.nova/config.yaml` walking upward from a
//!   working directory
//! - user config: `<project-root>/.nova/config.local.yaml`
//!
//! Discovery never creates directories; writers create parents lazily.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::Scope;
use crate::error::{ConfigError, ConfigResult};

/// Application directory name under the XDG bases
const APP_DIR: &str = "nova";

/// Scope file name for global and project scopes
pub const CONFIG_FILE: &str = "config.yaml";

/// Scope file name for the user scope
pub const USER_CONFIG_FILE: &str = "config.local.yaml";

/// Project marker directory
pub const PROJECT_DIR: &str = ".nova";

/// Subdirectory of the data root holding materialized marketplaces
pub const MARKETPLACES_DIR: &str = "marketplaces";

/// State file name under the marketplaces directory
pub const STATE_FILE: &str = "data.json";

/// Resolved locations for one invocation
#[derive(Debug, Clone)]
pub struct NovaPaths {
    /// Global scope file (may not exist)
    pub global_config: PathBuf,
    /// Data root owned by the Nova installation
    pub data_root: PathBuf,
    /// Project root, when a `.nova/config.yaml` was found upward of the
    /// working directory
    pub project_root: Option<PathBuf>,
}

impl NovaPaths {
    /// Resolve all locations for a working directory.
    ///
    /// Reads the environment at call time; performs no writes.
    pub fn resolve(working_dir: &Path) -> ConfigResult<Self> {
        Ok(Self {
            global_config: global_config_path()?,
            data_root: data_root()?,
            project_root: find_project_root(working_dir),
        })
    }

    /// Paths with explicit locations, for tests and embedders
    pub fn with_roots(
        global_config: PathBuf,
        data_root: PathBuf,
        project_root: Option<PathBuf>,
    ) -> Self {
        Self {
            global_config,
            data_root,
            project_root,
        }
    }

    /// Project scope file, when inside a project
    pub fn project_config(&self) -> Option<PathBuf> {
        self.project_root
            .as_ref()
            .map(|root| root.join(PROJECT_DIR).join(CONFIG_FILE))
    }

    /// User scope file, when inside a project
    pub fn user_config(&self) -> Option<PathBuf> {
        self.project_root
            .as_ref()
            .map(|root| root.join(PROJECT_DIR).join(USER_CONFIG_FILE))
    }

    /// The scope file a mutation targets.
    ///
    /// Errors when the scope has no storable location: `Effective` is never
    /// stored, and project/user scopes require a project root.
    pub fn scope_config(&self, scope: Scope) -> ConfigResult<PathBuf> {
        match scope {
            Scope::Global => Ok(self.global_config.clone()),
            Scope::Project => self.project_config().ok_or_else(|| ConfigError::NotFound {
                scope,
                expected_path: format!("<project-root>/{PROJECT_DIR}/{CONFIG_FILE}"),
            }),
            Scope::User => self.user_config().ok_or_else(|| ConfigError::NotFound {
                scope,
                expected_path: format!("<project-root>/{PROJECT_DIR}/{USER_CONFIG_FILE}"),
            }),
            Scope::Effective => Err(ConfigError::Validation {
                scope,
                path: String::new(),
                field: None,
                message: "the effective scope is computed, not stored".to_string(),
            }),
        }
    }

    /// Directory holding one subdirectory per installed marketplace
    pub fn marketplaces_dir(&self) -> PathBuf {
        self.data_root.join(MARKETPLACES_DIR)
    }

    /// The internal marketplace state file
    pub fn state_file(&self) -> PathBuf {
        self.marketplaces_dir().join(STATE_FILE)
    }

    /// Install location for a marketplace by name
    pub fn marketplace_dir(&self, name: &str) -> PathBuf {
        self.marketplaces_dir().join(name)
    }
}

/// Resolve the global scope file path
pub fn global_config_path() -> ConfigResult<PathBuf> {
    if let Some(base) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(base).join(APP_DIR).join(CONFIG_FILE));
    }
    let base = dirs::config_dir().ok_or(ConfigError::NoLocation {
        scope: Scope::Global,
    })?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

/// Resolve the data root.
///
/// `NOVA_DATA_HOME` overrides the platform default entirely.
pub fn data_root() -> ConfigResult<PathBuf> {
    if let Some(dir) = env::var_os("NOVA_DATA_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(base) = env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(base).join(APP_DIR));
    }
    let base = dirs::data_dir().ok_or(ConfigError::NoLocation {
        scope: Scope::Global,
    })?;
    Ok(base.join(APP_DIR))
}

/// Walk upward from `start` looking for a `.nova/config.yaml`.
///
/// Symlinks in `start` are resolved first so repository layouts where the
/// working directory is reached through a symlink still find their root.
/// Returns the directory containing `.nova`, or `None`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    let mut current = Some(start.as_path());
    while let Some(dir) = current {
        if dir.join(PROJECT_DIR).join(CONFIG_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
