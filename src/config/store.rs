//! Configuration store
//!
//! [`ConfigStore`] is the seam consumers of configuration depend on: one
//! `load()` returning the effective configuration. [`FileConfigStore`] is the
//! file-backed implementation; it discovers scope files, reads and validates
//! them, merges, and applies the environment overlay, from disk on every
//! call, with no caching and no writes. [`MemoryConfigStore`] serves
//! embedders and tests that want a fixed configuration.

use std::path::{Path, PathBuf};

use crate::config::env::apply_env_overlay;
use crate::config::merge::{merge_scopes, EffectiveConfig};
use crate::config::reader::{read_scope_file, ConfigWarning, LoadedScope};
use crate::config::scope::{GlobalConfig, ProjectConfig, Scope, ScopeFile, UserConfig};
use crate::error::ConfigResult;
use crate::paths::NovaPaths;

/// Source of effective configuration
pub trait ConfigStore {
    /// Produce the current effective configuration.
    ///
    /// File-backed implementations read from disk on every call; the first
    /// error encountered in global → project → user order halts the load.
    fn load(&self) -> ConfigResult<EffectiveConfig>;
}

/// File-backed configuration store
pub struct FileConfigStore {
    working_dir: PathBuf,
}

impl FileConfigStore {
    /// Store rooted at a working directory, used solely for project discovery
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn load_scope(
        scope: Scope,
        path: Option<PathBuf>,
        warnings: &mut Vec<ConfigWarning>,
    ) -> ConfigResult<Option<ScopeFile>> {
        let Some(path) = path else {
            return Ok(None);
        };
        let Some(LoadedScope { file, warnings: w }) = read_scope_file(scope, &path)? else {
            return Ok(None);
        };
        warnings.extend(w);
        Ok(Some(file))
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> ConfigResult<EffectiveConfig> {
        let paths = NovaPaths::resolve(&self.working_dir)?;
        let mut warnings = Vec::new();

        let global = Self::load_scope(
            Scope::Global,
            Some(paths.global_config.clone()),
            &mut warnings,
        )?
        .map(GlobalConfig);
        let project =
            Self::load_scope(Scope::Project, paths.project_config(), &mut warnings)?
                .map(ProjectConfig);
        let user =
            Self::load_scope(Scope::User, paths.user_config(), &mut warnings)?.map(UserConfig);

        let mut effective = merge_scopes(global.as_ref(), project.as_ref(), user.as_ref())?;
        effective.warnings = warnings;
        apply_env_overlay(&mut effective)?;
        Ok(effective)
    }
}

/// Fixed, in-memory configuration store
pub struct MemoryConfigStore {
    config: EffectiveConfig,
}

impl MemoryConfigStore {
    pub fn new(config: EffectiveConfig) -> Self {
        Self { config }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> ConfigResult<EffectiveConfig> {
        Ok(self.config.clone())
    }
}
