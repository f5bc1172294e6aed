//! Marketplace operations
//!
//! [`Marketplace`] orchestrates add/remove/list/get over a [`ConfigStore`],
//! the source parser, the fetcher, the manifest validator, the state store,
//! and the config mutator.
//!
//! Ordering within `add`: the tree moves into the data directory first, then
//! the state record is written, then the scope configuration. A failure
//! after the move triggers best-effort compensation (the moved directory is
//! removed again, and a state record already written is taken back out); if
//! compensation itself fails the returned error names both affected paths.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::config::{
    mutator, read_scope_file, ConfigStore, MarketplaceConfigEntry, Scope,
};
use crate::error::{marketplace::io_at, MarketplaceError, Result};
use crate::fetch::Fetcher;
use crate::marketplace::info::MarketplaceInfo;
use crate::marketplace::manifest::MarketplaceManifest;
use crate::marketplace::state::{MarketplaceState, StateFile};
use crate::paths::NovaPaths;
use crate::source::MarketplaceSource;

/// Marketplace service facade
pub struct Marketplace<'a> {
    store: &'a dyn ConfigStore,
    paths: NovaPaths,
    working_dir: PathBuf,
    fetcher: Fetcher,
}

impl<'a> Marketplace<'a> {
    pub fn new(
        store: &'a dyn ConfigStore,
        paths: NovaPaths,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            paths,
            working_dir: working_dir.into(),
            fetcher: Fetcher::default(),
        }
    }

    /// Replace the default fetcher (e.g. to shorten the timeout)
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Acquire a marketplace and record it in the given scope.
    pub fn add(&self, source_str: &str, scope: Scope) -> Result<MarketplaceInfo> {
        let source = MarketplaceSource::parse(source_str, &self.working_dir)?;
        let effective = self.store.load()?;
        for warning in &effective.warnings {
            warn!("{warning}");
        }

        // Resolve the scope file up front so a bad scope fails before any fetch
        let scope_path = self.paths.scope_config(scope)?;

        let fetched = self.fetcher.fetch(&source)?;
        let manifest = MarketplaceManifest::load(fetched.root())?;
        let name = manifest.name.clone();

        let state_path = self.paths.state_file();
        let mut state = StateFile::load(&state_path)?;
        if let Some(entry) = effective.find_marketplace(&name) {
            return Err(MarketplaceError::AlreadyExists {
                name,
                existing_source: entry.source.to_string(),
            });
        }
        if let Some(installed) = state.get(&name) {
            return Err(MarketplaceError::AlreadyExists {
                name,
                existing_source: installed.source.to_string(),
            });
        }

        let install_dir = self.paths.marketplace_dir(&name);
        if install_dir.exists() {
            return Err(MarketplaceError::Inconsistent {
                name,
                marketplace_dir: install_dir.display().to_string(),
                state_path: state_path.display().to_string(),
                detail: "a directory for this marketplace exists without a state entry"
                    .to_string(),
            });
        }

        fetched
            .persist_to(&install_dir)
            .map_err(|e| io_at(install_dir.display().to_string(), &e))?;

        state.insert(
            name.clone(),
            MarketplaceState {
                source: source.clone(),
                install_location: install_dir.clone(),
                last_updated: Utc::now(),
            },
        );
        if let Err(err) = state.save(&state_path) {
            return Err(self.undo_install(&name, &install_dir, &state_path, err));
        }

        let entry = MarketplaceConfigEntry {
            name: name.clone(),
            source: source.clone(),
        };
        if let Err(err) = mutator::append_entry(scope, &scope_path, entry) {
            state.remove(&name);
            let state_restored = state.save(&state_path).is_ok();
            let dir_removed = fs::remove_dir_all(&install_dir).is_ok();
            if !state_restored || !dir_removed {
                return Err(MarketplaceError::Inconsistent {
                    name,
                    marketplace_dir: install_dir.display().to_string(),
                    state_path: state_path.display().to_string(),
                    detail: format!(
                        "recording the marketplace in the {scope} configuration failed ({err}) and rollback could not restore the previous state"
                    ),
                });
            }
            return Err(err.into());
        }

        info!(name = %name, scope = %scope, source = %source, "marketplace added");
        let bundle_count = manifest.bundle_count();
        Ok(MarketplaceInfo {
            name,
            description: manifest.description.unwrap_or_default(),
            source,
            bundle_count,
        })
    }

    /// Remove a marketplace by name or source.
    ///
    /// Without an explicit scope the entry's scope is inferred; a name
    /// present in more than one scope is an error listing the scopes.
    pub fn remove(&self, target: &str, scope: Option<Scope>) -> Result<MarketplaceInfo> {
        let entries = self.read_scope_entries()?;
        let state_path = self.paths.state_file();
        let mut state = StateFile::load(&state_path)?;

        let (entry_scope, entry) = self.resolve_target(target, scope, &entries)?;
        let name = entry.name.clone();

        let snapshot = self.info_for(&entry, &state);

        let scope_path = self.paths.scope_config(entry_scope)?;
        mutator::remove_entry(entry_scope, &scope_path, &name)?;

        if let Some(installed) = state.get(&name) {
            let location = installed.install_location.clone();
            if let Err(e) = fs::remove_dir_all(&location) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(MarketplaceError::Inconsistent {
                        name,
                        marketplace_dir: location.display().to_string(),
                        state_path: state_path.display().to_string(),
                        detail: format!(
                            "the configuration entry was removed but the installed tree could not be deleted: {e}"
                        ),
                    });
                }
            }
            state.remove(&name);
            state.save(&state_path)?;
        }

        info!(name = %name, scope = %entry_scope, "marketplace removed");
        Ok(snapshot)
    }

    /// List configured marketplaces in effective-config order.
    pub fn list(&self) -> Result<Vec<MarketplaceInfo>> {
        let effective = self.store.load()?;
        for warning in &effective.warnings {
            warn!("{warning}");
        }
        let state = StateFile::load(&self.paths.state_file())?;

        Ok(effective
            .marketplaces
            .iter()
            .map(|entry| self.info_for(entry, &state))
            .collect())
    }

    /// Look up one marketplace by name.
    pub fn get(&self, name: &str) -> Result<MarketplaceInfo> {
        self.list()?
            .into_iter()
            .find(|info| info.name == name)
            .ok_or_else(|| MarketplaceError::NotFound {
                target: name.to_string(),
            })
    }

    /// Scope-level view of configured entries, in global → project → user
    /// order. Unlike `ConfigStore::load`, this tolerates cross-scope name
    /// collisions, which `remove` must be able to untangle.
    fn read_scope_entries(&self) -> Result<Vec<(Scope, MarketplaceConfigEntry)>> {
        let mut entries = Vec::new();

        let mut scope_paths: Vec<(Scope, PathBuf)> =
            vec![(Scope::Global, self.paths.global_config.clone())];
        if let Some(path) = self.paths.project_config() {
            scope_paths.push((Scope::Project, path));
        }
        if let Some(path) = self.paths.user_config() {
            scope_paths.push((Scope::User, path));
        }

        for (scope, path) in scope_paths {
            if let Some(loaded) = read_scope_file(scope, &path)? {
                for warning in &loaded.warnings {
                    warn!("{warning}");
                }
                entries.extend(
                    loaded
                        .file
                        .marketplaces()
                        .iter()
                        .cloned()
                        .map(|entry| (scope, entry)),
                );
            }
        }

        Ok(entries)
    }

    fn resolve_target(
        &self,
        target: &str,
        scope: Option<Scope>,
        entries: &[(Scope, MarketplaceConfigEntry)],
    ) -> Result<(Scope, MarketplaceConfigEntry)> {
        let mut matches: Vec<&(Scope, MarketplaceConfigEntry)> = entries
            .iter()
            .filter(|(_, entry)| entry.name == target)
            .collect();

        if matches.is_empty() {
            // Fall back to matching the source, structurally and by display form
            let parsed = MarketplaceSource::parse(target, &self.working_dir).ok();
            matches = entries
                .iter()
                .filter(|(_, entry)| {
                    parsed.as_ref() == Some(&entry.source)
                        || entry.source.to_string() == target
                })
                .collect();
        }

        if let Some(scope) = scope {
            return matches
                .iter()
                .find(|(s, _)| *s == scope)
                .map(|(s, e)| (*s, e.clone()))
                .ok_or_else(|| MarketplaceError::NotFound {
                    target: format!("{target} (in {scope} scope)"),
                });
        }

        match matches.as_slice() {
            [] => Err(MarketplaceError::NotFound {
                target: target.to_string(),
            }),
            [(s, e)] => Ok((*s, e.clone())),
            many => Err(MarketplaceError::Ambiguous {
                name: target.to_string(),
                scopes: many
                    .iter()
                    .map(|(s, _)| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Join a config entry with state and the installed manifest. A missing
    /// state entry or unreadable manifest degrades to zero bundles rather
    /// than failing the listing.
    fn info_for(&self, entry: &MarketplaceConfigEntry, state: &StateFile) -> MarketplaceInfo {
        let manifest = state
            .get(&entry.name)
            .and_then(|installed| MarketplaceManifest::load(&installed.install_location).ok());

        let (description, bundle_count) = manifest
            .map(|m| {
                let bundle_count = m.bundle_count();
                (m.description.unwrap_or_default(), bundle_count)
            })
            .unwrap_or_default();

        MarketplaceInfo {
            name: entry.name.clone(),
            description,
            source: entry.source.clone(),
            bundle_count,
        }
    }

    fn undo_install(
        &self,
        name: &str,
        install_dir: &Path,
        state_path: &Path,
        original: MarketplaceError,
    ) -> MarketplaceError {
        if let Err(cleanup) = fs::remove_dir_all(install_dir) {
            return MarketplaceError::Inconsistent {
                name: name.to_string(),
                marketplace_dir: install_dir.display().to_string(),
                state_path: state_path.display().to_string(),
                detail: format!(
                    "recording the marketplace state failed ({original}) and the installed tree could not be removed: {cleanup}"
                ),
            };
        }
        original
    }
}
