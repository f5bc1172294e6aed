//! Marketplace manifest (marketplace.json) parsing and validation
//!
//! The manifest declares the marketplace's name, owner, and bundle listings.
//! Validation is structural only: bundle directories are never opened here.
//! Field-level problems are reported as schema errors naming the field; the
//! JSON is parsed to a value first so syntax errors and schema errors stay
//! distinguishable.

use std::fs;
use std::io;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::check_marketplace_name;
use crate::error::{marketplace::io_at, MarketplaceError, Result};

/// Manifest file name at the marketplace root
pub const MANIFEST_FILE: &str = "marketplace.json";

/// A person or team referenced by the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One bundle listing inside a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    pub name: String,
    /// Path to the bundle, relative to the marketplace root
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Contact>,
}

/// Parsed and validated marketplace.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceManifest {
    pub name: String,
    pub owner: Contact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bundles: Vec<BundleEntry>,
}

impl MarketplaceManifest {
    /// Load and validate the manifest at the root of `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let display_path = path.display().to_string();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(MarketplaceError::ManifestMissing {
                    dir: dir.display().to_string(),
                });
            }
            Err(e) => return Err(io_at(display_path, &e)),
        };

        let value: Value =
            serde_json::from_str(&content).map_err(|e| MarketplaceError::ManifestJson {
                path: display_path.clone(),
                detail: e.to_string(),
            })?;

        let manifest = extract_manifest(&display_path, &value)?;
        validate_bundles(&display_path, &manifest)?;
        Ok(manifest)
    }

    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }
}

fn schema_error(path: &str, field: impl Into<String>) -> MarketplaceError {
    MarketplaceError::ManifestSchema {
        path: path.to_string(),
        field: field.into(),
    }
}

fn extract_manifest(path: &str, value: &Value) -> Result<MarketplaceManifest> {
    let root = value.as_object().ok_or_else(|| schema_error(path, "(root)"))?;

    let name = root
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| schema_error(path, "name"))?;
    if check_marketplace_name(name).is_some() {
        return Err(schema_error(path, "name"));
    }

    let owner = extract_contact(path, root.get("owner"), "owner")?;

    let description = match root.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(schema_error(path, "description")),
    };

    let bundle_values = root
        .get("bundles")
        .and_then(Value::as_array)
        .ok_or_else(|| schema_error(path, "bundles"))?;
    let bundles = bundle_values
        .iter()
        .enumerate()
        .map(|(i, b)| extract_bundle(path, i, b))
        .collect::<Result<Vec<_>>>()?;

    Ok(MarketplaceManifest {
        name: name.to_string(),
        owner,
        description,
        bundles,
    })
}

fn extract_contact(path: &str, value: Option<&Value>, field: &str) -> Result<Contact> {
    let object = value
        .and_then(Value::as_object)
        .ok_or_else(|| schema_error(path, field))?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| schema_error(path, format!("{field}.name")))?;
    let email = match object.get("email") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(schema_error(path, format!("{field}.email"))),
    };
    Ok(Contact {
        name: name.to_string(),
        email,
    })
}

fn extract_bundle(path: &str, index: usize, value: &Value) -> Result<BundleEntry> {
    let object = value
        .as_object()
        .ok_or_else(|| schema_error(path, format!("bundles[{index}]")))?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| schema_error(path, format!("bundles[{index}].name")))?;
    let source = object
        .get("source")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| schema_error(path, format!("bundles[{index}].source")))?;

    let optional_string = |key: &str| -> Result<Option<String>> {
        match object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(schema_error(path, format!("bundles[{index}].{key}"))),
        }
    };

    let author = match object.get("author") {
        None | Some(Value::Null) => None,
        Some(v) => Some(extract_contact(path, Some(v), &format!("bundles[{index}].author"))?),
    };

    Ok(BundleEntry {
        name: name.to_string(),
        source: source.to_string(),
        description: optional_string("description")?,
        category: optional_string("category")?,
        version: optional_string("version")?,
        author,
    })
}

fn validate_bundles(path: &str, manifest: &MarketplaceManifest) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for bundle in &manifest.bundles {
        if !seen.insert(bundle.name.as_str()) {
            return Err(MarketplaceError::ManifestDuplicateBundle {
                path: path.to_string(),
                name: bundle.name.clone(),
            });
        }
        if path_escapes_root(&bundle.source) {
            return Err(MarketplaceError::ManifestPathEscape {
                path: path.to_string(),
                bundle: bundle.name.clone(),
                source_path: bundle.source.clone(),
            });
        }
    }
    Ok(())
}

/// Whether a bundle source path can reach outside the marketplace root after
/// lexical normalization
fn path_escapes_root(source: &str) -> bool {
    let path = Path::new(source);
    if path.is_absolute() {
        return true;
    }

    let mut depth: i32 = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return true,
        }
    }
    false
}
