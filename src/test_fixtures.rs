//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Helpers to create common unit-test environments (temp directories,
//! marketplace trees, scope files) with a single call.

use std::path::PathBuf;

use tempfile::TempDir;

/// Create a temp directory in the system temp location.
///
/// Uses [`crate::temp::temp_dir_base`] so temp dirs are never created under
/// the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// Create test files in a directory.
///
/// Takes a list of (path, content) tuples; paths are relative to the temp
/// directory and parents are created as needed.
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(temp: &TempDir, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = temp.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// A minimal valid marketplace.json with the given name and bundle names
#[must_use]
pub fn manifest_json(name: &str, bundles: &[&str]) -> String {
    let bundle_objs: Vec<String> = bundles
        .iter()
        .map(|b| {
            format!(
                r#"{{ "name": "{b}", "source": "bundles/{b}", "description": "{b} bundle" }}"#
            )
        })
        .collect();
    format!(
        r#"{{
  "name": "{name}",
  "owner": {{ "name": "Test Owner", "email": "owner@example.com" }},
  "description": "A test marketplace",
  "bundles": [{}]
}}"#,
        bundle_objs.join(", ")
    )
}

/// Create a directory tree that is a valid local marketplace source.
///
/// Returns the marketplace root inside the temp dir.
///
/// # Panics
///
/// Panics if any file cannot be created.
#[must_use]
pub fn create_marketplace_tree(temp: &TempDir, name: &str, bundles: &[&str]) -> PathBuf {
    let root = temp.path().join(name);
    std::fs::create_dir_all(&root).expect("Failed to create marketplace root");
    std::fs::write(root.join("marketplace.json"), manifest_json(name, bundles))
        .expect("Failed to write marketplace.json");
    for bundle in bundles {
        std::fs::create_dir_all(root.join("bundles").join(bundle))
            .expect("Failed to create bundle directory");
    }
    root
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_create_marketplace_tree() {
        let temp = create_temp_dir();
        let root = create_marketplace_tree(&temp, "official", &["alpha", "beta"]);

        assert!(root.join("marketplace.json").exists());
        assert!(root.join("bundles/alpha").exists());

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(root.join("marketplace.json")).expect("read"))
                .expect("valid json");
        assert_eq!(parsed["name"], "official");
        assert_eq!(parsed["bundles"].as_array().expect("array").len(), 2);
    }
}
