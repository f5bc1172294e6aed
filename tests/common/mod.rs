//! Common test utilities for Nova integration tests

// Each integration test binary compiles its own copy of this module and uses
// a different subset of it.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// An isolated environment: its own HOME, XDG directories, and project tree.
///
/// Constructing one points the process environment at the temp directory, so
/// tests using it must be serialized (`#[serial]`).
pub struct TestEnv {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub home: PathBuf,
    pub project: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let home = temp.path().join("home");
        let project = temp.path().join("project");
        std::fs::create_dir_all(&home).expect("Failed to create home");
        std::fs::create_dir_all(project.join(".nova")).expect("Failed to create project");
        // The .nova/config.yaml marker makes `project` a discoverable root
        std::fs::write(project.join(".nova/config.yaml"), "").expect("Failed to write config");

        unsafe {
            std::env::set_var("HOME", &home);
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
            std::env::remove_var("NOVA_DATA_HOME");
            std::env::remove_var("NOVA_APP__ENVIRONMENT");
            std::env::remove_var("NOVA_CONFIG__STRICT");
            std::env::remove_var("NOVA_LOG");
            std::env::remove_var("NOVA_WORKING_DIR");
        }

        Self {
            temp,
            home,
            project,
        }
    }

    /// A working directory outside any project
    pub fn outside_dir(&self) -> PathBuf {
        let outside = self.temp.path().join("elsewhere");
        std::fs::create_dir_all(&outside).expect("Failed to create dir");
        outside
    }

    pub fn global_config_path(&self) -> PathBuf {
        self.home.join(".config/nova/config.yaml")
    }

    pub fn project_config_path(&self) -> PathBuf {
        self.project.join(".nova/config.yaml")
    }

    pub fn user_config_path(&self) -> PathBuf {
        self.project.join(".nova/config.local.yaml")
    }

    pub fn data_root(&self) -> PathBuf {
        self.home.join(".local/share/nova")
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_root().join("marketplaces/data.json")
    }

    pub fn marketplace_dir(&self, name: &str) -> PathBuf {
        self.data_root().join("marketplaces").join(name)
    }

    pub fn write_global(&self, yaml: &str) {
        write_creating_parents(&self.global_config_path(), yaml);
    }

    pub fn write_project(&self, yaml: &str) {
        write_creating_parents(&self.project_config_path(), yaml);
    }

    pub fn write_user(&self, yaml: &str) {
        write_creating_parents(&self.user_config_path(), yaml);
    }

    pub fn read_global(&self) -> String {
        std::fs::read_to_string(self.global_config_path()).expect("Failed to read global config")
    }

    pub fn read_project(&self) -> String {
        std::fs::read_to_string(self.project_config_path()).expect("Failed to read project config")
    }

    /// Create a valid local marketplace source outside the project tree.
    ///
    /// `declared_name` is what the manifest declares; `bundles` are the
    /// listed bundle names.
    pub fn create_marketplace_source(&self, declared_name: &str, bundles: &[&str]) -> PathBuf {
        let root = self.temp.path().join("sources").join(declared_name);
        self.create_marketplace_source_at(&root, declared_name, bundles);
        root
    }

    /// Create a valid local marketplace source at an explicit location.
    pub fn create_marketplace_source_at(
        &self,
        root: &Path,
        declared_name: &str,
        bundles: &[&str],
    ) {
        std::fs::create_dir_all(root).expect("Failed to create source root");
        std::fs::write(root.join("marketplace.json"), manifest_json(declared_name, bundles))
            .expect("Failed to write marketplace.json");
        for bundle in bundles {
            std::fs::create_dir_all(root.join("bundles").join(bundle))
                .expect("Failed to create bundle dir");
        }
    }
}

fn write_creating_parents(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// A minimal valid marketplace.json
pub fn manifest_json(name: &str, bundles: &[&str]) -> String {
    let bundle_objs: Vec<String> = bundles
        .iter()
        .map(|b| {
            format!(r#"{{ "name": "{b}", "source": "bundles/{b}", "description": "{b} bundle" }}"#)
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

/// YAML for a scope file with github-sourced entries
pub fn scope_yaml(entries: &[(&str, &str)]) -> String {
    let mut yaml = String::from("marketplaces:\n");
    for (name, repo) in entries {
        yaml.push_str(&format!(
            "  - name: {name}\n    source:\n      type: github\n      repo: {repo}\n"
        ));
    }
    yaml
}
