//! Integration tests for marketplace add

mod common;

use common::{scope_yaml, TestEnv};
use serial_test::serial;

use nova::config::{FileConfigStore, Scope};
use nova::error::MarketplaceError;
use nova::marketplace::{Marketplace, StateFile};
use nova::paths::NovaPaths;
use nova::source::MarketplaceSource;

fn service<'a>(store: &'a FileConfigStore, env: &TestEnv) -> Marketplace<'a> {
    let paths = NovaPaths::resolve(&env.project).expect("resolve paths");
    Marketplace::new(store, paths, env.project.clone())
}

#[test]
#[serial]
fn add_local_marketplace_happy_path() {
    let env = TestEnv::new();
    let source_dir = env.create_marketplace_source("official", &["alpha", "beta"]);
    let store = FileConfigStore::new(&env.project);

    let info = service(&store, &env)
        .add(&source_dir.display().to_string(), Scope::Global)
        .expect("add");

    assert_eq!(info.name, "official");
    assert_eq!(info.bundle_count, 2);
    assert!(matches!(info.source, MarketplaceSource::Local { .. }));

    // The tree was materialized under the data root
    assert!(env
        .marketplace_dir("official")
        .join("marketplace.json")
        .exists());
    assert!(env.marketplace_dir("official").join("bundles/alpha").exists());

    // The state file gained one entry
    let state = StateFile::load(&env.state_file()).expect("state");
    let record = state.get("official").expect("state entry");
    assert_eq!(record.install_location, env.marketplace_dir("official"));

    // The global config gained one entry
    let config = env.read_global();
    assert!(config.contains("name: official"));
    assert!(config.contains("type: local"));
}

#[test]
#[serial]
fn add_records_in_project_scope() {
    let env = TestEnv::new();
    let source_dir = env.create_marketplace_source("official", &["alpha"]);
    let store = FileConfigStore::new(&env.project);

    service(&store, &env)
        .add(&source_dir.display().to_string(), Scope::Project)
        .expect("add");

    let project_config = env.read_project();
    assert!(project_config.contains("name: official"));
    assert!(!env.global_config_path().exists());
}

#[test]
#[serial]
fn add_then_list_shows_the_marketplace() {
    let env = TestEnv::new();
    let source_dir = env.create_marketplace_source("official", &["alpha", "beta"]);
    let store = FileConfigStore::new(&env.project);

    let added = service(&store, &env)
        .add(&source_dir.display().to_string(), Scope::Global)
        .expect("add");

    let infos = service(&store, &env).list().expect("list");
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].name, "official");
    assert_eq!(infos[0].source, added.source);
    assert_eq!(infos[0].bundle_count, 2);
}

#[test]
#[serial]
fn add_collision_with_configured_name() {
    let env = TestEnv::new();
    env.write_global(&scope_yaml(&[("official", "nova-team/bundles")]));
    // A different source whose manifest declares the same name
    let source_dir = env.create_marketplace_source("official", &["alpha"]);
    let store = FileConfigStore::new(&env.project);

    let err = service(&store, &env)
        .add(&source_dir.display().to_string(), Scope::Project)
        .unwrap_err();

    match err {
        MarketplaceError::AlreadyExists {
            name,
            existing_source,
        } => {
            assert_eq!(name, "official");
            assert!(existing_source.contains("nova-team/bundles"));
        }
        other => panic!("expected AlreadyExists, got {other:?}"),
    }

    // No filesystem or state mutation
    assert!(!env.marketplace_dir("official").exists());
    assert!(!env.state_file().exists());
    assert!(!env.project_config_path().exists() || !env.read_project().contains("official"));
}

#[test]
#[serial]
fn add_collision_with_installed_state() {
    let env = TestEnv::new();
    let first = env.create_marketplace_source("official", &["alpha"]);
    let store = FileConfigStore::new(&env.project);

    service(&store, &env)
        .add(&first.display().to_string(), Scope::Project)
        .expect("first add");

    // Same declared name from a different directory, different scope
    let second = env.temp.path().join("sources/other");
    env.create_marketplace_source_at(&second, "official", &["beta"]);

    let err = service(&store, &env)
        .add(&second.display().to_string(), Scope::Global)
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::AlreadyExists { .. }));
}

#[test]
#[serial]
fn invalid_manifest_rolls_back_fetch() {
    let env = TestEnv::new();
    // marketplace.json lacking owner
    let source_dir = env.temp.path().join("sources/broken");
    std::fs::create_dir_all(&source_dir).expect("mkdir");
    std::fs::write(
        source_dir.join("marketplace.json"),
        r#"{ "name": "broken", "description": "x", "bundles": [] }"#,
    )
    .expect("write manifest");
    let store = FileConfigStore::new(&env.project);

    let err = service(&store, &env)
        .add(&source_dir.display().to_string(), Scope::Global)
        .unwrap_err();

    match err {
        MarketplaceError::ManifestSchema { field, .. } => assert_eq!(field, "owner"),
        other => panic!("expected schema error, got {other:?}"),
    }

    // Nothing was left behind under the data root
    assert!(!env.marketplace_dir("broken").exists());
    assert!(!env.state_file().exists());
}

#[test]
#[serial]
fn missing_manifest_is_rejected() {
    let env = TestEnv::new();
    let source_dir = env.temp.path().join("sources/empty");
    std::fs::create_dir_all(&source_dir).expect("mkdir");
    let store = FileConfigStore::new(&env.project);

    let err = service(&store, &env)
        .add(&source_dir.display().to_string(), Scope::Global)
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::ManifestMissing { .. }));
}

#[test]
#[serial]
fn invalid_source_string_is_rejected_before_any_io() {
    let env = TestEnv::new();
    let store = FileConfigStore::new(&env.project);

    let err = service(&store, &env)
        .add("not a source at all", Scope::Global)
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::InvalidSource { .. }));
    assert!(!env.state_file().exists());
}

#[test]
#[serial]
fn local_directory_wins_over_github_shorthand() {
    let env = TestEnv::new();
    // A directory literally named owner/repo inside the working directory
    let shorthand_dir = env.project.join("owner/repo");
    env.create_marketplace_source_at(&shorthand_dir, "devmarket", &["alpha"]);
    let store = FileConfigStore::new(&env.project);

    let info = service(&store, &env)
        .add("owner/repo", Scope::Project)
        .expect("add");

    // Parsed as Local: the copy came from disk, no clone was attempted
    assert!(matches!(info.source, MarketplaceSource::Local { .. }));
    assert_eq!(info.name, "devmarket");

    let state = StateFile::load(&env.state_file()).expect("state");
    assert!(matches!(
        state.get("devmarket").expect("entry").source,
        MarketplaceSource::Local { .. }
    ));
}

#[test]
#[serial]
fn add_to_project_scope_outside_project_fails_cleanly() {
    let env = TestEnv::new();
    let source_dir = env.create_marketplace_source("official", &["alpha"]);
    let outside = env.outside_dir();
    let store = FileConfigStore::new(&outside);
    let paths = NovaPaths::resolve(&outside).expect("resolve");
    let service = Marketplace::new(&store, paths, outside.clone());

    let err = service
        .add(&source_dir.display().to_string(), Scope::Project)
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::Config(_)));

    // The failure happened before any fetch or install
    assert!(!env.state_file().exists());
}

#[test]
#[serial]
fn add_duplicate_config_across_scopes_fails_load() {
    let env = TestEnv::new();
    env.write_global(&scope_yaml(&[("dup", "o/a")]));
    env.write_project(&scope_yaml(&[("dup", "o/b")]));
    let source_dir = env.create_marketplace_source("fresh", &[]);
    let store = FileConfigStore::new(&env.project);

    // The effective config is invalid, so the add passes the error through
    let err = service(&store, &env)
        .add(&source_dir.display().to_string(), Scope::Global)
        .unwrap_err();
    assert!(matches!(err, MarketplaceError::Config(_)));
}
