//! Integration tests for marketplace list and show

mod common;

use common::{scope_yaml, TestEnv};
use serial_test::serial;

use nova::config::{FileConfigStore, Scope};
use nova::error::MarketplaceError;
use nova::marketplace::Marketplace;
use nova::paths::NovaPaths;

fn service<'a>(store: &'a FileConfigStore, env: &TestEnv) -> Marketplace<'a> {
    let paths = NovaPaths::resolve(&env.project).expect("resolve paths");
    Marketplace::new(store, paths, env.project.clone())
}

#[test]
#[serial]
fn list_is_empty_without_config() {
    let env = TestEnv::new();
    let store = FileConfigStore::new(&env.project);
    assert!(service(&store, &env).list().expect("list").is_empty());
}

#[test]
#[serial]
fn list_preserves_effective_config_order() {
    let env = TestEnv::new();
    env.write_global(&scope_yaml(&[("zeta", "o/z"), ("alpha", "o/a")]));
    env.write_project(&scope_yaml(&[("middle", "o/m")]));
    let store = FileConfigStore::new(&env.project);

    let infos = service(&store, &env).list().expect("list");
    let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["zeta", "alpha", "middle"]);
}

#[test]
#[serial]
fn list_reports_zero_bundles_without_state() {
    let env = TestEnv::new();
    env.write_global(&scope_yaml(&[("official", "nova-team/bundles")]));
    let store = FileConfigStore::new(&env.project);

    let infos = service(&store, &env).list().expect("list");
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].bundle_count, 0);
    assert!(infos[0].description.is_empty());
}

#[test]
#[serial]
fn list_joins_bundle_counts_from_installed_manifest() {
    let env = TestEnv::new();
    let source_dir = env.create_marketplace_source("official", &["a", "b", "c"]);
    let store = FileConfigStore::new(&env.project);

    service(&store, &env)
        .add(&source_dir.display().to_string(), Scope::Global)
        .expect("add");

    let infos = service(&store, &env).list().expect("list");
    assert_eq!(infos[0].bundle_count, 3);
    assert_eq!(infos[0].description, "A test marketplace");
}

#[test]
#[serial]
fn get_returns_single_marketplace() {
    let env = TestEnv::new();
    env.write_global(&scope_yaml(&[("one", "o/1"), ("two", "o/2")]));
    let store = FileConfigStore::new(&env.project);

    let info = service(&store, &env).get("two").expect("get");
    assert_eq!(info.name, "two");
}

#[test]
#[serial]
fn get_unknown_name_is_not_found() {
    let env = TestEnv::new();
    let store = FileConfigStore::new(&env.project);

    let err = service(&store, &env).get("ghost").unwrap_err();
    assert!(matches!(err, MarketplaceError::NotFound { .. }));
}
