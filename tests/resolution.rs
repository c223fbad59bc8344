//! Integration tests for layered resolution.

use proptest::prelude::*;
use std::collections::BTreeMap;
use stratum_config::prelude::*;

fn prod_store() -> ValueStore {
    ValueStore::new()
        .with_global_setting("http.port", "8080")
        .with_global_setting("log.level", "info")
        .with_environment_setting("PROD", "http.port", "443")
        .with_environment_setting("PROD", "db.host", "db.internal")
        .with_required_setting("db.host")
        .with_required_setting("db.password")
        .with_sensitive_setting("db.password")
        .with_alias("db.host", "database.host")
}

#[test]
fn test_full_precedence() {
    let store = prod_store();
    let secrets = MapProvider::new([("db.password", "s3cret"), ("db.host", "ignored")]);
    let overrides = Properties::new();
    overrides.set("log.level", "debug");

    let settings = Resolver::new(&store)
        .with_provider(&secrets)
        .with_overrides(&overrides)
        .resolve("PROD")
        .unwrap();

    assert_eq!(settings["http.port"], "443");
    assert_eq!(settings["db.host"], "db.internal");
    assert_eq!(settings["db.password"], "s3cret");
    assert_eq!(settings["log.level"], "debug");
    assert_eq!(settings["database.host"], "db.internal");
    assert_eq!(settings.len(), 5);
}

#[test]
fn test_unknown_environment_uses_globals() {
    let store = prod_store();
    let secrets = MapProvider::new([("db.password", "s3cret"), ("db.host", "db.dev")]);
    let overrides = Properties::new();

    let settings = Resolver::new(&store)
        .with_provider(&secrets)
        .with_overrides(&overrides)
        .resolve("DEV")
        .unwrap();

    assert_eq!(settings["http.port"], "8080");
    assert_eq!(settings["db.host"], "db.dev");
    assert_eq!(settings["database.host"], "db.dev");
}

#[test]
fn test_missing_required_settings_are_all_reported() {
    let store = ValueStore::new()
        .with_required_setting("b.key")
        .with_required_setting("a.key")
        .with_required_setting("present")
        .with_global_setting("present", "yes");
    let overrides = Properties::new();

    let err = Resolver::new(&store)
        .with_overrides(&overrides)
        .resolve("PROD")
        .unwrap_err();

    assert_eq!(
        err.missing_keys(),
        Some(&["b.key".to_string(), "a.key".to_string()][..])
    );
    assert_eq!(err.to_string(), "Missing required settings: b.key, a.key");
}

#[test]
fn test_blank_provider_value_is_missing() {
    let store = ValueStore::new().with_required_setting("token");
    let provider = MapProvider::new([("token", "   ")]);
    let overrides = Properties::new();

    let err = Resolver::new(&store)
        .with_provider(&provider)
        .with_overrides(&overrides)
        .resolve("PROD")
        .unwrap_err();

    assert!(matches!(err, ConfigError::MissingRequiredSettings(_)));
}

#[test]
fn test_chained_providers_fill_required_keys() {
    let store = ValueStore::new()
        .with_required_setting("first")
        .with_required_setting("second");
    let chain = ChainProvider::new()
        .with_provider(MapProvider::new([("first", "from-a")]))
        .with_provider(MapProvider::new([("first", "shadowed"), ("second", "from-b")]));
    let overrides = Properties::new();

    let settings = Resolver::new(&store)
        .with_provider(&chain)
        .with_overrides(&overrides)
        .resolve("QA")
        .unwrap();

    assert_eq!(settings["first"], "from-a");
    assert_eq!(settings["second"], "from-b");
}

#[test]
fn test_store_is_not_modified() {
    let store = prod_store();
    let before = store.clone();
    let secrets = MapProvider::new([("db.password", "s3cret")]);
    let overrides = Properties::new();
    overrides.set("http.port", "9000");

    Resolver::new(&store)
        .with_provider(&secrets)
        .with_overrides(&overrides)
        .resolve("PROD")
        .unwrap();

    assert_eq!(store, before);
}

fn key() -> impl Strategy<Value = String> {
    "[a-c]\\.[a-c]"
}

fn layer() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(key(), "[a-z0-9]{1,6}", 0..6)
}

proptest! {
    #[test]
    fn prop_later_layers_win(
        globals in layer(),
        environment in layer(),
        overrides in layer(),
    ) {
        let mut store = ValueStore::new();
        for (k, v) in &globals {
            store = store.with_global_setting(k.clone(), v.clone());
        }
        for (k, v) in &environment {
            store = store.with_environment_setting("PROD", k.clone(), v.clone());
        }
        let properties = Properties::new();
        for (k, v) in &overrides {
            properties.set(k.clone(), v.clone());
        }

        let settings = Resolver::new(&store)
            .with_overrides(&properties)
            .resolve("PROD")
            .unwrap();

        let mut expected_keys: Vec<&String> = globals.keys().chain(environment.keys()).collect();
        expected_keys.sort();
        expected_keys.dedup();
        prop_assert_eq!(settings.keys().collect::<Vec<_>>(), expected_keys);

        for (k, v) in &settings {
            let expected = overrides
                .get(k)
                .or_else(|| environment.get(k))
                .or_else(|| globals.get(k));
            prop_assert_eq!(Some(v), expected);
        }
    }

    #[test]
    fn prop_resolution_is_repeatable(globals in layer(), environment in layer()) {
        let mut store = ValueStore::new();
        for (k, v) in &globals {
            store = store.with_global_setting(k.clone(), v.clone());
        }
        for (k, v) in &environment {
            store = store.with_environment_setting("PROD", k.clone(), v.clone());
        }
        let properties = Properties::new();
        let resolver = Resolver::new(&store).with_overrides(&properties);

        let first = resolver.resolve("PROD").unwrap();
        let second = resolver.resolve("PROD").unwrap();
        prop_assert_eq!(first, second);
    }
}
