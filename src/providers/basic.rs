//! Local setting providers: no-op, map-backed and process environment.

use super::SettingProvider;
use crate::error::ProviderResult;
use std::collections::HashMap;

/// Provider that never has a value.
///
/// This is the default provider used when resolution is not given one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProvider;

impl SettingProvider for NoOpProvider {
    fn get_property(&self, _environment: &str, _key: &str) -> ProviderResult<Option<String>> {
        Ok(None)
    }

    fn name(&self) -> String {
        "noop".to_string()
    }
}

/// Provider backed by a fixed key-value map.
///
/// Lookups ignore the environment.
///
/// # Examples
///
/// ```rust
/// use stratum_config::providers::{MapProvider, SettingProvider};
///
/// let provider = MapProvider::new([("db.password", "hunter2")]);
/// assert_eq!(
///     provider.get_property("PROD", "db.password").unwrap().as_deref(),
///     Some("hunter2")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapProvider {
    values: HashMap<String, String>,
}

impl MapProvider {
    /// Create a provider from key-value pairs.
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Number of entries held by this provider.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the provider holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingProvider for MapProvider {
    fn get_property(&self, _environment: &str, key: &str) -> ProviderResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn name(&self) -> String {
        "map".to_string()
    }
}

/// Provider backed by the process environment.
///
/// The environment is captured when the provider is created; later changes to
/// the process environment are not seen. Variables whose name or value is not
/// valid UTF-8 are skipped.
#[derive(Debug, Clone)]
pub struct SystemEnvironmentProvider {
    inner: MapProvider,
}

impl SystemEnvironmentProvider {
    /// Snapshot the current process environment.
    pub fn new() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self {
            inner: MapProvider::new(vars),
        }
    }
}

impl Default for SystemEnvironmentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingProvider for SystemEnvironmentProvider {
    fn get_property(&self, environment: &str, key: &str) -> ProviderResult<Option<String>> {
        self.inner.get_property(environment, key)
    }

    fn name(&self) -> String {
        "env".to_string()
    }
}

#[cfg(test)]
#[allow(unsafe_code)] // For env var manipulation in tests
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_noop_is_always_absent() {
        let provider = NoOpProvider;
        assert_eq!(provider.get_property("PROD", "anything").unwrap(), None);
        assert_eq!(provider.get_property("", "").unwrap(), None);
        assert_eq!(provider.name(), "noop");
    }

    #[test]
    fn test_map_provider_ignores_environment() {
        let provider = MapProvider::new([("key", "value")]);
        assert_eq!(provider.get_property("PROD", "key").unwrap().as_deref(), Some("value"));
        assert_eq!(provider.get_property("TEST", "key").unwrap().as_deref(), Some("value"));
        assert_eq!(provider.get_property("PROD", "other").unwrap(), None);
        assert_eq!(provider.len(), 1);
        assert!(!provider.is_empty());
    }

    #[test]
    fn test_empty_map_provider() {
        let provider = MapProvider::default();
        assert!(provider.is_empty());
        assert_eq!(provider.get_property("PROD", "key").unwrap(), None);
    }

    #[test]
    #[serial]
    fn test_system_environment_snapshot() {
        unsafe {
            std::env::set_var("STRATUM_TEST_SNAPSHOT_VAR", "present");
        }
        let provider = SystemEnvironmentProvider::new();
        unsafe {
            std::env::remove_var("STRATUM_TEST_SNAPSHOT_VAR");
        }

        // Captured at construction time
        assert_eq!(
            provider.get_property("LOCAL", "STRATUM_TEST_SNAPSHOT_VAR").unwrap().as_deref(),
            Some("present")
        );
        let fresh = SystemEnvironmentProvider::new();
        assert_eq!(fresh.get_property("LOCAL", "STRATUM_TEST_SNAPSHOT_VAR").unwrap(), None);
    }
}
