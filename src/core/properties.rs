//! Process-level properties.
//!
//! [`Properties`] is the highest-precedence override source during resolution
//! and the target that resolved configuration is published into. Reads are
//! lock-free via `arc-swap`; writes copy the map and swap it in atomically.

use crate::core::Settings;
use crate::error::ProviderResult;
use crate::providers::SettingProvider;
use arc_swap::ArcSwap;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Properties> = OnceLock::new();

/// A thread-safe key-value registry of process-level properties.
///
/// Use [`Properties::global`] for the process-wide instance, or create a
/// private instance and inject it where isolation is needed (tests, embedded
/// use).
///
/// # Examples
///
/// ```rust
/// use stratum_config::core::Properties;
///
/// let properties = Properties::new();
/// properties.set("server.port", "9090");
/// assert_eq!(properties.get("server.port").as_deref(), Some("9090"));
/// ```
#[derive(Debug)]
pub struct Properties {
    current: ArcSwap<Settings>,
}

impl Properties {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::from_settings(Settings::new())
    }

    /// Create a registry seeded with `settings`.
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Properties {
        GLOBAL.get_or_init(Properties::new)
    }

    /// Get the value of a property.
    pub fn get(&self, key: &str) -> Option<String> {
        self.current.load().get(key).cloned()
    }

    /// Set a property, replacing any existing value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        self.current.rcu(|current| {
            let mut next = Settings::clone(current);
            next.insert(key.clone(), value.clone());
            next
        });
    }

    /// Remove a property, returning whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        let previous = self.current.rcu(|current| {
            let mut next = Settings::clone(current);
            next.remove(key);
            next
        });
        previous.contains_key(key)
    }

    /// Publish resolved settings.
    ///
    /// Every entry of `settings` is written, overwriting existing values.
    /// Properties not named in `settings` are kept.
    pub fn publish(&self, settings: &Settings) {
        tracing::debug!(count = settings.len(), "publishing resolved settings to properties");
        self.current.rcu(|current| {
            let mut next = Settings::clone(current);
            next.extend(settings.iter().map(|(k, v)| (k.clone(), v.clone())));
            next
        });
    }

    /// A consistent snapshot of every property.
    pub fn snapshot(&self) -> Arc<Settings> {
        self.current.load_full()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    /// Whether there are no properties.
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingProvider for Properties {
    fn get_property(&self, _environment: &str, key: &str) -> ProviderResult<Option<String>> {
        Ok(self.get(key))
    }

    fn name(&self) -> String {
        "properties".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_set_get_remove() {
        let properties = Properties::new();
        assert!(properties.is_empty());

        properties.set("key", "value");
        assert_eq!(properties.get("key").as_deref(), Some("value"));
        assert_eq!(properties.len(), 1);

        properties.set("key", "other");
        assert_eq!(properties.get("key").as_deref(), Some("other"));

        assert!(properties.remove("key"));
        assert!(!properties.remove("key"));
        assert!(properties.get("key").is_none());
    }

    #[test]
    fn test_publish_overwrites_and_keeps_others() {
        let properties = Properties::new();
        properties.set("existing", "old");
        properties.set("untouched", "kept");

        let mut resolved = Settings::new();
        resolved.insert("existing".into(), "new".into());
        resolved.insert("added".into(), "value".into());
        properties.publish(&resolved);

        assert_eq!(properties.get("existing").as_deref(), Some("new"));
        assert_eq!(properties.get("added").as_deref(), Some("value"));
        assert_eq!(properties.get("untouched").as_deref(), Some("kept"));
    }

    #[test]
    fn test_snapshot_is_stable() {
        let properties = Properties::new();
        properties.set("key", "before");

        let snapshot = properties.snapshot();
        properties.set("key", "after");

        assert_eq!(snapshot.get("key").unwrap(), "before");
        assert_eq!(properties.get("key").as_deref(), Some("after"));
    }

    #[test]
    fn test_provider_ignores_environment() {
        let properties = Properties::new();
        properties.set("key", "value");

        assert_eq!(properties.get_property("PROD", "key").unwrap().as_deref(), Some("value"));
        assert_eq!(properties.get_property("TEST", "missing").unwrap(), None);
    }

    #[test]
    fn test_concurrent_writers() {
        let properties = Arc::new(Properties::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let properties = Arc::clone(&properties);
                thread::spawn(move || {
                    for j in 0..50 {
                        properties.set(format!("key.{i}.{j}"), "value");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(properties.len(), 400);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(Properties::global(), Properties::global()));
    }
}
