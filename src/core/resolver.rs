//! Resolution of a [`ValueStore`] into a flat settings map.

use crate::core::{Properties, Settings, ValueStore};
use crate::error::{ConfigError, Result};
use crate::providers::{NoOpProvider, SettingProvider};

static NO_OP: NoOpProvider = NoOpProvider;

/// Merges a [`ValueStore`] for one environment.
///
/// Precedence, lowest to highest:
///
/// 1. global settings
/// 2. settings for the environment
/// 3. provider values (only for required keys still missing)
/// 4. process-level overrides
///
/// Aliases are applied last, from the final value of their source key.
///
/// The resolver borrows everything it uses and never modifies the store, so
/// resolving twice with the same inputs yields the same map.
///
/// # Examples
///
/// ```rust
/// use stratum_config::core::{Properties, Resolver, ValueStore};
/// use stratum_config::providers::MapProvider;
///
/// # fn main() -> stratum_config::error::Result<()> {
/// let store = ValueStore::new()
///     .with_global_setting("db.host", "localhost")
///     .with_environment_setting("PROD", "db.host", "db.internal")
///     .with_required_setting("db.password");
///
/// let secrets = MapProvider::new([("db.password", "hunter2")]);
/// let overrides = Properties::new();
///
/// let settings = Resolver::new(&store)
///     .with_provider(&secrets)
///     .with_overrides(&overrides)
///     .resolve("PROD")?;
///
/// assert_eq!(settings["db.host"], "db.internal");
/// assert_eq!(settings["db.password"], "hunter2");
/// # Ok(())
/// # }
/// ```
pub struct Resolver<'a> {
    store: &'a ValueStore,
    provider: &'a dyn SettingProvider,
    overrides: &'a dyn SettingProvider,
}

impl<'a> Resolver<'a> {
    /// Create a resolver with no provider and the process-wide
    /// [`Properties`] as override source.
    pub fn new(store: &'a ValueStore) -> Self {
        Self {
            store,
            provider: &NO_OP,
            overrides: Properties::global(),
        }
    }

    /// Ask `provider` for required keys missing from the store.
    pub fn with_provider(mut self, provider: &'a dyn SettingProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Read process-level overrides from `overrides`.
    pub fn with_overrides(mut self, overrides: &'a dyn SettingProvider) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolve the store for `environment`.
    ///
    /// The environment name is matched exactly (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredSettings`] listing every required
    /// key that could not be resolved, in declaration order.
    pub fn resolve(&self, environment: &str) -> Result<Settings> {
        let store = self.store;

        tracing::debug!(
            environment = %environment,
            count = store.global_settings().len(),
            "Adding global values to merged results"
        );
        let mut merged = store.global_settings().clone();

        self.overlay_environment(environment, &mut merged);

        let missing = self.resolve_required(environment, &mut merged);
        if !missing.is_empty() {
            return Err(ConfigError::MissingRequiredSettings(missing));
        }

        self.apply_overrides(environment, &mut merged);
        self.apply_aliases(&mut merged);

        tracing::debug!(
            environment = %environment,
            settings = ?store.printable_map(&merged),
            "resolved settings"
        );
        Ok(merged)
    }

    fn overlay_environment(&self, environment: &str, merged: &mut Settings) {
        let Some(values) = self.store.environment(environment) else {
            tracing::debug!(environment = %environment, "no environment-specific values");
            return;
        };

        tracing::debug!(
            environment = %environment,
            count = values.len(),
            "Adding environment values to merged results"
        );

        for (key, value) in values {
            if merged.get(key) == Some(value) {
                tracing::warn!(
                    key = %key,
                    environment = %environment,
                    "{}",
                    duplicate_value_message(key, &self.store.printable(key, value), environment)
                );
            }
        }

        merged.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Fill in missing required keys, returning the keys still missing.
    fn resolve_required(&self, environment: &str, merged: &mut Settings) -> Vec<String> {
        tracing::debug!(
            required = ?self.store.required_settings(),
            "Verifying that the required properties are present"
        );

        let mut missing = Vec::new();
        for key in self.store.required_settings() {
            if merged.contains_key(key) {
                continue;
            }

            if let Some(value) = self.lookup(self.provider, environment, key) {
                tracing::debug!(
                    key = %key,
                    provider = %self.provider.name(),
                    "Config property {} received from {} as '{}'",
                    key,
                    self.provider.name(),
                    self.store.printable(key, &value)
                );
                merged.insert(key.clone(), value);
            } else if let Some(value) = self.lookup(self.overrides, environment, key) {
                tracing::debug!(
                    key = %key,
                    "Config property {} received from overrides as '{}'",
                    key,
                    self.store.printable(key, &value)
                );
                merged.insert(key.clone(), value);
            } else {
                missing.push(key.clone());
            }
        }

        missing
    }

    /// Replace any resolved value that has a differing process-level override.
    fn apply_overrides(&self, environment: &str, merged: &mut Settings) {
        tracing::debug!("Checking process-level properties for configuration value replacements");

        for (key, current) in merged.iter_mut() {
            let Some(value) = self.lookup_override(environment, key) else {
                continue;
            };
            if *current == value {
                continue;
            }

            tracing::info!(
                key = %key,
                "Replacing config property {} (old value: '{}') with override value '{}'",
                key,
                self.store.printable(key, current),
                self.store.printable(key, &value)
            );
            *current = value;
        }
    }

    fn apply_aliases(&self, merged: &mut Settings) {
        for (source, alias) in self.store.aliases() {
            match merged.get(source) {
                Some(value) => {
                    let value = value.clone();
                    merged.insert(alias.clone(), value);
                }
                None => {
                    tracing::debug!(
                        source = %source,
                        alias = %alias,
                        "alias source not resolved, skipping"
                    );
                }
            }
        }
    }

    /// Non-blank value from `provider`, folding failures into "absent".
    fn lookup(
        &self,
        provider: &dyn SettingProvider,
        environment: &str,
        key: &str,
    ) -> Option<String> {
        match provider.get_property(environment, key) {
            Ok(value) => value.filter(|v| !is_blank(v)),
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    provider = %provider.name(),
                    error = %e,
                    "provider lookup failed, treating value as absent"
                );
                None
            }
        }
    }

    fn lookup_override(&self, environment: &str, key: &str) -> Option<String> {
        match self.overrides.get_property(environment, key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "override lookup failed");
                None
            }
        }
    }
}

/// Whether a value is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn duplicate_value_message(key: &str, value: &str, environment: &str) -> String {
    format!(
        "The value for '{key}' is '{value}' in both the global and '{environment}' environments; \
         you can remove the duplicate value in the '{environment}' environment to simplify your \
         configuration file."
    )
}
