//! The raw configuration data model.

use crate::core::mask::mask;
use crate::core::{Resolver, Settings};
use crate::error::Result;
use crate::providers::SettingProvider;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "json")]
use crate::error::ConfigError;
#[cfg(feature = "json")]
use std::path::Path;

/// Layered configuration values before resolution.
///
/// A store holds global defaults, per-environment overrides, the keys that must
/// resolve, the keys whose values are sensitive, and aliases copied after
/// resolution. It is built once, resolved one or more times, and never
/// modified by resolution.
///
/// # Document format
///
/// ```json
/// {
///   // comments are allowed
///   "globalSettings": { "an.integer": "234", "some.key": "default" },
///   "environmentSettings": { "LOCAL": { "an.integer": "123" } },
///   "requiredSettings": ["some.key"],
///   "sensitiveSettings": ["db.password"],
///   "aliases": { "some.key": "legacy.some.key" }
/// }
/// ```
///
/// Numbers and booleans are stored as their text. A `null` value means the
/// key is not set, so it is dropped and a required key can still be supplied
/// by a provider.
///
/// # Examples
///
/// ```rust
/// use stratum_config::core::ValueStore;
///
/// let store = ValueStore::new()
///     .with_global_setting("an.integer", "234")
///     .with_environment_setting("LOCAL", "an.integer", "123")
///     .with_required_setting("an.integer");
///
/// assert_eq!(store.environment("LOCAL").unwrap()["an.integer"], "123");
/// assert!(store.environment("PROD").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueStore {
    #[serde(default, deserialize_with = "scalar_map")]
    global_settings: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "environment_maps")]
    environment_settings: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    required_settings: Vec<String>,
    #[serde(default)]
    sensitive_settings: BTreeSet<String>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

impl ValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value that applies to every environment.
    pub fn with_global_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.global_settings.insert(key.into(), value.into());
        self
    }

    /// Add a value for one environment.
    ///
    /// The environment's map is created on first use.
    pub fn with_environment_setting(
        mut self,
        environment: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.environment_settings
            .entry(environment.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Declare a key that must resolve to a non-blank value.
    pub fn with_required_setting(mut self, key: impl Into<String>) -> Self {
        self.required_settings.push(key.into());
        self
    }

    /// Declare a key whose value must be masked in diagnostics.
    pub fn with_sensitive_setting(mut self, key: impl Into<String>) -> Self {
        self.sensitive_settings.insert(key.into());
        self
    }

    /// After resolution, copy the value of `source` into `alias`.
    pub fn with_alias(mut self, source: impl Into<String>, alias: impl Into<String>) -> Self {
        self.aliases.insert(source.into(), alias.into());
        self
    }

    /// Values that apply to every environment.
    pub fn global_settings(&self) -> &BTreeMap<String, String> {
        &self.global_settings
    }

    /// Per-environment values, keyed by environment name.
    pub fn environment_settings(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.environment_settings
    }

    /// Values for a single environment, if any were declared.
    pub fn environment(&self, environment: &str) -> Option<&BTreeMap<String, String>> {
        self.environment_settings.get(environment)
    }

    /// Required keys in declaration order.
    pub fn required_settings(&self) -> &[String] {
        &self.required_settings
    }

    /// Keys whose values are sensitive.
    pub fn sensitive_settings(&self) -> &BTreeSet<String> {
        &self.sensitive_settings
    }

    /// Alias table, source key to alias key.
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Whether `key` is sensitive.
    ///
    /// An alias of a sensitive key carries the same value and is sensitive too,
    /// through any number of chained aliases.
    pub fn is_sensitive(&self, key: &str) -> bool {
        self.sensitive_settings.contains(key)
            || (!self.aliases.is_empty() && self.sensitive_keys().contains(key))
    }

    /// Every sensitive key, including aliases that receive a sensitive value.
    pub fn sensitive_keys(&self) -> BTreeSet<String> {
        let mut keys = self.sensitive_settings.clone();
        loop {
            let before = keys.len();
            for (source, alias) in &self.aliases {
                if keys.contains(source) {
                    keys.insert(alias.clone());
                }
            }
            if keys.len() == before {
                return keys;
            }
        }
    }

    /// Render `value` for diagnostics, masked if `key` is sensitive.
    pub fn printable<'v>(&self, key: &str, value: &'v str) -> Cow<'v, str> {
        if self.is_sensitive(key) {
            Cow::Owned(mask(value))
        } else {
            Cow::Borrowed(value)
        }
    }

    /// Render a whole map for diagnostics, masking sensitive values.
    pub fn printable_map(&self, settings: &BTreeMap<String, String>) -> Settings {
        let sensitive = self.sensitive_keys();
        settings
            .iter()
            .map(|(k, v)| {
                let value = if sensitive.contains(k) { mask(v) } else { v.clone() };
                (k.clone(), value)
            })
            .collect()
    }

    /// Resolve this store for `environment` with no provider.
    ///
    /// Process-level overrides come from
    /// [`Properties::global`](crate::core::Properties::global).
    ///
    /// # Errors
    ///
    /// Returns [`MissingRequiredSettings`](crate::error::ConfigError::MissingRequiredSettings)
    /// if any required key is missing.
    pub fn resolve(&self, environment: &str) -> Result<Settings> {
        Resolver::new(self).resolve(environment)
    }

    /// Resolve this store for `environment`, asking `provider` for missing
    /// required keys.
    ///
    /// # Errors
    ///
    /// Returns [`MissingRequiredSettings`](crate::error::ConfigError::MissingRequiredSettings)
    /// if any required key is missing.
    pub fn resolve_with(
        &self,
        environment: &str,
        provider: &dyn SettingProvider,
    ) -> Result<Settings> {
        Resolver::new(self).with_provider(provider).resolve(environment)
    }
}

#[cfg(feature = "json")]
impl ValueStore {
    /// Parse a comment-tolerant JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if the document cannot be parsed.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::parse("<string>", text)
    }

    /// Load a store from a file.
    ///
    /// A file that does not exist yields `Ok(None)`. Callers decide whether a
    /// missing file is fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "configuration resource not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Self::parse(&path.display().to_string(), &text).map(Some)
    }

    /// Render this store as a document accepted by [`from_json_str`](Self::from_json_str).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        json5::to_string(self).map_err(|e| ConfigError::malformed("<store>", e))
    }

    fn parse(resource: &str, text: &str) -> Result<Self> {
        json5::from_str(text).map_err(|e| ConfigError::malformed(resource, e))
    }
}

/// A scalar document value, stored as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Flag(bool),
    Integer(i64),
    Float(f64),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(text) => text,
            Scalar::Flag(flag) => flag.to_string(),
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }
    }
}

fn scalar_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<Scalar>>::deserialize(deserializer)?;
    Ok(present(raw))
}

/// Drop `null` values, converting the rest to text.
fn present(raw: BTreeMap<String, Option<Scalar>>) -> BTreeMap<String, String> {
    raw.into_iter()
        .filter_map(|(k, v)| Some((k, v?.into())))
        .collect()
}

fn environment_maps<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, BTreeMap<String, Option<Scalar>>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(env, values)| (env, present(values)))
        .collect())
}
