//! Startup assembly of resolved settings.

use crate::core::{EnvironmentSelector, Properties, Resolver, Settings, ValueStore};
use crate::error::{ConfigError, Result};
use crate::processors::{Pipeline, PostProcessor};
use crate::providers::{NoOpProvider, SettingProvider, SystemEnvironmentProvider};
use std::path::{Path, PathBuf};

/// Property naming the configuration resource to load.
pub const RESOURCE_PROPERTY: &str = "environment.json";

/// Resource loaded when [`RESOURCE_PROPERTY`] is not set.
pub const DEFAULT_RESOURCE: &str = "environment.json";

/// Prefix of the optional local overlay resource's file name.
pub const LOCAL_RESOURCE_PREFIX: &str = "local.";

/// Settings resolved by a [`SettingsBootstrap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    environment: String,
    source: PathBuf,
    settings: Settings,
}

impl ResolvedSettings {
    /// The environment the settings were resolved for.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// The resource the settings were loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Get a resolved value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Iterate over resolved values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrow the resolved map.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Take the resolved map.
    pub fn into_settings(self) -> Settings {
        self.settings
    }
}

/// Builder that loads, resolves, post-processes and optionally publishes
/// configuration at startup.
///
/// # Examples
///
/// ```rust,no_run
/// use stratum_config::core::SettingsBootstrap;
/// use stratum_config::processors::EnvironmentOverridingPostProcessor;
///
/// # fn example() -> stratum_config::error::Result<()> {
/// let resolved = SettingsBootstrap::new()
///     .with_resource("config/environment.json")
///     .with_post_processor(EnvironmentOverridingPostProcessor::new())
///     .publish(true)
///     .resolve()?;
///
/// println!("{} settings for {}", resolved.settings().len(), resolved.environment());
/// # Ok(())
/// # }
/// ```
pub struct SettingsBootstrap<'a> {
    resource: Option<PathBuf>,
    local_resource: Option<PathBuf>,
    environment: Option<String>,
    selector: EnvironmentSelector,
    provider: Box<dyn SettingProvider>,
    properties: &'a Properties,
    pipeline: Pipeline,
    publish: bool,
}

impl SettingsBootstrap<'static> {
    /// Create a bootstrap using the process-wide [`Properties`].
    pub fn new() -> Self {
        Self::with_properties(Properties::global())
    }
}

impl Default for SettingsBootstrap<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SettingsBootstrap<'a> {
    /// Create a bootstrap reading and publishing through `properties`.
    pub fn with_properties(properties: &'a Properties) -> Self {
        Self {
            resource: None,
            local_resource: None,
            environment: None,
            selector: EnvironmentSelector::new(),
            provider: Box::new(NoOpProvider),
            properties,
            pipeline: Pipeline::new(),
            publish: false,
        }
    }

    /// Load configuration from `path`.
    ///
    /// Defaults to the value of the [`RESOURCE_PROPERTY`] property, or
    /// [`DEFAULT_RESOURCE`].
    pub fn with_resource(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource = Some(path.into());
        self
    }

    /// Overlay values from `path` when it exists.
    ///
    /// Defaults to `local.<file name>` next to the main resource.
    pub fn with_local_resource(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_resource = Some(path.into());
        self
    }

    /// Resolve for `environment` instead of selecting one.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Use `selector` to determine the environment.
    pub fn with_selector(mut self, selector: EnvironmentSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Ask `provider` for missing required keys.
    pub fn with_provider<P: SettingProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Box::new(provider);
        self
    }

    /// Append a post-processor.
    pub fn with_post_processor<P: PostProcessor + 'static>(mut self, processor: P) -> Self {
        self.pipeline = self.pipeline.with_processor(processor);
        self
    }

    /// Whether to publish resolved settings into the properties registry.
    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    /// Load, resolve, post-process and optionally publish.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The main resource does not exist
    /// - Either resource cannot be read or parsed
    /// - Required settings are missing
    pub fn resolve(self) -> Result<ResolvedSettings> {
        let environment = match &self.environment {
            Some(environment) => environment.clone(),
            None => self
                .selector
                .determine(self.properties, &SystemEnvironmentProvider::new()),
        };
        let resource = self.resource_path();
        let local_resource = self.local_resource_path(&resource);

        tracing::debug!(
            environment = %environment,
            resource = %resource.display(),
            "Loading environment from resource"
        );
        let store = ValueStore::load(&resource)?
            .ok_or_else(|| ConfigError::ResourceNotFound(resource.clone()))?;

        let mut settings = self.resolve_store(&store, &environment)?;

        if let Some(path) = local_resource {
            if let Some(local) = ValueStore::load(&path)? {
                tracing::debug!(
                    environment = %environment,
                    resource = %path.display(),
                    "Overlaying local resource"
                );
                let local = store
                    .sensitive_keys()
                    .into_iter()
                    .fold(local, ValueStore::with_sensitive_setting);
                let overlay = self.resolve_store(&local, &environment)?;
                settings.extend(overlay);
            }
        }

        let settings = self.pipeline.process(settings);

        if self.publish {
            self.properties.publish(&settings);
        }

        Ok(ResolvedSettings {
            environment,
            source: resource,
            settings,
        })
    }

    fn resolve_store(&self, store: &ValueStore, environment: &str) -> Result<Settings> {
        Resolver::new(store)
            .with_provider(self.provider.as_ref())
            .with_overrides(self.properties)
            .resolve(environment)
    }

    fn resource_path(&self) -> PathBuf {
        self.resource.clone().unwrap_or_else(|| {
            self.properties
                .get(RESOURCE_PROPERTY)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE))
        })
    }

    fn local_resource_path(&self, resource: &Path) -> Option<PathBuf> {
        if let Some(local) = &self.local_resource {
            return Some(local.clone());
        }
        let file_name = resource.file_name()?.to_str()?;
        Some(resource.with_file_name(format!("{LOCAL_RESOURCE_PREFIX}{file_name}")))
    }
}
