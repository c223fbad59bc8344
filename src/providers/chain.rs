//! Provider chain.
//!
//! Combines several providers into one. Providers are queried strictly in the
//! order they were added and the first one with a value wins.

use super::SettingProvider;
use crate::error::{ProviderError, ProviderResult};

/// A chain of setting providers with priority ordering.
///
/// Providers are tried in the order they were added. The first provider to
/// return a value wins and no later provider is queried. A provider that
/// fails is logged and skipped.
///
/// # Examples
///
/// ```rust
/// use stratum_config::providers::{ChainProvider, MapProvider, NoOpProvider, SettingProvider};
///
/// let chain = ChainProvider::new()
///     .with_provider(NoOpProvider)
///     .with_provider(MapProvider::new([("db.url", "postgres://db")]));
///
/// assert_eq!(
///     chain.get_property("PROD", "db.url").unwrap().as_deref(),
///     Some("postgres://db")
/// );
/// ```
#[derive(Default)]
pub struct ChainProvider {
    providers: Vec<Box<dyn SettingProvider>>,
}

impl std::fmt::Debug for ChainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainProvider")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl ChainProvider {
    /// Create a new empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the end of the chain (builder pattern).
    ///
    /// Providers added first have higher priority.
    pub fn with_provider<P: SettingProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Add a provider to the end of the chain.
    pub fn add_provider(&mut self, provider: Box<dyn SettingProvider>) {
        self.providers.push(provider);
    }

    /// Get the number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Get the provider names in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl SettingProvider for ChainProvider {
    fn get_property(&self, environment: &str, key: &str) -> ProviderResult<Option<String>> {
        let mut last_error: Option<ProviderError> = None;

        for provider in &self.providers {
            match provider.get_property(environment, key) {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(
                        provider = %provider.name(),
                        environment = %environment,
                        key = %key,
                        error = %e,
                        "Provider returned error, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    fn name(&self) -> String {
        format!("chain[{}]", self.provider_names().join(", "))
    }
}
