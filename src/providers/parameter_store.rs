//! Tiered lookup against a remote parameter store.
//!
//! A key is resolved through three candidate names, most specific first:
//!
//! 1. `/{environment}/{prefix}/{key}`
//! 2. `/{environment}/{key}`
//! 3. `/global/{key}`
//!
//! Every name is lowercased. Tiers are queried one at a time and the first
//! tier with a value wins.

use super::SettingProvider;
use crate::error::{ProviderError, ProviderResult};

/// Environment segment used for the least specific tier.
pub const GLOBAL_TIER: &str = "global";

/// A store of named parameters, such as a managed parameter service.
///
/// Implementations fetch a single fully-qualified name. A name that does not
/// exist should be reported as [`ProviderError::NotFound`]; any other error
/// is a failed lookup. The tiered provider treats both the same way.
pub trait ParameterStore: Send + Sync {
    /// Fetch the value stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter does not exist or cannot be fetched.
    fn get_parameter(&self, name: &str) -> ProviderResult<String>;
}

impl<S: ParameterStore + ?Sized> ParameterStore for Box<S> {
    fn get_parameter(&self, name: &str) -> ProviderResult<String> {
        (**self).get_parameter(name)
    }
}

impl<S: ParameterStore + ?Sized> ParameterStore for std::sync::Arc<S> {
    fn get_parameter(&self, name: &str) -> ProviderResult<String> {
        (**self).get_parameter(name)
    }
}

/// A failed lookup of one tier.
#[derive(Debug)]
pub struct TierFailure<'a> {
    /// The fully-qualified name that was tried
    pub name: &'a str,
    /// Why the lookup failed
    pub error: &'a ProviderError,
}

/// Observer notified once for every tier that fails.
///
/// Observers see failures for diagnostics only; they cannot change which tier
/// is tried next.
pub trait FailureObserver: Send + Sync {
    /// Called after a tier lookup fails.
    fn on_failure(&self, failure: &TierFailure<'_>);
}

/// Default observer: logs each failed tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl FailureObserver for LoggingObserver {
    fn on_failure(&self, failure: &TierFailure<'_>) {
        tracing::info!(name = %failure.name, "unable to find parameter(s) {}", failure.name);
        tracing::debug!(name = %failure.name, error = %failure.error, "parameter lookup failed");
    }
}

/// Build a parameter name from path segments.
///
/// Segments are joined with `/`, prefixed with `/` and lowercased.
fn build_name(segments: &[&str]) -> String {
    format!("/{}", segments.join("/")).to_lowercase()
}

/// The candidate names for `key`, most specific first.
///
/// # Examples
///
/// ```rust
/// use stratum_config::providers::tier_names;
///
/// assert_eq!(
///     tier_names("TEST", "Pfx", "Some.Key"),
///     [
///         "/test/pfx/some.key".to_string(),
///         "/test/some.key".to_string(),
///         "/global/some.key".to_string(),
///     ]
/// );
/// ```
pub fn tier_names(environment: &str, prefix: &str, key: &str) -> [String; 3] {
    [
        build_name(&[environment, prefix, key]),
        build_name(&[environment, key]),
        build_name(&[GLOBAL_TIER, key]),
    ]
}

/// Provider resolving keys through tiered names in a [`ParameterStore`].
///
/// Unlike the other providers this one fails when no tier has a value:
/// [`get_property`](SettingProvider::get_property) returns
/// [`ProviderError::NotFound`] naming the most specific tier. Wrap it in a
/// [`ChainProvider`](super::ChainProvider) or let the resolver fold the error
/// into "absent" when a soft failure is wanted.
///
/// # Examples
///
/// ```rust
/// use stratum_config::error::{ProviderError, ProviderResult};
/// use stratum_config::providers::{ParameterStore, ParameterStoreProvider, SettingProvider};
/// use std::collections::HashMap;
///
/// struct InMemory(HashMap<String, String>);
///
/// impl ParameterStore for InMemory {
///     fn get_parameter(&self, name: &str) -> ProviderResult<String> {
///         self.0.get(name).cloned().ok_or_else(|| ProviderError::not_found(name))
///     }
/// }
///
/// let store = InMemory(HashMap::from([("/test/k".to_string(), "v".to_string())]));
/// let provider = ParameterStoreProvider::new(store, "pfx");
/// assert_eq!(provider.get_property("test", "k").unwrap().as_deref(), Some("v"));
/// ```
pub struct ParameterStoreProvider<S> {
    store: S,
    prefix: String,
    observer: Box<dyn FailureObserver>,
}

impl<S: ParameterStore> ParameterStoreProvider<S> {
    /// Create a provider over `store` using `prefix` for the most specific tier.
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            observer: Box::new(LoggingObserver),
        }
    }

    /// Replace the failure observer.
    pub fn with_observer<O: FailureObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The prefix used for the most specific tier.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Try each name in order, returning the first value found.
    fn first_match(&self, names: &[String]) -> ProviderResult<String> {
        for name in names {
            tracing::debug!(name = %name, "looking for parameter {}", name);
            match self.store.get_parameter(name) {
                Ok(value) => {
                    tracing::info!(name = %name, "found parameter as {}", name);
                    return Ok(value);
                }
                Err(error) => self.observer.on_failure(&TierFailure {
                    name,
                    error: &error,
                }),
            }
        }

        let most_specific = names.first().map(String::as_str).unwrap_or_default();
        Err(ProviderError::not_found(most_specific))
    }
}

impl<S: ParameterStore> SettingProvider for ParameterStoreProvider<S> {
    fn get_property(&self, environment: &str, key: &str) -> ProviderResult<Option<String>> {
        tracing::info!(
            key = %key,
            environment = %environment,
            "looking for property {} in environment {}",
            key,
            environment
        );

        let names = tier_names(environment, &self.prefix, key);
        self.first_match(&names).map(Some)
    }

    fn name(&self) -> String {
        format!("parameter-store:{}", self.prefix)
    }
}
