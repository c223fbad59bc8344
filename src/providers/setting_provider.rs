//! Setting provider trait.

use crate::error::ProviderResult;
use std::sync::Arc;

/// Trait for external setting providers.
///
/// A provider is asked for values the local configuration does not have.
/// Implement this trait to plug in custom lookups (secret stores, databases,
/// key-value services).
///
/// Lookups are synchronous and may block; the resolver never queries
/// providers concurrently.
///
/// # Return values
///
/// - `Ok(Some(value))` - the provider has a value for the key
/// - `Ok(None)` - the provider has nothing for the key
/// - `Err(_)` - the lookup failed; resolvers treat this as "absent"
///
/// # Examples
///
/// Closures become providers through [`from_fn`]:
///
/// ```rust
/// use stratum_config::providers::{SettingProvider, from_fn};
///
/// let provider = from_fn(|environment, key| Ok(Some(format!("{environment}:{key}"))));
/// assert_eq!(
///     provider.get_property("PROD", "db.url").unwrap(),
///     Some("PROD:db.url".to_string())
/// );
/// ```
pub trait SettingProvider: Send + Sync {
    /// Look up `key` for `environment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself failed.
    fn get_property(&self, environment: &str, key: &str) -> ProviderResult<Option<String>>;

    /// Get a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("provider")
            .to_string()
    }
}

/// Provider backed by a closure.
///
/// Created with [`from_fn`].
pub struct FnProvider<F> {
    lookup: F,
}

/// Wrap a closure as a [`SettingProvider`].
pub fn from_fn<F>(lookup: F) -> FnProvider<F>
where
    F: Fn(&str, &str) -> ProviderResult<Option<String>> + Send + Sync,
{
    FnProvider { lookup }
}

impl<F> SettingProvider for FnProvider<F>
where
    F: Fn(&str, &str) -> ProviderResult<Option<String>> + Send + Sync,
{
    fn get_property(&self, environment: &str, key: &str) -> ProviderResult<Option<String>> {
        (self.lookup)(environment, key)
    }

    fn name(&self) -> String {
        "fn".to_string()
    }
}

impl<P: SettingProvider + ?Sized> SettingProvider for &P {
    fn get_property(&self, environment: &str, key: &str) -> ProviderResult<Option<String>> {
        (**self).get_property(environment, key)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl<P: SettingProvider + ?Sized> SettingProvider for Box<P> {
    fn get_property(&self, environment: &str, key: &str) -> ProviderResult<Option<String>> {
        (**self).get_property(environment, key)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl<P: SettingProvider + ?Sized> SettingProvider for Arc<P> {
    fn get_property(&self, environment: &str, key: &str) -> ProviderResult<Option<String>> {
        (**self).get_property(environment, key)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChainProvider, MapProvider};

    #[test]
    fn test_fn_provider() {
        let provider = from_fn(|environment, key| {
            Ok((environment == "PROD").then(|| format!("{key}-prod")))
        });
        assert_eq!(provider.get_property("PROD", "k").unwrap().as_deref(), Some("k-prod"));
        assert_eq!(provider.get_property("TEST", "k").unwrap(), None);
        assert_eq!(provider.name(), "fn");
    }

    #[test]
    fn test_shared_provider_in_chain() {
        let shared = Arc::new(MapProvider::new([("key", "value")]));
        let chain = ChainProvider::new().with_provider(Arc::clone(&shared));

        assert_eq!(chain.get_property("PROD", "key").unwrap().as_deref(), Some("value"));
        assert_eq!(chain.provider_names(), vec!["map"]);
    }

    #[test]
    fn test_default_name_is_type_name() {
        struct Vault;
        impl SettingProvider for Vault {
            fn get_property(&self, _: &str, _: &str) -> ProviderResult<Option<String>> {
                Ok(None)
            }
        }

        assert_eq!(Vault.name(), "Vault");
    }
}
