//! Selection of the active environment name.

use crate::core::{Properties, is_blank};
use crate::providers::SettingProvider;

/// Property naming the property that holds the environment name.
pub const DEFAULT_INDIRECTION_PROPERTY: &str = "stratum.env.property";

/// Property holding the environment name.
pub const DEFAULT_ENVIRONMENT_PROPERTY: &str = "stratum.env";

/// OS environment variable holding the environment name.
pub const DEFAULT_ENVIRONMENT_VARIABLE: &str = "STRATUM_ENV";

/// Environment used when nothing else names one.
pub const DEFAULT_ENVIRONMENT: &str = "LOCAL";

/// Determines the active environment name.
///
/// Sources are checked in order, skipping blank values:
///
/// 1. the property named by the indirection property
/// 2. the environment property
/// 3. the OS environment variable
/// 4. the default, `LOCAL`
///
/// # Examples
///
/// ```rust
/// use stratum_config::core::{EnvironmentSelector, Properties};
/// use stratum_config::providers::NoOpProvider;
///
/// let properties = Properties::new();
/// properties.set("stratum.env", "PROD");
///
/// let selector = EnvironmentSelector::new();
/// assert_eq!(selector.determine(&properties, &NoOpProvider), "PROD");
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentSelector {
    indirection_property: String,
    property: String,
    variable: String,
    default: String,
}

impl EnvironmentSelector {
    /// Create a selector with the default names.
    pub fn new() -> Self {
        Self {
            indirection_property: DEFAULT_INDIRECTION_PROPERTY.to_string(),
            property: DEFAULT_ENVIRONMENT_PROPERTY.to_string(),
            variable: DEFAULT_ENVIRONMENT_VARIABLE.to_string(),
            default: DEFAULT_ENVIRONMENT.to_string(),
        }
    }

    /// Set the property that names the environment property.
    pub fn with_indirection_property(mut self, name: impl Into<String>) -> Self {
        self.indirection_property = name.into();
        self
    }

    /// Set the property holding the environment name.
    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.property = name.into();
        self
    }

    /// Set the OS environment variable holding the environment name.
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = name.into();
        self
    }

    /// Set the fallback environment name.
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default = name.into();
        self
    }

    /// Determine the environment name.
    ///
    /// `variables` supplies OS environment variables, normally a
    /// [`SystemEnvironmentProvider`](crate::providers::SystemEnvironmentProvider).
    pub fn determine(&self, properties: &Properties, variables: &dyn SettingProvider) -> String {
        let non_blank = |value: Option<String>| value.filter(|v| !is_blank(v));

        let indirect = non_blank(properties.get(&self.indirection_property))
            .and_then(|name| non_blank(properties.get(&name)));
        if let Some(environment) = indirect {
            tracing::trace!(
                environment = %environment,
                via = %self.indirection_property,
                "using environment name"
            );
            return environment;
        }

        if let Some(environment) = non_blank(properties.get(&self.property)) {
            tracing::trace!(
                environment = %environment,
                via = %self.property,
                "using environment name"
            );
            return environment;
        }

        let from_variable = variables
            .get_property(&self.default, &self.variable)
            .unwrap_or_else(|e| {
                tracing::debug!(
                    variable = %self.variable,
                    error = %e,
                    "environment variable lookup failed"
                );
                None
            });
        if let Some(environment) = non_blank(from_variable) {
            tracing::trace!(
                environment = %environment,
                via = %self.variable,
                "using environment name"
            );
            return environment;
        }

        tracing::trace!(environment = %self.default, "using default environment name");
        self.default.clone()
    }
}

impl Default for EnvironmentSelector {
    fn default() -> Self {
        Self::new()
    }
}
