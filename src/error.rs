//! Error types for stratum-config.

use std::path::PathBuf;

/// Result type alias for stratum-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Result type alias for provider lookups.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One or more required settings could not be resolved.
    ///
    /// Raised once per resolution and lists every missing key in
    /// declaration order.
    #[error("Missing required settings: {}", .0.join(", "))]
    MissingRequiredSettings(Vec<String>),

    /// The configuration source exists but could not be parsed.
    #[error("Failed to parse configuration '{resource}': {reason}")]
    Malformed {
        /// The resource that failed to parse
        resource: String,
        /// The parser's description of the problem
        reason: String,
    },

    /// A mandatory configuration resource does not exist.
    #[error("Configuration resource not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    /// IO error occurred while reading an existing source.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A provider failed and the caller asked for the failure.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A runtime needed to drive a remote client could not be started.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl ConfigError {
    /// Create a malformed-source error.
    pub fn malformed(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// The keys reported missing, if this is a missing-settings error.
    pub fn missing_keys(&self) -> Option<&[String]> {
        match self {
            Self::MissingRequiredSettings(keys) => Some(keys),
            _ => None,
        }
    }
}

/// Errors reported by setting providers.
///
/// Providers return `Ok(None)` for "no value"; these errors describe lookups
/// that failed outright.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No candidate name resolved. `name` is the most specific candidate.
    #[error("unable to find parameter using pattern {name}")]
    NotFound {
        /// The most specific name that was tried
        name: String,
    },

    /// A single named lookup failed.
    #[error("lookup of '{name}' failed: {reason}")]
    Lookup {
        /// The name being looked up
        name: String,
        /// Why it failed
        reason: String,
    },

    /// Generic provider error.
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Create a lookup error for a single name.
    pub fn lookup(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Lookup {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}
