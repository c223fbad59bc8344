//! # stratum-config
//!
//! Layered, per-environment configuration resolution.
//!
//! ## Overview
//!
//! `stratum-config` turns a declarative [`ValueStore`](core::ValueStore) into
//! the flat settings map for one environment:
//! - Global values, overlaid by environment-specific values
//! - Required keys filled from pluggable [`SettingProvider`](providers::SettingProvider)s
//! - Process-level overrides from a lock-free [`Properties`](core::Properties) registry
//! - Aliases, sensitive-value masking and post-processing
//!
//! ## Quick Start
//!
//! ```rust
//! use stratum_config::prelude::*;
//!
//! # fn main() -> stratum_config::error::Result<()> {
//! let store = ValueStore::new()
//!     .with_global_setting("http.port", "8080")
//!     .with_environment_setting("PROD", "http.port", "443")
//!     .with_required_setting("db.password")
//!     .with_sensitive_setting("db.password")
//!     .with_alias("http.port", "server.port");
//!
//! let secrets = MapProvider::new([("db.password", "hunter2")]);
//! let overrides = Properties::new();
//!
//! let settings = Resolver::new(&store)
//!     .with_provider(&secrets)
//!     .with_overrides(&overrides)
//!     .resolve("PROD")?;
//!
//! assert_eq!(settings["server.port"], "443");
//! assert_eq!(store.printable("db.password", &settings["db.password"]), "*******");
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `json` (default): load stores from comment-tolerant JSON and assemble
//!   settings at startup with [`SettingsBootstrap`](core::SettingsBootstrap)
//! - `aws-ssm`: back the tiered parameter-store provider with AWS Systems
//!   Manager Parameter Store

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod processors;
pub mod providers;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{EnvironmentSelector, Properties, Resolver, Settings, ValueStore};
    pub use crate::error::{ConfigError, ProviderError, Result};
    pub use crate::processors::{EnvironmentOverridingPostProcessor, Pipeline, PostProcessor};
    pub use crate::providers::{
        ChainProvider, MapProvider, NoOpProvider, ParameterStore, ParameterStoreProvider,
        SettingProvider, SystemEnvironmentProvider,
    };

    #[cfg(feature = "json")]
    pub use crate::core::{ResolvedSettings, SettingsBootstrap};
}
