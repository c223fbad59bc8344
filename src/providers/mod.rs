//! Setting provider implementations.
//!
//! Providers supply values that the local configuration does not have. They
//! are queried only for required keys missing after the global and
//! per-environment tiers are merged.

mod basic;
mod chain;
mod parameter_store;
mod setting_provider;

#[cfg(feature = "aws-ssm")]
mod ssm;

pub use basic::{MapProvider, NoOpProvider, SystemEnvironmentProvider};
pub use chain::ChainProvider;
pub use parameter_store::{
    FailureObserver, GLOBAL_TIER, LoggingObserver, ParameterStore, ParameterStoreProvider,
    TierFailure, tier_names,
};
pub use setting_provider::{FnProvider, SettingProvider, from_fn};

#[cfg(feature = "aws-ssm")]
pub use ssm::SsmParameterStore;
