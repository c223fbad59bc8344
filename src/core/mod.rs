//! Core resolution types.

mod environment;
mod mask;
mod properties;
mod resolver;
mod store;

#[cfg(feature = "json")]
mod bootstrap;

use std::collections::BTreeMap;

/// A flat map of resolved setting names to values.
pub type Settings = BTreeMap<String, String>;

pub use environment::{
    DEFAULT_ENVIRONMENT, DEFAULT_ENVIRONMENT_PROPERTY, DEFAULT_ENVIRONMENT_VARIABLE,
    DEFAULT_INDIRECTION_PROPERTY, EnvironmentSelector,
};
pub use mask::{MASK_CHAR, mask};
pub use properties::Properties;
pub use resolver::{Resolver, is_blank};
pub use store::ValueStore;

#[cfg(feature = "json")]
pub use bootstrap::{
    DEFAULT_RESOURCE, LOCAL_RESOURCE_PREFIX, RESOURCE_PROPERTY, ResolvedSettings, SettingsBootstrap,
};
