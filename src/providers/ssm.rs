//! AWS Systems Manager Parameter Store adapter.
//!
//! Implements [`ParameterStore`] over an `aws-sdk-ssm` client so it can back a
//! [`ParameterStoreProvider`](super::ParameterStoreProvider). Building and
//! authenticating the client is left to the caller.

use super::ParameterStore;
use crate::error::{ConfigError, ProviderError, ProviderResult, Result};
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::{DisplayErrorContext, SdkError};
use tokio::runtime::{Builder, Runtime};

/// Parameter store backed by AWS SSM `GetParameter` with decryption enabled.
///
/// Lookups are synchronous: each call drives the async client to completion on
/// a runtime owned by this store. Do not call it from inside an async context.
///
/// # Examples
///
/// ```rust,no_run
/// use stratum_config::providers::{ParameterStoreProvider, SsmParameterStore};
///
/// # fn example(client: aws_sdk_ssm::Client) -> stratum_config::error::Result<()> {
/// let store = SsmParameterStore::new(client)?;
/// let provider = ParameterStoreProvider::new(store, "billing");
/// # Ok(())
/// # }
/// ```
pub struct SsmParameterStore {
    client: Client,
    runtime: Runtime,
}

impl SsmParameterStore {
    /// Wrap a configured SSM client.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime used to drive the client cannot start.
    pub fn new(client: Client) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConfigError::Runtime(format!("Failed to create runtime: {}", e)))?;

        Ok(Self { client, runtime })
    }
}

impl ParameterStore for SsmParameterStore {
    fn get_parameter(&self, name: &str) -> ProviderResult<String> {
        let request = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send();

        let output = match self.runtime.block_on(request) {
            Ok(output) => output,
            Err(SdkError::ServiceError(err)) if err.err().is_parameter_not_found() => {
                return Err(ProviderError::not_found(name));
            }
            Err(err) => {
                return Err(ProviderError::lookup(name, DisplayErrorContext(&err)));
            }
        };

        output
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_string)
            .ok_or_else(|| ProviderError::not_found(name))
    }
}
