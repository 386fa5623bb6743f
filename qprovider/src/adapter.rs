//! Provider adapter contract and the normalized call value.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::{CredentialSnapshot, ProviderError, ProviderId, VersionId};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// One normalized invocation: the fully composed prompt, the model version
/// to address, and the deadline this single attempt must finish within.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    pub version: VersionId,
    pub prompt: String,
    pub deadline: Duration,
}

impl ProviderCall {
    pub fn new(version: VersionId, prompt: impl Into<String>) -> Self {
        Self {
            version,
            prompt: prompt.into(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.version.as_str().trim().is_empty() {
            return Err(ProviderError::invalid_request("version must not be empty"));
        }

        if self.prompt.trim().is_empty() {
            return Err(ProviderError::invalid_request("prompt must not be empty"));
        }

        if self.deadline.is_zero() {
            return Err(ProviderError::invalid_request(
                "deadline must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Uniform capability implemented once per backend. Adapters translate the
/// normalized call into a provider-specific request, honor the call's
/// deadline, and map every provider-native failure into `ProviderError`.
/// Adapters never retry; retry policy belongs to the dispatch coordinator.
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    fn invoke<'a>(
        &'a self,
        call: ProviderCall,
        credentials: &'a CredentialSnapshot,
    ) -> ProviderFuture<'a, Result<String, ProviderError>>;
}
