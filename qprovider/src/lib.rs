//! Provider identity, credentials, resilience, and per-backend adapters for
//! the quorum gateway.

mod adapter;
pub mod adapters;
mod credentials;
mod error;
mod model;
mod registry;
mod resilience;

pub use adapter::{DEFAULT_DEADLINE, ProviderAdapter, ProviderCall, ProviderFuture};
pub use credentials::{CredentialSnapshot, CredentialStore, SecretString};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{Provider, ProviderId, VersionId, builtin_providers};
pub use registry::AdapterRegistry;
pub use resilience::{
    NoopOperationHooks, ProviderOperationHooks, RetryPolicy, execute_with_retry,
};
