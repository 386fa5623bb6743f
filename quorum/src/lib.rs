//! Unified facade over the quorum workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the core quorum crates and provides convenience utilities
//! and macros for wiring a gateway and submitting fan-out turns.

mod macros;

pub mod gateway;
pub mod prelude;
pub mod providers;
pub mod util;

pub use qcommon;
pub use qdispatch;
pub use qobserve;
pub use qprovider;
pub use qsession;

pub use qcommon::{BoxFuture, Registry, SessionId, TurnId, TurnIdGenerator};
pub use qdispatch::{
    ComposeError, DispatchCoordinator, DispatchHandle, DispatchHooks, DispatchPolicy,
    NoopDispatchHooks, Outcome, OutcomeStatus, OutcomeStream, ProviderSelection, SelectionEntry,
    Topic, TopicCatalog, Turn, builtin_topics, compose,
};
pub use qobserve::{
    MetricsObservabilityHooks, SafeDispatchHooks, SafeProviderHooks, TracingObservabilityHooks,
};
pub use qprovider::{
    AdapterRegistry, CredentialSnapshot, CredentialStore, DEFAULT_DEADLINE, NoopOperationHooks,
    Provider, ProviderAdapter, ProviderCall, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderId, ProviderOperationHooks, RetryPolicy, SecretString, VersionId, builtin_providers,
    execute_with_retry,
};
pub use qsession::{
    EventBus, SessionError, SessionErrorKind, SessionEvent, SessionState, Transcript,
    TranscriptEntry, TurnSubmission,
};

pub use gateway::{GatewayBundle, build_gateway, build_gateway_with};
pub use providers::{AdapterBuildConfig, build_adapter, build_adapter_with_config};
pub use util::{default_selection, parse_provider_id, selection_for};
