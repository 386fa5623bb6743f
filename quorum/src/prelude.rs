//! Common imports for most quorum applications.

pub use crate::{
    build_adapter, build_adapter_with_config, build_gateway, build_gateway_with,
    default_selection, parse_provider_id, selection_for, AdapterBuildConfig, GatewayBundle,
};
pub use crate::{q_provider, q_selection};
pub use crate::{
    AdapterRegistry, BoxFuture, CredentialStore, DispatchCoordinator, DispatchHandle,
    DispatchPolicy, Outcome, OutcomeStatus, OutcomeStream, ProviderAdapter, ProviderError,
    ProviderErrorKind, ProviderId, ProviderSelection, RetryPolicy, SessionError, SessionEvent,
    SessionId, SessionState, Topic, TopicCatalog, Transcript, TranscriptEntry, Turn, TurnId,
    TurnSubmission, VersionId,
};
