//! Gateway wiring helpers: adapters, credentials, coordinator, sessions.

use std::sync::Arc;

use crate::{
    AdapterRegistry, CredentialStore, DispatchCoordinator, DispatchPolicy,
    MetricsObservabilityHooks, ProviderError, ProviderId, SessionId, SessionState, TopicCatalog,
    TracingObservabilityHooks,
};

/// Everything one running gateway shares across sessions.
#[derive(Clone)]
pub struct GatewayBundle {
    pub registry: Arc<AdapterRegistry>,
    pub credentials: Arc<CredentialStore>,
    pub coordinator: Arc<DispatchCoordinator>,
}

impl GatewayBundle {
    /// New session backed by this gateway's coordinator and the stock topic
    /// catalog. Sessions are independent; each keeps its own transcript.
    pub fn open_session(&self, id: impl Into<SessionId>) -> SessionState {
        SessionState::new(id.into(), Arc::clone(&self.coordinator))
    }

    pub fn open_session_with_catalog(
        &self,
        id: impl Into<SessionId>,
        catalog: TopicCatalog,
    ) -> SessionState {
        SessionState::new(id.into(), Arc::clone(&self.coordinator)).with_catalog(catalog)
    }
}

/// Builds a gateway with HTTP adapters for the given providers and their API
/// keys, default dispatch policy, and tracing + metrics observability.
pub fn build_gateway(
    api_keys: &[(ProviderId, &str)],
) -> Result<GatewayBundle, ProviderError> {
    build_gateway_with(api_keys, DispatchPolicy::default())
}

pub fn build_gateway_with(
    api_keys: &[(ProviderId, &str)],
    policy: DispatchPolicy,
) -> Result<GatewayBundle, ProviderError> {
    let mut registry = AdapterRegistry::new();
    let credentials = CredentialStore::new();

    for (provider, api_key) in api_keys {
        credentials.set_api_key(*provider, *api_key)?;
        registry.register_arc(crate::providers::build_adapter(*provider)?);
    }

    let registry = Arc::new(registry);
    let credentials = Arc::new(credentials);
    let coordinator = Arc::new(
        DispatchCoordinator::new(Arc::clone(&registry), Arc::clone(&credentials))
            .with_policy(policy)
            .with_hooks(Arc::new(TracingObservabilityHooks))
            .with_operation_hooks(Arc::new(MetricsObservabilityHooks)),
    );

    Ok(GatewayBundle {
        registry,
        credentials,
        coordinator,
    })
}
