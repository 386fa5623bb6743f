//! Runtime registry of provider adapters.

use std::sync::Arc;

use qcommon::Registry;

use crate::{ProviderAdapter, ProviderId};

/// New backends register an adapter here; the dispatch coordinator resolves
/// adapters by id and never special-cases provider identity.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Registry<ProviderId, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A>(&mut self, adapter: A)
    where
        A: ProviderAdapter + 'static,
    {
        self.adapters.insert(adapter.id(), Arc::new(adapter));
    }

    pub fn register_arc(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.id(), adapter);
    }

    pub fn get(&self, provider: ProviderId) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&provider).map(Arc::clone)
    }

    pub fn contains(&self, provider: ProviderId) -> bool {
        self.adapters.contains_key(&provider)
    }

    pub fn ids(&self) -> Vec<ProviderId> {
        self.adapters.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
