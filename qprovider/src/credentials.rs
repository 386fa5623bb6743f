//! In-memory API key holder and per-dispatch read-only snapshots.
//!
//! The store is a holder, not a storage policy: persistence, encryption,
//! and rotation UI live outside the gateway core.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::{ProviderError, ProviderId};

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Mutable key registry shared with the configuration surface. Dispatches
/// never read it directly; they take a [`CredentialSnapshot`] once at
/// dispatch start, so rotating a key cannot corrupt an in-flight invocation.
#[derive(Debug, Default)]
pub struct CredentialStore {
    keys: Mutex<HashMap<ProviderId, SecretString>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_api_key(
        &self,
        provider: ProviderId,
        api_key: impl Into<String>,
    ) -> Result<(), ProviderError> {
        let api_key = SecretString::new(api_key);
        if api_key.is_empty() {
            return Err(ProviderError::authentication("api key must not be empty"));
        }

        self.keys_mut()?.insert(provider, api_key);
        Ok(())
    }

    pub fn has_api_key(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.keys_ref()?.contains_key(&provider))
    }

    pub fn clear(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.keys_mut()?.remove(&provider).is_some())
    }

    pub fn snapshot(&self) -> Result<CredentialSnapshot, ProviderError> {
        Ok(CredentialSnapshot {
            keys: self.keys_ref()?.clone(),
        })
    }

    fn keys_ref(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<ProviderId, SecretString>>, ProviderError> {
        self.keys
            .lock()
            .map_err(|_| ProviderError::invalid_request("credential store lock poisoned"))
    }

    fn keys_mut(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<ProviderId, SecretString>>, ProviderError> {
        self.keys
            .lock()
            .map_err(|_| ProviderError::invalid_request("credential store lock poisoned"))
    }
}

/// Immutable view of the store as of one dispatch.
#[derive(Debug, Clone, Default)]
pub struct CredentialSnapshot {
    keys: HashMap<ProviderId, SecretString>,
}

impl CredentialSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, provider: ProviderId, api_key: impl Into<String>) -> Self {
        self.keys.insert(provider, SecretString::new(api_key));
        self
    }

    pub fn api_key(&self, provider: ProviderId) -> Option<&SecretString> {
        self.keys.get(&provider)
    }

    /// Resolves the key for `provider` or reports the authentication error
    /// an adapter surfaces when no credential was configured.
    pub fn require_api_key(&self, provider: ProviderId) -> Result<&SecretString, ProviderError> {
        self.api_key(provider).ok_or_else(|| {
            ProviderError::authentication(format!("no api key configured for {provider}"))
        })
    }
}
