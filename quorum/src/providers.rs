//! Stable adapter construction surface for facade consumers.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::{ProviderAdapter, ProviderError, ProviderId};

#[derive(Debug, Clone)]
pub struct AdapterBuildConfig {
    pub provider_id: ProviderId,
    pub timeout: Duration,
}

impl AdapterBuildConfig {
    pub fn new(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            timeout: Duration::from_secs(90),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Builds the HTTP adapter for one backend with default settings. API keys
/// are not baked into adapters; they live in the gateway's credential store.
pub fn build_adapter(provider_id: ProviderId) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    build_adapter_with_config(AdapterBuildConfig::new(provider_id))
}

pub fn build_adapter_with_config(
    config: AdapterBuildConfig,
) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    // The per-request deadline is enforced by the dispatch coordinator; this
    // client timeout is only a backstop for requests outside a dispatch.
    let http = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ProviderError::network(err.to_string()))?;

    match config.provider_id {
        ProviderId::OpenAi => build_openai_adapter(http),
        ProviderId::Gemini => build_gemini_adapter(http),
        ProviderId::DeepSeek => build_deepseek_adapter(http),
        ProviderId::Claude => build_claude_adapter(http),
    }
}

#[cfg(feature = "provider-openai")]
fn build_openai_adapter(http: Client) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    let transport = Arc::new(qprovider::adapters::openai::OpenAiAdapter::default_http_transport(http));
    Ok(Arc::new(qprovider::adapters::openai::OpenAiAdapter::new(
        transport,
    )))
}

#[cfg(not(feature = "provider-openai"))]
fn build_openai_adapter(_http: Client) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-openai feature is not enabled on quorum",
    ))
}

#[cfg(feature = "provider-gemini")]
fn build_gemini_adapter(http: Client) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    let transport = Arc::new(qprovider::adapters::gemini::GeminiAdapter::default_http_transport(http));
    Ok(Arc::new(qprovider::adapters::gemini::GeminiAdapter::new(
        transport,
    )))
}

#[cfg(not(feature = "provider-gemini"))]
fn build_gemini_adapter(_http: Client) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-gemini feature is not enabled on quorum",
    ))
}

#[cfg(feature = "provider-deepseek")]
fn build_deepseek_adapter(http: Client) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    let transport = Arc::new(
        qprovider::adapters::deepseek::DeepSeekAdapter::default_http_transport(http),
    );
    Ok(Arc::new(qprovider::adapters::deepseek::DeepSeekAdapter::new(
        transport,
    )))
}

#[cfg(not(feature = "provider-deepseek"))]
fn build_deepseek_adapter(_http: Client) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-deepseek feature is not enabled on quorum",
    ))
}

#[cfg(feature = "provider-claude")]
fn build_claude_adapter(http: Client) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    let transport = Arc::new(qprovider::adapters::claude::ClaudeAdapter::default_http_transport(http));
    Ok(Arc::new(qprovider::adapters::claude::ClaudeAdapter::new(
        transport,
    )))
}

#[cfg(not(feature = "provider-claude"))]
fn build_claude_adapter(_http: Client) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-claude feature is not enabled on quorum",
    ))
}
