//! Google Gemini generateContent transport trait, reqwest implementation, and adapter.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{error_from_response, map_transport_error};
use crate::{
    CredentialSnapshot, ProviderAdapter, ProviderCall, ProviderError, ProviderFuture, ProviderId,
    SecretString,
};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeminiPart {
    pub text: String,
}

impl GenerateContentRequest {
    pub fn from_call(call: &ProviderCall) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: call.prompt.clone(),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidateContent {
    #[serde(default)]
    pub parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidatePart {
    #[serde(default)]
    pub text: String,
}

impl GenerateContentResponse {
    pub fn into_text(self) -> Result<String, ProviderError> {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::invalid_response(
                "response contained no candidate content",
            ));
        }

        Ok(text)
    }
}

pub trait GeminiTransport: Send + Sync + std::fmt::Debug {
    fn generate<'a>(
        &'a self,
        request: GenerateContentRequest,
        model: String,
        api_key: &'a SecretString,
        deadline: Duration,
    ) -> ProviderFuture<'a, Result<GenerateContentResponse, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct HttpGeminiTransport {
    client: Client,
    base_url: String,
}

impl HttpGeminiTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

impl GeminiTransport for HttpGeminiTransport {
    fn generate<'a>(
        &'a self,
        request: GenerateContentRequest,
        model: String,
        api_key: &'a SecretString,
        deadline: Duration,
    ) -> ProviderFuture<'a, Result<GenerateContentResponse, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint(&model))
                .header("x-goog-api-key", api_key.expose())
                .timeout(deadline)
                .json(&request)
                .send()
                .await
                .map_err(map_transport_error)?;

            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|err| ProviderError::invalid_response(err.to_string()))
        })
    }
}

#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    transport: Arc<dyn GeminiTransport>,
}

impl GeminiAdapter {
    pub fn new(transport: Arc<dyn GeminiTransport>) -> Self {
        Self { transport }
    }

    pub fn default_http_transport(client: Client) -> HttpGeminiTransport {
        HttpGeminiTransport::new(client)
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn invoke<'a>(
        &'a self,
        call: ProviderCall,
        credentials: &'a CredentialSnapshot,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            call.validate()?;
            let api_key = credentials.require_api_key(self.id())?;
            let request = GenerateContentRequest::from_call(&call);
            let model = call.version.as_str().to_string();
            let response = self
                .transport
                .generate(request, model, api_key, call.deadline)
                .await?;
            response.into_text()
        })
    }
}
