//! Anthropic Claude messages transport trait, reqwest implementation, and adapter.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{error_from_response, map_transport_error};
use crate::{
    CredentialSnapshot, ProviderAdapter, ProviderCall, ProviderError, ProviderFuture, ProviderId,
    SecretString,
};

pub const CLAUDE_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const CLAUDE_API_VERSION: &str = "2023-06-01";

/// The messages API requires an explicit output ceiling on every request.
pub const CLAUDE_DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaudeMessage {
    pub role: String,
    pub content: String,
}

impl MessagesRequest {
    pub fn from_call(call: &ProviderCall) -> Self {
        Self {
            model: call.version.as_str().to_string(),
            max_tokens: CLAUDE_DEFAULT_MAX_TOKENS,
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: call.prompt.clone(),
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ClaudeContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl MessagesResponse {
    pub fn into_text(self) -> Result<String, ProviderError> {
        let text = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect::<String>();

        if text.trim().is_empty() {
            return Err(ProviderError::invalid_response(
                "response contained no text blocks",
            ));
        }

        Ok(text)
    }
}

pub trait ClaudeTransport: Send + Sync + std::fmt::Debug {
    fn create_message<'a>(
        &'a self,
        request: MessagesRequest,
        api_key: &'a SecretString,
        deadline: Duration,
    ) -> ProviderFuture<'a, Result<MessagesResponse, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct HttpClaudeTransport {
    client: Client,
    base_url: String,
}

impl HttpClaudeTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: CLAUDE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/messages", self.base_url.trim_end_matches('/'))
    }
}

impl ClaudeTransport for HttpClaudeTransport {
    fn create_message<'a>(
        &'a self,
        request: MessagesRequest,
        api_key: &'a SecretString,
        deadline: Duration,
    ) -> ProviderFuture<'a, Result<MessagesResponse, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint())
                .header("x-api-key", api_key.expose())
                .header("anthropic-version", CLAUDE_API_VERSION)
                .timeout(deadline)
                .json(&request)
                .send()
                .await
                .map_err(map_transport_error)?;

            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            response
                .json::<MessagesResponse>()
                .await
                .map_err(|err| ProviderError::invalid_response(err.to_string()))
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClaudeAdapter {
    transport: Arc<dyn ClaudeTransport>,
}

impl ClaudeAdapter {
    pub fn new(transport: Arc<dyn ClaudeTransport>) -> Self {
        Self { transport }
    }

    pub fn default_http_transport(client: Client) -> HttpClaudeTransport {
        HttpClaudeTransport::new(client)
    }
}

impl ProviderAdapter for ClaudeAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Claude
    }

    fn invoke<'a>(
        &'a self,
        call: ProviderCall,
        credentials: &'a CredentialSnapshot,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            call.validate()?;
            let api_key = credentials.require_api_key(self.id())?;
            let request = MessagesRequest::from_call(&call);
            let response = self
                .transport
                .create_message(request, api_key, call.deadline)
                .await?;
            response.into_text()
        })
    }
}
