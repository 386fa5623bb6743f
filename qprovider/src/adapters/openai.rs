//! OpenAI chat-completions transport trait, reqwest implementation, and adapter.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{error_from_response, map_transport_error};
use crate::{
    CredentialSnapshot, ProviderAdapter, ProviderCall, ProviderError, ProviderFuture, ProviderId,
    SecretString,
};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatCompletionsRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatCompletionsRequest {
    pub fn from_call(call: &ProviderCall) -> Self {
        Self {
            model: call.version.as_str().to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: call.prompt.clone(),
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionsResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionsResponse {
    pub fn into_text(self) -> Result<String, ProviderError> {
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::invalid_response(
                "response contained no assistant content",
            ));
        }

        Ok(text)
    }
}

/// Wire boundary for the OpenAI-compatible chat-completions API. DeepSeek
/// speaks the same shape against a different base URL, so it shares this
/// trait and its HTTP implementation.
pub trait ChatCompletionsTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: ChatCompletionsRequest,
        api_key: &'a SecretString,
        deadline: Duration,
    ) -> ProviderFuture<'a, Result<ChatCompletionsResponse, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct HttpChatCompletionsTransport {
    client: Client,
    base_url: String,
}

impl HttpChatCompletionsTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl ChatCompletionsTransport for HttpChatCompletionsTransport {
    fn complete<'a>(
        &'a self,
        request: ChatCompletionsRequest,
        api_key: &'a SecretString,
        deadline: Duration,
    ) -> ProviderFuture<'a, Result<ChatCompletionsResponse, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint("chat/completions"))
                .bearer_auth(api_key.expose())
                .timeout(deadline)
                .json(&request)
                .send()
                .await
                .map_err(map_transport_error)?;

            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            response
                .json::<ChatCompletionsResponse>()
                .await
                .map_err(|err| ProviderError::invalid_response(err.to_string()))
        })
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    transport: Arc<dyn ChatCompletionsTransport>,
}

impl OpenAiAdapter {
    pub fn new(transport: Arc<dyn ChatCompletionsTransport>) -> Self {
        Self { transport }
    }

    pub fn default_http_transport(client: Client) -> HttpChatCompletionsTransport {
        HttpChatCompletionsTransport::new(client)
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn invoke<'a>(
        &'a self,
        call: ProviderCall,
        credentials: &'a CredentialSnapshot,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            call.validate()?;
            let api_key = credentials.require_api_key(self.id())?;
            let request = ChatCompletionsRequest::from_call(&call);
            let response = self
                .transport
                .complete(request, api_key, call.deadline)
                .await?;
            response.into_text()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{ProviderErrorKind, VersionId};

    #[derive(Debug, Default)]
    struct FakeTransport {
        requests: Mutex<Vec<ChatCompletionsRequest>>,
        response: Mutex<Option<Result<ChatCompletionsResponse, ProviderError>>>,
    }

    impl FakeTransport {
        fn with_text(text: &str) -> Self {
            let transport = Self::default();
            *transport.response.lock().expect("response lock") = Some(Ok(ChatCompletionsResponse {
                choices: vec![ChatChoice {
                    message: ChatChoiceMessage {
                        content: Some(text.to_string()),
                    },
                }],
            }));
            transport
        }

        fn with_error(error: ProviderError) -> Self {
            let transport = Self::default();
            *transport.response.lock().expect("response lock") = Some(Err(error));
            transport
        }
    }

    impl ChatCompletionsTransport for FakeTransport {
        fn complete<'a>(
            &'a self,
            request: ChatCompletionsRequest,
            _api_key: &'a SecretString,
            _deadline: Duration,
        ) -> ProviderFuture<'a, Result<ChatCompletionsResponse, ProviderError>> {
            Box::pin(async move {
                self.requests.lock().expect("requests lock").push(request);
                self.response
                    .lock()
                    .expect("response lock")
                    .take()
                    .expect("fake transport response should be staged")
            })
        }
    }

    fn credentials() -> CredentialSnapshot {
        CredentialSnapshot::empty().with_api_key(ProviderId::OpenAi, "sk-test")
    }

    #[tokio::test]
    async fn invoke_sends_model_and_prompt_and_returns_text() {
        let transport = Arc::new(FakeTransport::with_text("the answer"));
        let adapter = OpenAiAdapter::new(Arc::clone(&transport) as Arc<dyn ChatCompletionsTransport>);

        let call = ProviderCall::new(VersionId::from("gpt-4o-mini"), "what is the answer?");
        let content = adapter
            .invoke(call, &credentials())
            .await
            .expect("invoke should succeed");
        assert_eq!(content, "the answer");

        let requests = transport.requests.lock().expect("requests lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert_eq!(requests[0].messages[0].role, "user");
        assert_eq!(requests[0].messages[0].content, "what is the answer?");
    }

    #[tokio::test]
    async fn invoke_without_api_key_fails_before_transport() {
        let transport = Arc::new(FakeTransport::with_text("never seen"));
        let adapter = OpenAiAdapter::new(Arc::clone(&transport) as Arc<dyn ChatCompletionsTransport>);

        let call = ProviderCall::new(VersionId::from("gpt-4o"), "hello");
        let error = adapter
            .invoke(call, &CredentialSnapshot::empty())
            .await
            .expect_err("invoke should fail");

        assert_eq!(error.kind, ProviderErrorKind::Authentication);
        assert!(transport.requests.lock().expect("requests lock").is_empty());
    }

    #[tokio::test]
    async fn empty_choices_surface_as_invalid_response() {
        let transport = Arc::new(FakeTransport::default());
        *transport.response.lock().expect("response lock") =
            Some(Ok(ChatCompletionsResponse { choices: vec![] }));
        let adapter = OpenAiAdapter::new(Arc::clone(&transport) as Arc<dyn ChatCompletionsTransport>);

        let call = ProviderCall::new(VersionId::from("gpt-4o"), "hello");
        let error = adapter
            .invoke(call, &credentials())
            .await
            .expect_err("invoke should fail");
        assert_eq!(error.kind, ProviderErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn transport_errors_pass_through_unchanged() {
        let transport = Arc::new(FakeTransport::with_error(ProviderError::rate_limited(
            "quota exhausted",
        )));
        let adapter = OpenAiAdapter::new(transport as Arc<dyn ChatCompletionsTransport>);

        let call = ProviderCall::new(VersionId::from("gpt-4o"), "hello");
        let error = adapter
            .invoke(call, &credentials())
            .await
            .expect_err("invoke should fail");
        assert_eq!(error.kind, ProviderErrorKind::RateLimited);
        assert!(error.retryable);
    }
}
