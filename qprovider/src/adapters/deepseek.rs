//! DeepSeek adapter over the OpenAI-compatible chat-completions transport.

use std::sync::Arc;

use reqwest::Client;

use crate::adapters::openai::{
    ChatCompletionsRequest, ChatCompletionsTransport, HttpChatCompletionsTransport,
};
use crate::{
    CredentialSnapshot, ProviderAdapter, ProviderCall, ProviderError, ProviderFuture, ProviderId,
};

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";

#[derive(Debug, Clone)]
pub struct DeepSeekAdapter {
    transport: Arc<dyn ChatCompletionsTransport>,
}

impl DeepSeekAdapter {
    pub fn new(transport: Arc<dyn ChatCompletionsTransport>) -> Self {
        Self { transport }
    }

    pub fn default_http_transport(client: Client) -> HttpChatCompletionsTransport {
        HttpChatCompletionsTransport::new(client).with_base_url(DEEPSEEK_BASE_URL)
    }
}

impl ProviderAdapter for DeepSeekAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::DeepSeek
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
    use std::time::Duration;

    use super::*;
    use crate::adapters::openai::{ChatChoice, ChatChoiceMessage, ChatCompletionsResponse};
    use crate::{ProviderErrorKind, SecretString, VersionId};

    #[derive(Debug, Default)]
    struct FakeTransport {
        requests: Mutex<Vec<ChatCompletionsRequest>>,
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
                Ok(ChatCompletionsResponse {
                    choices: vec![ChatChoice {
                        message: ChatChoiceMessage {
                            content: Some("step-by-step reasoning".to_string()),
                        },
                    }],
                })
            })
        }
    }

    #[tokio::test]
    async fn invoke_uses_deepseek_credentials_and_model() {
        let transport = Arc::new(FakeTransport::default());
        let adapter = DeepSeekAdapter::new(Arc::clone(&transport) as Arc<dyn ChatCompletionsTransport>);
        let credentials =
            CredentialSnapshot::empty().with_api_key(ProviderId::DeepSeek, "sk-deepseek");

        let call = ProviderCall::new(VersionId::from("deepseek-reasoner"), "prove it");
        let content = adapter
            .invoke(call, &credentials)
            .await
            .expect("invoke should succeed");
        assert_eq!(content, "step-by-step reasoning");

        let requests = transport.requests.lock().expect("requests lock");
        assert_eq!(requests[0].model, "deepseek-reasoner");
    }

    #[tokio::test]
    async fn invoke_rejects_missing_deepseek_key_even_with_other_keys_present() {
        let transport = Arc::new(FakeTransport::default());
        let adapter = DeepSeekAdapter::new(Arc::clone(&transport) as Arc<dyn ChatCompletionsTransport>);
        let credentials = CredentialSnapshot::empty().with_api_key(ProviderId::OpenAi, "sk-openai");

        let call = ProviderCall::new(VersionId::from("deepseek-chat"), "hello");
        let error = adapter
            .invoke(call, &credentials)
            .await
            .expect_err("invoke should fail");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
        assert!(transport.requests.lock().expect("requests lock").is_empty());
    }
}
