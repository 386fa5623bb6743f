//! HTTP adapter implementations, one module per backend.

#[cfg(feature = "provider-openai")]
pub mod openai;

#[cfg(feature = "provider-deepseek")]
pub mod deepseek;

#[cfg(feature = "provider-gemini")]
pub mod gemini;

#[cfg(feature = "provider-claude")]
pub mod claude;

#[cfg(any(
    feature = "provider-openai",
    feature = "provider-gemini",
    feature = "provider-claude"
))]
pub(crate) mod http {
    //! Shared status and transport error mapping for the HTTP adapters.

    use reqwest::{Response, StatusCode};

    use crate::ProviderError;

    pub(crate) fn map_transport_error(err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::timeout(err.to_string())
        } else {
            ProviderError::network(err.to_string())
        }
    }

    pub(crate) async fn error_from_response(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("request failed with status {status}"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(message)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ProviderError::invalid_request(message)
            }
            _ => ProviderError::network(message),
        }
    }

    /// Every backend wraps failures as `{"error": {"message": ...}}`.
    pub(crate) fn extract_error_message(body: &str) -> Option<String> {
        let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
        let message = value.get("error")?.get("message")?.as_str()?;
        Some(truncate(message, 4096))
    }

    pub(crate) fn truncate(input: &str, max: usize) -> String {
        if input.len() <= max {
            return input.to_string();
        }
        let mut output = input[..max].to_string();
        output.push_str("...");
        output
    }

    #[cfg(test)]
    mod tests {
        use super::extract_error_message;

        #[test]
        fn extracts_nested_error_message() {
            let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
            assert_eq!(
                extract_error_message(body),
                Some("Incorrect API key provided".to_string())
            );
        }

        #[test]
        fn returns_none_for_unstructured_bodies() {
            assert_eq!(extract_error_message("upstream unavailable"), None);
            assert_eq!(extract_error_message(r#"{"detail": "nope"}"#), None);
        }
    }
}
