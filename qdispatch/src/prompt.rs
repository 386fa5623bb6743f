//! Topic templates and prompt composition.
//!
//! ```rust
//! use qdispatch::{Topic, compose};
//! use qprovider::ProviderId;
//!
//! let topic = Topic::new("general", "General", "Anything goes")
//!     .with_template(ProviderId::OpenAi, "You are a helpful assistant.");
//!
//! let prompt = compose(&topic, ProviderId::OpenAi, "What is Rust?").unwrap();
//! assert!(prompt.starts_with("You are a helpful assistant."));
//! assert!(prompt.ends_with("What is Rust?"));
//! ```

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use qprovider::ProviderId;

/// Immutable catalog entry: a conversation subject with one tuned prompt
/// template per provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub description: String,
    templates: HashMap<ProviderId, String>,
}

impl Topic {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            templates: HashMap::new(),
        }
    }

    pub fn with_template(mut self, provider: ProviderId, template: impl Into<String>) -> Self {
        self.templates.insert(provider, template.into());
        self
    }

    pub fn template_for(&self, provider: ProviderId) -> Option<&str> {
        self.templates.get(&provider).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    TemplateMissing {
        topic_id: String,
        provider: ProviderId,
    },
}

impl Display for ComposeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateMissing { topic_id, provider } => {
                write!(f, "topic '{topic_id}' has no template for {provider}")
            }
        }
    }
}

impl Error for ComposeError {}

/// Merges the topic's provider-specific template with the user text. Pure;
/// callers decide the fallback when the template is missing rather than
/// aborting the whole turn.
pub fn compose(
    topic: &Topic,
    provider: ProviderId,
    user_text: &str,
) -> Result<String, ComposeError> {
    let template = topic
        .template_for(provider)
        .ok_or_else(|| ComposeError::TemplateMissing {
            topic_id: topic.id.clone(),
            provider,
        })?;

    Ok(format!("{template}\n\n{user_text}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_merges_template_and_user_text() {
        let topic = Topic::new("math", "Math", "Problem solving")
            .with_template(ProviderId::DeepSeek, "You are a rigorous math tutor.")
            .with_template(ProviderId::OpenAi, "You are a friendly math tutor.");

        let prompt = compose(&topic, ProviderId::DeepSeek, "Solve x^2 = 4").expect("compose");
        assert_eq!(
            prompt,
            "You are a rigorous math tutor.\n\nSolve x^2 = 4"
        );
    }

    #[test]
    fn compose_is_pure() {
        let topic = Topic::new("general", "General", "Anything")
            .with_template(ProviderId::Claude, "Be balanced.");

        let first = compose(&topic, ProviderId::Claude, "hello").expect("compose");
        let second = compose(&topic, ProviderId::Claude, "hello").expect("compose");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_template_reports_topic_and_provider() {
        let topic = Topic::new("general", "General", "Anything");
        let error = compose(&topic, ProviderId::Gemini, "hello").expect_err("must fail");

        assert_eq!(
            error,
            ComposeError::TemplateMissing {
                topic_id: "general".to_string(),
                provider: ProviderId::Gemini,
            }
        );
        assert!(error.to_string().contains("gemini"));
    }
}
