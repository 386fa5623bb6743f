//! Provider identity and the built-in provider catalog.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderId {
    OpenAi,
    Gemini,
    DeepSeek,
    Claude,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::OpenAi,
        ProviderId::Gemini,
        ProviderId::DeepSeek,
        ProviderId::Claude,
    ];
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::Claude => "claude",
        };

        f.write_str(id)
    }
}

/// Concrete model version offered by a provider, e.g. `gpt-4o-mini`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for VersionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for VersionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Immutable provider identity. Set at configuration time, never mutated
/// while the gateway is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub id: ProviderId,
    pub display_name: String,
    pub description: String,
    pub supported_versions: Vec<VersionId>,
}

impl Provider {
    pub fn new(
        id: ProviderId,
        display_name: impl Into<String>,
        description: impl Into<String>,
        supported_versions: Vec<VersionId>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            description: description.into(),
            supported_versions,
        }
    }

    pub fn default_version(&self) -> Option<&VersionId> {
        self.supported_versions.first()
    }

    pub fn supports(&self, version: &VersionId) -> bool {
        self.supported_versions.contains(version)
    }
}

/// The four backends the gateway ships adapters for.
pub fn builtin_providers() -> Vec<Provider> {
    vec![
        Provider::new(
            ProviderId::OpenAi,
            "OpenAI GPT",
            "ChatGPT and GPT-4 models",
            vec![VersionId::from("gpt-4o"), VersionId::from("gpt-4o-mini")],
        ),
        Provider::new(
            ProviderId::Gemini,
            "Google Gemini",
            "Google's advanced AI model",
            vec![
                VersionId::from("gemini-1.5-pro"),
                VersionId::from("gemini-1.5-flash"),
            ],
        ),
        Provider::new(
            ProviderId::DeepSeek,
            "DeepSeek",
            "DeepSeek reasoning models",
            vec![
                VersionId::from("deepseek-chat"),
                VersionId::from("deepseek-reasoner"),
            ],
        ),
        Provider::new(
            ProviderId::Claude,
            "Anthropic Claude",
            "Claude 3 and Sonnet models",
            vec![
                VersionId::from("claude-3-5-sonnet-latest"),
                VersionId::from("claude-3-haiku-20240307"),
            ],
        ),
    ]
}
