//! Small convenience constructors for common types.

use crate::{ProviderId, ProviderSelection, builtin_providers};

pub fn parse_provider_id(value: &str) -> Option<ProviderId> {
    match value.trim().to_ascii_lowercase().as_str() {
        "openai" | "gpt" | "chatgpt" => Some(ProviderId::OpenAi),
        "gemini" | "google" => Some(ProviderId::Gemini),
        "deepseek" => Some(ProviderId::DeepSeek),
        "claude" | "anthropic" => Some(ProviderId::Claude),
        _ => None,
    }
}

/// Selection with every built-in provider enabled at its default version.
pub fn default_selection() -> ProviderSelection {
    selection_for(&ProviderId::ALL)
}

/// Selection with the given providers enabled at their catalog default
/// versions. Providers without a catalog entry are skipped.
pub fn selection_for(providers: &[ProviderId]) -> ProviderSelection {
    let catalog = builtin_providers();
    let mut selection = ProviderSelection::new();
    for id in providers {
        let version = catalog
            .iter()
            .find(|provider| provider.id == *id)
            .and_then(|provider| provider.default_version().cloned());
        if let Some(version) = version {
            selection.enable(*id, version);
        }
    }
    selection
}
