/// Resolves a provider shorthand ident to a [`ProviderId`](crate::ProviderId).
///
/// ```rust
/// use quorum::{ProviderId, q_provider};
///
/// assert_eq!(q_provider!(openai), ProviderId::OpenAi);
/// assert_eq!(q_provider!(claude), ProviderId::Claude);
/// ```
#[macro_export]
macro_rules! q_provider {
    (openai) => {
        $crate::ProviderId::OpenAi
    };
    (gemini) => {
        $crate::ProviderId::Gemini
    };
    (deepseek) => {
        $crate::ProviderId::DeepSeek
    };
    (claude) => {
        $crate::ProviderId::Claude
    };
    ($other:ident) => {
        compile_error!("unsupported provider: use openai, gemini, deepseek, or claude")
    };
}

/// Builds a [`ProviderSelection`](crate::ProviderSelection) from
/// provider/version pairs.
///
/// ```rust
/// use quorum::{ProviderId, q_selection};
///
/// let selection = q_selection![
///     openai => "gpt-4o",
///     claude => "claude-3-5-sonnet-latest",
/// ];
///
/// assert_eq!(selection.enabled_count(), 2);
/// assert!(selection.is_enabled(ProviderId::OpenAi));
/// ```
#[macro_export]
macro_rules! q_selection {
    () => {
        $crate::ProviderSelection::new()
    };
    ($($provider:ident => $version:expr),+ $(,)?) => {{
        let mut selection = $crate::ProviderSelection::new();
        $(selection.enable($crate::q_provider!($provider), $crate::VersionId::from($version));)+
        selection
    }};
}
