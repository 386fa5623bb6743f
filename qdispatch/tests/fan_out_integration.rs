use std::sync::Arc;
use std::time::Duration;

use futures_timer::Delay;
use futures_util::StreamExt;
use qcommon::TurnIdGenerator;
use qdispatch::{
    DispatchCoordinator, DispatchPolicy, OutcomeStatus, ProviderSelection, TopicCatalog, Turn,
};
use qprovider::{
    AdapterRegistry, CredentialSnapshot, CredentialStore, ProviderAdapter, ProviderCall,
    ProviderError, ProviderFuture, ProviderId, RetryPolicy, VersionId,
};

#[derive(Debug)]
struct CannedAdapter {
    id: ProviderId,
    delay: Duration,
    content: String,
}

impl ProviderAdapter for CannedAdapter {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn invoke<'a>(
        &'a self,
        call: ProviderCall,
        credentials: &'a CredentialSnapshot,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            call.validate()?;
            credentials.require_api_key(self.id)?;
            Delay::new(self.delay).await;
            Ok(self.content.clone())
        })
    }
}

fn gateway(adapters: Vec<CannedAdapter>) -> DispatchCoordinator {
    let mut registry = AdapterRegistry::new();
    let credentials = CredentialStore::new();
    for adapter in adapters {
        credentials
            .set_api_key(adapter.id, format!("sk-{}", adapter.id))
            .expect("set key");
        registry.register(adapter);
    }

    DispatchCoordinator::new(Arc::new(registry), Arc::new(credentials)).with_policy(
        DispatchPolicy {
            deadline: Duration::from_secs(2),
            retry: RetryPolicy::default(),
        },
    )
}

#[tokio::test]
async fn dispatch_with_builtin_topic_yields_one_outcome_per_enabled_provider() {
    let coordinator = gateway(vec![
        CannedAdapter {
            id: ProviderId::OpenAi,
            delay: Duration::from_millis(40),
            content: "openai says hi".to_string(),
        },
        CannedAdapter {
            id: ProviderId::Gemini,
            delay: Duration::from_millis(5),
            content: "gemini says hi".to_string(),
        },
    ]);

    let catalog = TopicCatalog::builtin();
    let topic = catalog.get("programming").expect("builtin topic");

    let selection = ProviderSelection::new()
        .with_provider(ProviderId::OpenAi, VersionId::from("gpt-4o"))
        .with_provider(ProviderId::Gemini, VersionId::from("gemini-1.5-flash"));
    let turns = TurnIdGenerator::new();
    let turn = Turn::new(turns.next_id(), "explain lifetimes", "programming", selection);

    let (outcomes, _handle) = coordinator.dispatch(&turn, topic);
    let outcomes = outcomes.collect::<Vec<_>>().await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|outcome| outcome.status == OutcomeStatus::Succeeded));
    // Completion order follows latency, not selection order.
    assert_eq!(outcomes[0].provider_id, ProviderId::Gemini);
    assert_eq!(outcomes[1].provider_id, ProviderId::OpenAi);
    assert_eq!(outcomes[1].content.as_deref(), Some("openai says hi"));
}

#[tokio::test]
async fn disabled_provider_is_never_invoked() {
    let coordinator = gateway(vec![
        CannedAdapter {
            id: ProviderId::Claude,
            delay: Duration::ZERO,
            content: "claude says hi".to_string(),
        },
        CannedAdapter {
            id: ProviderId::DeepSeek,
            delay: Duration::ZERO,
            content: "deepseek says hi".to_string(),
        },
    ]);

    let catalog = TopicCatalog::builtin();
    let topic = catalog.get("general").expect("builtin topic");

    let mut selection = ProviderSelection::new()
        .with_provider(
            ProviderId::Claude,
            VersionId::from("claude-3-5-sonnet-latest"),
        )
        .with_provider(ProviderId::DeepSeek, VersionId::from("deepseek-chat"));
    selection.disable(ProviderId::DeepSeek);

    let turns = TurnIdGenerator::new();
    let turn = Turn::new(turns.next_id(), "hello there", "general", selection);

    let (outcomes, _handle) = coordinator.dispatch(&turn, topic);
    let outcomes = outcomes.collect::<Vec<_>>().await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].provider_id, ProviderId::Claude);
    assert_eq!(outcomes[0].status, OutcomeStatus::Succeeded);
}
