//! Per-session orchestration: validation, cancel-and-replace, transcript.

use std::sync::{Arc, Mutex, MutexGuard};

use async_stream::stream;
use qcommon::{SessionId, TurnIdGenerator};
use qdispatch::{
    DispatchCoordinator, DispatchHandle, OutcomeStream, ProviderSelection, Topic, TopicCatalog,
    Turn,
};
use qprovider::{ProviderId, VersionId};

use crate::error::SessionError;
use crate::events::{EventBus, SessionEvent};
use crate::transcript::{Transcript, TranscriptEntry};

/// A successfully submitted turn plus its live outcome feed. The caller
/// drives `outcomes`; each outcome is appended to the transcript and
/// published on the event bus before it is yielded.
pub struct TurnSubmission {
    pub turn: Turn,
    pub outcomes: OutcomeStream,
}

impl std::fmt::Debug for TurnSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnSubmission")
            .field("turn", &self.turn)
            .finish_non_exhaustive()
    }
}

struct Inner {
    selection: ProviderSelection,
    topic_id: String,
    active: Option<DispatchHandle>,
    closed: bool,
}

/// Owns everything one conversation needs: the provider selection, the
/// current topic, the transcript, and the handle of the in-flight dispatch.
/// At most one dispatch runs at a time; submitting a new turn cancels the
/// previous one first.
pub struct SessionState {
    id: SessionId,
    coordinator: Arc<DispatchCoordinator>,
    catalog: TopicCatalog,
    transcript: Arc<Transcript>,
    events: Arc<EventBus>,
    turn_ids: TurnIdGenerator,
    inner: Mutex<Inner>,
}

impl SessionState {
    pub fn new(id: SessionId, coordinator: Arc<DispatchCoordinator>) -> Self {
        Self {
            id,
            coordinator,
            catalog: TopicCatalog::builtin(),
            transcript: Arc::new(Transcript::new()),
            events: Arc::new(EventBus::new()),
            turn_ids: TurnIdGenerator::new(),
            inner: Mutex::new(Inner {
                selection: ProviderSelection::new(),
                topic_id: "general".to_string(),
                active: None,
                closed: false,
            }),
        }
    }

    pub fn with_catalog(mut self, catalog: TopicCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Takes effect from the next submitted turn; the in-flight dispatch
    /// keeps the selection snapshot it started with.
    pub fn enable_provider(
        &self,
        provider: ProviderId,
        version: VersionId,
    ) -> Result<(), SessionError> {
        self.inner()?.selection.enable(provider, version);
        Ok(())
    }

    pub fn disable_provider(&self, provider: ProviderId) -> Result<(), SessionError> {
        self.inner()?.selection.disable(provider);
        Ok(())
    }

    pub fn selection(&self) -> Result<ProviderSelection, SessionError> {
        Ok(self.inner()?.selection.clone())
    }

    /// Takes effect from the next submitted turn.
    pub fn set_topic(&self, topic_id: &str) -> Result<(), SessionError> {
        if self.catalog.get(topic_id).is_none() {
            return Err(SessionError::unknown_topic(topic_id));
        }

        self.inner()?.topic_id = topic_id.to_string();
        Ok(())
    }

    pub fn topic_id(&self) -> Result<String, SessionError> {
        Ok(self.inner()?.topic_id.clone())
    }

    /// Validates and dispatches one turn. Any still-running previous turn
    /// is cancelled first, so its remaining providers resolve as Cancelled.
    /// Cancel-then-dispatch happens under the session lock, so when two
    /// submissions race, the turn created later is always the one that
    /// survives. The returned stream is lazy: outcomes only reach the
    /// transcript and event feed as the caller drains `outcomes`.
    pub fn submit_turn(&self, user_text: &str) -> Result<TurnSubmission, SessionError> {
        if user_text.trim().is_empty() {
            return Err(SessionError::invalid_turn("message text must not be blank"));
        }

        let mut inner = self.inner()?;
        if inner.closed {
            return Err(SessionError::closed());
        }

        if inner.selection.enabled_count() == 0 {
            return Err(SessionError::invalid_turn(
                "at least one provider must be enabled",
            ));
        }

        let topic: Topic = self
            .catalog
            .get(&inner.topic_id)
            .cloned()
            .ok_or_else(|| SessionError::unknown_topic(&inner.topic_id))?;

        if let Some(previous) = inner.active.take() {
            self.events
                .publish(SessionEvent::TurnCancelled(previous.turn_id()));
            previous.cancel();
        }

        let turn = Turn::new(
            self.turn_ids.next_id(),
            user_text,
            inner.topic_id.clone(),
            inner.selection.clone(),
        );

        self.transcript.append_turn(turn.clone());
        self.events.publish(SessionEvent::TurnCreated(turn.clone()));

        let (outcomes, handle) = self.coordinator.dispatch(&turn, &topic);
        inner.active = Some(handle);
        drop(inner);

        Ok(TurnSubmission {
            turn,
            outcomes: self.instrument(outcomes),
        })
    }

    /// Cancels the in-flight turn, if any. Returns whether one was running.
    pub fn cancel_current_turn(&self) -> Result<bool, SessionError> {
        let previous = self.inner()?.active.take();
        match previous {
            Some(handle) => {
                self.events
                    .publish(SessionEvent::TurnCancelled(handle.turn_id()));
                handle.cancel();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Tears the session down: cancels any in-flight turn and rejects
    /// further submissions. The transcript stays readable.
    pub fn close(&self) -> Result<(), SessionError> {
        let previous = {
            let mut inner = self.inner()?;
            inner.closed = true;
            inner.active.take()
        };

        if let Some(handle) = previous {
            self.events
                .publish(SessionEvent::TurnCancelled(handle.turn_id()));
            handle.cancel();
        }

        self.events.publish(SessionEvent::SessionClosed);
        Ok(())
    }

    pub fn is_closed(&self) -> Result<bool, SessionError> {
        Ok(self.inner()?.closed)
    }

    pub fn transcript(&self) -> Arc<Transcript> {
        Arc::clone(&self.transcript)
    }

    pub fn transcript_snapshot(&self) -> Vec<TranscriptEntry> {
        self.transcript.snapshot()
    }

    pub fn subscribe(&self) -> futures_channel::mpsc::UnboundedReceiver<SessionEvent> {
        self.events.subscribe()
    }

    fn instrument(&self, outcomes: OutcomeStream) -> OutcomeStream {
        let transcript = Arc::clone(&self.transcript);
        let events = Arc::clone(&self.events);

        Box::pin(stream! {
            let mut outcomes = outcomes;
            while let Some(outcome) = futures_util::StreamExt::next(&mut outcomes).await {
                transcript.append_outcome(outcome.clone());
                events.publish(SessionEvent::OutcomeRecorded(outcome.clone()));
                yield outcome;
            }
        })
    }

    fn inner(&self) -> Result<MutexGuard<'_, Inner>, SessionError> {
        self.inner
            .lock()
            .map_err(|_| SessionError::internal("session state lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::StreamExt;
    use qdispatch::OutcomeStatus;
    use qprovider::{
        AdapterRegistry, CredentialSnapshot, CredentialStore, ProviderAdapter, ProviderCall,
        ProviderError, ProviderFuture,
    };

    use super::*;
    use crate::error::SessionErrorKind;

    #[derive(Debug)]
    struct InstantAdapter {
        id: ProviderId,
    }

    impl ProviderAdapter for InstantAdapter {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn invoke<'a>(
            &'a self,
            call: ProviderCall,
            _credentials: &'a CredentialSnapshot,
        ) -> ProviderFuture<'a, Result<String, ProviderError>> {
            Box::pin(async move { Ok(format!("{} answered: {}", self.id, call.prompt)) })
        }
    }

    fn session_with(providers: &[ProviderId]) -> SessionState {
        let mut registry = AdapterRegistry::new();
        let credentials = CredentialStore::new();
        for provider in providers {
            registry.register(InstantAdapter { id: *provider });
            credentials
                .set_api_key(*provider, format!("sk-{provider}"))
                .expect("set key");
        }

        let coordinator =
            DispatchCoordinator::new(Arc::new(registry), Arc::new(credentials));
        let session = SessionState::new(SessionId::from("s-test"), Arc::new(coordinator));
        for provider in providers {
            session
                .enable_provider(*provider, VersionId::from("test-model"))
                .expect("enable");
        }
        session
    }

    #[tokio::test]
    async fn blank_text_and_empty_selection_are_rejected() {
        let session = session_with(&[ProviderId::OpenAi]);
        let error = session.submit_turn("   ").expect_err("blank must fail");
        assert_eq!(error.kind, SessionErrorKind::InvalidTurn);

        session
            .disable_provider(ProviderId::OpenAi)
            .expect("disable");
        let error = session.submit_turn("hello").expect_err("no providers");
        assert_eq!(error.kind, SessionErrorKind::InvalidTurn);
        assert!(session.transcript_snapshot().is_empty());
    }

    #[tokio::test]
    async fn submitted_turn_records_turn_and_outcomes_in_transcript() {
        let session = session_with(&[ProviderId::OpenAi, ProviderId::Claude]);

        let submission = session.submit_turn("what is rust?").expect("submit");
        let outcomes = submission.outcomes.collect::<Vec<_>>().await;
        assert_eq!(outcomes.len(), 2);

        let snapshot = session.transcript_snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(matches!(&snapshot[0], TranscriptEntry::Turn(t) if t.id == submission.turn.id));
        assert!(snapshot[1..]
            .iter()
            .all(|entry| matches!(entry, TranscriptEntry::Outcome(_))));
    }

    #[tokio::test]
    async fn unknown_topic_is_rejected_before_any_dispatch() {
        let session = session_with(&[ProviderId::OpenAi]);
        let error = session.set_topic("astrology").expect_err("unknown topic");
        assert_eq!(error.kind, SessionErrorKind::UnknownTopic);

        session.set_topic("math").expect("known topic");
        assert_eq!(session.topic_id().expect("topic"), "math");
    }

    #[tokio::test]
    async fn closed_session_rejects_submissions_but_keeps_transcript() {
        let session = session_with(&[ProviderId::OpenAi]);
        let submission = session.submit_turn("hello").expect("submit");
        let _ = submission.outcomes.collect::<Vec<_>>().await;

        session.close().expect("close");
        assert!(session.is_closed().expect("closed"));

        let error = session.submit_turn("again").expect_err("closed");
        assert_eq!(error.kind, SessionErrorKind::Closed);
        assert_eq!(session.transcript_snapshot().len(), 2);
    }

    #[tokio::test]
    async fn cancel_current_turn_reports_whether_a_dispatch_was_running() {
        let session = session_with(&[ProviderId::OpenAi]);
        assert!(!session.cancel_current_turn().expect("no-op cancel"));

        let submission = session.submit_turn("hello").expect("submit");
        assert!(session.cancel_current_turn().expect("cancel"));
        drop(submission);
        assert!(!session.cancel_current_turn().expect("idempotent"));
    }

    #[tokio::test]
    async fn events_mirror_the_transcript() {
        let session = session_with(&[ProviderId::OpenAi]);
        let mut events = session.subscribe();

        let submission = session.submit_turn("hello").expect("submit");
        let outcomes = submission.outcomes.collect::<Vec<_>>().await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, OutcomeStatus::Succeeded);

        assert_eq!(
            events.next().await,
            Some(SessionEvent::TurnCreated(submission.turn))
        );
        assert_eq!(
            events.next().await,
            Some(SessionEvent::OutcomeRecorded(outcomes[0].clone()))
        );
    }

    #[tokio::test]
    async fn slow_turn_is_cancelled_when_replaced() {
        #[derive(Debug)]
        struct SlowAdapter;

        impl ProviderAdapter for SlowAdapter {
            fn id(&self) -> ProviderId {
                ProviderId::Gemini
            }

            fn invoke<'a>(
                &'a self,
                _call: ProviderCall,
                _credentials: &'a CredentialSnapshot,
            ) -> ProviderFuture<'a, Result<String, ProviderError>> {
                Box::pin(async move {
                    futures_timer::Delay::new(Duration::from_secs(30)).await;
                    Ok("too late".to_string())
                })
            }
        }

        let mut registry = AdapterRegistry::new();
        registry.register(SlowAdapter);
        let credentials = CredentialStore::new();
        credentials
            .set_api_key(ProviderId::Gemini, "sk-gemini")
            .expect("set key");
        let coordinator =
            DispatchCoordinator::new(Arc::new(registry), Arc::new(credentials));
        let session = SessionState::new(SessionId::from("s-replace"), Arc::new(coordinator));
        session
            .enable_provider(ProviderId::Gemini, VersionId::from("gemini-1.5-pro"))
            .expect("enable");

        let first = session.submit_turn("first question").expect("submit");
        let first_outcomes = tokio::spawn(first.outcomes.collect::<Vec<_>>());

        let second = session.submit_turn("second question").expect("submit");

        let first_outcomes = first_outcomes.await.expect("join");
        assert_eq!(first_outcomes.len(), 1);
        assert_eq!(first_outcomes[0].status, OutcomeStatus::Cancelled);
        assert_eq!(first_outcomes[0].turn_id, first.turn.id);
        assert!(second.turn.id > first.turn.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_submissions_always_cancel_the_older_turn() {
        #[derive(Debug)]
        struct BriefAdapter;

        impl ProviderAdapter for BriefAdapter {
            fn id(&self) -> ProviderId {
                ProviderId::OpenAi
            }

            fn invoke<'a>(
                &'a self,
                _call: ProviderCall,
                _credentials: &'a CredentialSnapshot,
            ) -> ProviderFuture<'a, Result<String, ProviderError>> {
                Box::pin(async move {
                    futures_timer::Delay::new(Duration::from_millis(150)).await;
                    Ok("answer".to_string())
                })
            }
        }

        for _ in 0..10 {
            let mut registry = AdapterRegistry::new();
            registry.register(BriefAdapter);
            let credentials = CredentialStore::new();
            credentials
                .set_api_key(ProviderId::OpenAi, "sk-openai")
                .expect("set key");
            let coordinator =
                DispatchCoordinator::new(Arc::new(registry), Arc::new(credentials));
            let session = Arc::new(SessionState::new(
                SessionId::from("s-race"),
                Arc::new(coordinator),
            ));
            session
                .enable_provider(ProviderId::OpenAi, VersionId::from("gpt-4o"))
                .expect("enable");

            let barrier = Arc::new(std::sync::Barrier::new(2));
            let submit = |session: Arc<SessionState>, barrier: Arc<std::sync::Barrier>| {
                std::thread::spawn(move || {
                    barrier.wait();
                    session.submit_turn("race")
                })
            };

            let first = submit(Arc::clone(&session), Arc::clone(&barrier));
            let second = submit(Arc::clone(&session), barrier);
            let first = first.join().expect("join").expect("submit");
            let second = second.join().expect("join").expect("submit");

            let (older, newer) = if first.turn.id < second.turn.id {
                (first, second)
            } else {
                (second, first)
            };

            let older_outcomes = older.outcomes.collect::<Vec<_>>().await;
            assert_eq!(older_outcomes.len(), 1);
            assert_eq!(older_outcomes[0].status, OutcomeStatus::Cancelled);
            assert_eq!(older_outcomes[0].turn_id, older.turn.id);

            let newer_outcomes = newer.outcomes.collect::<Vec<_>>().await;
            assert_eq!(newer_outcomes.len(), 1);
            assert_eq!(newer_outcomes[0].status, OutcomeStatus::Succeeded);
            assert_eq!(newer_outcomes[0].turn_id, newer.turn.id);
        }
    }
}
