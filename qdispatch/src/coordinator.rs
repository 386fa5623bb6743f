//! Fan-out dispatch: one turn, many providers, outcomes in completion order.

use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use futures_core::Stream;
use futures_timer::Delay;
use futures_channel::oneshot;
use futures_util::future::{FutureExt, Shared};
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::{pin_mut, select};
use qcommon::{BoxFuture, TurnId};
use qprovider::{
    AdapterRegistry, CredentialSnapshot, CredentialStore, NoopOperationHooks, ProviderCall,
    ProviderError, ProviderId, ProviderOperationHooks, RetryPolicy, VersionId, DEFAULT_DEADLINE,
    execute_with_retry,
};

use crate::hooks::{DispatchHooks, NoopDispatchHooks};
use crate::prompt::{compose, Topic};
use crate::types::{Outcome, Turn};

/// Outcomes in the order providers finish, not the order they were started.
pub type OutcomeStream = std::pin::Pin<Box<dyn Stream<Item = Outcome> + Send>>;

/// Knobs applied uniformly to every provider in a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPolicy {
    /// Wall-clock budget for a single invocation attempt.
    pub deadline: Duration,
    pub retry: RetryPolicy,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
            retry: RetryPolicy::default(),
        }
    }
}

/// Cancellation lever for one in-flight dispatch. Dropping the handle
/// cancels the dispatch, so the caller keeps it alive for as long as the
/// turn should keep running.
pub struct DispatchHandle {
    cancel: Option<oneshot::Sender<()>>,
    turn_id: TurnId,
}

impl DispatchHandle {
    pub fn turn_id(&self) -> TurnId {
        self.turn_id
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

impl std::fmt::Debug for DispatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchHandle")
            .field("turn_id", &self.turn_id)
            .finish()
    }
}

/// Fans one turn out to every enabled provider concurrently and yields one
/// terminal [`Outcome`] per provider as each finishes. A slow or failing
/// provider never delays the others.
pub struct DispatchCoordinator {
    registry: Arc<AdapterRegistry>,
    credentials: Arc<CredentialStore>,
    policy: DispatchPolicy,
    hooks: Arc<dyn DispatchHooks>,
    operation_hooks: Arc<dyn ProviderOperationHooks>,
}

impl DispatchCoordinator {
    pub fn new(registry: Arc<AdapterRegistry>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            registry,
            credentials,
            policy: DispatchPolicy::default(),
            hooks: Arc::new(NoopDispatchHooks),
            operation_hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn DispatchHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_operation_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.operation_hooks = hooks;
        self
    }

    /// Starts the fan-out for `turn` and returns the outcome stream plus the
    /// cancellation handle. The stream terminates after exactly one outcome
    /// per enabled provider, cancelled providers included.
    pub fn dispatch(&self, turn: &Turn, topic: &Topic) -> (OutcomeStream, DispatchHandle) {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let cancelled = cancel_rx.shared();

        // Key rotation mid-dispatch must not affect in-flight invocations,
        // so every provider works from this one snapshot.
        let credentials = Arc::new(
            self.credentials
                .snapshot()
                .unwrap_or_else(|_| CredentialSnapshot::empty()),
        );
        let topic = Arc::new(topic.clone());

        let jobs: FuturesUnordered<BoxFuture<'static, Outcome>> = FuturesUnordered::new();
        for (provider, version) in turn.selection.enabled_providers() {
            jobs.push(self.provider_job(
                turn,
                topic.clone(),
                provider,
                version.clone(),
                Arc::clone(&credentials),
                cancelled.clone(),
            ));
        }

        self.hooks.on_dispatch_start(turn.id, jobs.len());

        let hooks = Arc::clone(&self.hooks);
        let turn_id = turn.id;
        let mut jobs = jobs;
        let outcomes = stream! {
            while let Some(outcome) = jobs.next().await {
                hooks.on_outcome(&outcome);
                yield outcome;
            }
            hooks.on_dispatch_complete(turn_id);
        };

        let handle = DispatchHandle {
            cancel: Some(cancel_tx),
            turn_id,
        };

        (Box::pin(outcomes), handle)
    }

    fn provider_job(
        &self,
        turn: &Turn,
        topic: Arc<Topic>,
        provider: ProviderId,
        version: VersionId,
        credentials: Arc<CredentialSnapshot>,
        cancelled: Shared<oneshot::Receiver<()>>,
    ) -> BoxFuture<'static, Outcome> {
        let registry = Arc::clone(&self.registry);
        let operation_hooks = Arc::clone(&self.operation_hooks);
        let retry = self.policy.retry.clone();
        let deadline = self.policy.deadline;
        let turn_id = turn.id;
        let user_text = turn.user_text.clone();

        Box::pin(async move {
            let outcome = Outcome::pending(turn_id, provider, version.clone());

            let Some(adapter) = registry.get(provider) else {
                return outcome.complete_err(ProviderError::invalid_request(format!(
                    "no adapter registered for {provider}"
                )));
            };

            if let Err(error) = credentials.require_api_key(provider) {
                return outcome.complete_err(error);
            }

            // A topic without a template for this provider degrades to the
            // raw user text instead of failing the provider.
            let prompt = compose(&topic, provider, &user_text)
                .unwrap_or_else(|_| user_text.clone());
            let call = ProviderCall::new(version, prompt).with_deadline(deadline);
            if let Err(error) = call.validate() {
                return outcome.complete_err(error);
            }

            let work = execute_with_retry(
                provider,
                "invoke",
                &retry,
                operation_hooks.as_ref(),
                |_attempt| {
                    let adapter = Arc::clone(&adapter);
                    let credentials = Arc::clone(&credentials);
                    let call = call.clone();
                    async move {
                        let invoke = adapter.invoke(call, &credentials).fuse();
                        let deadline_timer = Delay::new(deadline).fuse();
                        pin_mut!(invoke, deadline_timer);
                        select! {
                            result = invoke => result,
                            _ = deadline_timer => Err(ProviderError::timeout(format!(
                                "{provider} gave no response within {deadline:?}"
                            ))),
                        }
                    }
                },
                Delay::new,
            )
            .fuse();
            let cancel = cancelled.fuse();
            pin_mut!(work, cancel);

            select! {
                result = work => match result {
                    Ok(content) => outcome.complete_ok(content),
                    Err(error) => outcome.complete_err(error),
                },
                _ = cancel => {
                    outcome.complete_err(ProviderError::cancelled("dispatch cancelled"))
                }
            }
        })
    }
}
