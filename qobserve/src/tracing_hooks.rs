//! Tracing-based observability hooks for provider invocations and dispatches.
//!
//! ```rust
//! use qobserve::TracingObservabilityHooks;
//! use qprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use qcommon::TurnId;
use qdispatch::{DispatchHooks, Outcome, OutcomeStatus};
use qprovider::{ProviderError, ProviderId, ProviderOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        tracing::info!(
            phase = "provider",
            event = "attempt_start",
            provider = %provider,
            operation,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "provider",
            event = "retry_scheduled",
            provider = %provider,
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            attempts
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl DispatchHooks for TracingObservabilityHooks {
    fn on_dispatch_start(&self, turn: TurnId, providers: usize) {
        tracing::info!(
            phase = "dispatch",
            event = "start",
            turn = %turn,
            providers
        );
    }

    fn on_outcome(&self, outcome: &Outcome) {
        match outcome.status {
            OutcomeStatus::Succeeded => tracing::info!(
                phase = "dispatch",
                event = "outcome",
                turn = %outcome.turn_id,
                provider = %outcome.provider_id,
                version = %outcome.version,
                status = ?outcome.status
            ),
            _ => tracing::warn!(
                phase = "dispatch",
                event = "outcome",
                turn = %outcome.turn_id,
                provider = %outcome.provider_id,
                version = %outcome.version,
                status = ?outcome.status,
                reason = outcome.reason()
            ),
        }
    }

    fn on_dispatch_complete(&self, turn: TurnId) {
        tracing::info!(phase = "dispatch", event = "complete", turn = %turn);
    }
}
