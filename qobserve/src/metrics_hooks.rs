//! Metrics-based observability hooks for provider invocations and dispatches.
//!
//! ```rust
//! use qobserve::MetricsObservabilityHooks;
//! use qdispatch::DispatchHooks;
//!
//! fn accepts_dispatch_hooks(_hooks: &dyn DispatchHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_dispatch_hooks(&hooks);
//! ```

use std::time::Duration;

use qcommon::TurnId;
use qdispatch::{DispatchHooks, Outcome};
use qprovider::{ProviderError, ProviderId, ProviderOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, _attempt: u32) {
        metrics::counter!(
            "quorum_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "quorum_provider_retry_scheduled_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "quorum_provider_retry_delay_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        metrics::counter!(
            "quorum_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "quorum_provider_attempts_per_success",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "quorum_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "quorum_provider_attempts_per_failure",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }
}

impl DispatchHooks for MetricsObservabilityHooks {
    fn on_dispatch_start(&self, _turn: TurnId, providers: usize) {
        metrics::counter!("quorum_dispatch_start_total").increment(1);
        metrics::histogram!("quorum_dispatch_fan_out_width").record(providers as f64);
    }

    fn on_outcome(&self, outcome: &Outcome) {
        metrics::counter!(
            "quorum_dispatch_outcome_total",
            "provider" => outcome.provider_id.to_string(),
            "status" => format!("{:?}", outcome.status)
        )
        .increment(1);

        if let (started, Some(completed)) = (outcome.started_at, outcome.completed_at) {
            if let Ok(elapsed) = completed.duration_since(started) {
                metrics::histogram!(
                    "quorum_dispatch_outcome_duration_seconds",
                    "provider" => outcome.provider_id.to_string(),
                    "status" => format!("{:?}", outcome.status)
                )
                .record(elapsed.as_secs_f64());
            }
        }
    }

    fn on_dispatch_complete(&self, _turn: TurnId) {
        metrics::counter!("quorum_dispatch_complete_total").increment(1);
    }
}
