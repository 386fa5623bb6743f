//! Observability hook contract for dispatch lifecycles.

use qcommon::TurnId;

use crate::Outcome;

/// Callbacks fired as a dispatch fans out and drains. Implementations must
/// be cheap and non-blocking; they run on the dispatch path.
pub trait DispatchHooks: Send + Sync {
    fn on_dispatch_start(&self, _turn: TurnId, _providers: usize) {}

    fn on_outcome(&self, _outcome: &Outcome) {}

    fn on_dispatch_complete(&self, _turn: TurnId) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDispatchHooks;

impl DispatchHooks for NoopDispatchHooks {}
