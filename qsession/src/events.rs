//! Session event feed for transcript consumers.

use std::sync::Mutex;

use futures_channel::mpsc;
use qcommon::TurnId;
use qdispatch::{Outcome, Turn};

/// Everything a consumer needs to mirror the transcript live.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    TurnCreated(Turn),
    OutcomeRecorded(Outcome),
    TurnCancelled(TurnId),
    SessionClosed,
}

/// Broadcast fan-out over unbounded channels. Dropped receivers are pruned
/// on the next publish; a slow consumer buffers instead of blocking the
/// dispatch path.
#[derive(Debug, Default)]
pub struct EventBus {
    senders: Mutex<Vec<mpsc::UnboundedSender<SessionEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (sender, receiver) = mpsc::unbounded();
        self.senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(sender);
        receiver
    }

    pub fn publish(&self, event: SessionEvent) {
        self.senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|sender| sender.unbounded_send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
