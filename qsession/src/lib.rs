//! Session layer for the quorum gateway.
//!
//! A [`SessionState`] accepts user turns, enforces the one-dispatch-at-a-time
//! rule (submitting a new turn cancels the previous one), records every turn
//! and provider outcome in an append-only [`Transcript`], and mirrors the
//! transcript on a live [`SessionEvent`] feed.

mod error;
mod events;
mod session;
mod transcript;

pub use error::{SessionError, SessionErrorKind};
pub use events::{EventBus, SessionEvent};
pub use session::{SessionState, TurnSubmission};
pub use transcript::{Transcript, TranscriptEntry};
