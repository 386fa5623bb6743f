//! Session error kinds and error value helpers.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    /// The submission itself was malformed: blank text or no enabled provider.
    InvalidTurn,
    UnknownTopic,
    Closed,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub kind: SessionErrorKind,
    pub message: String,
}

impl SessionError {
    pub fn new(kind: SessionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_turn(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::InvalidTurn, message)
    }

    pub fn unknown_topic(topic_id: &str) -> Self {
        Self::new(
            SessionErrorKind::UnknownTopic,
            format!("unknown topic '{topic_id}'"),
        )
    }

    pub fn closed() -> Self {
        Self::new(SessionErrorKind::Closed, "session is closed")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Internal, message)
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for SessionError {}
