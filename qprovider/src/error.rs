//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use qprovider::ProviderError;
//!
//! let auth = ProviderError::authentication("bad key");
//! assert!(!auth.retryable);
//!
//! let rate_limited = ProviderError::rate_limited("slow down");
//! assert!(rate_limited.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Closed classification of everything a provider call can fail with.
/// Adapters map provider-native failures into this set and never leak
/// provider-specific error shapes past their boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    Network,
    InvalidRequest,
    InvalidResponse,
    Timeout,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message, true)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Network, message, true)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidResponse, message, false)
    }

    /// Deadline exceeded. Not retryable: a timed-out invocation surfaces as
    /// a terminal TimedOut outcome rather than consuming a second deadline.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, false)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Cancelled, message, false)
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_builders_assign_expected_retryability() {
        assert!(!ProviderError::authentication("bad key").retryable);
        assert!(!ProviderError::invalid_request("bad input").retryable);
        assert!(!ProviderError::invalid_response("garbage body").retryable);
        assert!(!ProviderError::timeout("deadline exceeded").retryable);
        assert!(!ProviderError::cancelled("turn superseded").retryable);
        assert!(ProviderError::rate_limited("try later").retryable);
        assert!(ProviderError::network("connection reset").retryable);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = ProviderError::rate_limited("quota exhausted");
        assert_eq!(error.to_string(), "RateLimited: quota exhausted");
    }
}
