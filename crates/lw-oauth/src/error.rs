//! Host-facing error model
//!
//! Every failure a flow can hit is reported to the host as an [`OAuthError`]
//! through the error callback, exactly once per flow. Provider-reported
//! error codes pass through verbatim in `kind`; local failures use the fixed
//! kinds below.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::types::RawRedirectError;

/// Error kind for CSRF state validation failures.
pub const STATE_NOT_MATCH: &str = "state_not_match";

/// Error kind for failures during the code-for-token exchange.
pub const EXCHANGE_FAILED: &str = "exchange_failed";

/// Error reported to the host's error callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthError {
    /// Provider error code, or one of the fixed local kinds.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl OAuthError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// CSRF validation failure. The message embeds the state value the
    /// redirect actually carried.
    pub fn state_not_match(url_state: &str) -> Self {
        Self::new(
            STATE_NOT_MATCH,
            format!("state is not the same {}", url_state),
        )
    }

    /// Token exchange failure, message derived from the underlying error.
    pub fn exchange_failed(source: impl std::fmt::Display) -> Self {
        Self::new(EXCHANGE_FAILED, source.to_string())
    }
}

/// Map a provider error redirect onto the host-facing error shape. Absent
/// fields become empty strings.
pub fn transform_error(raw: RawRedirectError) -> OAuthError {
    OAuthError {
        kind: raw.error.unwrap_or_default(),
        message: raw.error_description.unwrap_or_default(),
    }
}

/// Diagnostic output only; never part of the decision logic.
pub fn log_error(err: &OAuthError) {
    error!(kind = %err.kind, "OAuth flow error: {}", err.message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_error() {
        let err = transform_error(RawRedirectError {
            error: Some("error".to_string()),
            error_description: Some("error_description".to_string()),
        });
        assert_eq!(
            err,
            OAuthError {
                kind: "error".to_string(),
                message: "error_description".to_string(),
            }
        );
    }

    #[test]
    fn test_transform_error_missing_description() {
        let err = transform_error(RawRedirectError {
            error: Some("error".to_string()),
            error_description: None,
        });
        assert_eq!(err.kind, "error");
        assert_eq!(err.message, "");
    }

    #[test]
    fn test_state_not_match_message() {
        let err = OAuthError::state_not_match("123");
        assert_eq!(err.kind, STATE_NOT_MATCH);
        assert_eq!(err.message, "state is not the same 123");
    }

    #[test]
    fn test_exchange_failed_message() {
        let err = OAuthError::exchange_failed("connection refused");
        assert_eq!(err.kind, EXCHANGE_FAILED);
        assert_eq!(err.message, "connection refused");
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let err = OAuthError::new("user_cancelled_login", "the user cancelled");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "user_cancelled_login");
        assert_eq!(json["message"], "the user cancelled");
    }

    #[test]
    fn test_log_error_does_not_panic() {
        log_error(&OAuthError::new("test_error", "test error"));
    }
}
