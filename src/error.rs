// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared by the token store, authorization flow and channels.
//!
//! None of these escape the session boundary: `SessionContext` folds them
//! into a [`SubmissionResult`](crate::models::SubmissionResult).

/// Authorization flow errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The authorization server returned an `error` in the redirect.
    #[error("Authorization denied: {0}")]
    Denied(String),

    /// The token is gone, stale, or could not be refreshed.
    #[error("Session expired, please log in again")]
    Expired,

    /// The redirect fragment carried neither a token nor an error.
    #[error("Malformed authorization response: {0}")]
    Malformed(String),
}

/// Token persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store contains invalid data: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Token store lock poisoned")]
    Poisoned,
}

/// Failure of a single attempt on a presence channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// HTTP 401, or a bridge reporting the session is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// HTTP 403, or a bridge reporting missing permissions.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Any other non-success response. `body` is the server text verbatim.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// No response at all.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Rejection without an HTTP status, as reported by the host bridge.
    #[error("{0}")]
    Rejected(String),
}

impl ChannelError {
    /// Classify a non-success HTTP status and its body.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => ChannelError::Unauthorized,
            403 => ChannelError::Forbidden(body),
            _ => ChannelError::Status { status, body },
        }
    }
}

/// Error reported by the host bridge in embedded mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BridgeError(pub String);

impl BridgeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<BridgeError> for ChannelError {
    /// Map a bridge message onto the channel taxonomy by its wording.
    fn from(err: BridgeError) -> Self {
        let lower = err.0.to_lowercase();
        if lower.contains("permission") {
            ChannelError::Forbidden(err.0)
        } else if lower.contains("not authenticated") {
            ChannelError::Unauthorized
        } else if err.0.trim().is_empty() {
            ChannelError::Rejected("Unknown error".to_string())
        } else {
            ChannelError::Rejected(err.0)
        }
    }
}
