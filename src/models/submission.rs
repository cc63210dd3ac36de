// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Submission outcome and the status message derived from it.

use serde::Serialize;
use std::time::Duration;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How long a success message stays visible.
pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Outcome {
    Success,
    /// No usable token; recoverable by logging in again.
    AuthExpired,
    /// Scope or permission missing; not retried.
    PermissionDenied,
    /// No response from the server; not retried.
    NetworkError,
    /// Unexpected server response, carried verbatim.
    Unknown,
}

/// Result of one submit or clear call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SubmissionResult {
    pub outcome: Outcome,
    pub message: String,
}

impl SubmissionResult {
    pub fn new(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Outcome::Success, message)
    }

    pub fn auth_expired() -> Self {
        Self::new(
            Outcome::AuthExpired,
            "Not authenticated. Please log in with Discord again.",
        )
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// Exactly one status message per outcome.
    pub fn status_message(&self) -> StatusMessage {
        let (level, auto_dismiss) = match self.outcome {
            Outcome::Success => (StatusLevel::Success, Some(SUCCESS_DISMISS_AFTER)),
            _ => (StatusLevel::Error, None),
        };
        StatusMessage {
            level,
            text: self.message.clone(),
            auto_dismiss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Error,
}

/// Message shown to the user; errors persist until the next action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
    #[serde(skip)]
    pub auto_dismiss: Option<Duration>,
}
