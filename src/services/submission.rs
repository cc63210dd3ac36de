// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Presence submission protocol.
//!
//! One ordered list of attempts per operation, consumed by one loop:
//! - no usable token: `AuthExpired` before any network call
//! - 401: refresh once and retry the same attempt
//! - other rejection: at most one fallback attempt, then `Unknown`
//! - 403: `PermissionDenied`, never retried
//! - no response: `NetworkError`, never retried

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use crate::error::ChannelError;
use crate::models::{Outcome, PresencePayload, SubmissionResult};
use crate::services::discord::DiscordClient;
use crate::services::oauth::OAuthClient;
use crate::services::token_store::TokenStore;
use crate::time_utils::now_epoch_ms;

/// Alternate attempts tried after the primary one.
pub const MAX_FALLBACKS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Update,
    Clear,
}

/// How the logical update is rendered into a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// The full activity object (or nothing when clearing).
    Activity,
    /// `{"custom_status": {...}}` for the settings endpoint.
    CustomStatus,
}

/// One `(method, path, shape)` entry of an attempt list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub method: Method,
    pub path: &'static str,
    pub shape: PayloadShape,
}

impl Attempt {
    pub const fn new(method: Method, path: &'static str, shape: PayloadShape) -> Self {
        Self {
            method,
            path,
            shape,
        }
    }

    /// Request body for this attempt. `None` payload means clear.
    pub fn body(&self, payload: Option<&PresencePayload>) -> Option<serde_json::Value> {
        match (self.shape, payload) {
            (PayloadShape::Activity, Some(payload)) => Some(json!(payload)),
            (PayloadShape::Activity, None) => None,
            (PayloadShape::CustomStatus, Some(payload)) => Some(json!({
                "custom_status": { "text": payload.status_text() }
            })),
            (PayloadShape::CustomStatus, None) => Some(json!({ "custom_status": null })),
        }
    }
}

const ACTIVITIES_PATH: &str = "/users/@me/activities";
const SETTINGS_PATH: &str = "/users/@me/settings";

/// REST attempts for an operation, primary first.
pub fn rest_attempts(op: Operation, fallback: bool) -> Vec<Attempt> {
    let (primary, alternate) = match op {
        Operation::Update => (
            Attempt::new(Method::POST, ACTIVITIES_PATH, PayloadShape::Activity),
            Attempt::new(Method::PATCH, SETTINGS_PATH, PayloadShape::CustomStatus),
        ),
        Operation::Clear => (
            Attempt::new(Method::DELETE, ACTIVITIES_PATH, PayloadShape::Activity),
            Attempt::new(Method::PATCH, SETTINGS_PATH, PayloadShape::CustomStatus),
        ),
    };

    if fallback {
        vec![primary, alternate]
    } else {
        vec![primary]
    }
}

/// A way of delivering presence updates.
#[async_trait]
pub trait PresenceChannel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether attempts need a bearer token from the store.
    fn requires_token(&self) -> bool;

    /// Whether the channel can accept calls at all.
    fn is_ready(&self) -> bool {
        true
    }

    fn attempts(&self, op: Operation) -> Vec<Attempt>;

    async fn send(
        &self,
        access_token: Option<&str>,
        attempt: &Attempt,
        payload: Option<&PresencePayload>,
    ) -> Result<(), ChannelError>;
}

/// Direct REST calls with the user's bearer token.
#[derive(Clone)]
pub struct RestChannel {
    client: DiscordClient,
    fallback: bool,
}

impl RestChannel {
    pub fn new(client: DiscordClient, fallback: bool) -> Self {
        Self { client, fallback }
    }
}

#[async_trait]
impl PresenceChannel for RestChannel {
    fn name(&self) -> &'static str {
        "rest"
    }

    fn requires_token(&self) -> bool {
        true
    }

    fn attempts(&self, op: Operation) -> Vec<Attempt> {
        rest_attempts(op, self.fallback)
    }

    async fn send(
        &self,
        access_token: Option<&str>,
        attempt: &Attempt,
        payload: Option<&PresencePayload>,
    ) -> Result<(), ChannelError> {
        let access_token = access_token.ok_or(ChannelError::Unauthorized)?;
        let body = attempt.body(payload);
        self.client
            .execute(access_token, attempt, body.as_ref())
            .await
    }
}

/// Run `op` through `channel`, consulting `store` and refreshing via `oauth`.
///
/// Never fails: every error is folded into the returned result.
pub async fn run(
    channel: &dyn PresenceChannel,
    store: &dyn TokenStore,
    oauth: Option<&OAuthClient>,
    op: Operation,
    payload: Option<&PresencePayload>,
) -> SubmissionResult {
    if !channel.is_ready() {
        return SubmissionResult::new(Outcome::AuthExpired, "Not connected to Discord");
    }

    let mut token = if channel.requires_token() {
        match store.load() {
            Ok(Some(record)) => Some(record),
            Ok(None) => return SubmissionResult::auth_expired(),
            Err(e) => {
                tracing::warn!(error = %e, "Token store unreadable, treating as logged out");
                return SubmissionResult::auth_expired();
            }
        }
    } else {
        None
    };

    let attempts: Vec<Attempt> = channel
        .attempts(op)
        .into_iter()
        .take(1 + MAX_FALLBACKS)
        .collect();

    let mut refreshed = false;
    let mut last_failure = String::from("No attempts configured");
    let mut index = 0;

    while let Some(attempt) = attempts.get(index) {
        let access_token = token.as_ref().map(|t| t.access_token.as_str());
        tracing::debug!(
            channel = channel.name(),
            method = %attempt.method,
            path = attempt.path,
            "Sending presence attempt"
        );

        match channel.send(access_token, attempt, payload).await {
            Ok(()) => {
                tracing::info!(channel = channel.name(), path = attempt.path, ?op, "Presence call succeeded");
                return SubmissionResult::success(success_message(op));
            }
            Err(ChannelError::Unauthorized) => {
                let Some(current) = token.as_ref() else {
                    return SubmissionResult::auth_expired();
                };
                if refreshed {
                    tracing::warn!("Still unauthorized after refresh, clearing token");
                    clear_quietly(store);
                    return SubmissionResult::auth_expired();
                }
                refreshed = true;

                let refreshed_token = match oauth {
                    Some(oauth) => oauth.refresh(current, now_epoch_ms()).await,
                    None => Err(crate::error::AuthError::Expired),
                };
                match refreshed_token {
                    Ok(record) => {
                        if let Err(e) = store.save(&record) {
                            tracing::warn!(error = %e, "Failed to persist refreshed token");
                        }
                        token = Some(record);
                        // Same attempt again, exactly once.
                    }
                    Err(e) => {
                        tracing::info!(error = %e, "Refresh failed, clearing token");
                        clear_quietly(store);
                        return SubmissionResult::auth_expired();
                    }
                }
            }
            Err(ChannelError::Forbidden(body)) => {
                tracing::warn!(path = attempt.path, body = %body, "Presence call forbidden");
                return SubmissionResult::new(
                    Outcome::PermissionDenied,
                    "Missing permissions. Make sure the app is allowed to update your activity.",
                );
            }
            Err(ChannelError::Transport(message)) => {
                tracing::warn!(error = %message, "Presence call failed without a response");
                return SubmissionResult::new(Outcome::NetworkError, message);
            }
            Err(ChannelError::Status { status, body }) => {
                tracing::warn!(status, path = attempt.path, body = %body, "Presence call rejected");
                last_failure = if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body
                };
                index += 1;
            }
            Err(ChannelError::Rejected(message)) => {
                tracing::warn!(channel = channel.name(), error = %message, "Presence call rejected");
                last_failure = message;
                index += 1;
            }
        }
    }

    SubmissionResult::new(Outcome::Unknown, last_failure)
}

fn success_message(op: Operation) -> &'static str {
    match op {
        Operation::Update => "Rich Presence updated! Your friends can now see your activity.",
        Operation::Clear => "Status cleared",
    }
}

fn clear_quietly(store: &dyn TokenStore) {
    if let Err(e) = store.clear() {
        tracing::warn!(error = %e, "Failed to clear token store");
    }
}
