// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Embedded-mode channel over the host-provided SDK bridge.
//!
//! The bridge owns its authorization handshake; we only drive it.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::EMBEDDED_SCOPES;
use crate::error::{BridgeError, ChannelError};
use crate::models::PresencePayload;
use crate::services::submission::{Attempt, Operation, PayloadShape, PresenceChannel};

/// Upper bound on waiting for optional event subscriptions.
pub const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Options passed to the bridge's `authorize` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizeOptions {
    pub client_id: String,
    pub response_type: String,
    pub state: String,
    pub prompt: String,
    pub scope: Vec<String>,
}

impl AuthorizeOptions {
    pub fn for_client(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            response_type: "code".to_string(),
            state: String::new(),
            prompt: "none".to_string(),
            scope: EMBEDDED_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeResponse {
    pub code: String,
}

/// Events we subscribe to for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeEvent {
    VoiceStateUpdate,
    CurrentUserUpdate,
}

impl BridgeEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeEvent::VoiceStateUpdate => "VOICE_STATE_UPDATE",
            BridgeEvent::CurrentUserUpdate => "CURRENT_USER_UPDATE",
        }
    }
}

pub type EventHandler = Box<dyn Fn(serde_json::Value) + Send + Sync>;

/// Host SDK surface used in embedded mode.
#[async_trait]
pub trait HostBridge: Send + Sync {
    async fn ready(&self) -> Result<(), BridgeError>;

    async fn authorize(&self, options: &AuthorizeOptions) -> Result<AuthorizeResponse, BridgeError>;

    async fn subscribe(&self, event: BridgeEvent, handler: EventHandler) -> Result<(), BridgeError>;

    /// `None` clears the activity.
    async fn set_activity(&self, activity: Option<&PresencePayload>) -> Result<(), BridgeError>;
}

/// Pseudo-attempt for the bridge; method and path are informational only.
const SET_ACTIVITY: Attempt = Attempt::new(Method::POST, "SET_ACTIVITY", PayloadShape::Activity);

/// [`PresenceChannel`] backed by a [`HostBridge`].
pub struct EmbeddedChannel {
    bridge: Arc<dyn HostBridge>,
    connected: AtomicBool,
}

impl EmbeddedChannel {
    pub fn new(bridge: Arc<dyn HostBridge>) -> Self {
        Self {
            bridge,
            connected: AtomicBool::new(false),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Wait for the bridge, authorize, and subscribe to events.
    ///
    /// Subscriptions are best effort and bounded by [`SUBSCRIBE_TIMEOUT`].
    pub async fn connect(&self, client_id: &str) -> Result<(), BridgeError> {
        tracing::info!("Connecting to Discord host bridge");
        self.bridge.ready().await?;

        self.bridge
            .authorize(&AuthorizeOptions::for_client(client_id))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Bridge authorization failed"))?;
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!("Authorized with Discord host bridge");

        for event in [BridgeEvent::VoiceStateUpdate, BridgeEvent::CurrentUserUpdate] {
            let name = event.as_str();
            let handler: EventHandler = Box::new(move |data| {
                tracing::debug!(event = name, %data, "Bridge event");
            });
            match tokio::time::timeout(SUBSCRIBE_TIMEOUT, self.bridge.subscribe(event, handler)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(event = name, error = %e, "Bridge subscription failed"),
                Err(_) => tracing::warn!(event = name, "Bridge subscription timed out"),
            }
        }

        Ok(())
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl PresenceChannel for EmbeddedChannel {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn requires_token(&self) -> bool {
        false
    }

    fn is_ready(&self) -> bool {
        self.is_connected()
    }

    fn attempts(&self, _op: Operation) -> Vec<Attempt> {
        vec![SET_ACTIVITY]
    }

    async fn send(
        &self,
        _access_token: Option<&str>,
        _attempt: &Attempt,
        payload: Option<&PresencePayload>,
    ) -> Result<(), ChannelError> {
        let result = self.bridge.set_activity(payload).await.map_err(ChannelError::from);
        if let Err(ChannelError::Unauthorized) = &result {
            tracing::warn!("Bridge session is no longer authenticated, disconnecting");
            self.disconnect();
        }
        result
    }
}
