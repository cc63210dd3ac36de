// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Embedded mode with a fake host bridge.

use async_trait::async_trait;
use rich_presence_manager::config::Config;
use rich_presence_manager::error::BridgeError;
use rich_presence_manager::models::{Outcome, PresenceForm, PresencePayload};
use rich_presence_manager::services::bridge::{
    AuthorizeOptions, AuthorizeResponse, BridgeEvent, EventHandler,
};
use rich_presence_manager::services::{EmbeddedChannel, HostBridge, MemoryTokenStore};
use rich_presence_manager::SessionContext;
use std::sync::{Arc, Mutex};

/// Bridge that records calls and fails `set_activity` with a canned message.
#[derive(Default)]
struct FakeBridge {
    authorized: Mutex<Option<AuthorizeOptions>>,
    subscriptions: Mutex<Vec<BridgeEvent>>,
    activities: Mutex<Vec<Option<PresencePayload>>>,
    fail_with: Option<String>,
    deny_authorize: bool,
}

#[async_trait]
impl HostBridge for FakeBridge {
    async fn ready(&self) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn authorize(&self, options: &AuthorizeOptions) -> Result<AuthorizeResponse, BridgeError> {
        if self.deny_authorize {
            return Err(BridgeError::new("User cancelled authorization"));
        }
        *self.authorized.lock().unwrap() = Some(options.clone());
        Ok(AuthorizeResponse {
            code: "code".to_string(),
        })
    }

    async fn subscribe(&self, event: BridgeEvent, handler: EventHandler) -> Result<(), BridgeError> {
        handler(serde_json::json!({ "event": event.as_str() }));
        self.subscriptions.lock().unwrap().push(event);
        Ok(())
    }

    async fn set_activity(&self, activity: Option<&PresencePayload>) -> Result<(), BridgeError> {
        self.activities.lock().unwrap().push(activity.cloned());
        match &self.fail_with {
            Some(message) => Err(BridgeError::new(message.clone())),
            None => Ok(()),
        }
    }
}

async fn connected_session(bridge: Arc<FakeBridge>) -> SessionContext {
    let channel = Arc::new(EmbeddedChannel::new(bridge));
    channel.connect("1450008731692568729").await.unwrap();
    SessionContext::embedded(Config::default(), Arc::new(MemoryTokenStore::new()), channel)
}

#[tokio::test]
async fn test_connect_authorizes_with_embedded_scopes() {
    let bridge = Arc::new(FakeBridge::default());
    let _session = connected_session(bridge.clone()).await;

    let options = bridge.authorized.lock().unwrap().clone().unwrap();
    assert_eq!(options.client_id, "1450008731692568729");
    assert_eq!(options.response_type, "code");
    assert_eq!(options.prompt, "none");
    assert_eq!(options.scope, vec!["identify", "rpc.activities.write"]);
    assert_eq!(
        *bridge.subscriptions.lock().unwrap(),
        vec![BridgeEvent::VoiceStateUpdate, BridgeEvent::CurrentUserUpdate]
    );
}

#[tokio::test]
async fn test_update_goes_through_bridge_without_token() {
    let bridge = Arc::new(FakeBridge::default());
    let session = connected_session(bridge.clone()).await;

    let result = session.update(&PresenceForm::sample()).await;

    assert_eq!(result.outcome, Outcome::Success);
    let sent = bridge.activities.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].as_ref().unwrap().name, "Rich Presence Manager");
}

#[tokio::test]
async fn test_clear_sends_null_activity() {
    let bridge = Arc::new(FakeBridge::default());
    let session = connected_session(bridge.clone()).await;
    let mut form = PresenceForm::sample();

    let result = session.clear(&mut form).await;

    assert_eq!(result.outcome, Outcome::Success);
    assert_eq!(*bridge.activities.lock().unwrap(), vec![None]);
    assert_eq!(form.details, None);
}

#[tokio::test]
async fn test_bridge_errors_are_classified() {
    let cases = [
        ("Missing permission to set activity", Outcome::PermissionDenied),
        ("User not authenticated", Outcome::AuthExpired),
        ("Activity session closed", Outcome::Unknown),
    ];

    for (message, expected) in cases {
        let bridge = Arc::new(FakeBridge {
            fail_with: Some(message.to_string()),
            ..Default::default()
        });
        let session = connected_session(bridge.clone()).await;

        let result = session.update(&PresenceForm::sample()).await;

        assert_eq!(result.outcome, expected, "message: {}", message);
        // The bridge is never retried
        assert_eq!(bridge.activities.lock().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_empty_bridge_error_reports_unknown_error() {
    let bridge = Arc::new(FakeBridge {
        fail_with: Some(String::new()),
        ..Default::default()
    });
    let session = connected_session(bridge).await;

    let result = session.update(&PresenceForm::sample()).await;

    assert_eq!(result.outcome, Outcome::Unknown);
    assert_eq!(result.message, "Unknown error");
}

#[tokio::test]
async fn test_unauthenticated_bridge_disconnects() {
    let bridge = Arc::new(FakeBridge {
        fail_with: Some("User not authenticated".to_string()),
        ..Default::default()
    });
    let channel = Arc::new(EmbeddedChannel::new(bridge.clone()));
    channel.connect("1450008731692568729").await.unwrap();
    let session = SessionContext::embedded(
        Config::default(),
        Arc::new(MemoryTokenStore::new()),
        channel.clone(),
    );

    let first = session.update(&PresenceForm::sample()).await;
    assert_eq!(first.outcome, Outcome::AuthExpired);
    assert!(!channel.is_connected());

    // Later calls stop at the connection check
    let second = session.update(&PresenceForm::sample()).await;
    assert_eq!(second.outcome, Outcome::AuthExpired);
    assert_eq!(second.message, "Not connected to Discord");
    assert_eq!(bridge.activities.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unconnected_bridge_is_auth_expired() {
    let bridge = Arc::new(FakeBridge {
        deny_authorize: true,
        ..Default::default()
    });
    let channel = Arc::new(EmbeddedChannel::new(bridge.clone()));
    assert!(channel.connect("id").await.is_err());

    let session =
        SessionContext::embedded(Config::default(), Arc::new(MemoryTokenStore::new()), channel);
    let result = session.update(&PresenceForm::sample()).await;

    assert_eq!(result.outcome, Outcome::AuthExpired);
    assert_eq!(result.message, "Not connected to Discord");
    assert!(bridge.activities.lock().unwrap().is_empty());
}
