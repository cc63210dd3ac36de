// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login/logout lifecycle through the session context.

use rich_presence_manager::error::AuthError;
use rich_presence_manager::services::oauth::{parse_redirect_fragment, AuthState};
use rich_presence_manager::services::TokenStore;
use rich_presence_manager::time_utils::now_epoch_ms;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{live_token, oauth_session, test_config};

#[test]
fn test_parse_fragment_expiry_tracks_clock() {
    let now = now_epoch_ms();
    let record = parse_redirect_fragment("access_token=abc&expires_in=3600", now).unwrap();

    assert_eq!(record.access_token, "abc");
    assert_eq!(record.expires_at_epoch_ms, now + 3_600_000);
}

#[test]
fn test_login_lifecycle() {
    let (session, store) = oauth_session(test_config("http://discord.test", true), None);
    assert_eq!(session.auth_state(), AuthState::Unauthenticated);

    let url = session.begin_login();
    assert!(url.starts_with("http://discord.test/oauth2/authorize?client_id=test_client_id"));
    assert!(url.contains("response_type=token"));
    assert!(url.contains("scope=identify%20activities.write"));
    assert_eq!(session.auth_state(), AuthState::AwaitingRedirect);

    let before = now_epoch_ms();
    let record = session
        .complete_login("#access_token=abc&token_type=Bearer&expires_in=3600&scope=identify")
        .unwrap();
    assert_eq!(record.access_token, "abc");
    assert!(record.expires_at_epoch_ms >= before + 3_600_000);
    assert_eq!(session.auth_state(), AuthState::Authenticated);
    assert_eq!(store.read().unwrap(), Some(record));

    session.logout().unwrap();
    assert_eq!(session.auth_state(), AuthState::Unauthenticated);
    assert_eq!(store.read().unwrap(), None);
}

#[test]
fn test_denied_login_clears_previous_token() {
    let (session, store) = oauth_session(
        test_config("http://discord.test", true),
        Some(live_token("old", None)),
    );
    assert_eq!(session.auth_state(), AuthState::Authenticated);

    session.begin_login();
    let err = session.complete_login("error=access_denied").unwrap_err();

    assert_eq!(err, AuthError::Denied("access_denied".to_string()));
    assert_eq!(session.auth_state(), AuthState::Unauthenticated);
    assert_eq!(store.read().unwrap(), None);
}

#[tokio::test]
async fn test_whoami_uses_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "80351110224678912",
            "username": "nelly",
            "global_name": "Nelly"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _store) =
        oauth_session(test_config(&server.uri(), true), Some(live_token("abc", None)));
    let user = session.whoami().await.expect("identity");

    assert_eq!(user.id, "80351110224678912");
    assert_eq!(user.display_name(), "Nelly");
}

#[tokio::test]
async fn test_whoami_unauthorized_logs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (session, store) =
        oauth_session(test_config(&server.uri(), true), Some(live_token("abc", None)));

    assert!(session.whoami().await.is_none());
    assert_eq!(store.read().unwrap(), None);
    assert_eq!(session.auth_state(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn test_whoami_without_token_is_none() {
    let (session, _store) = oauth_session(test_config("http://127.0.0.1:9", true), None);
    assert!(session.whoami().await.is_none());
}
