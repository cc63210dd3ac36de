// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Discord OAuth2 implicit grant.
//!
//! Handles:
//! - Authorization URL construction (`response_type=token`)
//! - Redirect fragment parsing into a [`TokenRecord`]
//! - Refresh-token exchange when a grant issued one
//!
//! This is a public-client flow: no client secret is ever sent.

use serde::Deserialize;

use crate::error::AuthError;
use crate::models::TokenRecord;

/// Lifetime assumed when the redirect omits `expires_in` (7 days).
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 604_800;

/// Login state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    /// Authorization URL handed out, waiting for the redirect.
    AwaitingRedirect,
    Authenticated,
}

/// Build the implicit-grant authorization URL.
///
/// Scopes are joined with a single space and encoded as one parameter.
pub fn build_authorization_url(
    authorize_base: &str,
    client_id: &str,
    redirect_uri: &str,
    scopes: &[impl AsRef<str>],
) -> String {
    let scope = scopes
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{}?client_id={}&redirect_uri={}&response_type=token&scope={}",
        authorize_base,
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&scope)
    )
}

/// Parse the `#key=value&...` fragment of the redirect URL.
///
/// An `error` key wins over everything else. `now_ms` anchors `expires_in`.
pub fn parse_redirect_fragment(fragment: &str, now_ms: i64) -> Result<TokenRecord, AuthError> {
    let fragment = fragment.trim();
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    let mut access_token = None;
    let mut expires_in = None;
    let mut refresh_token = None;
    let mut error = None;
    let mut error_description = None;

    for pair in fragment.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_component(value)?;
        match key {
            "access_token" => access_token = Some(value),
            "expires_in" => expires_in = Some(value),
            "refresh_token" => refresh_token = Some(value),
            "error" => error = Some(value),
            "error_description" => error_description = Some(value),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AuthError::Denied(error_description.unwrap_or(error)));
    }

    let access_token = access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::Malformed("missing access_token".to_string()))?;

    let expires_in = match expires_in {
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| AuthError::Malformed(format!("invalid expires_in: {}", raw)))?,
        None => DEFAULT_EXPIRES_IN_SECS,
    };

    let expires_at_epoch_ms = expiry_after(now_ms, expires_in)
        .ok_or_else(|| AuthError::Malformed(format!("expires_in out of range: {}", expires_in)))?;

    Ok(TokenRecord {
        access_token,
        expires_at_epoch_ms,
        refresh_token: refresh_token.filter(|t| !t.is_empty()),
    })
}

/// Absolute expiry `expires_in` seconds after `now_ms`, or `None` on overflow.
fn expiry_after(now_ms: i64, expires_in: i64) -> Option<i64> {
    expires_in.checked_mul(1000)?.checked_add(now_ms)
}

fn decode_component(value: &str) -> Result<String, AuthError> {
    let plus_decoded = value.replace('+', " ");
    urlencoding::decode(&plus_decoded)
        .map(|v| v.into_owned())
        .map_err(|e| AuthError::Malformed(format!("bad percent-encoding: {}", e)))
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Client for the token endpoint.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
}

impl OAuthClient {
    pub fn new(http: reqwest::Client, token_url: String, client_id: String) -> Self {
        Self {
            http,
            token_url,
            client_id,
        }
    }

    /// Exchange the record's refresh token for a new record.
    ///
    /// Every failure collapses to [`AuthError::Expired`]; the caller clears
    /// the store.
    pub async fn refresh(&self, record: &TokenRecord, now_ms: i64) -> Result<TokenRecord, AuthError> {
        let Some(refresh_token) = record.refresh_token.as_deref() else {
            tracing::info!("No refresh token available, re-authorization required");
            return Err(AuthError::Expired);
        };

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Token refresh request failed");
                AuthError::Expired
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Token refresh rejected");
            return Err(AuthError::Expired);
        }

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse token refresh response");
            AuthError::Expired
        })?;

        let expires_in = tokens.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let Some(expires_at_epoch_ms) = expiry_after(now_ms, expires_in) else {
            tracing::warn!(expires_in, "Token refresh returned an out-of-range lifetime");
            return Err(AuthError::Expired);
        };

        tracing::info!("Access token refreshed");

        Ok(TokenRecord {
            access_token: tokens.access_token,
            expires_at_epoch_ms,
            refresh_token: tokens.refresh_token.or_else(|| record.refresh_token.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn authorization_url_is_deterministic() {
        let url = build_authorization_url(
            "https://discord.com/oauth2/authorize",
            "1450008731692568729",
            "http://localhost:8080/callback",
            &["identify", "activities.write"],
        );

        assert_eq!(
            url,
            "https://discord.com/oauth2/authorize?client_id=1450008731692568729\
             &redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback\
             &response_type=token&scope=identify%20activities.write"
        );
        assert!(!url.contains("client_secret"));
    }

    #[test]
    fn parses_token_fragment() {
        let record = parse_redirect_fragment("access_token=abc&expires_in=3600", NOW).unwrap();

        assert_eq!(record.access_token, "abc");
        assert_eq!(record.expires_at_epoch_ms, NOW + 3_600_000);
        assert_eq!(record.refresh_token, None);
    }

    #[test]
    fn leading_hash_and_extra_keys_are_tolerated() {
        let record = parse_redirect_fragment(
            "#token_type=Bearer&access_token=a%2Bb&scope=identify+activities.write",
            NOW,
        )
        .unwrap();

        assert_eq!(record.access_token, "a+b");
        assert_eq!(
            record.expires_at_epoch_ms,
            NOW + DEFAULT_EXPIRES_IN_SECS * 1000
        );
    }

    #[test]
    fn error_key_is_denied() {
        assert_eq!(
            parse_redirect_fragment("error=access_denied", NOW),
            Err(AuthError::Denied("access_denied".to_string()))
        );
        assert_eq!(
            parse_redirect_fragment(
                "error=access_denied&error_description=The+user+cancelled",
                NOW
            ),
            Err(AuthError::Denied("The user cancelled".to_string()))
        );
    }

    #[test]
    fn missing_token_is_malformed() {
        assert!(matches!(
            parse_redirect_fragment("", NOW),
            Err(AuthError::Malformed(_))
        ));
        assert!(matches!(
            parse_redirect_fragment("access_token=abc&expires_in=soon", NOW),
            Err(AuthError::Malformed(_))
        ));
    }

    #[test]
    fn oversized_expires_in_is_malformed() {
        assert!(matches!(
            parse_redirect_fragment("access_token=abc&expires_in=9223372036854775", NOW),
            Err(AuthError::Malformed(_))
        ));
        assert!(matches!(
            parse_redirect_fragment("access_token=abc&expires_in=9223372036854775807", NOW),
            Err(AuthError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_expires() {
        let client = OAuthClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/token".to_string(),
            "id".to_string(),
        );
        let record = TokenRecord {
            access_token: "abc".to_string(),
            expires_at_epoch_ms: NOW,
            refresh_token: None,
        };

        assert_eq!(client.refresh(&record, NOW).await, Err(AuthError::Expired));
    }
}
