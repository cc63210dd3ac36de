// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token record persisted by the token store.

use serde::{Deserialize, Serialize};

/// Bearer token with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Opaque bearer token
    pub access_token: String,
    /// When the access token expires (Unix epoch milliseconds)
    pub expires_at_epoch_ms: i64,
    /// Refresh token, if the grant issued one (implicit grants don't)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenRecord {
    /// A record is usable only while non-empty and not yet expired.
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        !self.access_token.is_empty() && now_ms < self.expires_at_epoch_ms
    }
}
