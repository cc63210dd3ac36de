// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use rich_presence_manager::config::Config;
use rich_presence_manager::models::TokenRecord;
use rich_presence_manager::services::MemoryTokenStore;
use rich_presence_manager::time_utils::now_epoch_ms;
use rich_presence_manager::SessionContext;
use std::sync::Arc;

/// Config pointing every endpoint at a mock server.
#[allow(dead_code)]
pub fn test_config(server_uri: &str, fallback: bool) -> Config {
    Config {
        api_base: server_uri.to_string(),
        token_url: format!("{}/oauth2/token", server_uri),
        authorize_url: format!("{}/oauth2/authorize", server_uri),
        enable_fallback: fallback,
        ..Config::default()
    }
}

/// A token valid for another hour.
#[allow(dead_code)]
pub fn live_token(access: &str, refresh: Option<&str>) -> TokenRecord {
    TokenRecord {
        access_token: access.to_string(),
        expires_at_epoch_ms: now_epoch_ms() + 3_600_000,
        refresh_token: refresh.map(str::to_string),
    }
}

/// OAuth session over an in-memory store.
#[allow(dead_code)]
pub fn oauth_session(config: Config, token: Option<TokenRecord>) -> (SessionContext, Arc<MemoryTokenStore>) {
    let store = Arc::new(match token {
        Some(record) => MemoryTokenStore::with_record(record),
        None => MemoryTokenStore::new(),
    });
    (SessionContext::oauth(config, store.clone()), store)
}
