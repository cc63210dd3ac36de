// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Discord REST client for user-token presence calls.
//!
//! Handles:
//! - Identity lookup (`GET /users/@me`)
//! - Activity post/delete and settings patch, as described by an [`Attempt`]
//! - Mapping HTTP failures onto [`ChannelError`]

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;
use crate::services::submission::Attempt;

/// Discord API client.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    base_url: String,
}

impl DiscordClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the user the token belongs to.
    pub async fn get_current_user(&self, access_token: &str) -> Result<DiscordUser, ChannelError> {
        let url = format!("{}/users/@me", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ChannelError::Transport(format!("JSON parse error: {}", e)))
    }

    /// Execute one attempt with an already-shaped JSON body.
    pub async fn execute(
        &self,
        access_token: &str,
        attempt: &Attempt,
        body: Option<&serde_json::Value>,
    ) -> Result<(), ChannelError> {
        let url = format!("{}{}", self.base_url, attempt.path);

        let mut request = self
            .http
            .request(attempt.method.clone(), &url)
            .bearer_auth(access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        Self::check_response(response).await?;
        Ok(())
    }

    /// Check response status and return error if not successful.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ChannelError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Discord rate limit hit (429)");
        }

        Err(ChannelError::from_status(status.as_u16(), body))
    }
}

/// Subset of the Discord user object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
}

impl DiscordUser {
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}
