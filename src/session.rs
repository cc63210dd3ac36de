// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session context: owns the token lifecycle and the active channel.
//!
//! Every front-end action goes through here. Calls take `&self` and are
//! independent of each other; a second call never cancels the first.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;
use crate::error::{AuthError, ChannelError, StoreError};
use crate::models::{PresenceForm, PresencePayload, SubmissionResult, TokenRecord};
use crate::services::oauth::{self, AuthState, OAuthClient};
use crate::services::payload::PayloadBuilder;
use crate::services::preview::{self, PreviewText};
use crate::services::submission::{self, Operation, PresenceChannel, RestChannel};
use crate::services::{DiscordClient, DiscordUser, EmbeddedChannel, TokenStore};
use crate::time_utils::{now_epoch_ms, now_epoch_secs};

/// Upper bound for the identity lookup; it never gates a submission.
pub const IDENTITY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SessionContext {
    config: Config,
    store: Arc<dyn TokenStore>,
    oauth: OAuthClient,
    discord: DiscordClient,
    channel: Arc<dyn PresenceChannel>,
    builder: PayloadBuilder,
    auth_state: Mutex<AuthState>,
}

impl SessionContext {
    /// Session for implicit-OAuth mode, calling the REST API directly.
    pub fn oauth(config: Config, store: Arc<dyn TokenStore>) -> Self {
        let http = reqwest::Client::new();
        let discord = DiscordClient::new(http.clone(), config.api_base.clone());
        let channel = Arc::new(RestChannel::new(discord.clone(), config.enable_fallback));
        Self::assemble(config, store, http, discord, channel)
    }

    /// Session for embedded mode. `channel` should already be connected.
    pub fn embedded(config: Config, store: Arc<dyn TokenStore>, channel: Arc<EmbeddedChannel>) -> Self {
        let http = reqwest::Client::new();
        let discord = DiscordClient::new(http.clone(), config.api_base.clone());
        Self::assemble(config, store, http, discord, channel)
    }

    fn assemble(
        config: Config,
        store: Arc<dyn TokenStore>,
        http: reqwest::Client,
        discord: DiscordClient,
        channel: Arc<dyn PresenceChannel>,
    ) -> Self {
        let oauth = OAuthClient::new(http, config.token_url.clone(), config.client_id.clone());
        let initial = match store.load() {
            Ok(Some(_)) => AuthState::Authenticated,
            Ok(None) => AuthState::Unauthenticated,
            Err(e) => {
                tracing::warn!(error = %e, "Token store unreadable at startup");
                AuthState::Unauthenticated
            }
        };

        Self {
            builder: PayloadBuilder::from_config(&config),
            config,
            store,
            oauth,
            discord,
            channel,
            auth_state: Mutex::new(initial),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth_state
            .lock()
            .map(|s| *s)
            .unwrap_or(AuthState::Unauthenticated)
    }

    fn set_auth_state(&self, state: AuthState) {
        if let Ok(mut guard) = self.auth_state.lock() {
            if *guard != state {
                tracing::debug!(from = ?*guard, to = ?state, "Auth state changed");
            }
            *guard = state;
        }
    }

    // ─── Authorization ───────────────────────────────────────────────────────

    /// Authorization URL to send the user to.
    pub fn begin_login(&self) -> String {
        let url = oauth::build_authorization_url(
            &self.config.authorize_url,
            &self.config.client_id,
            &self.config.redirect_uri,
            self.config.scopes.as_slice(),
        );
        self.set_auth_state(AuthState::AwaitingRedirect);
        tracing::info!(client_id = %self.config.client_id, "Starting OAuth flow");
        url
    }

    /// Consume the redirect fragment and persist the token.
    ///
    /// The caller must drop the fragment from wherever it came from, so a
    /// reload doesn't replay it.
    pub fn complete_login(&self, fragment: &str) -> Result<TokenRecord, AuthError> {
        match oauth::parse_redirect_fragment(fragment, now_epoch_ms()) {
            Ok(record) => {
                self.store.save(&record).map_err(|e| {
                    tracing::error!(error = %e, "Failed to persist token");
                    AuthError::Expired
                })?;
                self.set_auth_state(AuthState::Authenticated);
                tracing::info!(
                    expires_at = %crate::time_utils::format_epoch_ms(record.expires_at_epoch_ms),
                    "OAuth login completed"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(error = %e, "OAuth login failed");
                self.clear_token();
                self.set_auth_state(AuthState::Unauthenticated);
                Err(e)
            }
        }
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.clear()?;
        self.set_auth_state(AuthState::Unauthenticated);
        tracing::info!("Logged out");
        Ok(())
    }

    /// Currently usable token, if any.
    pub fn current_token(&self) -> Option<TokenRecord> {
        match self.store.load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Token store unreadable");
                None
            }
        }
    }

    fn clear_token(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear token store");
        }
    }

    // ─── Payload & preview ───────────────────────────────────────────────────

    pub fn build_payload(&self, form: &PresenceForm, now: i64) -> PresencePayload {
        self.builder.build(form, now)
    }

    pub fn preview(&self, form: &PresenceForm) -> PreviewText {
        let now = now_epoch_secs();
        preview::project(&self.builder.build(form, now), now)
    }

    // ─── Submission ──────────────────────────────────────────────────────────

    /// Submit a prepared payload.
    pub async fn submit(&self, payload: &PresencePayload) -> SubmissionResult {
        let result = submission::run(
            self.channel.as_ref(),
            self.store.as_ref(),
            Some(&self.oauth),
            Operation::Update,
            Some(payload),
        )
        .await;
        self.track(&result);
        result
    }

    /// Build the payload from `form` at the current time and submit it.
    pub async fn update(&self, form: &PresenceForm) -> SubmissionResult {
        let payload = self.builder.build(form, now_epoch_secs());
        self.submit(&payload).await
    }

    /// Clear the presence; on success also resets the form's presence fields.
    pub async fn clear(&self, form: &mut PresenceForm) -> SubmissionResult {
        let result = submission::run(
            self.channel.as_ref(),
            self.store.as_ref(),
            Some(&self.oauth),
            Operation::Clear,
            None,
        )
        .await;
        self.track(&result);
        if result.is_success() {
            form.reset_presence_fields();
        }
        result
    }

    fn track(&self, result: &SubmissionResult) {
        match result.outcome {
            crate::models::Outcome::Success => self.set_auth_state(AuthState::Authenticated),
            crate::models::Outcome::AuthExpired => self.set_auth_state(AuthState::Unauthenticated),
            _ => {}
        }
    }

    // ─── Identity ────────────────────────────────────────────────────────────

    /// Look up the logged-in user, waiting at most [`IDENTITY_TIMEOUT`].
    ///
    /// `None` when logged out, rejected, or unavailable.
    pub async fn whoami(&self) -> Option<DiscordUser> {
        let token = self.current_token()?;

        match tokio::time::timeout(
            IDENTITY_TIMEOUT,
            self.discord.get_current_user(&token.access_token),
        )
        .await
        {
            Ok(Ok(user)) => Some(user),
            Ok(Err(ChannelError::Unauthorized)) => {
                tracing::info!("Identity lookup unauthorized, clearing token");
                self.clear_token();
                self.set_auth_state(AuthState::Unauthenticated);
                None
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Identity lookup failed");
                None
            }
            Err(_) => {
                tracing::warn!("Identity lookup timed out");
                None
            }
        }
    }
}
