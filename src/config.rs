// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development. The implicit grant is a
//! public-client flow, so there is deliberately no client secret here.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::Button;

/// Discord REST API base.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";

/// Scopes requested in implicit-OAuth mode.
pub const OAUTH_SCOPES: &[&str] = &["identify", "activities.write"];
/// Scopes requested through the host bridge in embedded mode.
pub const EMBEDDED_SCOPES: &[&str] = &["identify", "rpc.activities.write"];

/// Placeholder asset key for the large image.
pub const DEFAULT_LARGE_IMAGE: &str = "default_large";

/// Execution mode. A session runs in exactly one of the two concrete modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceMode {
    OAuth,
    Embedded,
    /// Decide at startup from [`EnvironmentHints`].
    Auto,
}

impl FromStr for PresenceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oauth" => Ok(Self::OAuth),
            "embedded" => Ok(Self::Embedded),
            "auto" | "" => Ok(Self::Auto),
            other => Err(ConfigError::Invalid("PRESENCE_MODE", other.to_string())),
        }
    }
}

/// What the front end knows about where it is running.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentHints {
    /// Loaded inside a frame (the host loads activities in iframes)
    pub framed: bool,
    pub user_agent: String,
    pub location: String,
}

/// Detect whether we are running inside the Discord host.
pub fn detect_mode(hints: &EnvironmentHints) -> PresenceMode {
    if hints.framed
        || hints.user_agent.contains("Discord")
        || hints.location.contains("discord.com/activity")
    {
        PresenceMode::Embedded
    } else {
        PresenceMode::OAuth
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord application (client) ID
    pub client_id: String,
    /// Redirect URI registered for the implicit grant
    pub redirect_uri: String,
    /// Scopes requested on login
    pub scopes: Vec<String>,
    pub api_base: String,
    pub authorize_url: String,
    pub token_url: String,
    /// Where the single token record lives
    pub token_store_path: PathBuf,
    pub mode: PresenceMode,
    /// Try the settings endpoint when the activities endpoint rejects a request
    pub enable_fallback: bool,
    pub large_image: String,
    /// Optional link button added to every payload
    pub button: Option<Button>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            client_id: "test_client_id".to_string(),
            redirect_uri: "http://localhost:8080/callback".to_string(),
            scopes: OAUTH_SCOPES.iter().map(|s| s.to_string()).collect(),
            api_base: DEFAULT_API_BASE.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            token_store_path: PathBuf::from(".presence_token.json"),
            mode: PresenceMode::OAuth,
            enable_fallback: true,
            large_image: DEFAULT_LARGE_IMAGE.to_string(),
            button: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        if env::var("DISCORD_CLIENT_SECRET").is_ok() {
            tracing::warn!(
                "DISCORD_CLIENT_SECRET is set but ignored; the implicit grant never uses a \
                 client secret and a secret shipped to clients must be rotated"
            );
        }

        let scopes = env::var("DISCORD_SCOPES")
            .map(|v| v.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| OAUTH_SCOPES.iter().map(|s| s.to_string()).collect());

        let button = match (
            env::var("PRESENCE_BUTTON_LABEL"),
            env::var("PRESENCE_BUTTON_URL"),
        ) {
            (Ok(label), Ok(url)) if !label.trim().is_empty() && !url.trim().is_empty() => {
                Some(Button {
                    label: label.trim().to_string(),
                    url: url.trim().to_string(),
                })
            }
            _ => None,
        };

        Ok(Self {
            client_id: env::var("DISCORD_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("DISCORD_CLIENT_ID"))?,
            redirect_uri: env::var("DISCORD_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8080/callback".to_string()),
            scopes,
            api_base: env::var("DISCORD_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            authorize_url: env::var("DISCORD_AUTHORIZE_URL")
                .unwrap_or_else(|_| DEFAULT_AUTHORIZE_URL.to_string()),
            token_url: env::var("DISCORD_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string()),
            token_store_path: env::var("TOKEN_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".presence_token.json")),
            mode: env::var("PRESENCE_MODE")
                .unwrap_or_else(|_| "auto".to_string())
                .parse()?,
            enable_fallback: env::var("PRESENCE_FALLBACK")
                .map(|v| !matches!(v.trim(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
            large_image: env::var("PRESENCE_LARGE_IMAGE")
                .unwrap_or_else(|_| DEFAULT_LARGE_IMAGE.to_string()),
            button,
        })
    }

    /// Resolve `Auto` into a concrete mode.
    pub fn resolved_mode(&self, hints: &EnvironmentHints) -> PresenceMode {
        match self.mode {
            PresenceMode::Auto => detect_mode(hints),
            mode => mode,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
