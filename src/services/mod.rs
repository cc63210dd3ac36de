// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - presence logic and its collaborators.

pub mod bridge;
pub mod discord;
pub mod oauth;
pub mod payload;
pub mod preview;
pub mod submission;
pub mod token_store;

pub use bridge::{EmbeddedChannel, HostBridge};
pub use discord::{DiscordClient, DiscordUser};
pub use oauth::{AuthState, OAuthClient};
pub use payload::PayloadBuilder;
pub use preview::PreviewText;
pub use submission::{Operation, PresenceChannel, RestChannel};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
