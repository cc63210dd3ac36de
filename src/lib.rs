// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Rich Presence Manager: push a Discord activity from a simple form.
//!
//! Two modes, never combined in one session:
//! - embedded, through the host SDK bridge ([`services::EmbeddedChannel`])
//! - implicit OAuth, calling the REST API with the user's bearer token
//!
//! [`SessionContext`] is the entry point for both.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod time_utils;

pub use session::SessionContext;
