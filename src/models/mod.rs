// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod form;
pub mod payload;
pub mod submission;
pub mod token;

pub use form::{PresenceForm, TimestampMode};
pub use payload::{Assets, Button, PresencePayload, Timestamps};
pub use submission::{Outcome, StatusLevel, StatusMessage, SubmissionResult};
pub use token::TokenRecord;
