// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Form state → presence payload.
//!
//! Pure: no I/O, and the only time input is the `now` argument.

use crate::config::{Config, DEFAULT_LARGE_IMAGE};
use crate::models::payload::ACTIVITY_TYPE_PLAYING;
use crate::models::{Assets, Button, PresenceForm, PresencePayload, TimestampMode, Timestamps};

/// Name used when the form leaves the activity name blank.
pub const DEFAULT_ACTIVITY_NAME: &str = "Custom Activity";
/// Countdown length when the form doesn't give one.
pub const DEFAULT_COUNTDOWN_MINUTES: i64 = 60;

/// Payload builder carrying the fixed presentation bits.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    large_image: String,
    button: Option<Button>,
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self {
            large_image: DEFAULT_LARGE_IMAGE.to_string(),
            button: None,
        }
    }
}

impl PayloadBuilder {
    pub fn new(large_image: impl Into<String>, button: Option<Button>) -> Self {
        Self {
            large_image: large_image.into(),
            button,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.large_image.clone(), config.button.clone())
    }

    /// Build the payload for `form` at `now` (epoch seconds).
    pub fn build(&self, form: &PresenceForm, now: i64) -> PresencePayload {
        let name = non_empty(Some(&form.activity_name))
            .unwrap_or_else(|| DEFAULT_ACTIVITY_NAME.to_string());

        let timestamps = match form.timestamp_mode {
            TimestampMode::None => Timestamps::default(),
            TimestampMode::Start => Timestamps {
                start: Some(now),
                end: None,
            },
            TimestampMode::End => {
                let minutes = form
                    .countdown_minutes
                    .unwrap_or(DEFAULT_COUNTDOWN_MINUTES)
                    .max(1);
                // Saturates at i64::MAX rather than overflowing
                Timestamps {
                    start: None,
                    end: Some(now.saturating_add(minutes.saturating_mul(60))),
                }
            }
        };

        PresencePayload {
            kind: ACTIVITY_TYPE_PLAYING,
            details: non_empty(form.details.as_ref()),
            state: non_empty(form.state.as_ref()),
            timestamps,
            assets: Assets {
                large_image: self.large_image.clone(),
                large_text: name.clone(),
            },
            buttons: self.button.clone().map(|b| vec![b]),
            name,
        }
    }
}

/// Build with the default builder.
pub fn build(form: &PresenceForm, now: i64) -> PresencePayload {
    PayloadBuilder::default().build(form, now)
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
