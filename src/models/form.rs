// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Presence form state as entered by the user.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which timestamp, if any, to attach to the activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    #[default]
    None,
    /// Elapsed timer starting now
    Start,
    /// Countdown ending `countdown_minutes` from now
    End,
}

/// Form input owned by the front end; read-only to the payload builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PresenceForm {
    pub activity_name: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub timestamp_mode: TimestampMode,
    #[serde(default)]
    pub countdown_minutes: Option<i64>,
}

impl PresenceForm {
    /// Canned example used by the "load sample" action.
    pub fn sample() -> Self {
        Self {
            activity_name: "Rich Presence Manager".to_string(),
            details: Some("Customizing my status".to_string()),
            state: Some("Having fun".to_string()),
            timestamp_mode: TimestampMode::Start,
            countdown_minutes: None,
        }
    }

    /// Reset the fields a successful clear wipes. The activity name is kept.
    pub fn reset_presence_fields(&mut self) {
        self.details = None;
        self.state = None;
        self.timestamp_mode = TimestampMode::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_activity_name() {
        let mut form = PresenceForm::sample();
        form.reset_presence_fields();

        assert_eq!(form.activity_name, "Rich Presence Manager");
        assert_eq!(form.details, None);
        assert_eq!(form.state, None);
        assert_eq!(form.timestamp_mode, TimestampMode::None);
    }

    #[test]
    fn deserializes_partial_form() {
        let form: PresenceForm =
            serde_json::from_str(r#"{"activityName":"Chess","timestampMode":"end"}"#).unwrap();
        assert_eq!(form.activity_name, "Chess");
        assert_eq!(form.timestamp_mode, TimestampMode::End);
        assert_eq!(form.countdown_minutes, None);
    }
}
