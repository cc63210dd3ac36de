// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Human-readable preview of a presence payload.

use serde::Serialize;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::PresencePayload;

/// What the preview pane shows. Absent lines are hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PreviewText {
    pub name: String,
    pub details: Option<String>,
    pub state: Option<String>,
    pub timer: Option<String>,
}

/// Project `payload` as seen at `now` (epoch seconds).
pub fn project(payload: &PresencePayload, now: i64) -> PreviewText {
    let timer = if payload.timestamps.start.is_some() {
        Some("Started now".to_string())
    } else {
        payload.timestamps.end.map(|end| {
            let minutes = (end.saturating_sub(now) as f64 / 60.0).round() as i64;
            format!("{} minutes remaining", minutes)
        })
    };

    PreviewText {
        name: payload.name.clone(),
        details: payload.details.clone(),
        state: payload.state.clone(),
        timer,
    }
}

impl fmt::Display for PreviewText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for line in [&self.details, &self.state, &self.timer].into_iter().flatten() {
            write!(f, "\n  {}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PresenceForm, TimestampMode};
    use crate::services::payload::build;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn countdown_shows_minutes_remaining() {
        let form = PresenceForm {
            activity_name: "Chess".to_string(),
            timestamp_mode: TimestampMode::End,
            countdown_minutes: Some(10),
            ..Default::default()
        };
        let preview = project(&build(&form, NOW), NOW);

        assert_eq!(preview.timer.as_deref(), Some("10 minutes remaining"));
        assert!(preview.to_string().contains("10 minutes remaining"));
    }

    #[test]
    fn remaining_minutes_round_to_nearest() {
        let form = PresenceForm {
            timestamp_mode: TimestampMode::End,
            countdown_minutes: Some(10),
            ..Default::default()
        };
        let payload = build(&form, NOW);

        // 9.5 minutes left rounds up, 9m20s rounds down
        assert_eq!(
            project(&payload, NOW + 30).timer.as_deref(),
            Some("10 minutes remaining")
        );
        assert_eq!(
            project(&payload, NOW + 40).timer.as_deref(),
            Some("9 minutes remaining")
        );
    }

    #[test]
    fn saturated_end_still_projects() {
        let form = PresenceForm {
            timestamp_mode: TimestampMode::End,
            countdown_minutes: Some(i64::MAX / 30),
            ..Default::default()
        };
        let payload = build(&form, NOW);
        assert_eq!(payload.timestamps.end, Some(i64::MAX));

        let timer = project(&payload, NOW).timer.unwrap();
        assert!(timer.ends_with(" minutes remaining"));
        assert!(!timer.starts_with('-'));

        // A clock far in the past must not overflow the subtraction either
        assert!(project(&payload, i64::MIN).timer.is_some());
    }

    #[test]
    fn start_timestamp_shows_started_now() {
        let preview = project(&build(&PresenceForm::sample(), NOW), NOW);

        assert_eq!(preview.name, "Rich Presence Manager");
        assert_eq!(preview.timer.as_deref(), Some("Started now"));
        assert_eq!(
            preview.to_string(),
            "Rich Presence Manager\n  Customizing my status\n  Having fun\n  Started now"
        );
    }

    #[test]
    fn no_timestamp_hides_timer() {
        let preview = project(&build(&PresenceForm::default(), NOW), NOW);
        assert_eq!(preview.timer, None);
        assert_eq!(preview.to_string(), "Custom Activity");
    }
}
