// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command-line front end: the form fields and buttons as subcommands.

use clap::{Args, Parser, Subcommand, ValueEnum};

use rich_presence_manager::config::{EnvironmentHints, PresenceMode};
use rich_presence_manager::models::{PresenceForm, TimestampMode};

/// Rich Presence Manager: set your Discord activity from the terminal
#[derive(Debug, Parser)]
#[command(name = "presence", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the Discord authorization URL
    Login,
    /// Finish login with the redirect URL (or just its #fragment)
    Callback {
        /// Redirect URL or fragment, e.g. "#access_token=...&expires_in=604800"
        redirect: String,
    },
    /// Forget the stored token
    Logout,
    /// Show who the stored token belongs to
    Whoami,
    /// Update your activity
    Update(FormArgs),
    /// Clear your activity
    Clear,
    /// Preview the activity without sending it
    Preview(FormArgs),
    /// Preview the built-in sample activity
    Sample {
        /// Also send the sample
        #[arg(long)]
        send: bool,
    },
    /// Report which mode the given environment would run in
    Detect {
        #[arg(long, default_value = "")]
        user_agent: String,
        #[arg(long, default_value = "")]
        location: String,
        /// Running inside a frame
        #[arg(long)]
        framed: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TimestampArg {
    None,
    Start,
    End,
}

impl From<TimestampArg> for TimestampMode {
    fn from(arg: TimestampArg) -> Self {
        match arg {
            TimestampArg::None => TimestampMode::None,
            TimestampArg::Start => TimestampMode::Start,
            TimestampArg::End => TimestampMode::End,
        }
    }
}

/// Presence form fields.
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Activity name (defaults to "Custom Activity")
    #[arg(short, long, default_value = "")]
    pub name: String,
    /// First line under the name
    #[arg(short, long)]
    pub details: Option<String>,
    /// Second line under the name
    #[arg(short, long)]
    pub state: Option<String>,
    #[arg(short, long, value_enum, default_value = "none")]
    pub timestamp: TimestampArg,
    /// Countdown length for `--timestamp end`
    #[arg(short, long)]
    pub minutes: Option<i64>,
}

impl From<FormArgs> for PresenceForm {
    fn from(args: FormArgs) -> Self {
        Self {
            activity_name: args.name,
            details: args.details,
            state: args.state,
            timestamp_mode: args.timestamp.into(),
            countdown_minutes: args.minutes,
        }
    }
}

impl Commands {
    pub fn hints(&self) -> EnvironmentHints {
        match self {
            Commands::Detect {
                user_agent,
                location,
                framed,
            } => EnvironmentHints {
                framed: *framed,
                user_agent: user_agent.clone(),
                location: location.clone(),
            },
            _ => EnvironmentHints::default(),
        }
    }
}

pub fn describe_mode(mode: PresenceMode) -> &'static str {
    match mode {
        PresenceMode::OAuth => "oauth",
        PresenceMode::Embedded => "embedded",
        PresenceMode::Auto => "auto",
    }
}

/// Pull the fragment out of a full redirect URL.
pub fn fragment_of(redirect: &str) -> &str {
    redirect
        .split_once('#')
        .map(|(_, fragment)| fragment)
        .unwrap_or(redirect)
}
