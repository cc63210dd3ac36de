// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rich Presence Manager CLI
//!
//! Drives the implicit-OAuth mode from a terminal. Embedded mode needs a
//! host bridge and is only available to library users.

mod cli;

use anyhow::{bail, Context};
use clap::Parser;
use rich_presence_manager::{
    config::{detect_mode, Config, EnvironmentHints, PresenceMode},
    models::{PresenceForm, StatusLevel, SubmissionResult},
    services::FileTokenStore,
    time_utils::format_epoch_ms,
    SessionContext,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{describe_mode, fragment_of, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let hints = cli.command.hints();

    match cli.command {
        Commands::Detect { .. } => {
            println!("{}", describe_mode(detect_mode(&hints)));
        }
        Commands::Login => {
            let session = open_session(&hints)?;
            println!("Open this URL to authorize, then run `presence callback <redirect-url>`:");
            println!("{}", session.begin_login());
        }
        Commands::Callback { redirect } => {
            let record = open_session(&hints)?
                .complete_login(fragment_of(&redirect))
                .context("Login failed")?;
            println!(
                "Logged in. Token valid until {}",
                format_epoch_ms(record.expires_at_epoch_ms)
            );
        }
        Commands::Logout => {
            open_session(&hints)?.logout().context("Failed to clear token")?;
            println!("Logged out");
        }
        Commands::Whoami => match open_session(&hints)?.whoami().await {
            Some(user) => println!("{} ({})", user.display_name(), user.id),
            None => println!("Not logged in, or identity unavailable"),
        },
        Commands::Update(args) => {
            let session = open_session(&hints)?;
            let form: PresenceForm = args.into();
            println!("{}", session.preview(&form));
            report(session.update(&form).await)?;
        }
        Commands::Clear => {
            let mut form = PresenceForm::default();
            report(open_session(&hints)?.clear(&mut form).await)?;
        }
        Commands::Preview(args) => {
            let form: PresenceForm = args.into();
            println!("{}", open_session(&hints)?.preview(&form));
        }
        Commands::Sample { send } => {
            let session = open_session(&hints)?;
            let form = PresenceForm::sample();
            println!("{}", session.preview(&form));
            if send {
                report(session.update(&form).await)?;
            }
        }
    }

    Ok(())
}

/// Load configuration and open an OAuth-mode session over the file store.
fn open_session(hints: &EnvironmentHints) -> anyhow::Result<SessionContext> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let mode = config.resolved_mode(hints);
    if mode == PresenceMode::Embedded {
        bail!("Embedded mode needs the Discord host bridge; set PRESENCE_MODE=oauth to use the CLI");
    }

    tracing::debug!(mode = describe_mode(mode), store = %config.token_store_path.display(), "Starting");
    let store = Arc::new(FileTokenStore::new(config.token_store_path.clone()));
    Ok(SessionContext::oauth(config, store))
}

/// Print the status message; non-success results fail the process.
fn report(result: SubmissionResult) -> anyhow::Result<()> {
    let status = result.status_message();
    match status.level {
        StatusLevel::Success => {
            println!("{}", status.text);
            Ok(())
        }
        StatusLevel::Error => bail!("{:?}: {}", result.outcome, status.text),
    }
}

/// Initialize logging: JSON when `LOG_FORMAT=json`, human-readable otherwise.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rich_presence_manager=info,warn"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
