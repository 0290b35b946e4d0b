//! Strictly Webgame - terminal client
//!
//! Joins a web game session and plays it from the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_webgame::{
    BoardSynchronizer, ClientConfig, HttpTransport, MemorySurface, SyncOutcome, parse_player_mark,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.command)?;

    let mut config = ClientConfig::load_or_default(&cli.config)?;
    if let Some(url) = cli.server_url {
        config = config.with_base_url(url);
    }

    match cli.command {
        Command::Play {
            session,
            new_game,
            mark,
        } => {
            if let Some(session) = session {
                config = config.with_session_id(session);
            } else if new_game {
                config = config.without_session();
            }
            if let Some(mark) = mark {
                config = config.with_player_mark(parse_player_mark(&mark)?);
            }
            run_play(config).await
        }
        Command::Show { session } => run_show(config.with_session_id(session)).await,
    }
}

/// Install the subscriber for `command`, before any span is opened
fn init_tracing(command: &Command) -> Result<()> {
    match command {
        Command::Play { .. } => {
            // Log to a file so the TUI is not overwritten
            let log_file = std::fs::File::create("strictly_webgame.log")?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("info,strictly_webgame=debug")),
                )
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false)
                .init();
        }
        Command::Show { .. } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .init();
        }
    }
    Ok(())
}

/// Run the interactive terminal client
async fn run_play(config: ClientConfig) -> Result<()> {
    info!("Starting Strictly Webgame client");
    strictly_webgame::terminal::run(config).await
}

/// Fetch one snapshot and print it
#[instrument(skip(config), fields(base_url = %config.base_url()))]
async fn run_show(config: ClientConfig) -> Result<()> {
    let session_id = config
        .session_id()
        .clone()
        .ok_or_else(|| anyhow::anyhow!("No session id given"))?;
    let transport = HttpTransport::new(config.base_url().clone(), config.request_timeout())?;
    let mut page = BoardSynchronizer::new(
        session_id,
        *config.player_mark(),
        transport,
        MemorySurface::new(),
    );

    match page.refresh().await? {
        SyncOutcome::Reconciled(outcome) => {
            println!("{}\n\n{}", page.board().display(), outcome);
            Ok(())
        }
        SyncOutcome::Reverted(err) => Err(err.into()),
    }
}
