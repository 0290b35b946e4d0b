//! Command-line interface for strictly_webgame.

use clap::{Parser, Subcommand};

/// Strictly Webgame - tic-tac-toe client for the web game server
#[derive(Parser, Debug)]
#[command(name = "strictly_webgame")]
#[command(about = "Play tic-tac-toe against a web game session", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to client configuration file
    #[arg(short, long, default_value = "webgame.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Server URL, overrides the config file
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a session in the terminal
    Play {
        /// Session ID to join
        #[arg(long, conflicts_with = "new_game")]
        session: Option<String>,

        /// Ask the server for a fresh session
        #[arg(long)]
        new_game: bool,

        /// Mark to play (OMARK or XMARK)
        #[arg(long)]
        mark: Option<String>,
    },

    /// Fetch a session once and print the board
    Show {
        /// Session ID to fetch
        #[arg(long)]
        session: String,
    },
}
