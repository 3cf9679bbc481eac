//! CLI module for Cinemood.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Cinemood - movie suggestions for the mood you're in
///
/// Pick one or more moods and TMDB genre IDs; an LLM agent browses The Movie
/// Database and recommends films that fit.
#[derive(Parser, Debug)]
#[command(name = "cinemood")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Suggest movies for the given moods and genres
    Suggest {
        /// Mood to match (repeatable, e.g. --mood Happy --mood Calm)
        #[arg(short, long = "mood", required = true)]
        moods: Vec<String>,

        /// TMDB genre ID (repeatable, see `cinemood genres`)
        #[arg(short, long = "genre", required = true)]
        genres: Vec<u32>,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,

        /// LLM model to use
        #[arg(long)]
        model: Option<String>,
    },

    /// List TMDB movie genres and their IDs
    Genres,

    /// List the built-in moods
    Moods,

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file if none exists
    Init,

    /// Show configuration file path
    Path,
}
