//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::feed::FeedSource;
use crate::input::InputFormat;
use crate::markov::{EstimationPolicy, TieBreak};
use crate::{Config, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Match outcome predictor CLI
#[derive(Parser, Debug)]
#[command(name = "match-markov")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a file of match results
    Analyze {
        /// CSV or JSON file with a `result` field per record
        input: PathBuf,

        /// Input format (inferred from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,

        #[command(flatten)]
        model: ModelArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Poll the live result feed and update the model
    Poll {
        /// Feed type
        #[arg(short, long, value_enum, default_value = "http")]
        source: FeedSource,

        /// Feed endpoint (overrides config)
        #[arg(long, env = "MATCH_FEED_URL")]
        url: Option<String>,

        /// Scripted results for the mock feed, comma separated
        #[arg(long, value_delimiter = ',')]
        mock_results: Vec<String>,

        /// Number of polls to perform
        #[arg(short = 'n', long, default_value = "1")]
        times: u32,

        /// Seconds to wait between polls
        #[arg(long, default_value = "30")]
        interval: u64,

        /// Seed the live sequence from a results file
        #[arg(long)]
        seed: Option<PathBuf>,

        #[command(flatten)]
        model: ModelArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

/// Model options shared by every command
#[derive(Args, Debug, Clone, Copy)]
pub struct ModelArgs {
    /// Probability estimation policy (overrides config)
    #[arg(long, value_enum)]
    pub policy: Option<EstimationPolicy>,

    /// Rule used when both outcomes are equally likely (overrides config)
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreak>,
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text table
    Table,
}

/// Execute the CLI command
pub async fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Analyze { .. } => commands::analyze::execute(args, config),
        Commands::Poll { .. } => commands::poll::execute(args, config).await,
    }
}
