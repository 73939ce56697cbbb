//! CLI interface for BlogFlow
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags for running the article pipeline.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BlogFlow article pipeline
///
/// Researches a topic, drafts an article, optimizes it for search and runs
/// an editorial review loop until the draft clears the quality bar.
#[derive(Parser, Debug)]
#[command(name = "blogflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate an article for a topic
    Run(RunArgs),

    /// Run system diagnostics
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the Gemini API key stored in the OS keychain
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

/// Arguments for `blogflow run`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// The topic for the article
    pub topic: String,

    /// Path to a custom style guide file
    #[arg(long, value_name = "PATH")]
    pub style: Option<PathBuf>,

    /// Minimum combined quality score for approval (0-10)
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Maximum number of editorial review rounds
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<u32>,

    /// Directory the article is written to
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Generation provider (gemini, ollama)
    #[arg(long, value_name = "NAME")]
    pub provider: Option<String>,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

/// Credential management actions
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Prompt for the Gemini API key and store it
    Set,

    /// Delete the stored Gemini API key
    Remove,
}
