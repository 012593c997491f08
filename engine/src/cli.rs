//! CLI interface for StudyCoder
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// StudyCoder Assistant
///
/// Routes free-text study questions to specialized response agents backed by
/// an OpenAI-compatible language model endpoint, with built-in code
/// execution, knowledge lookup and study planning tools.
#[derive(Parser, Debug)]
#[command(name = "studycoder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process a single query and print the report
    Ask {
        /// The query to process
        query: String,
    },

    /// Start an interactive session
    Chat,

    /// Check connectivity to the configured backend
    Doctor,

    /// Show system information
    Info,
}
