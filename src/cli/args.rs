//! CLI argument definitions using clap
//!
//! Commands:
//! - qqq validate --config <path>
//! - qqq query --config <path>
//! - qqq count --config <path>
//! - qqq start --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// QQQ record layer: filter evaluation and record security over JSON metadata
#[derive(Parser, Debug)]
#[command(name = "qqq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate instance metadata, then exit
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./qqq.json")]
        config: PathBuf,
    },

    /// Run one query read from stdin and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./qqq.json")]
        config: PathBuf,
    },

    /// Run one count read from stdin and exit
    Count {
        /// Path to configuration file
        #[arg(long, default_value = "./qqq.json")]
        config: PathBuf,
    },

    /// Serve requests from stdin, one JSON object per line
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./qqq.json")]
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
