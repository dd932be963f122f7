//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hookguard")]
#[command(author, version, about = "Risk scoring for agent lifecycle hooks")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a hook file, a settings file, or a directory
    Scan {
        /// Path to scan
        path: PathBuf,

        /// Exit with status 1 if any hook reaches this level (warning, dangerous)
        #[arg(long)]
        fail_on: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use pattern matching only
        #[arg(long)]
        no_syntax: bool,
    },

    /// List the detection catalog
    Catalog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan a single snippet of hook code
    Check {
        /// Code to scan
        text: String,

        /// Language of the snippet (javascript, typescript, tsx, python, shell)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "hookguard.toml")]
        output: PathBuf,
    },
}
