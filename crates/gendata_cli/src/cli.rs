//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// gendata - Flatten JSON documents into ordered records
#[derive(Parser)]
#[command(name = "gendata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Flatten a JSON or JSONC document
    Flatten {
        /// Input file. Reads standard input when omitted.
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Annotate records with their path
        #[arg(long)]
        paths: bool,

        /// Path separator
        #[arg(long, value_name = "SEP")]
        separator: Option<String>,

        /// Do not scan the members of nodes at this depth
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,

        /// Omit container records
        #[arg(long)]
        leaves_only: bool,

        /// Annotate records with their depth
        #[arg(long)]
        depth: bool,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
