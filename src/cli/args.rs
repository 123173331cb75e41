//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{list::ListArgs, protocol::ProtocolArgs, score::ScoreArgs};

#[derive(Parser)]
#[command(name = "cot")]
#[command(author, version, about = "Cotton Origin Toolkit")]
#[command(
    long_about = "Risk scoring and statistical testing-protocol engine for cotton origin compliance. Assessments are plain YAML files suitable for git version control."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Risk catalog YAML overriding the built-in tables
    #[arg(long, global = true, env = "COT_CATALOG")]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a shipment's origin risk
    Score(ScoreArgs),

    /// Generate AQL and color/size testing protocols
    Protocol(ProtocolArgs),

    /// List saved assessments
    List(ListArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (styled for show, table for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
}
