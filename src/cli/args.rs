//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, critical::CriticalArgs,
    inquiry::InquiryArgs, overview::OverviewArgs, project::ProjectArgs, push::PushArgs,
    readiness::ReadinessArgs, suppliers::SuppliersArgs,
};

#[derive(Parser)]
#[command(name = "mstudy")]
#[command(author, version, about = "Material Study reporter")]
#[command(long_about = "Reads a Material Study workbook and reports project fulfillment, material whereabouts, supplier delays and what blocks a job from production.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Study file (xlsx or csv); default: newest study in --dir
    #[arg(long, short = 'i', global = true)]
    pub file: Option<PathBuf>,

    /// Directory searched for the newest study file (default: current dir)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Worksheet holding the demand lines (default: Study)
    #[arg(long, global = true)]
    pub sheet: Option<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dashboard overview of the whole study
    Overview(OverviewArgs),

    /// Material status of one project
    Project(ProjectArgs),

    /// Where an item is allocated and what blocks it
    Inquiry(InquiryArgs),

    /// Suppliers ranked by average delay
    Suppliers(SuppliersArgs),

    /// Projects in critical status, nearest delivery first
    Critical(CriticalArgs),

    /// Projects ranked by fulfillment
    Readiness(ReadinessArgs),

    /// Production action plan for selected projects
    Push(PushArgs),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Report text for terminals, aligned columns for lists
    #[default]
    Auto,
    /// Aligned columns (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// JSON format (for programming)
    Json,
}

impl OutputFormat {
    /// Apply the configured default when the flag was left at `auto`
    pub fn or_config(self, configured: Option<&str>) -> Self {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|s| OutputFormat::from_str(s, true).ok())
            .unwrap_or(self)
    }
}
