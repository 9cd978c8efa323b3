//! CLI argument parsing for the hunt corpus workflow.
//!
//! The CLI is intentionally thin: every subcommand maps to one workflow
//! function over the core, with no policy of its own.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "huntlock",
    version,
    about = "Manage a corpus of LOCK-pattern threat hunt records",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Workspace root containing the hunts directory
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    pub workspace: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new hunt record with the next available id
    New(NewArgs),
    /// List hunts, optionally filtered
    List(ListArgs),
    /// Validate one hunt or the whole corpus
    Validate(ValidateArgs),
    /// Show corpus statistics
    Stats(StatsArgs),
    /// Show MITRE ATT&CK coverage by tactic
    Coverage(CoverageArgs),
    /// Full-text search across all hunts
    Search(SearchArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Create a new hunt record")]
pub struct NewArgs {
    /// Hunt title
    #[arg(long)]
    pub title: String,

    /// MITRE ATT&CK technique id (e.g. T1003.001); repeatable
    #[arg(long = "technique", value_name = "ID")]
    pub techniques: Vec<String>,

    /// MITRE tactic; repeatable
    #[arg(long = "tactic", value_name = "NAME")]
    pub tactics: Vec<String>,

    /// Target platform; repeatable
    #[arg(long = "platform", value_name = "NAME")]
    pub platforms: Vec<String>,

    /// Data source; repeatable
    #[arg(long = "data-source", value_name = "NAME")]
    pub data_sources: Vec<String>,

    /// Hunter name (defaults to the config's hunter, if set)
    #[arg(long)]
    pub hunter: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "List hunts with optional filters")]
pub struct ListArgs {
    /// Filter by status (planning, active, in-progress, completed, paused, archived)
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by MITRE tactic membership
    #[arg(long)]
    pub tactic: Option<String>,

    /// Filter by MITRE technique membership (e.g. T1003.001)
    #[arg(long)]
    pub technique: Option<String>,

    /// Filter by platform membership
    #[arg(long)]
    pub platform: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Validate hunt structure against the schema")]
pub struct ValidateArgs {
    /// Hunt id to validate; validates the whole corpus when omitted
    pub hunt_id: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Show hunt program statistics")]
pub struct StatsArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Show MITRE ATT&CK technique coverage by tactic")]
pub struct CoverageArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Full-text search across all hunts")]
pub struct SearchArgs {
    /// Search query (case-insensitive substring)
    pub query: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}
