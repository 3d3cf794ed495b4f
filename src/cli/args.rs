//! CLI argument definitions using clap derive

use crate::pass::payload::parse_date;
use crate::pass::{PassPayload, PayloadError};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Tessera - signed entitlement passes
///
/// Issues tamper-evident pass tokens, verifies them, and renders each pass
/// once as a cached QR code.
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TESSERA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Token signing secret
    #[arg(long, global = true, env = "TESSERA_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Issue a signed pass token
    Issue(IssueArgs),

    /// Verify a pass token and decide admission
    Verify(VerifyArgs),

    /// Get or create the QR code artifact for a pass
    Artifact(ArtifactArgs),

    /// List stored artifacts
    List(ListArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Entitlement fields shared by commands that build a pass
#[derive(Args, Debug)]
pub struct PassArgs {
    /// Subject identifier (also the artifact key)
    #[arg(short, long)]
    pub subject: String,

    /// Display name
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Route identifier
    #[arg(short, long, default_value = "")]
    pub route: String,

    /// Last valid day (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_day)]
    pub expires: NaiveDate,

    /// Issue date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_day)]
    pub issued: Option<NaiveDate>,
}

impl PassArgs {
    /// Build the payload these arguments describe
    pub fn to_payload(&self) -> Result<PassPayload, PayloadError> {
        PassPayload::new(
            &self.subject,
            &self.name,
            &self.route,
            self.expires,
            self.issued.unwrap_or_else(today),
        )
    }
}

/// Arguments for the issue command
#[derive(Parser, Debug)]
pub struct IssueArgs {
    #[command(flatten)]
    pub pass: PassArgs,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,
}

/// Arguments for the verify command
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Token to verify
    pub token: String,

    /// Route the bearer is boarding
    #[arg(short, long)]
    pub route: Option<String>,

    /// Evaluate as of this day (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_day)]
    pub today: Option<NaiveDate>,
}

/// Arguments for the artifact command
#[derive(Parser, Debug)]
pub struct ArtifactArgs {
    #[command(flatten)]
    pub pass: PassArgs,

    /// Also copy the PNG to this path
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    parse_date("date", s).map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))
}
