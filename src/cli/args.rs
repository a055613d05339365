//! Command-line argument definitions for the `fmf` tool
//!
//! Uses the clap derive API. Verbosity flags are global so they can follow
//! any subcommand.

use crate::export::ExportFormat;
use crate::models::Delimiter;
use crate::writer::NumberFormat;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Inspect, validate, convert and rewrite FMF files
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fmf",
    version,
    about = "Inspect, validate and convert FMF scientific data files",
    long_about = "Reads FMF files (a line-oriented format of metadata sections and \
                  unit-annotated tables), reports structural problems, exports tables \
                  to Parquet or CSV and rewrites files with a different layout."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show file information, sections, tables and diagnostics
    Inspect(InspectArgs),
    /// Check files or directories for structural problems
    Check(CheckArgs),
    /// Export the tables of a file to Parquet or CSV
    Convert(ConvertArgs),
    /// Write a file back out with a different delimiter or number format
    Rewrite(RewriteArgs),
}

#[derive(Debug, Clone, ClapArgs)]
pub struct InspectArgs {
    /// FMF file to inspect
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Print a JSON document instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct CheckArgs {
    /// Files or directories; directories are searched for `.fmf` files
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Table export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConvertFormat {
    Parquet,
    Csv,
}

impl From<ConvertFormat> for ExportFormat {
    fn from(format: ConvertFormat) -> Self {
        match format {
            ConvertFormat::Parquet => ExportFormat::Parquet,
            ConvertFormat::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ConvertArgs {
    /// FMF file to convert
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory receiving one file per table
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "parquet")]
    pub format: ConvertFormat,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct RewriteArgs {
    /// FMF file to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output name; `.fmf` is appended when missing
    #[arg(value_name = "OUTPUT")]
    pub output: String,

    /// Delimiter to write (`\t`, `whitespace`, `semicolon` or a literal)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<Delimiter>,

    /// Number format for numeric cells, e.g. `%G`, `:.4E`, `{:.3f}`
    #[arg(long, value_parser = parse_number_format)]
    pub number_format: Option<NumberFormat>,

    /// Encoding declared in the control line
    #[arg(long)]
    pub encoding: Option<String>,

    /// Comment character of the control line
    #[arg(long)]
    pub comment: Option<char>,
}

fn parse_delimiter(value: &str) -> Result<Delimiter, String> {
    let delimiter = Delimiter::from_control_value(value);
    match delimiter.control_line_problem() {
        Some(reason) => Err(reason.to_string()),
        None => Ok(delimiter),
    }
}

fn parse_number_format(value: &str) -> Result<NumberFormat, String> {
    NumberFormat::parse(value).map_err(|e| e.to_string())
}

impl Args {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}
