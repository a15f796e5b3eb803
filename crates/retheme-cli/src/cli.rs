//! Command-line interface for `retheme`.
//!
//! # Examples
//!
//! ```bash
//! # Retheme the document's current selection in place
//! retheme apply design.json
//!
//! # Retheme two frames, writing the result elsewhere
//! retheme apply design.json --select 1:0 --select 4:2 --output night.json
//!
//! # Remember the document's style keys for later runs
//! retheme sync design.json
//!
//! # Show how a theme path is read
//! retheme check "Checkout (Pro/Night)" "*/Pro/Day/accent"
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Swap design styles between theme variants.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "retheme",
    author,
    version,
    about = "Swap design styles between theme variants",
    long_about = "Rethemes the selected frames of a design document by replacing every \
                  style reference with its sibling in the requested theme variant."
)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "RETHEME_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to color the report
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorMode>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Retheme the selected frames of a document
    Apply(ApplyArgs),

    /// Persist the document's local style keys
    Sync(SyncArgs),

    /// Validate and expand theme paths
    Check(CheckArgs),
}

/// Arguments for `apply`.
#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// Document to retheme (.json or .toml)
    pub document: PathBuf,

    /// Node id of a selection root; defaults to the document's selection
    #[arg(long = "select", short = 's', value_name = "ID")]
    pub select: Vec<String>,

    /// Where to write the rethemed document; defaults to the input
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Key store to restore library styles from
    #[arg(long, env = "RETHEME_STORE")]
    pub store: Option<PathBuf>,

    /// Report format
    #[arg(long, short = 'f', value_enum, env = "RETHEME_FORMAT")]
    pub format: Option<ReportFormat>,

    /// Exit with status 3 when any error diagnostic is reported
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `sync`.
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Document whose local style keys are stored
    pub document: PathBuf,

    /// Key store to write
    #[arg(long, env = "RETHEME_STORE")]
    pub store: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Theme paths to check
    #[arg(required = true)]
    pub paths: Vec<String>,
}

/// Report output formats.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per diagnostic
    #[default]
    Text,
    /// The grouped report as JSON
    Json,
}

/// Color output mode.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}
