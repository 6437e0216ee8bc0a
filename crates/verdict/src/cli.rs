//! CLI argument parsing and command definitions

use camino::Utf8PathBuf;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Default debounce interval in milliseconds for watch mode.
/// Prevents multiple checks from running on rapid file changes.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "verdict", version, about = "Diagnostics bridge for external checkers")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Optional config file (TOML only). Default: .verdict.toml if present.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
pub enum Command {
    /// Check a file once and report its diagnostics
    Check(CheckArgs),
    /// Watch paths for changes and re-check on the fly
    Watch(WatchArgs),
    /// Show bridge status: config, checker binary, effective settings
    Doctor(DoctorArgs),
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// File that triggers the check (also the file cleared on a clean run).
    pub file: Utf8PathBuf,

    /// Checker binary to invoke (overrides [checker].command)
    #[arg(long, value_name = "TOOL")]
    pub bin: Option<String>,

    /// Extra checker arguments (appended to the configured base args)
    #[arg(long = "arg", value_name = "ARG", num_args = 0..)]
    pub extra_args: Vec<String>,

    /// Output JSON instead of human format
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Paths to watch (files or directories). Defaults to current dir if omitted.
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<Utf8PathBuf>,

    /// Checker binary to invoke (overrides [checker].command)
    #[arg(long, value_name = "TOOL")]
    pub bin: Option<String>,

    /// Debounce interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Output JSON instead of human format
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct DoctorArgs {}
