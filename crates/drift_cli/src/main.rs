//! drift CLI — content-addressed recompilation checking for native builds.
//!
//! Provides `drift check` to decide, per compilation unit, whether it must
//! be recompiled after a source-tree change, and `drift graph` to dump one
//! unit's effective include graph for inspection.

#![warn(missing_docs)]

mod check;
mod graph;
mod setup;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// drift — include-graph staleness detection without timestamps.
#[derive(Parser, Debug)]
#[command(name = "drift", version, about = "Incremental native-build dependency tracker")]
pub struct Cli {
    /// Suppress all output except errors and verdicts.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory containing `drift.toml` (default: current directory).
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decide per unit whether recompilation is required.
    Check(CheckArgs),
    /// Build and print one unit's include graph.
    Graph(GraphArgs),
}

/// Arguments for the `drift check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Root compilation units. Falls back to `drift.toml` units when empty.
    pub units: Vec<PathBuf>,

    /// Quoted-include search roots, in order (like `-iquote`/`-I`).
    #[arg(short = 'I', long = "iquote", value_name = "DIR")]
    pub quote_dirs: Vec<PathBuf>,

    /// System-include search roots, in order (like `-isystem`).
    #[arg(long = "isystem", value_name = "DIR")]
    pub system_dirs: Vec<PathBuf>,

    /// Macro definitions for include-path substitution (`NAME=VALUE`, or
    /// bare `NAME` for a definition of `1`).
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
    pub defines: Vec<String>,

    /// Directory holding the persisted snapshot store.
    #[arg(long, default_value = ".drift", value_name = "DIR")]
    pub state_dir: PathBuf,

    /// Output format for verdicts.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `drift graph` subcommand.
#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// The compilation unit to expand.
    pub unit: PathBuf,

    /// Quoted-include search roots, in order.
    #[arg(short = 'I', long = "iquote", value_name = "DIR")]
    pub quote_dirs: Vec<PathBuf>,

    /// System-include search roots, in order.
    #[arg(long = "isystem", value_name = "DIR")]
    pub system_dirs: Vec<PathBuf>,

    /// Macro definitions for include-path substitution.
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
    pub defines: Vec<String>,

    /// Output format for the graph dump.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Output format for command results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-essential output.
    pub quiet: bool,
    /// Optional project directory override.
    pub project_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        project_dir: cli.project_dir,
    };

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, &global),
        Command::Graph(ref args) => graph::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(quiet: bool, verbose: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
