//! Larch CLI, an inspector for larch library archives.
//!
//! Provides `larch info` for a library summary, `larch manifest` for the
//! target-substituted manifest, `larch parts` for package metadata parts,
//! `larch declaration` for IR declarations and `larch natives` for the
//! native code shipped for a target.

#![warn(missing_docs)]

mod context;
mod declaration;
mod info;
mod manifest;
mod natives;
mod parts;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use context::GlobalArgs;

/// Larch, a library archive inspector.
#[derive(Parser, Debug)]
#[command(name = "larch", version, about = "Larch library archive inspector")]
pub struct Cli {
    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML file with additional target substitutions.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize a library.
    Info(InfoArgs),
    /// Print the manifest, with target substitutions applied.
    Manifest(ManifestArgs),
    /// List the metadata parts of a package.
    Parts(PartsArgs),
    /// Look up one IR declaration.
    Declaration(DeclarationArgs),
    /// List the native code shipped for a target.
    Natives(NativesArgs),
}

/// Arguments for the `larch info` subcommand.
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Library root directory.
    pub library: PathBuf,

    /// Target to open the library for.
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Arguments for the `larch manifest` subcommand.
#[derive(Parser, Debug)]
pub struct ManifestArgs {
    /// Library root directory.
    pub library: PathBuf,

    /// Target whose substitutions are applied.
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Arguments for the `larch parts` subcommand.
#[derive(Parser, Debug)]
pub struct PartsArgs {
    /// Library root directory.
    pub library: PathBuf,

    /// Fully qualified package name. Empty for the root package.
    pub package: String,
}

/// Arguments for the `larch declaration` subcommand.
#[derive(Parser, Debug)]
pub struct DeclarationArgs {
    /// Library root directory.
    pub library: PathBuf,

    /// Declaration index.
    pub index: u64,

    /// Look up a file-local declaration.
    #[arg(long)]
    pub local: bool,

    /// Write the declaration bytes to stdout instead of a summary.
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for the `larch natives` subcommand.
#[derive(Parser, Debug)]
pub struct NativesArgs {
    /// Library root directory.
    pub library: PathBuf,

    /// Target to list native code for.
    #[arg(short, long)]
    pub target: String,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        format: cli.format,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Info(ref args) => info::run(args, &global),
        Command::Manifest(ref args) => manifest::run(args, &global),
        Command::Parts(ref args) => parts::run(args, &global),
        Command::Declaration(ref args) => declaration::run(args, &global),
        Command::Natives(ref args) => natives::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_logging(quiet: bool, verbose: bool) {
    let level = log_level(quiet, verbose);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn log_level(quiet: bool, verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}
