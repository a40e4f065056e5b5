//! kms - DRM color commit simulator
//!
//! Feeds a YAML description of CRTC and plane color properties through the
//! kms-color pipeline and prints the resulting hardware configuration.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kms_color::DeviceCaps;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod model;

#[derive(Parser)]
#[command(name = "kms")]
#[command(author, version, about = "DRM color commit simulator")]
#[command(long_about = "
Maps DRM color properties (degamma, CTM, shaper, 3D LUT, gamma, transfer
functions) onto display hardware color blocks and prints the result.

Examples:
  kms commit commit.yaml                  # Configure one output and its planes
  kms commit commit.yaml --caps dcn3.yaml # With 3D LUT capable device caps
  kms commit commit.yaml --repeat 2       # Re-apply to check idempotence
  kms caps --caps dcn3.yaml               # Show effective device caps
  RUST_LOG=kms_color=trace kms commit commit.yaml
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Device capabilities (YAML)
    #[arg(long, global = true)]
    caps: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a commit description
    #[command(visible_alias = "c")]
    Commit(CommitArgs),

    /// Show effective device capabilities
    Caps,
}

#[derive(Args)]
struct CommitArgs {
    /// Commit description (YAML)
    input: PathBuf,

    /// Apply the commit this many times to the same state
    #[arg(short, long, default_value = "1")]
    repeat: usize,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_caps(path: Option<&PathBuf>) -> Result<DeviceCaps> {
    let caps = match path {
        Some(path) => DeviceCaps::from_file(path)
            .with_context(|| format!("Failed to load caps: {}", path.display()))?,
        None => DeviceCaps::default(),
    };
    caps.with_env_overrides()
        .context("Invalid KMS_COLOR_* override")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let caps = load_caps(cli.caps.as_ref())?;
    match cli.command {
        Commands::Commit(args) => commands::commit::run(args, caps, cli.verbose),
        Commands::Caps => commands::caps::run(caps),
    }
}
