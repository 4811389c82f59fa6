use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed music-release project tracker.
/// Storage defaults to ~/.relpm or a directory passed via --dir.
#[derive(Parser)]
#[command(name = "relpm", version, about = "Music-release project management CLI")]
pub struct Cli {
    /// Data directory holding the per-tenant project files.
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Tenant whose projects are operated on.
    #[arg(long, global = true, default_value = "default")]
    pub tenant: String,

    #[command(subcommand)]
    pub command: Commands,
}
