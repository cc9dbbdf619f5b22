use clap::Parser;
use std::path::PathBuf;

/// Anchor-based LSP file-URI fix for Claude Code's bundled cli.js
#[derive(Parser, Debug)]
#[command(name = "cclspfix", version, about)]
pub struct Cli {
    /// Path to the bundled cli.js to patch
    pub file: PathBuf,

    /// Run the full pipeline and show diffs without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Directory for pre-patch backups (default: "backups" next to FILE)
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Load configuration from an explicit file instead of the default
    /// location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
