//! CLI argument parsing for the story resequencer.
use crate::resequence::Mode;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_STORIES_DIR: &str = "docs/stories";

/// Root CLI entrypoint.
///
/// With no flags the tool validates every scheduled story and rewrites the
/// headers that drifted.
#[derive(Parser, Debug)]
#[command(
    name = "resequence-stories",
    version,
    about = "Align story sequence, sprint, and prev/next headers with the greenfield schedule",
    after_help = "Examples:\n  resequence-stories --validate-only\n  resequence-stories --dry-run\n  resequence-stories --stories-dir docs/stories --schedule schedule.json"
)]
pub struct RootArgs {
    /// Compute fixes and report them without writing any file
    #[arg(long, conflicts_with = "validate_only")]
    pub dry_run: bool,

    /// Only validate; exit non-zero if any story is out of sequence
    #[arg(long, conflicts_with = "dry_run")]
    pub validate_only: bool,

    /// Directory holding STORY-*.md files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_STORIES_DIR)]
    pub stories_dir: PathBuf,

    /// Schedule JSON to use instead of the built-in greenfield order
    #[arg(long, value_name = "PATH")]
    pub schedule: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Emit debug logging on stderr
    #[arg(long)]
    pub verbose: bool,
}

impl RootArgs {
    pub fn mode(&self) -> Mode {
        if self.validate_only {
            Mode::ValidateOnly
        } else if self.dry_run {
            Mode::DryRun
        } else {
            Mode::Fix
        }
    }
}
