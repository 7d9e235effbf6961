//! CLI argument parsing for the annotation tool.
//!
//! The CLI is intentionally thin: every subcommand loads the corpus, calls
//! into the store/engine API, and renders the result, so the same core logic
//! drives the TUI session and the scriptable commands alike.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "stsanno",
    version,
    about = "Semantic textual similarity annotation for tab-delimited sentence-pair corpora",
    after_help = "Examples:\n  stsanno annotate corpus.txt\n  stsanno annotate corpus.txt --jump-to-next\n  stsanno status corpus.txt --json\n  stsanno score corpus.txt 12 4\n  stsanno score corpus.txt 12 --erase\n  stsanno check corpus.txt",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Annotate(AnnotateArgs),
    Status(StatusArgs),
    Score(ScoreArgs),
    Check(CheckArgs),
}

/// Interactive annotation session inputs.
#[derive(Parser, Debug)]
#[command(about = "Annotate a corpus interactively in a TUI session")]
pub struct AnnotateArgs {
    /// Corpus file: one tab-separated sentence pair per line
    pub corpus: PathBuf,

    /// Start with auto-advance on: jump to the next pair needing attention
    /// after every score or erase
    #[arg(long)]
    pub jump_to_next: bool,
}

/// Status command inputs.
#[derive(Parser, Debug)]
#[command(about = "Summarize annotation progress for a corpus")]
pub struct StatusArgs {
    /// Corpus file: one tab-separated sentence pair per line
    pub corpus: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Single non-interactive mutation, saved back to the corpus file.
#[derive(Parser, Debug)]
#[command(about = "Assign or erase one score without opening the TUI")]
pub struct ScoreArgs {
    /// Corpus file: one tab-separated sentence pair per line
    pub corpus: PathBuf,

    /// 1-based line number of the pair to mutate
    pub line: usize,

    /// Score token to assign: a digit 0-5 or "?" to skip
    #[arg(required_unless_present = "erase", conflicts_with = "erase")]
    pub token: Option<String>,

    /// Erase the pair's annotation instead of assigning one
    #[arg(long)]
    pub erase: bool,
}

/// Check command inputs.
#[derive(Parser, Debug)]
#[command(about = "Validate corpus format and report malformed lines")]
pub struct CheckArgs {
    /// Corpus file: one tab-separated sentence pair per line
    pub corpus: PathBuf,
}
