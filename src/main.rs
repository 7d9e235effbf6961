use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;

mod cli;
mod corpus;
mod engine;
mod error;
mod session;
mod store;
mod summary;

use cli::{AnnotateArgs, CheckArgs, Command, RootArgs, ScoreArgs, StatusArgs};
use corpus::{check_lines, ScoreToken};
use store::open_corpus;
use summary::{build_status_summary, render_text};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Annotate(args) => cmd_annotate(args),
        Command::Status(args) => cmd_status(args),
        Command::Score(args) => cmd_score(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_annotate(args: AnnotateArgs) -> Result<()> {
    let mut store = open_corpus(&args.corpus)?;
    session::run(&mut store, &args.corpus, args.jump_to_next)?;
    let counts = store.counts();
    println!(
        "scored: {}  unscored: {}  skipped: {}",
        counts.scored, counts.unscored, counts.skipped
    );
    Ok(())
}

fn cmd_status(args: StatusArgs) -> Result<()> {
    let store = open_corpus(&args.corpus)?;
    let summary = build_status_summary(&store, &args.corpus);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serialize status summary")?
        );
    } else {
        print!("{}", render_text(&summary));
    }
    Ok(())
}

fn cmd_score(args: ScoreArgs) -> Result<()> {
    let mut store = open_corpus(&args.corpus)?;
    let index = args
        .line
        .checked_sub(1)
        .context("line numbers start at 1")?;
    if args.erase {
        engine::erase_score(&mut store, index)?;
    } else {
        // clap guarantees a token is present when --erase is absent.
        let raw = args.token.as_deref().context("missing score token")?;
        let token = ScoreToken::parse(raw)?;
        engine::assign_score(&mut store, index, token)?;
    }
    store
        .save(&args.corpus)
        .with_context(|| format!("save corpus {}", args.corpus.display()))?;
    let counts = store.counts();
    println!(
        "scored: {}  unscored: {}  skipped: {}",
        counts.scored, counts.unscored, counts.skipped
    );
    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<()> {
    let text = fs::read_to_string(&args.corpus)
        .with_context(|| format!("read corpus {}", args.corpus.display()))?;
    if text.lines().next().is_none() {
        bail!(error::CorpusError::EmptyCorpus);
    }
    let problems = check_lines(&text);
    for problem in &problems {
        println!("{problem}");
    }
    if !problems.is_empty() {
        bail!("{} malformed line(s)", problems.len());
    }
    println!("ok: {} records", text.lines().count());
    Ok(())
}
