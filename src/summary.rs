//! Corpus status summary for the `status` subcommand.

use crate::engine;
use crate::store::CorpusStore;
use serde::Serialize;
use std::path::Path;

/// Machine-readable annotation progress for one corpus file.
#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub corpus: String,
    pub records: usize,
    pub scored: usize,
    pub unscored: usize,
    pub skipped: usize,
    /// True when every record carries a digit score.
    pub complete: bool,
    /// 1-based line of the next pair needing attention, absent when complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_line: Option<usize>,
}

pub fn build_status_summary(store: &CorpusStore, corpus: &Path) -> StatusSummary {
    let counts = store.counts();
    let complete = counts.unscored == 0 && counts.skipped == 0;
    StatusSummary {
        corpus: corpus.display().to_string(),
        records: store.record_count(),
        scored: counts.scored,
        unscored: counts.unscored,
        skipped: counts.skipped,
        complete,
        next_line: (!complete).then(|| engine::next_pair_needing_attention(store) + 1),
    }
}

pub fn render_text(summary: &StatusSummary) -> String {
    let mut out = format!(
        "{}: {} records\nscored: {}  unscored: {}  skipped: {}\n",
        summary.corpus, summary.records, summary.scored, summary.unscored, summary.skipped
    );
    match summary.next_line {
        Some(line) => out.push_str(&format!("next pair needing attention: line {line}\n")),
        None => out.push_str("annotation complete\n"),
    }
    out
}
