//! In-memory corpus store with incremental annotation counts.
//!
//! The store owns the parse-on-load and serialize-on-save logic and keeps
//! per-status aggregate counts in lockstep with the records. Counts are
//! updated through a single (old, new) transition delta so they stay
//! consistent even when a mutation leaves the status unchanged. Saving
//! replaces the corpus file atomically: the new contents are written to a
//! sibling temporary file first and renamed into place, so an interrupted
//! save never truncates the original.

use crate::corpus::{Record, Status};
use crate::error::CorpusError;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Aggregate record counts per status. Always sums to the record count.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Counts {
    pub scored: usize,
    pub unscored: usize,
    pub skipped: usize,
}

impl Counts {
    /// Full recount from scratch. Load-time initialization and the
    /// correctness oracle for the incremental updates.
    pub fn tally(records: &[Record]) -> Self {
        let mut counts = Counts::default();
        for record in records {
            *counts.slot_mut(record.status()) += 1;
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.scored + self.unscored + self.skipped
    }

    /// Apply the delta for one record moving from `old` to `new` status.
    /// `old == new` is a no-op, so re-scoring a scored pair cannot skew the
    /// totals.
    pub(crate) fn transition(&mut self, old: Status, new: Status) {
        if old == new {
            return;
        }
        *self.slot_mut(old) -= 1;
        *self.slot_mut(new) += 1;
    }

    fn slot_mut(&mut self, status: Status) -> &mut usize {
        match status {
            Status::Scored => &mut self.scored,
            Status::Unscored => &mut self.unscored,
            Status::Skipped => &mut self.skipped,
        }
    }
}

/// Ordered collection of corpus records for one annotation session.
///
/// The index is the stable identity of a pair: records are created at load
/// time, mutated in place, and never added or removed afterwards.
#[derive(Debug)]
pub struct CorpusStore {
    records: Vec<Record>,
    counts: Counts,
}

impl CorpusStore {
    /// Parse full corpus text into a store. Fails on the first malformed
    /// line (with its 1-based line number) and on an empty corpus.
    pub fn from_text(text: &str) -> Result<Self, CorpusError> {
        let mut records = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            records.push(Record::parse(line.trim_end_matches('\r'), idx + 1)?);
        }
        if records.is_empty() {
            return Err(CorpusError::EmptyCorpus);
        }
        let counts = Counts::tally(&records);
        tracing::debug!(records = records.len(), "parsed corpus");
        Ok(CorpusStore { records, counts })
    }

    /// Read and parse the corpus file at `path`.
    pub fn open(path: &Path) -> Result<Self, CorpusError> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    /// Serialize every record back to the on-disk line format, in index
    /// order, with a trailing newline.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_line());
            out.push('\n');
        }
        out
    }

    /// Overwrite the corpus file with the current records. The write goes to
    /// a temporary file in the same directory and replaces the target in one
    /// rename; on failure the original file and the in-memory state are both
    /// intact.
    pub fn save(&self, path: &Path) -> Result<(), CorpusError> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(self.serialize().as_bytes())?;
        tmp.persist(path).map_err(|err| err.error)?;
        tracing::info!(records = self.records.len(), path = %path.display(), "saved corpus");
        Ok(())
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Result<&Record, CorpusError> {
        let len = self.records.len();
        self.records
            .get(index)
            .ok_or(CorpusError::IndexOutOfRange { index, len })
    }

    pub(crate) fn record_mut(&mut self, index: usize) -> Result<&mut Record, CorpusError> {
        let len = self.records.len();
        self.records
            .get_mut(index)
            .ok_or(CorpusError::IndexOutOfRange { index, len })
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub(crate) fn apply_transition(&mut self, old: Status, new: Status) {
        self.counts.transition(old, new);
    }
}

/// Open a corpus with shell-friendly error context.
pub fn open_corpus(path: &Path) -> Result<CorpusStore> {
    CorpusStore::open(path).with_context(|| format!("load corpus {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ScoreToken;

    const SCENARIO: &str = "a\tb\n1\tc\td\n?\te\tf\n";

    #[test]
    fn loads_scenario_corpus_with_counts() {
        let store = CorpusStore::from_text(SCENARIO).expect("load");
        assert_eq!(store.record_count(), 3);
        assert_eq!(
            store.counts(),
            Counts {
                scored: 1,
                unscored: 1,
                skipped: 1,
            }
        );
        assert_eq!(store.counts().total(), store.record_count());
    }

    #[test]
    fn serialize_round_trips() {
        let store = CorpusStore::from_text(SCENARIO).expect("load");
        assert_eq!(store.serialize(), SCENARIO);
        // And a second pass over the serialized form yields the same records.
        let again = CorpusStore::from_text(&store.serialize()).expect("reload");
        assert_eq!(again.records(), store.records());
    }

    #[test]
    fn handles_crlf_and_missing_trailing_newline() {
        let store = CorpusStore::from_text("2\ta\tb\r\nc\td").expect("load");
        assert_eq!(store.record_count(), 2);
        assert_eq!(store.records()[0].token, Some(ScoreToken::Score(2)));
        assert_eq!(store.records()[1].text2, "d");
        assert_eq!(store.serialize(), "2\ta\tb\nc\td\n");
    }

    #[test]
    fn empty_corpus_is_an_error() {
        assert!(matches!(
            CorpusStore::from_text(""),
            Err(CorpusError::EmptyCorpus)
        ));
        assert!(matches!(
            CorpusStore::from_text("\n"),
            Err(CorpusError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn malformed_line_reports_position() {
        let err = CorpusStore::from_text("a\tb\nnope\n").expect_err("malformed");
        assert!(matches!(err, CorpusError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn transition_table_keeps_totals_stable() {
        let mut counts = Counts {
            scored: 2,
            unscored: 1,
            skipped: 0,
        };
        counts.transition(Status::Scored, Status::Scored);
        assert_eq!(counts.scored, 2);
        counts.transition(Status::Scored, Status::Skipped);
        assert_eq!(
            counts,
            Counts {
                scored: 1,
                unscored: 1,
                skipped: 1,
            }
        );
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn save_writes_and_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("corpus.txt");
        let store = CorpusStore::from_text(SCENARIO).expect("load");
        store.save(&path).expect("save");
        let reloaded = CorpusStore::open(&path).expect("reload");
        assert_eq!(reloaded.records(), store.records());
        assert_eq!(reloaded.counts(), store.counts());
    }
}
