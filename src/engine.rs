//! Annotation mutations and the next-pair policy.
//!
//! All mutations go through this module so the store's counts can never
//! drift: a mutation reads the old status, rewrites the token, derives the
//! new status, and applies exactly one count transition. The store is passed
//! in by reference; there is no ambient session state.

use crate::corpus::{Record, ScoreToken, Status};
use crate::error::CorpusError;
use crate::store::{Counts, CorpusStore};

/// Read-only view of one pair, shaped for rendering.
#[derive(Clone, Copy, Debug)]
pub struct PairView<'a> {
    pub index: usize,
    pub text1: &'a str,
    pub text2: &'a str,
    pub token: Option<ScoreToken>,
}

/// Assign a score or the skip marker to the record at `index`.
///
/// Re-scoring an already-scored pair with a different digit changes the
/// stored token only; the counts are untouched.
pub fn assign_score(
    store: &mut CorpusStore,
    index: usize,
    token: ScoreToken,
) -> Result<(), CorpusError> {
    apply_token(store, index, Some(token))
}

/// Clear any annotation on the record at `index`, returning it to Unscored.
/// A no-op on counts if the record was already unscored.
pub fn erase_score(store: &mut CorpusStore, index: usize) -> Result<(), CorpusError> {
    apply_token(store, index, None)
}

fn apply_token(
    store: &mut CorpusStore,
    index: usize,
    token: Option<ScoreToken>,
) -> Result<(), CorpusError> {
    let record = store.record_mut(index)?;
    let old = record.status();
    record.token = token;
    let new = record.status();
    store.apply_transition(old, new);
    debug_assert_eq!(store.counts(), Counts::tally(store.records()));
    tracing::debug!(index, token = ?token, "applied annotation");
    Ok(())
}

/// Pure read of the fields the shell needs to render one pair.
pub fn select_pair(store: &CorpusStore, index: usize) -> Result<PairView<'_>, CorpusError> {
    let record: &Record = store.record(index)?;
    Ok(PairView {
        index,
        text1: &record.text1,
        text2: &record.text2,
        token: record.token,
    })
}

/// Index of the pair the annotator should look at next: the first Unscored
/// record, else the first Skipped one, else 0 when the corpus is fully
/// scored. Always scans from the start, so ties resolve to the lowest index
/// and the result is deterministic.
pub fn next_pair_needing_attention(store: &CorpusStore) -> usize {
    let first_with = |status: Status| {
        store
            .records()
            .iter()
            .position(|record| record.status() == status)
    };
    first_with(Status::Unscored)
        .or_else(|| first_with(Status::Skipped))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> CorpusStore {
        CorpusStore::from_text("a\tb\n1\tc\td\n?\te\tf\n").expect("load")
    }

    #[test]
    fn scenario_walkthrough() {
        let mut store = scenario();
        assign_score(&mut store, 0, ScoreToken::Score(5)).expect("assign");
        assert_eq!(
            store.counts(),
            Counts {
                scored: 2,
                unscored: 0,
                skipped: 1,
            }
        );
        erase_score(&mut store, 2).expect("erase");
        assert_eq!(
            store.counts(),
            Counts {
                scored: 2,
                unscored: 1,
                skipped: 0,
            }
        );
        assert_eq!(store.serialize(), "5\ta\tb\n1\tc\td\ne\tf\n");
    }

    #[test]
    fn counts_stay_consistent_under_mutation_sequences() {
        let mut store = scenario();
        let moves: &[(usize, Option<ScoreToken>)] = &[
            (0, Some(ScoreToken::Skip)),
            (1, None),
            (1, Some(ScoreToken::Score(0))),
            (2, Some(ScoreToken::Score(4))),
            (0, Some(ScoreToken::Score(2))),
            (0, None),
            (0, None),
        ];
        for (index, token) in moves {
            match token {
                Some(token) => assign_score(&mut store, *index, *token).expect("assign"),
                None => erase_score(&mut store, *index).expect("erase"),
            }
            assert_eq!(store.counts(), Counts::tally(store.records()));
            assert_eq!(store.counts().total(), store.record_count());
        }
    }

    #[test]
    fn erase_is_idempotent() {
        let mut store = scenario();
        erase_score(&mut store, 0).expect("erase unscored");
        erase_score(&mut store, 0).expect("erase again");
        assert_eq!(
            store.counts(),
            Counts {
                scored: 1,
                unscored: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn rescoring_changes_token_but_not_counts() {
        let mut store = scenario();
        assign_score(&mut store, 1, ScoreToken::Score(3)).expect("assign");
        let before = store.counts();
        assign_score(&mut store, 1, ScoreToken::Score(4)).expect("re-assign");
        assert_eq!(store.counts(), before);
        assert_eq!(store.records()[1].token, Some(ScoreToken::Score(4)));
    }

    #[test]
    fn next_pair_policy_is_deterministic() {
        // Statuses: [Scored, Unscored, Skipped, Unscored]
        let mut store =
            CorpusStore::from_text("2\ta\tb\nc\td\n?\te\tf\ng\th\n").expect("load");
        assert_eq!(next_pair_needing_attention(&store), 1);

        assign_score(&mut store, 1, ScoreToken::Score(1)).expect("assign");
        assign_score(&mut store, 3, ScoreToken::Score(1)).expect("assign");
        assert_eq!(next_pair_needing_attention(&store), 2);

        assign_score(&mut store, 2, ScoreToken::Score(1)).expect("assign");
        assert_eq!(next_pair_needing_attention(&store), 0);
    }

    #[test]
    fn select_pair_exposes_render_fields() {
        let store = scenario();
        let view = select_pair(&store, 2).expect("select");
        assert_eq!(view.index, 2);
        assert_eq!(view.text1, "e");
        assert_eq!(view.text2, "f");
        assert_eq!(view.token, Some(ScoreToken::Skip));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut store = scenario();
        let err = assign_score(&mut store, 9, ScoreToken::Skip).expect_err("bad index");
        assert!(matches!(
            err,
            CorpusError::IndexOutOfRange { index: 9, len: 3 }
        ));
        assert!(select_pair(&store, 3).is_err());
    }
}
