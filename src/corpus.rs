//! Record model for tab-delimited STS corpora.
//!
//! One corpus line is one sentence pair. An unscored pair is
//! `text1<TAB>text2`; an annotated pair carries a leading token,
//! `token<TAB>text1<TAB>text2`, where the token is a similarity digit `0`-`5`
//! or the skip marker `?`. A record's status is derived strictly from its
//! token, never stored alongside it, so the two cannot drift apart.

use crate::error::CorpusError;
use std::fmt;

/// Token denoting "reviewed but deliberately left unscored".
pub const SKIP_TOKEN: &str = "?";

/// Highest assignable similarity score.
pub const MAX_SCORE: u8 = 5;

/// Derived classification of a pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Unscored,
    Scored,
    Skipped,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Unscored => "unscored",
            Status::Scored => "scored",
            Status::Skipped => "skipped",
        }
    }
}

/// Literal annotation attached to a pair: a similarity digit or the skip
/// marker. Kept as a token rather than a bare number because a pair scored
/// zero must stay distinguishable from an unscored one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScoreToken {
    Skip,
    Score(u8),
}

impl ScoreToken {
    /// Parse a token exactly as it may appear on disk or on the command
    /// line: `"?"` or a single digit `"0"`-`"5"`.
    pub fn parse(raw: &str) -> Result<Self, CorpusError> {
        if raw == SKIP_TOKEN {
            return Ok(ScoreToken::Skip);
        }
        match raw.parse::<u8>() {
            Ok(score) if raw.len() == 1 && score <= MAX_SCORE => Ok(ScoreToken::Score(score)),
            _ => Err(CorpusError::InvalidToken(raw.to_string())),
        }
    }

    /// Load-time variant of [`ScoreToken::parse`] that also accepts the
    /// legacy artifact of a skip marker glued to a stray digit (`"?3"`),
    /// produced by a past save bug. The marker is stripped and the rest
    /// parsed as usual. Serialization never produces this form.
    pub fn parse_lenient(raw: &str) -> Result<Self, CorpusError> {
        match raw.strip_prefix(SKIP_TOKEN) {
            Some("") => Ok(ScoreToken::Skip),
            Some(rest) => Self::parse(rest),
            None => Self::parse(raw),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ScoreToken::Skip => Status::Skipped,
            ScoreToken::Score(_) => Status::Scored,
        }
    }
}

impl fmt::Display for ScoreToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreToken::Skip => f.write_str(SKIP_TOKEN),
            ScoreToken::Score(score) => write!(f, "{score}"),
        }
    }
}

/// One corpus line: two sentence fields and an optional annotation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub text1: String,
    pub text2: String,
    pub token: Option<ScoreToken>,
}

impl Record {
    /// Parse one line-ending-normalized corpus line. `line_no` is 1-based
    /// and only used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self, CorpusError> {
        let fields: Vec<&str> = line.split('\t').collect();
        match fields.as_slice() {
            [text1, text2] => Ok(Record {
                text1: (*text1).to_string(),
                text2: (*text2).to_string(),
                token: None,
            }),
            [token, text1, text2] => {
                let token = ScoreToken::parse_lenient(token).map_err(|err| {
                    CorpusError::MalformedLine {
                        line: line_no,
                        reason: err.to_string(),
                    }
                })?;
                Ok(Record {
                    text1: (*text1).to_string(),
                    text2: (*text2).to_string(),
                    token: Some(token),
                })
            }
            other => Err(CorpusError::MalformedLine {
                line: line_no,
                reason: format!(
                    "expected 2 or 3 tab-separated fields, found {}",
                    other.len()
                ),
            }),
        }
    }

    /// Exact on-disk form of this record. Inverse of [`Record::parse`] for
    /// well-formed input.
    pub fn to_line(&self) -> String {
        match self.token {
            Some(token) => format!("{token}\t{}\t{}", self.text1, self.text2),
            None => format!("{}\t{}", self.text1, self.text2),
        }
    }

    pub fn status(&self) -> Status {
        self.token.map(|token| token.status()).unwrap_or(Status::Unscored)
    }
}

/// Scan raw corpus text and report every malformed line without giving up at
/// the first one. Used by `check`.
pub fn check_lines(text: &str) -> Vec<CorpusError> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            Record::parse(line.trim_end_matches('\r'), idx + 1).err()
        })
        .collect()
}
