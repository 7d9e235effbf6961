//! Typed failures for corpus loading, mutation, and persistence.
//!
//! Parse and save errors are user-facing and carry enough context (line
//! numbers, the offending token) to be printed as-is. Index and token
//! violations are contract breaches by the calling shell and normally never
//! surface with a well-behaved UI.

use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CorpusError {
    /// The corpus file parsed to zero records. Fatal at startup.
    EmptyCorpus,
    /// A line had neither 2 nor 3 tab-separated fields, or its leading token
    /// was not a valid score token. `line` is 1-based.
    MalformedLine { line: usize, reason: String },
    /// A score token that is neither the skip marker nor a digit 0-5.
    InvalidToken(String),
    /// A record index outside `0..len`.
    IndexOutOfRange { index: usize, len: usize },
    /// Reading or replacing the corpus file failed. The in-memory store is
    /// left untouched so the caller can retry.
    Io(io::Error),
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusError::EmptyCorpus => write!(f, "corpus file contains no records"),
            CorpusError::MalformedLine { line, reason } => {
                write!(f, "line {line}: {reason}")
            }
            CorpusError::InvalidToken(token) => {
                write!(
                    f,
                    "invalid score token {token:?} (expected \"?\" or a digit 0-5)"
                )
            }
            CorpusError::IndexOutOfRange { index, len } => {
                write!(f, "record index {index} out of range (corpus has {len} records)")
            }
            CorpusError::Io(err) => write!(f, "corpus file I/O failed: {err}"),
        }
    }
}

impl Error for CorpusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CorpusError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CorpusError {
    fn from(err: io::Error) -> Self {
        CorpusError::Io(err)
    }
}
