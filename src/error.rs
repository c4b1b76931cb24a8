//! Error types for the password search engine

use crate::search::config::StrategyKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating, starting or running a search strategy.
///
/// Cancellation is not an error: a stopped strategy ends with
/// [`SearchResult::Cancelled`](crate::search::SearchResult::Cancelled).
#[derive(Error, Debug)]
pub enum SearchError {
    /// Bad or missing parameters, rejected before any thread is launched
    #[error("invalid search parameters: {0}")]
    Validation(String),

    /// The wordlist could not be opened or read
    #[error("wordlist unavailable: {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No character class selected for an alphabet-driven strategy
    #[error("no characters selected: the candidate alphabet is empty")]
    EmptyAlphabet,

    /// The oracle could not evaluate the document at all
    #[error("{kind} search aborted: document could not be checked: {reason}")]
    OracleFailure { kind: StrategyKind, reason: String },

    /// Configuration file could not be loaded or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// A strategy thread panicked before reporting
    #[error("{0} search thread panicked")]
    Panicked(StrategyKind),
}

impl SearchError {
    /// Whether the error was raised at `start`, before anything ran.
    pub fn is_validation(&self) -> bool {
        matches!(self, SearchError::Validation(_) | SearchError::EmptyAlphabet)
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_mentions_path() {
        let err = SearchError::SourceUnavailable {
            path: PathBuf::from("/no/such/list.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/no/such/list.txt"));
        assert!(msg.contains("missing"));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_oracle_failure_mentions_strategy() {
        let err = SearchError::OracleFailure {
            kind: StrategyKind::Random,
            reason: "not a digest".to_string(),
        };
        assert!(err.to_string().starts_with("random search aborted"));
    }

    #[test]
    fn test_validation_classification() {
        assert!(SearchError::EmptyAlphabet.is_validation());
        assert!(SearchError::Validation("x".into()).is_validation());
        assert!(!SearchError::Config("x".into()).is_validation());
    }
}
