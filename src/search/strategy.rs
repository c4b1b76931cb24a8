//! The three search strategies and the shared candidate loop

use crate::error::{Result, SearchError};
use crate::oracle::{Outcome, PasswordOracle};
use crate::search::SearchStrategy;
use crate::search::candidate::{
    CandidateGenerator, IncrementalCandidates, RandomCandidates, Termination, WordlistCandidates,
};
use crate::search::config::{Alphabet, LengthRange, StrategyKind};
use crate::search::result::{Progress, SearchResult, SearchStatistics, StrategyReport};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Dictionary replay in file order
#[derive(Debug, Clone)]
pub struct WordlistStrategy {
    pub path: PathBuf,
}

impl SearchStrategy for WordlistStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Wordlist
    }

    fn open(&self) -> Result<Box<dyn CandidateGenerator>> {
        Ok(Box::new(WordlistCandidates::open(&self.path)?))
    }
}

/// Exhaustive enumeration over an alphabet
#[derive(Debug, Clone)]
pub struct IncrementalStrategy {
    pub alphabet: Alphabet,
    pub lengths: LengthRange,
}

impl SearchStrategy for IncrementalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Incremental
    }

    fn open(&self) -> Result<Box<dyn CandidateGenerator>> {
        Ok(Box::new(IncrementalCandidates::new(
            &self.alphabet,
            self.lengths,
        )?))
    }
}

/// Random sampling until stopped
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    pub lengths: LengthRange,
    pub seed: Option<u64>,
}

impl SearchStrategy for RandomStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Random
    }

    fn open(&self) -> Result<Box<dyn CandidateGenerator>> {
        Ok(Box::new(RandomCandidates::new(self.lengths, self.seed)?))
    }
}

/// Drive `generator` against `oracle` until a match, exhaustion, a stop
/// request or an oracle failure.
///
/// `stop` is checked before every pull, so a set flag ends the run
/// without consuming another candidate.
pub fn run_candidates(
    kind: StrategyKind,
    generator: &mut dyn CandidateGenerator,
    oracle: &dyn PasswordOracle,
    stop: &AtomicBool,
    on_progress: &mut dyn FnMut(&Progress),
) -> Result<StrategyReport> {
    let start_time = Instant::now();
    let mut statistics = SearchStatistics::new(kind);
    statistics.keyspace = generator.keyspace();

    let result = loop {
        if stop.load(Ordering::SeqCst) {
            tracing::debug!(strategy = %kind, attempts = statistics.attempts, "stop flag observed");
            break SearchResult::Cancelled;
        }

        let candidate = match generator.next_candidate() {
            Ok(Some(candidate)) => candidate,
            Ok(None) => {
                debug_assert_eq!(generator.termination(), Termination::Finite);
                break SearchResult::NotFound;
            }
            Err(e) => {
                tracing::warn!(strategy = %kind, error = %e, "candidate source failed");
                return Err(e);
            }
        };

        statistics.attempts += 1;
        let outcome = oracle.try_password(candidate.as_str());
        let elapsed = start_time.elapsed();

        on_progress(&Progress {
            strategy: kind,
            candidate: candidate.to_string(),
            elapsed,
            attempts: statistics.attempts,
        });

        match outcome {
            Outcome::Unlocked => {
                break SearchResult::Found {
                    password: candidate.into_string(),
                    elapsed,
                };
            }
            Outcome::Rejected => {}
            Outcome::Malformed(reason) => {
                tracing::warn!(strategy = %kind, reason = %reason, "oracle cannot check document");
                return Err(SearchError::OracleFailure { kind, reason });
            }
        }
    };

    statistics.elapsed_time = start_time.elapsed();
    Ok(StrategyReport { result, statistics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::config::CharsetSpec;
    use std::io::Cursor;

    fn accept(password: &'static str) -> impl Fn(&str) -> Outcome + Send + Sync {
        move |candidate: &str| {
            if candidate == password {
                Outcome::Unlocked
            } else {
                Outcome::Rejected
            }
        }
    }

    #[test]
    fn test_wordlist_found_after_three_tries() {
        let mut words =
            WordlistCandidates::from_reader(Cursor::new("alpha\nbeta\n42\ngamma\n"), "inline");
        let stop = AtomicBool::new(false);
        let mut tried = Vec::new();
        let report = run_candidates(
            StrategyKind::Wordlist,
            &mut words,
            &accept("42"),
            &stop,
            &mut |p: &Progress| tried.push(p.candidate.clone()),
        )
        .unwrap();

        assert_eq!(report.result.password(), Some("42"));
        assert_eq!(report.statistics.attempts, 3);
        assert_eq!(tried, vec!["alpha", "beta", "42"]);
    }

    #[test]
    fn test_incremental_digits_finds_42_after_53_attempts() {
        let strategy = IncrementalStrategy {
            alphabet: CharsetSpec::default().with_numbers(true).alphabet(),
            lengths: LengthRange::default(),
        };
        let mut generator = strategy.open().unwrap();
        let stop = AtomicBool::new(false);
        let report = run_candidates(
            strategy.kind(),
            generator.as_mut(),
            &accept("42"),
            &stop,
            &mut |_: &Progress| {},
        )
        .unwrap();

        assert_eq!(report.result.password(), Some("42"));
        assert_eq!(report.statistics.attempts, 10 + 43);
    }

    #[test]
    fn test_exhaustion_is_not_found() {
        let strategy = IncrementalStrategy {
            alphabet: Alphabet::new("ab"),
            lengths: LengthRange { min: 1, max: 3 },
        };
        let mut generator = strategy.open().unwrap();
        let stop = AtomicBool::new(false);
        let report = run_candidates(
            strategy.kind(),
            generator.as_mut(),
            &accept("zzz"),
            &stop,
            &mut |_: &Progress| {},
        )
        .unwrap();

        assert_eq!(report.result, SearchResult::NotFound);
        assert_eq!(report.statistics.attempts, 2 + 4 + 8);
        assert_eq!(report.statistics.keyspace, Some(14));
    }

    #[test]
    fn test_preset_stop_consumes_nothing() {
        let strategy = RandomStrategy {
            lengths: LengthRange { min: 4, max: 4 },
            seed: Some(1),
        };
        let mut generator = strategy.open().unwrap();
        let stop = AtomicBool::new(true);
        let mut calls = 0;
        let report = run_candidates(
            strategy.kind(),
            generator.as_mut(),
            &accept("never"),
            &stop,
            &mut |_: &Progress| calls += 1,
        )
        .unwrap();

        assert_eq!(report.result, SearchResult::Cancelled);
        assert_eq!(report.statistics.attempts, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_random_stops_only_when_signalled() {
        let strategy = RandomStrategy {
            lengths: LengthRange { min: 4, max: 4 },
            seed: Some(9),
        };
        let mut generator = strategy.open().unwrap();
        let stop = AtomicBool::new(false);
        let report = run_candidates(
            strategy.kind(),
            generator.as_mut(),
            &accept("never"),
            &stop,
            &mut |p: &Progress| {
                if p.attempts == 500 {
                    stop.store(true, Ordering::SeqCst);
                }
            },
        )
        .unwrap();

        assert_eq!(report.result, SearchResult::Cancelled);
        assert_eq!(report.statistics.attempts, 500);
    }

    #[test]
    fn test_malformed_aborts_without_retry() {
        let mut words = WordlistCandidates::from_reader(Cursor::new("a\nb\nc\n"), "inline");
        let stop = AtomicBool::new(false);
        let mut attempts = 0;
        let oracle = |_: &str| Outcome::Malformed("truncated file".to_string());
        let err = run_candidates(
            StrategyKind::Wordlist,
            &mut words,
            &oracle,
            &stop,
            &mut |p: &Progress| attempts = p.attempts,
        )
        .unwrap_err();

        assert!(matches!(err, SearchError::OracleFailure { kind: StrategyKind::Wordlist, .. }));
        assert_eq!(attempts, 1);
    }

    #[test]
    fn test_missing_wordlist_fails_to_open() {
        let strategy = WordlistStrategy {
            path: PathBuf::from("/no/such/wordlist.txt"),
        };
        assert!(matches!(
            strategy.open(),
            Err(SearchError::SourceUnavailable { .. })
        ));
    }
}
