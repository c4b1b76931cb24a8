//! Password search strategies
//!
//! This module provides three strategies that share one candidate loop:
//! - Wordlist: replay a dictionary in file order
//! - Incremental: exhaustive enumeration over a selected alphabet
//! - Random: uniform sampling of letters+digits strings, until stopped
//!
//! The [`parallel`] submodule runs them concurrently with cross-cancellation.

pub mod candidate;
pub mod config;
pub mod parallel;
pub mod result;
pub mod strategy;

pub use candidate::{Candidate, CandidateGenerator, Termination};
pub use config::{Alphabet, CharsetSpec, LengthRange, StrategyKind, StrategyParams};
pub use parallel::{SearchCoordinator, SearchEvent, SessionReport};
pub use result::{Progress, SearchResult, SearchStatistics, StrategyReport, StrategyStatus};
pub use strategy::{IncrementalStrategy, RandomStrategy, WordlistStrategy, run_candidates};

use crate::error::Result;
use crate::oracle::PasswordOracle;
use std::sync::atomic::AtomicBool;

/// A candidate-generation policy that can be run against an oracle
pub trait SearchStrategy: Send {
    fn kind(&self) -> StrategyKind;

    /// Open a fresh generator. Wordlist sources are re-opened, so every
    /// run starts from the first entry.
    fn open(&self) -> Result<Box<dyn CandidateGenerator>>;

    /// Run the strategy to a terminal result.
    ///
    /// # Arguments
    /// * `oracle` - Tests each candidate against the document
    /// * `stop` - Checked before every candidate; set it to cancel
    /// * `on_progress` - Called after every attempt with the tried candidate
    fn run(
        &self,
        oracle: &dyn PasswordOracle,
        stop: &AtomicBool,
        on_progress: &mut dyn FnMut(&Progress),
    ) -> Result<StrategyReport> {
        let mut generator = self.open()?;
        run_candidates(self.kind(), generator.as_mut(), oracle, stop, on_progress)
    }
}
