//! Configuration for concurrent strategy execution.

use crate::search::config::LengthRange;

/// Configuration for a [`SearchCoordinator`](super::SearchCoordinator).
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// Publish one progress event every this many attempts.
    pub progress_interval: u64,
    /// Capacity of the event channel; overflow is dropped.
    pub event_capacity: usize,
    /// Length bounds of the incremental strategy.
    pub incremental_lengths: LengthRange,
    /// Seed for the random strategy (None = seed from the OS).
    pub seed: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            progress_interval: 1000,
            event_capacity: 1024,
            incremental_lengths: LengthRange::default(),
            seed: None,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    pub fn with_incremental_lengths(mut self, lengths: LengthRange) -> Self {
        self.incremental_lengths = lengths;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the seed from an Option.
    pub fn with_seed_option(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
