//! Event channel from strategy threads to the collaborator.

use crate::search::config::StrategyKind;
use crate::search::result::{Progress, SearchStatistics, StrategyStatus};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// Message published by a strategy thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// A strategy thread was launched.
    Started { strategy: StrategyKind },
    /// Latest attempt of a running strategy.
    Progress(Progress),
    /// A strategy reached a terminal status.
    Finished {
        strategy: StrategyKind,
        status: StrategyStatus,
        statistics: Option<SearchStatistics>,
    },
}

/// Create the bounded event channel. Publishers never block: when the
/// buffer is full, events are dropped.
pub fn create_event_channel(capacity: usize) -> (Sender<SearchEvent>, Receiver<SearchEvent>) {
    bounded(capacity.max(1))
}

/// Best-effort publish; returns false if the event was dropped.
pub fn publish(tx: &Sender<SearchEvent>, event: SearchEvent) -> bool {
    match tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
    }
}

/// Forwards every `interval`-th progress update of one strategy.
#[derive(Debug)]
pub struct ProgressSink {
    tx: Sender<SearchEvent>,
    interval: u64,
    dropped: u64,
    last_published: Option<u64>,
}

impl ProgressSink {
    pub fn new(tx: Sender<SearchEvent>, interval: u64) -> Self {
        Self {
            tx,
            interval: interval.max(1),
            dropped: 0,
            last_published: None,
        }
    }

    pub fn report(&mut self, progress: &Progress) {
        if progress.attempts % self.interval == 0 {
            self.force(progress);
        }
    }

    /// Publish regardless of the interval. An attempt already published
    /// is not sent again.
    pub fn force(&mut self, progress: &Progress) {
        if self.last_published == Some(progress.attempts) {
            return;
        }
        self.last_published = Some(progress.attempts);
        if !publish(&self.tx, SearchEvent::Progress(progress.clone())) {
            self.dropped += 1;
        }
    }

    /// Updates lost to a full or closed channel
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
