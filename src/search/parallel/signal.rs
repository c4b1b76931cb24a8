//! Shared stop flags and the first-success-wins result cell.

use crate::search::config::StrategyKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// The password that ended a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPassword {
    pub strategy: StrategyKind,
    pub password: String,
    pub elapsed: Duration,
}

/// Cancellation state shared by the coordinator and its strategy threads.
///
/// Strategies only read their stop flag. The found flag is claimed by
/// compare-and-swap, so exactly one strategy records a password per
/// session.
#[derive(Debug, Default)]
pub struct SearchSignals {
    stop: [AtomicBool; 3],
    found: AtomicBool,
    winner: Mutex<Option<FoundPassword>>,
}

impl SearchSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// The flag a strategy polls before each candidate.
    pub fn stop_flag(&self, kind: StrategyKind) -> &AtomicBool {
        &self.stop[kind.index()]
    }

    pub fn is_stopped(&self, kind: StrategyKind) -> bool {
        self.stop_flag(kind).load(Ordering::SeqCst)
    }

    pub fn request_stop(&self, kind: StrategyKind) {
        self.stop_flag(kind).store(true, Ordering::SeqCst);
    }

    /// Set the stop flags of the two strategies other than `kind`.
    pub fn stop_others(&self, kind: StrategyKind) {
        for other in kind.others() {
            self.request_stop(other);
        }
    }

    pub fn clear_stop(&self, kind: StrategyKind) {
        self.stop_flag(kind).store(false, Ordering::SeqCst);
    }

    pub fn is_found(&self) -> bool {
        self.found.load(Ordering::SeqCst)
    }

    /// Record `found` if no password has been recorded this session.
    /// Returns false when another strategy got there first.
    ///
    /// The winner lock is held across the flag swap, so once `is_found`
    /// reads true, `winner` returns the password.
    pub fn try_record_found(&self, found: FoundPassword) -> bool {
        let mut winner = self.winner.lock().unwrap_or_else(PoisonError::into_inner);
        if self
            .found
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        *winner = Some(found);
        true
    }

    pub fn winner(&self) -> Option<FoundPassword> {
        self.winner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Start a fresh session: clear the found flag, the recorded password
    /// and every stop flag. Only valid while no strategy is running.
    pub fn reset(&self) {
        let mut winner = self.winner.lock().unwrap_or_else(PoisonError::into_inner);
        *winner = None;
        self.found.store(false, Ordering::SeqCst);
        drop(winner);
        for flag in &self.stop {
            flag.store(false, Ordering::SeqCst);
        }
    }
}
