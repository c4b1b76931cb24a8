//! Search result types and statistics

use crate::search::config::StrategyKind;
use std::time::Duration;

/// Terminal result of one strategy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// A finite generator ran out without a match
    NotFound,
    /// The oracle accepted `password`, `elapsed` after the run started
    Found { password: String, elapsed: Duration },
    /// The stop flag was observed before a match
    Cancelled,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }

    pub fn password(&self) -> Option<&str> {
        match self {
            SearchResult::Found { password, .. } => Some(password),
            _ => None,
        }
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchResult::NotFound => write!(f, "exhausted without match"),
            SearchResult::Found { password, elapsed } => write!(
                f,
                "password found: {} (time taken: {})",
                password,
                format_duration(*elapsed)
            ),
            SearchResult::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Statistics from a strategy run
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    pub strategy: StrategyKind,
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Number of candidates sent to the oracle
    pub attempts: u64,
    /// Candidate count of the whole run, if the generator knows it
    pub keyspace: Option<u64>,
}

impl SearchStatistics {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            elapsed_time: Duration::ZERO,
            attempts: 0,
            keyspace: None,
        }
    }

    /// Candidates tried per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.attempts as f64 / secs
        }
    }

    /// Share of the keyspace covered, 0.0 to 1.0
    pub fn coverage(&self) -> Option<f64> {
        self.keyspace
            .filter(|&k| k > 0)
            .map(|k| self.attempts as f64 / k as f64)
    }

    /// Format statistics as a one-line summary
    pub fn format_summary(&self) -> String {
        let mut s = format!(
            "{:<12} {} attempts in {} ({:.0} p/s)",
            self.strategy,
            self.attempts,
            format_duration(self.elapsed_time),
            self.throughput()
        );
        if let Some(coverage) = self.coverage() {
            s.push_str(&format!(", {:.2}% of keyspace", coverage * 100.0));
        }
        s
    }
}

/// Result and statistics of one finished strategy run
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyReport {
    pub result: SearchResult,
    pub statistics: SearchStatistics,
}

/// Snapshot of a running strategy, overwritten on every attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub strategy: StrategyKind,
    pub candidate: String,
    pub elapsed: Duration,
    pub attempts: u64,
}

/// Last reported status of one strategy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StrategyStatus {
    #[default]
    Idle,
    Searching,
    Found { password: String, elapsed: Duration },
    Exhausted,
    Cancelled,
    /// Source, alphabet or oracle failure
    Failed(String),
}

impl StrategyStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StrategyStatus::Idle | StrategyStatus::Searching)
    }
}

impl From<&SearchResult> for StrategyStatus {
    fn from(result: &SearchResult) -> Self {
        match result {
            SearchResult::NotFound => StrategyStatus::Exhausted,
            SearchResult::Found { password, elapsed } => StrategyStatus::Found {
                password: password.clone(),
                elapsed: *elapsed,
            },
            SearchResult::Cancelled => StrategyStatus::Cancelled,
        }
    }
}

impl std::fmt::Display for StrategyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyStatus::Idle => write!(f, "idle"),
            StrategyStatus::Searching => write!(f, "searching"),
            StrategyStatus::Found { password, elapsed } => write!(
                f,
                "password found: {} (time taken: {})",
                password,
                format_duration(*elapsed)
            ),
            StrategyStatus::Exhausted => write!(f, "exhausted without match"),
            StrategyStatus::Cancelled => write!(f, "cancelled"),
            StrategyStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Compact human-readable duration: `12.3s`, `4m7s`, `2h15m`
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{}h{}m", secs / 3600, (secs / 60) % 60)
    }
}
