//! Concurrent execution of the search strategies.
//!
//! Each strategy runs on its own thread against a shared oracle.
//!
//! # Architecture
//!
//! The concurrent search system consists of:
//! - A **coordinator** that launches strategy threads and joins them
//! - **Shared signals**: one stop flag per strategy plus a found flag
//!   claimed by compare-and-swap, so only the first success is recorded
//! - A bounded **event channel** carrying progress and lifecycle events
//!   to whoever drives the search
//!
//! Stopping any strategy before a password is found stops all three. Once
//! a password is recorded, stops only affect the strategy they name.
//!
//! # Example
//!
//! ```ignore
//! use docunlock::oracle::DigestOracle;
//! use docunlock::search::parallel::{CoordinatorConfig, SearchCoordinator};
//! use docunlock::search::{CharsetSpec, StrategyParams};
//!
//! let coordinator = SearchCoordinator::new(
//!     DigestOracle::new("report.locked"),
//!     CoordinatorConfig::default().with_progress_interval(500),
//! );
//! coordinator.start(StrategyParams::Wordlist { path: "rockyou.txt".into() })?;
//! coordinator.start(StrategyParams::Incremental {
//!     charset: CharsetSpec::default().with_numbers(true),
//! })?;
//!
//! let report = coordinator.wait();
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;
pub mod signal;

pub use channel::SearchEvent;
pub use config::CoordinatorConfig;
pub use coordinator::{SearchCoordinator, SessionReport};
pub use signal::{FoundPassword, SearchSignals};
