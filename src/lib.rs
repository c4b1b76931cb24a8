//! docunlock - password recovery search engine
//!
//! Three strategies look for the password of a locked document:
//! dictionary replay, exhaustive incremental enumeration, and random
//! sampling. They test candidates through a [`PasswordOracle`] and can run
//! concurrently under a [`SearchCoordinator`], where the first success
//! wins and stopping one strategy stops the others.
//!
//! [`PasswordOracle`]: oracle::PasswordOracle
//! [`SearchCoordinator`]: search::SearchCoordinator

pub mod config;
pub mod error;
pub mod oracle;
pub mod search;

pub use error::{Result, SearchError};

/// Common imports for driving a search
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, SearchError};
    pub use crate::oracle::{DigestOracle, Outcome, PasswordOracle};
    pub use crate::search::parallel::{CoordinatorConfig, FoundPassword};
    pub use crate::search::{
        CharsetSpec, LengthRange, SearchCoordinator, SearchEvent, SearchResult, SessionReport,
        StrategyKind, StrategyParams, StrategyStatus,
    };
}
