//! Password oracle contract
//!
//! An oracle is bound to one protected document and answers a single
//! question: does this candidate unlock it? The search engine never looks
//! at the document itself.

pub mod digest;

pub use digest::DigestOracle;

/// Verdict for one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The candidate unlocks the document
    Unlocked,
    /// Wrong password, try the next one
    Rejected,
    /// The document cannot be checked at all; fatal for the strategy
    Malformed(String),
}

/// Tests candidate passwords against one document.
///
/// Calls may be slow and are made concurrently from every running
/// strategy.
pub trait PasswordOracle: Send + Sync {
    fn try_password(&self, candidate: &str) -> Outcome;
}

impl<F> PasswordOracle for F
where
    F: Fn(&str) -> Outcome + Send + Sync,
{
    fn try_password(&self, candidate: &str) -> Outcome {
        self(candidate)
    }
}
