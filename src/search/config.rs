//! Configuration types for search strategies

use crate::error::{Result, SearchError};
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Digits used when the `numbers` class is selected
pub const DIGITS: &str = "0123456789";
/// Fixed special character set
pub const SPECIAL_CHARS: &str = "!@#$%^&*()";
/// ASCII letters, lowercase first
pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default incremental length bounds
pub const INCREMENTAL_MIN_LENGTH: usize = 1;
pub const INCREMENTAL_MAX_LENGTH: usize = 8;
/// Upper cap on configurable incremental length
pub const INCREMENTAL_LENGTH_CAP: usize = 16;

/// Search strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    /// Replay a wordlist in file order
    Wordlist,
    /// Enumerate every string over an alphabet, shortest first
    Incremental,
    /// Sample random letters+digits strings until stopped
    Random,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Wordlist,
        StrategyKind::Incremental,
        StrategyKind::Random,
    ];

    /// Dense index used for per-strategy flag slots
    pub fn index(self) -> usize {
        match self {
            StrategyKind::Wordlist => 0,
            StrategyKind::Incremental => 1,
            StrategyKind::Random => 2,
        }
    }

    /// The two strategies other than `self`
    pub fn others(self) -> impl Iterator<Item = StrategyKind> {
        Self::ALL.into_iter().filter(move |k| *k != self)
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Wordlist => write!(f, "wordlist"),
            StrategyKind::Incremental => write!(f, "incremental"),
            StrategyKind::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wordlist" | "dictionary" | "dict" => Ok(StrategyKind::Wordlist),
            "incremental" | "inc" | "bruteforce" => Ok(StrategyKind::Incremental),
            "random" | "rand" => Ok(StrategyKind::Random),
            _ => Err(format!(
                "Unknown strategy: '{}'. Valid options: wordlist, incremental, random",
                s
            )),
        }
    }
}

/// Character classes selectable for the incremental strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharsetSpec {
    pub numbers: bool,
    pub special_chars: bool,
    pub letters: bool,
}

impl CharsetSpec {
    pub fn with_numbers(mut self, enabled: bool) -> Self {
        self.numbers = enabled;
        self
    }

    pub fn with_special_chars(mut self, enabled: bool) -> Self {
        self.special_chars = enabled;
        self
    }

    pub fn with_letters(mut self, enabled: bool) -> Self {
        self.letters = enabled;
        self
    }

    pub fn is_empty(&self) -> bool {
        !(self.numbers || self.special_chars || self.letters)
    }

    /// Build the ordered alphabet: digits, then specials, then letters.
    pub fn alphabet(&self) -> Alphabet {
        let mut chars = String::new();
        if self.numbers {
            chars.push_str(DIGITS);
        }
        if self.special_chars {
            chars.push_str(SPECIAL_CHARS);
        }
        if self.letters {
            chars.push_str(LETTERS);
        }
        Alphabet::new(&chars)
    }
}

/// Ordered, deduplicated set of characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// First occurrence of each character wins its position.
    pub fn new(chars: &str) -> Self {
        let mut seen = Vec::with_capacity(chars.len());
        for c in chars.chars() {
            if !seen.contains(&c) {
                seen.push(c);
            }
        }
        Self { chars: seen }
    }

    /// Letters and digits, the fixed alphabet of the random strategy
    pub fn alphanumeric() -> Self {
        Self::new(&format!("{LETTERS}{DIGITS}"))
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Inclusive password length bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    /// Validated constructor: `1 <= min <= max`.
    pub fn new(min: usize, max: usize) -> Result<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min == 0 {
            return Err(SearchError::Validation(
                "minimum length must be at least 1".to_string(),
            ));
        }
        if self.min > self.max {
            return Err(SearchError::Validation(format!(
                "minimum length {} exceeds maximum length {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn as_range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        Self {
            min: INCREMENTAL_MIN_LENGTH,
            max: INCREMENTAL_MAX_LENGTH,
        }
    }
}

impl std::fmt::Display for LengthRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Per-strategy inputs supplied at `start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyParams {
    Wordlist { path: PathBuf },
    Incremental { charset: CharsetSpec },
    Random { lengths: LengthRange },
}

impl StrategyParams {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyParams::Wordlist { .. } => StrategyKind::Wordlist,
            StrategyParams::Incremental { .. } => StrategyKind::Incremental,
            StrategyParams::Random { .. } => StrategyKind::Random,
        }
    }

    /// Reject parameters that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        match self {
            StrategyParams::Wordlist { path } => {
                if path.as_os_str().is_empty() {
                    return Err(SearchError::Validation(
                        "wordlist path is empty".to_string(),
                    ));
                }
                Ok(())
            }
            StrategyParams::Incremental { charset } => {
                if charset.alphabet().is_empty() {
                    return Err(SearchError::EmptyAlphabet);
                }
                Ok(())
            }
            StrategyParams::Random { lengths } => lengths.validate(),
        }
    }
}
