//! Candidate password generation for search strategies

use crate::error::{Result, SearchError};
use crate::search::config::{Alphabet, LengthRange};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// One password attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Candidate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Whether a generator can run out of candidates on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Ends after a bounded number of candidates
    Finite,
    /// Never ends; only a stop signal or a match halts it
    Infinite,
}

/// Lazy source of candidates driven by a search strategy.
pub trait CandidateGenerator: Send {
    /// Next candidate, `Ok(None)` once a finite generator is exhausted.
    fn next_candidate(&mut self) -> Result<Option<Candidate>>;

    fn termination(&self) -> Termination;

    /// Total number of candidates, when known up front.
    fn keyspace(&self) -> Option<u64> {
        None
    }
}

/// Wordlist replay over an already-opened line source
pub struct WordlistCandidates<R> {
    reader: R,
    path: PathBuf,
    line: Vec<u8>,
}

impl WordlistCandidates<BufReader<File>> {
    /// Open a wordlist file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| SearchError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(BufReader::new(file), path))
    }
}

impl<R: BufRead> WordlistCandidates<R> {
    /// `origin` only labels errors.
    pub fn from_reader(reader: R, origin: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: origin.into(),
            line: Vec::with_capacity(64),
        }
    }
}

impl<R: BufRead + Send> CandidateGenerator for WordlistCandidates<R> {
    fn next_candidate(&mut self) -> Result<Option<Candidate>> {
        self.line.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.line)
            .map_err(|source| SearchError::SourceUnavailable {
                path: self.path.clone(),
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&self.line);
        Ok(Some(Candidate::new(text.trim())))
    }

    fn termination(&self) -> Termination {
        Termination::Finite
    }
}

/// Exhaustive enumeration: every string of each length, shortest first,
/// lexicographic over the alphabet order within a length.
pub struct IncrementalCandidates {
    chars: Vec<char>,
    lengths: RangeInclusive<usize>,
    indices: Vec<usize>,
    exhausted: bool,
}

impl IncrementalCandidates {
    pub fn new(alphabet: &Alphabet, lengths: LengthRange) -> Result<Self> {
        if alphabet.is_empty() {
            return Err(SearchError::EmptyAlphabet);
        }
        lengths.validate()?;
        Ok(Self {
            chars: alphabet.chars().to_vec(),
            lengths: lengths.as_range(),
            indices: vec![0; lengths.min],
            exhausted: false,
        })
    }

    fn current(&self) -> Candidate {
        Candidate(self.indices.iter().map(|&i| self.chars[i]).collect())
    }

    /// Advance the odometer; rightmost position turns fastest.
    fn advance(&mut self) {
        let base = self.chars.len();
        for pos in (0..self.indices.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < base {
                return;
            }
            self.indices[pos] = 0;
        }
        // Wrapped around: move to the next length.
        let next_len = self.indices.len() + 1;
        if next_len > *self.lengths.end() {
            self.exhausted = true;
        } else {
            self.indices = vec![0; next_len];
        }
    }
}

impl CandidateGenerator for IncrementalCandidates {
    fn next_candidate(&mut self) -> Result<Option<Candidate>> {
        if self.exhausted {
            return Ok(None);
        }
        let candidate = self.current();
        self.advance();
        Ok(Some(candidate))
    }

    fn termination(&self) -> Termination {
        Termination::Finite
    }

    fn keyspace(&self) -> Option<u64> {
        Some(estimate_keyspace(self.chars.len(), self.lengths.clone()))
    }
}

/// Number of candidates the incremental strategy visits, saturating at
/// `u64::MAX`.
pub fn estimate_keyspace(alphabet_len: usize, lengths: RangeInclusive<usize>) -> u64 {
    let base = alphabet_len as u64;
    lengths.fold(0u64, |total, length| {
        let combinations = (0..length).fold(1u64, |acc, _| acc.saturating_mul(base));
        total.saturating_add(combinations)
    })
}

/// Random letters+digits strings with uniformly sampled length
pub struct RandomCandidates {
    rng: ChaCha8Rng,
    chars: Vec<char>,
    lengths: LengthRange,
}

impl RandomCandidates {
    /// `seed = None` draws the seed from the OS.
    pub fn new(lengths: LengthRange, seed: Option<u64>) -> Result<Self> {
        lengths.validate()?;
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Ok(Self {
            rng,
            chars: Alphabet::alphanumeric().chars().to_vec(),
            lengths,
        })
    }
}

impl CandidateGenerator for RandomCandidates {
    fn next_candidate(&mut self) -> Result<Option<Candidate>> {
        let length = self.rng.random_range(self.lengths.as_range());
        let password = (0..length)
            .map(|_| self.chars[self.rng.random_range(0..self.chars.len())])
            .collect();
        Ok(Some(Candidate(password)))
    }

    fn termination(&self) -> Termination {
        Termination::Infinite
    }
}
