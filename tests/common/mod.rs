#![allow(dead_code)]

use docunlock::oracle::Outcome;
use docunlock::oracle::digest::password_digest;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tempfile::NamedTempFile;

/// Wordlist file with one entry per line.
pub fn write_wordlist(entries: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create wordlist");
    for entry in entries {
        writeln!(file, "{}", entry).expect("write wordlist");
    }
    file.flush().expect("flush wordlist");
    file
}

/// Locked document that opens with `password`.
pub fn write_document(password: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create document");
    writeln!(file, "{}", password_digest(password)).expect("write document");
    file.flush().expect("flush document");
    file
}

/// Oracle that accepts exactly `password` and counts its calls.
#[derive(Clone)]
pub struct CountingOracle {
    password: String,
    pub calls: Arc<AtomicU64>,
}

impl CountingOracle {
    pub fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            calls: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl docunlock::oracle::PasswordOracle for CountingOracle {
    fn try_password(&self, candidate: &str) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if candidate == self.password {
            Outcome::Unlocked
        } else {
            Outcome::Rejected
        }
    }
}

/// Oracle that blocks every attempt until `gate` is set.
pub fn gated_oracle(
    password: &'static str,
    gate: Arc<AtomicBool>,
) -> impl Fn(&str) -> Outcome + Send + Sync + 'static {
    move |candidate: &str| {
        while !gate.load(Ordering::SeqCst) {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        if candidate == password {
            Outcome::Unlocked
        } else {
            Outcome::Rejected
        }
    }
}
