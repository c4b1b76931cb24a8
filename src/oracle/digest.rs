//! Reference oracle backed by a SHA-256 digest file
//!
//! The "document" is a text file holding the lowercase hex SHA-256 digest
//! of the password. It stands in for a real container format so the
//! search engine can be exercised end to end.

use crate::oracle::{Outcome, PasswordOracle};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DIGEST_HEX_LEN: usize = 64;

/// Oracle over a digest document, loaded lazily on the first attempt
#[derive(Debug)]
pub struct DigestOracle {
    path: PathBuf,
    expected: OnceLock<Result<String, String>>,
}

impl DigestOracle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            expected: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn expected(&self) -> &Result<String, String> {
        self.expected.get_or_init(|| load_digest(&self.path))
    }
}

impl PasswordOracle for DigestOracle {
    fn try_password(&self, candidate: &str) -> Outcome {
        match self.expected() {
            Ok(expected) if *expected == password_digest(candidate) => Outcome::Unlocked,
            Ok(_) => Outcome::Rejected,
            Err(reason) => Outcome::Malformed(reason.clone()),
        }
    }
}

/// Lowercase hex SHA-256 of a password, the body of a digest document.
pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn load_digest(path: &Path) -> Result<String, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let digest = content.trim().to_ascii_lowercase();
    if digest.len() != DIGEST_HEX_LEN || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!(
            "{} does not contain a SHA-256 hex digest",
            path.display()
        ));
    }
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn digest_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", body).unwrap();
        file
    }

    #[test]
    fn test_password_digest_known_value() {
        assert_eq!(
            password_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_unlock_and_reject() {
        let file = digest_file(&format!("{}\n", password_digest("42").to_uppercase()));
        let oracle = DigestOracle::new(file.path());
        assert_eq!(oracle.try_password("41"), Outcome::Rejected);
        assert_eq!(oracle.try_password("42"), Outcome::Unlocked);
    }

    #[test]
    fn test_malformed_body() {
        let file = digest_file("not a digest");
        let oracle = DigestOracle::new(file.path());
        assert!(matches!(oracle.try_password("x"), Outcome::Malformed(_)));
    }

    #[test]
    fn test_missing_document() {
        let oracle = DigestOracle::new("/no/such/document.sha256");
        match oracle.try_password("x") {
            Outcome::Malformed(reason) => assert!(reason.contains("cannot read")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
