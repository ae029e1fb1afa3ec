// src/fingerprint.rs

//! SHA-256 content fingerprinting shared by both pipelines.
//!
//! Fingerprints are lowercase hex digests over the full byte content of
//! whatever was observed: a local file for the watch pipeline, a downloaded
//! asset body for the remote poller.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

/// Content could not be read while computing a fingerprint.
///
/// Typically the file was removed or became unreadable between the change
/// notification and the content read.
#[derive(Error, Debug)]
#[error("reading {path:?} for fingerprinting: {source}")]
pub struct HashError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Compute the hex SHA-256 digest of a file's full content.
///
/// Reads in fixed-size chunks so large binaries are never pulled into
/// memory whole.
pub fn compute_file_fingerprint(path: &Path) -> Result<String, HashError> {
    let mut file = File::open(path).map_err(|source| HashError {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|source| HashError {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hex::encode(hasher.finalize());
    debug!(path = ?path, digest = %digest, "computed file fingerprint");
    Ok(digest)
}

/// Compute the hex SHA-256 digest of an in-memory byte sequence.
pub fn compute_fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte sequence.
    const EMPTY_DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn empty_input_yields_the_well_known_digest() {
        assert_eq!(compute_fingerprint(b""), EMPTY_DIGEST);
    }

    #[test]
    fn empty_file_yields_the_well_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(compute_file_fingerprint(&path).unwrap(), EMPTY_DIGEST);
    }

    #[test]
    fn file_and_bytes_fingerprints_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        let content = b"hello";
        std::fs::write(&path, content).unwrap();

        let from_file = compute_file_fingerprint(&path).unwrap();
        assert_eq!(from_file, compute_fingerprint(content));
        // Known vector, so a wrong algorithm cannot slip through unnoticed.
        assert_eq!(
            from_file,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = compute_file_fingerprint(Path::new("/no/such/file.bin")).unwrap_err();
        assert!(err.to_string().contains("file.bin"));
    }
}
