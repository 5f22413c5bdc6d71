//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing SHA-256
//! fingerprints of file contents. Files are read in fixed-size chunks
//! ([`CHUNK_SIZE`] bytes) so memory use stays constant regardless of file
//! size.
//!
//! # Example
//!
//! ```no_run
//! use hashsweep::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! match hasher.hash_file(Path::new("photo.jpg")) {
//!     Ok(fingerprint) => println!("{}", fingerprint),
//!     Err(e) => eprintln!("Unreadable: {}", e),
//! }
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::HashError;

/// Read buffer size used while streaming file content.
pub const CHUNK_SIZE: usize = 8192;

/// Hexadecimal SHA-256 digest of a file's full content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint of a finished digest.
    fn from_digest(hasher: Sha256) -> Self {
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Hex string form (64 lowercase characters).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` characters, for compact display.
    #[must_use]
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher reading [`CHUNK_SIZE`] bytes at a time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Create a hasher with a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Hash the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] if the file cannot be opened or any read
    /// fails. No partial fingerprint is ever returned.
    pub fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates the first read error other than `Interrupted`.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Fingerprint> {
        let mut digest = Sha256::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            digest.update(&buffer[..read]);
        }

        Ok(Fingerprint::from_digest(digest))
    }

    /// Hash an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(&self, bytes: &[u8]) -> Fingerprint {
        let mut digest = Sha256::new();
        digest.update(bytes);
        Fingerprint::from_digest(digest)
    }
}
