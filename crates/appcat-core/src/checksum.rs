//! SHA-256 digest and byte count over a stream.
//!
//! Callers feed chunks as they arrive; only the hash state is kept in memory.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Checksum and size of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Lowercase hex SHA-256.
    pub checksum: String,
    /// Bytes hashed.
    pub size: u64,
}

/// Incremental SHA-256 that also counts bytes.
#[derive(Default)]
pub struct StreamDigest {
    hasher: Sha256,
    bytes: u64,
}

impl StreamDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.bytes += chunk.len() as u64;
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn finish(self) -> Fingerprint {
        Fingerprint {
            checksum: hex::encode(self.hasher.finalize()),
            size: self.bytes,
        }
    }
}

/// Compute SHA-256 and size of a local file.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> Result<Fingerprint> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut digest = StreamDigest::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n]);
    }
    Ok(digest.finish())
}
