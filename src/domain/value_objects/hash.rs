//! Content Hash Value Object
//!
//! A validated, immutable hash representing the content of a file.
//! Used for change detection against the deploy manifest.

use std::fmt;
use std::io::{self, Read};

use sha2::{Digest, Sha256};

/// Read buffer size for streaming digests
const CHUNK_SIZE: usize = 64 * 1024;

/// Content hash value object
///
/// Wraps a SHA-256 hash string with the `sha256:` prefix.
/// Hashes recorded without the prefix (or by another algorithm) simply
/// never compare equal, which makes the file look changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// Prefix for SHA-256 hashes
    pub const PREFIX: &'static str = "sha256:";

    /// Wrap a hash exactly as recorded (manifest values are not rewritten)
    pub fn new(recorded: impl Into<String>) -> Self {
        Self(recorded.into())
    }

    /// Compute SHA-256 of an in-memory buffer
    pub fn from_bytes(content: &[u8]) -> Self {
        let hash = Sha256::digest(content);
        Self(format!("{}{:x}", Self::PREFIX, hash))
    }

    /// Compute SHA-256 of a reader in fixed-size chunks
    ///
    /// Returns the hash together with the number of bytes consumed.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<(Self, u64)> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
            total += n as u64;
        }
        Ok((
            Self(format!("{}{:x}", Self::PREFIX, hasher.finalize())),
            total,
        ))
    }

    /// Get the full hash string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get just the hex part without prefix
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContentHash {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ContentHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_computes_sha256() {
        let hash = ContentHash::from_bytes(b"hello");
        assert!(hash.as_str().starts_with("sha256:"));
        assert_eq!(hash.hex().len(), 64);
        assert_eq!(
            hash.hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn reader_and_bytes_agree() {
        let data = vec![7u8; CHUNK_SIZE * 2 + 13];
        let (streamed, size) = ContentHash::from_reader(&data[..]).unwrap();
        assert_eq!(streamed, ContentHash::from_bytes(&data));
        assert_eq!(size, data.len() as u64);
    }

    #[test]
    fn empty_reader_hashes_to_empty_digest() {
        let (hash, size) = ContentHash::from_reader(io::empty()).unwrap();
        assert_eq!(size, 0);
        assert_eq!(hash, ContentHash::from_bytes(b""));
    }

    #[test]
    fn different_content_different_hash() {
        assert_ne!(
            ContentHash::from_bytes(b"test1"),
            ContentHash::from_bytes(b"test2")
        );
    }

    #[test]
    fn new_keeps_recorded_value_verbatim() {
        let legacy = ContentHash::new("d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(legacy.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_ne!(legacy, ContentHash::from_bytes(b""));
    }

    #[test]
    fn hex_returns_without_prefix() {
        let hash = ContentHash::new("sha256:abc123");
        assert_eq!(hash.hex(), "abc123");
    }

    #[test]
    fn display_shows_full_hash() {
        let hash = ContentHash::new("sha256:abc123");
        assert_eq!(format!("{}", hash), "sha256:abc123");
    }
}
