//! The file key type.

use std::fmt;

/// Identifier derived from owner, bucket, location, size and fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileKey([u8; 32]);

impl FileKey {
    /// Creates a file key from a byte array.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the key as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the key as a hex string.
    pub fn to_hex(&self) -> String {
        super::encode_hex(&self.0)
    }

    /// Parses a key from 64 hex characters.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        super::decode_hex(hex_str).map(Self)
    }
}

impl AsRef<[u8]> for FileKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let key = FileKey::new([0xABu8; 32]);
        let hex = key.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c == 'a' || c == 'b'));
        assert_eq!(FileKey::from_hex(&hex), Some(key));
    }
}
