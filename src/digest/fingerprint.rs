//! The file fingerprint type.

use std::fmt;

/// Merkle root over the ordered chunk sequence of a file.
///
/// Identical content yields an identical fingerprint, however the stream was
/// fragmented and whichever reassembler variant produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// The size of the fingerprint in bytes.
    pub const SIZE: usize = 32;

    /// Creates a fingerprint from a byte array.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a fingerprint from a slice.
    ///
    /// Returns `None` if the slice is not exactly 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(slice).ok().map(Self)
    }

    /// Returns the fingerprint as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the fingerprint as a hex string.
    pub fn to_hex(&self) -> String {
        super::encode_hex(&self.0)
    }

    /// Parses a fingerprint from 64 hex characters.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        super::decode_hex(hex_str).map(Self)
    }
}

impl From<blake3::Hash> for Fingerprint {
    fn from(hash: blake3::Hash) -> Self {
        Self(hash.into())
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
