//! File key derivation.
//!
//! A [`FileKey`] is the hash of a canonical encoding of the file's owner,
//! bucket, location, declared size and fingerprint:
//!
//! ```text
//! u64le(len) owner | u64le(len) bucket_id | u64le(len) location | u64le size | fingerprint[32]
//! ```
//!
//! Variable fields are length-prefixed so no two distinct inputs share an
//! encoding.

use bytes::{BufMut, Bytes, BytesMut};

use crate::digest::{FileKey, Fingerprint};
use crate::hash::Blake3Hasher;

/// Maps a canonical encoding to a file key.
pub trait KeyHasher {
    /// Hashes the encoded key material.
    fn hash_key(&self, encoded: &[u8]) -> FileKey;
}

/// Default key hasher: BLAKE3 over the encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3KeyHasher;

impl KeyHasher for Blake3KeyHasher {
    fn hash_key(&self, encoded: &[u8]) -> FileKey {
        FileKey::new(Blake3Hasher::hash(encoded).into())
    }
}

/// Storage coordinates that, with size and fingerprint, identify a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKeyParams {
    owner: Bytes,
    bucket_id: Bytes,
    location: Bytes,
}

impl FileKeyParams {
    /// Creates the parameter set.
    pub fn new(
        owner: impl Into<Bytes>,
        bucket_id: impl Into<Bytes>,
        location: impl Into<Bytes>,
    ) -> Self {
        Self {
            owner: owner.into(),
            bucket_id: bucket_id.into(),
            location: location.into(),
        }
    }

    /// Returns the owner.
    pub fn owner(&self) -> &Bytes {
        &self.owner
    }

    /// Returns the bucket id.
    pub fn bucket_id(&self) -> &Bytes {
        &self.bucket_id
    }

    /// Returns the location.
    pub fn location(&self) -> &Bytes {
        &self.location
    }

    /// Builds the canonical encoding for `size` and `fingerprint`.
    pub fn encode(&self, size: u64, fingerprint: &Fingerprint) -> Bytes {
        let fields = [&self.owner, &self.bucket_id, &self.location];
        let variable: usize = fields.iter().map(|f| 8 + f.len()).sum();

        let mut buf = BytesMut::with_capacity(variable + 8 + Fingerprint::SIZE);
        for field in fields {
            buf.put_u64_le(field.len() as u64);
            buf.put_slice(field);
        }
        buf.put_u64_le(size);
        buf.put_slice(fingerprint.as_bytes());
        buf.freeze()
    }
}

/// Derives the file key for `params`, `size` and `fingerprint`.
///
/// # Example
///
/// ```
/// use chunkprint::{derive_file_key, Blake3KeyHasher, FileKeyParams, Fingerprint};
///
/// let params = FileKeyParams::new(&b"alice"[..], vec![1u8; 32], &b"/docs/a.txt"[..]);
/// let fp = Fingerprint::new([9u8; 32]);
///
/// let key = derive_file_key(&params, 1800, &fp, &Blake3KeyHasher);
/// assert_eq!(key, derive_file_key(&params, 1800, &fp, &Blake3KeyHasher));
/// assert_ne!(key, derive_file_key(&params, 1801, &fp, &Blake3KeyHasher));
/// ```
pub fn derive_file_key<H: KeyHasher + ?Sized>(
    params: &FileKeyParams,
    size: u64,
    fingerprint: &Fingerprint,
    hasher: &H,
) -> FileKey {
    hasher.hash_key(&params.encode(size, fingerprint))
}
