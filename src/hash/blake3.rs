//! BLAKE3-based leaf, parent and key hashing.

/// Domain tag prefixed to every leaf (chunk) hash.
const LEAF_TAG: u8 = 0x00;

/// Domain tag prefixed to every parent (interior node) hash.
const PARENT_TAG: u8 = 0x01;

/// A reusable BLAKE3 hasher.
///
/// Leaves and parents are domain separated so a chunk can never collide with
/// an interior node.
#[derive(Debug, Clone)]
pub struct Blake3Hasher {
    state: blake3::Hasher,
}

impl Blake3Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self {
            state: blake3::Hasher::new(),
        }
    }

    /// Hashes one chunk as a tree leaf, reusing internal state.
    pub fn hash_leaf(&mut self, chunk: &[u8]) -> blake3::Hash {
        self.state.reset();
        self.state.update(&[LEAF_TAG]);
        self.state.update(chunk);
        self.state.finalize()
    }

    /// Hashes two child roots into their parent.
    pub fn hash_parent(left: &blake3::Hash, right: &blake3::Hash) -> blake3::Hash {
        let mut state = blake3::Hasher::new();
        state.update(&[PARENT_TAG]);
        state.update(left.as_bytes());
        state.update(right.as_bytes());
        state.finalize()
    }

    /// Convenience method to hash data in one shot.
    pub fn hash(data: &[u8]) -> blake3::Hash {
        blake3::hash(data)
    }
}

impl Default for Blake3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash() {
        let hash = Blake3Hasher::hash(b"hello world");
        assert_eq!(hash.as_bytes().len(), 32);

        // Hash should be deterministic
        assert_eq!(hash, Blake3Hasher::hash(b"hello world"));
        assert_ne!(hash, Blake3Hasher::hash(b"hello world!"));
    }

    #[test]
    fn test_leaf_reuses_state() {
        let mut hasher = Blake3Hasher::new();
        let first = hasher.hash_leaf(b"some data");
        let _ = hasher.hash_leaf(b"other data");
        assert_eq!(hasher.hash_leaf(b"some data"), first);
    }

    #[test]
    fn test_leaf_is_domain_separated() {
        let mut hasher = Blake3Hasher::new();
        assert_ne!(hasher.hash_leaf(b"abc"), Blake3Hasher::hash(b"abc"));
    }

    #[test]
    fn test_parent_is_ordered() {
        let mut hasher = Blake3Hasher::new();
        let a = hasher.hash_leaf(b"a");
        let b = hasher.hash_leaf(b"b");
        assert_ne!(
            Blake3Hasher::hash_parent(&a, &b),
            Blake3Hasher::hash_parent(&b, &a)
        );
    }
}
