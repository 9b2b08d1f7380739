//! Reference binary Merkle accumulator over BLAKE3.

use crate::config::CHUNK_SIZE;
use crate::digest::Fingerprint;
use crate::error::FingerprintError;
use crate::hash::Blake3Hasher;

use super::{ChunkSink, MerkleAccumulator};

/// Incremental binary Merkle tree over 1 KiB leaves.
///
/// Only the right spine is kept: a stack of `(level, root)` pairs for the
/// completed subtrees. A new leaf merges with the top of the stack while the
/// levels match, like carrying in a binary counter, so the stack never holds
/// more than `log2(leaves) + 1` entries.
///
/// The root folds the stack right to left. An empty tree has the root
/// `BLAKE3("")`.
///
/// # Example
///
/// ```
/// use chunkprint::{Blake3MerkleTree, ChunkSink, MerkleAccumulator};
///
/// let mut tree = Blake3MerkleTree::new();
/// tree.push_chunk(&[0u8; 1024])?;
/// tree.push_chunk(b"tail")?;
/// assert_eq!(tree.leaf_count(), 2);
/// println!("root {}", tree.root());
/// # Ok::<(), chunkprint::FingerprintError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Blake3MerkleTree {
    hasher: Blake3Hasher,
    spine: Vec<(u32, blake3::Hash)>,
    leaves: u64,
    bytes: u64,
}

impl Blake3MerkleTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of leaves appended.
    pub fn leaf_count(&self) -> u64 {
        self.leaves
    }

    /// Returns the number of content bytes appended.
    pub fn byte_count(&self) -> u64 {
        self.bytes
    }

    pub(crate) fn append_leaf(&mut self, chunk: &[u8]) {
        let mut node = self.hasher.hash_leaf(chunk);
        let mut level = 0u32;

        while let Some(&(top_level, top)) = self.spine.last() {
            if top_level != level {
                break;
            }
            self.spine.pop();
            node = Blake3Hasher::hash_parent(&top, &node);
            level += 1;
        }

        self.spine.push((level, node));
        self.leaves += 1;
        self.bytes += chunk.len() as u64;
    }
}

impl ChunkSink for Blake3MerkleTree {
    fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), FingerprintError> {
        self.append_leaf(chunk);
        Ok(())
    }

    fn push_chunks_batched(&mut self, chunks: &[u8]) -> Result<(), FingerprintError> {
        for chunk in chunks.chunks(CHUNK_SIZE) {
            self.append_leaf(chunk);
        }
        Ok(())
    }
}

impl MerkleAccumulator for Blake3MerkleTree {
    fn root(&self) -> Fingerprint {
        let mut nodes = self.spine.iter().rev();
        let Some(&(_, mut root)) = nodes.next() else {
            return Fingerprint::from(Blake3Hasher::hash(&[]));
        };
        for (_, left) in nodes {
            root = Blake3Hasher::hash_parent(left, &root);
        }
        Fingerprint::from(root)
    }
}
