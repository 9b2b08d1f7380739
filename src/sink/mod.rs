//! Chunk sinks and Merkle accumulators.
//!
//! Reassemblers hand chunks to a [`ChunkSink`]. A [`MerkleAccumulator`] is a
//! sink that can also report the root over everything it has seen.
//!
//! - [`Blake3MerkleTree`] - Reference binary Merkle accumulator
//! - [`RecordingSink`] - Records every chunk and batch for inspection

mod merkle;
mod recording;

pub use merkle::Blake3MerkleTree;
pub use recording::{ChunkRecord, RecordingSink};

use crate::config::CHUNK_SIZE;
use crate::digest::Fingerprint;
use crate::error::FingerprintError;

/// Receives chunks in stream order.
///
/// Every chunk is exactly [`CHUNK_SIZE`] bytes except the terminal one,
/// which is shorter.
pub trait ChunkSink {
    /// Appends one chunk.
    fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), FingerprintError>;

    /// Appends a run of whole chunks laid out back to back.
    ///
    /// Must behave exactly like calling [`ChunkSink::push_chunk`] once per
    /// `CHUNK_SIZE` slice of `chunks`, in order. Implementations may override
    /// it to do the same work with less per-call overhead.
    fn push_chunks_batched(&mut self, chunks: &[u8]) -> Result<(), FingerprintError> {
        for chunk in chunks.chunks(CHUNK_SIZE) {
            self.push_chunk(chunk)?;
        }
        Ok(())
    }
}

/// A sink that exposes the Merkle root over the chunks pushed so far.
pub trait MerkleAccumulator: ChunkSink {
    /// Returns the root, deterministic in the ordered chunk sequence.
    fn root(&self) -> Fingerprint;
}

impl<S: ChunkSink + ?Sized> ChunkSink for &mut S {
    fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), FingerprintError> {
        (**self).push_chunk(chunk)
    }

    fn push_chunks_batched(&mut self, chunks: &[u8]) -> Result<(), FingerprintError> {
        (**self).push_chunks_batched(chunks)
    }
}

impl<S: ChunkSink + ?Sized> ChunkSink for Box<S> {
    fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), FingerprintError> {
        (**self).push_chunk(chunk)
    }

    fn push_chunks_batched(&mut self, chunks: &[u8]) -> Result<(), FingerprintError> {
        (**self).push_chunks_batched(chunks)
    }
}

impl<A: MerkleAccumulator + ?Sized> MerkleAccumulator for Box<A> {
    fn root(&self) -> Fingerprint {
        (**self).root()
    }
}
