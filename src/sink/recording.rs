//! A sink that records what it receives.

use bytes::Bytes;
use std::fmt;

use crate::config::CHUNK_SIZE;
use crate::digest::Fingerprint;
use crate::error::FingerprintError;

use super::{Blake3MerkleTree, ChunkSink, MerkleAccumulator};

/// One chunk as seen by a sink, with its position in the stream.
///
/// # Example
///
/// ```
/// use chunkprint::ChunkRecord;
/// use bytes::Bytes;
///
/// let record = ChunkRecord::new(Bytes::from_static(b"hello"), 1024);
/// assert_eq!(record.range(), 1024..1029);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    /// The chunk content.
    pub data: Bytes,

    /// Byte offset of the chunk in the original stream.
    pub offset: u64,
}

impl ChunkRecord {
    /// Creates a new record.
    pub fn new(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset,
        }
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the chunk as a range.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.offset..self.end()
    }
}

impl fmt::Display for ChunkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({} bytes @ {})", self.len(), self.offset)
    }
}

/// Records every chunk and every batched call it receives.
///
/// Batched pushes are split into per-chunk records, so two sinks fed the same
/// bytes compare equal on [`RecordingSink::chunks`] whether or not batching
/// was used. [`RecordingSink::batch_lens`] keeps the raw batch sizes.
///
/// Also a [`MerkleAccumulator`]: the root is a [`Blake3MerkleTree`] root over
/// the recorded chunks.
///
/// # Example
///
/// ```
/// use chunkprint::{ChunkSink, RecordingSink};
///
/// let mut sink = RecordingSink::new();
/// sink.push_chunks_batched(&[1u8; 2048])?;
/// sink.push_chunk(b"tail")?;
///
/// assert_eq!(sink.boundaries(), vec![(0, 1024), (1024, 1024), (2048, 4)]);
/// assert_eq!(sink.batch_lens(), &[2048]);
/// # Ok::<(), chunkprint::FingerprintError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    chunks: Vec<ChunkRecord>,
    batch_lens: Vec<usize>,
    single_calls: usize,
    offset: u64,
    tree: Blake3MerkleTree,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, chunk: &[u8]) {
        self.chunks
            .push(ChunkRecord::new(Bytes::copy_from_slice(chunk), self.offset));
        self.offset += chunk.len() as u64;
        self.tree.append_leaf(chunk);
    }

    /// Returns every chunk seen, in order.
    pub fn chunks(&self) -> &[ChunkRecord] {
        &self.chunks
    }

    /// Returns `(offset, length)` for every chunk seen, in order.
    pub fn boundaries(&self) -> Vec<(u64, usize)> {
        self.chunks.iter().map(|c| (c.offset, c.len())).collect()
    }

    /// Returns the length of every batched call, in order.
    pub fn batch_lens(&self) -> &[usize] {
        &self.batch_lens
    }

    /// Returns how many single-chunk calls were made.
    pub fn single_calls(&self) -> usize {
        self.single_calls
    }

    /// Returns the total number of bytes recorded.
    pub fn total_bytes(&self) -> u64 {
        self.offset
    }

    /// Concatenates every recorded chunk.
    pub fn concat(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.offset as usize);
        for chunk in &self.chunks {
            out.extend_from_slice(&chunk.data);
        }
        out
    }

    /// Consumes the recorder and returns the chunks.
    pub fn into_chunks(self) -> Vec<ChunkRecord> {
        self.chunks
    }
}

impl ChunkSink for RecordingSink {
    fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), FingerprintError> {
        self.single_calls += 1;
        self.record(chunk);
        Ok(())
    }

    fn push_chunks_batched(&mut self, chunks: &[u8]) -> Result<(), FingerprintError> {
        self.batch_lens.push(chunks.len());
        for chunk in chunks.chunks(CHUNK_SIZE) {
            self.record(chunk);
        }
        Ok(())
    }
}

impl MerkleAccumulator for RecordingSink {
    fn root(&self) -> Fingerprint {
        self.tree.root()
    }
}
