//! The zero-copy batched reassembler.

use std::fmt;

use tracing::trace;

use crate::config::CHUNK_SIZE;
use crate::error::FingerprintError;
use crate::sink::ChunkSink;

use super::Reassembler;

/// Reassembler that pushes whole-chunk runs straight out of each fragment.
///
/// Only bytes that straddle a fragment boundary are copied, into a fixed
/// `CHUNK_SIZE` remainder array. Everything else reaches the sink as a
/// borrowed slice of the fragment through
/// [`ChunkSink::push_chunks_batched`], at most `batch_bytes` per call.
/// Resident memory is `CHUNK_SIZE + batch_bytes` whatever the stream length.
///
/// Per fragment:
///
/// 1. Top up a pending remainder from the front of the fragment and emit it
///    once it holds a full chunk.
/// 2. Push `batch_bytes` slices while at least that many whole-chunk bytes
///    remain, then one shorter whole-chunk slice if any remain.
/// 3. Copy the trailing partial chunk into the remainder.
///
/// # Example
///
/// ```
/// use chunkprint::{Reassembler, RecordingSink, ZeroCopyBatchReassembler};
///
/// let mut reassembler = ZeroCopyBatchReassembler::new(4096);
/// let mut sink = RecordingSink::new();
///
/// reassembler.feed(&[7u8; 10_000], &mut sink)?;
/// reassembler.finish(&mut sink)?;
///
/// // 4096 + 4096 + 1024 batched, 784 left for the final chunk
/// assert_eq!(sink.batch_lens(), &[4096, 4096, 1024]);
/// assert_eq!(sink.chunks().last().map(|c| c.len()), Some(784));
/// # Ok::<(), chunkprint::FingerprintError>(())
/// ```
#[derive(Clone)]
pub struct ZeroCopyBatchReassembler {
    remainder: [u8; CHUNK_SIZE],
    remainder_len: usize,
    batch_bytes: usize,
    offset: u64,
}

impl ZeroCopyBatchReassembler {
    /// Creates a reassembler pushing at most `batch_target_bytes` per batch.
    ///
    /// The target is rounded down to a multiple of [`CHUNK_SIZE`], and never
    /// below one chunk.
    pub fn new(batch_target_bytes: usize) -> Self {
        Self {
            remainder: [0u8; CHUNK_SIZE],
            remainder_len: 0,
            batch_bytes: (batch_target_bytes / CHUNK_SIZE).max(1) * CHUNK_SIZE,
            offset: 0,
        }
    }

    /// Returns the batch size in use.
    pub fn batch_bytes(&self) -> usize {
        self.batch_bytes
    }

    fn push_batch<S: ChunkSink + ?Sized>(
        &mut self,
        batch: &[u8],
        sink: &mut S,
    ) -> Result<(), FingerprintError> {
        trace!(offset = self.offset, len = batch.len(), "pushing chunk batch");
        sink.push_chunks_batched(batch)?;
        self.offset += batch.len() as u64;
        Ok(())
    }
}

impl Reassembler for ZeroCopyBatchReassembler {
    fn feed<S: ChunkSink + ?Sized>(
        &mut self,
        fragment: &[u8],
        sink: &mut S,
    ) -> Result<(), FingerprintError> {
        let mut pos = 0;

        if self.remainder_len > 0 {
            let take = (CHUNK_SIZE - self.remainder_len).min(fragment.len());
            self.remainder[self.remainder_len..self.remainder_len + take]
                .copy_from_slice(&fragment[..take]);
            self.remainder_len += take;
            pos = take;

            if self.remainder_len == CHUNK_SIZE {
                sink.push_chunk(&self.remainder)?;
                self.remainder_len = 0;
                self.offset += CHUNK_SIZE as u64;
            }
        }

        let mut pushable = (fragment.len() - pos) / CHUNK_SIZE * CHUNK_SIZE;
        while pushable >= self.batch_bytes {
            let end = pos + self.batch_bytes;
            self.push_batch(&fragment[pos..end], sink)?;
            pos = end;
            pushable -= self.batch_bytes;
        }
        if pushable > 0 {
            let end = pos + pushable;
            self.push_batch(&fragment[pos..end], sink)?;
            pos = end;
        }

        // Either the remainder is empty here or the fragment is exhausted.
        let tail = &fragment[pos..];
        self.remainder[self.remainder_len..self.remainder_len + tail.len()].copy_from_slice(tail);
        self.remainder_len += tail.len();
        Ok(())
    }

    fn finish<S: ChunkSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), FingerprintError> {
        if self.remainder_len == 0 {
            return Ok(());
        }

        let len = std::mem::take(&mut self.remainder_len);
        sink.push_chunk(&self.remainder[..len])?;
        self.offset += len as u64;
        Ok(())
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn pending_len(&self) -> usize {
        self.remainder_len
    }
}

impl fmt::Debug for ZeroCopyBatchReassembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroCopyBatchReassembler")
            .field("remainder_len", &self.remainder_len)
            .field("batch_bytes", &self.batch_bytes)
            .field("offset", &self.offset)
            .finish()
    }
}
