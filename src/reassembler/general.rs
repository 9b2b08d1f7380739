//! The general buffering reassembler.

use bytes::Bytes;

use crate::config::CHUNK_SIZE;
use crate::error::FingerprintError;
use crate::sink::ChunkSink;
use crate::util::combine_bytes;

use super::Reassembler;

/// Reassembler that rebuilds a working buffer on every fragment.
///
/// Each fragment is appended to the carry in a fresh buffer; whole chunks are
/// sliced off the front and the tail becomes the new carry. Resident memory is
/// the carry plus the current fragment, never the whole stream.
///
/// Simple and obviously correct, at the cost of copying every byte once per
/// fragment. [`ZeroCopyBatchReassembler`](super::ZeroCopyBatchReassembler)
/// produces the same chunks without that copy.
///
/// # Example
///
/// ```
/// use chunkprint::{GeneralReassembler, Reassembler, RecordingSink};
///
/// let mut reassembler = GeneralReassembler::new();
/// let mut sink = RecordingSink::new();
///
/// reassembler.feed(&[b'A'; 600], &mut sink)?;
/// reassembler.feed(&[b'B'; 600], &mut sink)?;
/// reassembler.finish(&mut sink)?;
///
/// assert_eq!(sink.boundaries(), vec![(0, 1024), (1024, 176)]);
/// # Ok::<(), chunkprint::FingerprintError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeneralReassembler {
    carry: Bytes,
    offset: u64,
}

impl GeneralReassembler {
    /// Creates a reassembler with an empty carry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reassembler for GeneralReassembler {
    fn feed<S: ChunkSink + ?Sized>(
        &mut self,
        fragment: &[u8],
        sink: &mut S,
    ) -> Result<(), FingerprintError> {
        if fragment.is_empty() {
            return Ok(());
        }

        let buffer = combine_bytes(&self.carry, fragment);
        let mut start = 0;

        while buffer.len() - start >= CHUNK_SIZE {
            sink.push_chunk(&buffer[start..start + CHUNK_SIZE])?;
            start += CHUNK_SIZE;
            self.offset += CHUNK_SIZE as u64;
        }

        self.carry = buffer.slice(start..);
        Ok(())
    }

    fn finish<S: ChunkSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), FingerprintError> {
        let tail = std::mem::take(&mut self.carry);
        if tail.is_empty() {
            return Ok(());
        }

        sink.push_chunk(&tail)?;
        self.offset += tail.len() as u64;
        Ok(())
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn pending_len(&self) -> usize {
        self.carry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;

    #[test]
    fn test_empty_stream() {
        let mut reassembler = GeneralReassembler::new();
        let mut sink = RecordingSink::new();
        reassembler.finish(&mut sink).unwrap();
        assert!(sink.chunks().is_empty());
    }

    #[test]
    fn test_empty_fragment_is_skipped() {
        let mut reassembler = GeneralReassembler::new();
        let mut sink = RecordingSink::new();

        reassembler.feed(b"abc", &mut sink).unwrap();
        reassembler.feed(b"", &mut sink).unwrap();
        assert_eq!(reassembler.pending_len(), 3);

        reassembler.finish(&mut sink).unwrap();
        assert_eq!(sink.boundaries(), vec![(0, 3)]);
    }

    #[test]
    fn test_carry_spans_fragments() {
        let mut reassembler = GeneralReassembler::new();
        let mut sink = RecordingSink::new();

        reassembler.feed(&[1u8; 1000], &mut sink).unwrap();
        assert!(sink.chunks().is_empty());

        reassembler.feed(&[2u8; 100], &mut sink).unwrap();
        assert_eq!(sink.boundaries(), vec![(0, 1024)]);
        assert_eq!(reassembler.pending_len(), 76);
        assert_eq!(reassembler.offset(), 1024);

        let first = &sink.chunks()[0].data;
        assert!(first[..1000].iter().all(|&b| b == 1));
        assert!(first[1000..].iter().all(|&b| b == 2));
    }

    #[test]
    fn test_exact_multiple_has_no_tail() {
        let mut reassembler = GeneralReassembler::new();
        let mut sink = RecordingSink::new();

        reassembler.feed(&[0u8; 3 * CHUNK_SIZE], &mut sink).unwrap();
        reassembler.finish(&mut sink).unwrap();

        assert_eq!(sink.chunks().len(), 3);
        assert_eq!(sink.single_calls(), 3);
        assert!(sink.batch_lens().is_empty());
    }

    #[test]
    fn test_finish_twice() {
        let mut reassembler = GeneralReassembler::new();
        let mut sink = RecordingSink::new();

        reassembler.feed(b"tail", &mut sink).unwrap();
        reassembler.finish(&mut sink).unwrap();
        reassembler.finish(&mut sink).unwrap();
        assert_eq!(sink.chunks().len(), 1);
    }
}
