//! Fixed-size chunk reassembly for byte streams.
//!
//! A reassembler turns fragments of arbitrary size into the exact sequence of
//! [`CHUNK_SIZE`](crate::CHUNK_SIZE) chunks a [`ChunkSink`] expects:
//!
//! - [`GeneralReassembler`] - Carry + fragment buffer per read
//! - [`ZeroCopyBatchReassembler`] - Fixed remainder, batched borrowed slices
//! - [`AnyReassembler`] - Either of the above, chosen from configuration
//!
//! Drivers feed a whole source through a reassembler:
//!
//! - [`reassemble_stream`] - Async, over a fragment stream
//! - [`reassemble_reader`] - Sync, over [`std::io::Read`]
//! - [`fingerprint_reader`] - Sync one-shot fingerprint of a reader

mod batched;
mod drive;
mod general;

pub use batched::ZeroCopyBatchReassembler;
pub use drive::{fingerprint_reader, reassemble_reader, reassemble_stream};
pub use general::GeneralReassembler;

use crate::error::FingerprintError;
use crate::sink::ChunkSink;

/// Converts arbitrary fragments into chunk-aligned sink calls.
///
/// For any byte sequence and any way of splitting it into fragments, every
/// implementation hands the sink the same chunk contents at the same offsets.
///
/// After a call returns an error the reassembler is in an unspecified state
/// and must be discarded.
pub trait Reassembler {
    /// Folds one fragment into chunks and dispatches every complete one.
    ///
    /// Bytes that do not yet fill a chunk are held until the next call.
    fn feed<S: ChunkSink + ?Sized>(
        &mut self,
        fragment: &[u8],
        sink: &mut S,
    ) -> Result<(), FingerprintError>;

    /// Emits the held bytes, if any, as the final short chunk.
    fn finish<S: ChunkSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), FingerprintError>;

    /// Returns the number of bytes dispatched to the sink so far.
    fn offset(&self) -> u64;

    /// Returns the number of bytes held waiting for more input.
    fn pending_len(&self) -> usize;
}

/// A reassembler of either variant.
#[derive(Debug, Clone)]
pub enum AnyReassembler {
    /// See [`GeneralReassembler`].
    General(GeneralReassembler),
    /// See [`ZeroCopyBatchReassembler`].
    ZeroCopyBatch(ZeroCopyBatchReassembler),
}

impl Reassembler for AnyReassembler {
    fn feed<S: ChunkSink + ?Sized>(
        &mut self,
        fragment: &[u8],
        sink: &mut S,
    ) -> Result<(), FingerprintError> {
        match self {
            AnyReassembler::General(r) => r.feed(fragment, sink),
            AnyReassembler::ZeroCopyBatch(r) => r.feed(fragment, sink),
        }
    }

    fn finish<S: ChunkSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), FingerprintError> {
        match self {
            AnyReassembler::General(r) => r.finish(sink),
            AnyReassembler::ZeroCopyBatch(r) => r.finish(sink),
        }
    }

    fn offset(&self) -> u64 {
        match self {
            AnyReassembler::General(r) => r.offset(),
            AnyReassembler::ZeroCopyBatch(r) => r.offset(),
        }
    }

    fn pending_len(&self) -> usize {
        match self {
            AnyReassembler::General(r) => r.pending_len(),
            AnyReassembler::ZeroCopyBatch(r) => r.pending_len(),
        }
    }
}

impl From<GeneralReassembler> for AnyReassembler {
    fn from(r: GeneralReassembler) -> Self {
        AnyReassembler::General(r)
    }
}

impl From<ZeroCopyBatchReassembler> for AnyReassembler {
    fn from(r: ZeroCopyBatchReassembler) -> Self {
        AnyReassembler::ZeroCopyBatch(r)
    }
}
