//! chunkprint
//!
//! Streaming fixed-size chunk reassembly for Merkle file fingerprinting.
//!
//! `chunkprint` turns a byte stream delivered in fragments of arbitrary size
//! into the exact sequence of 1 KiB chunks a Merkle accumulator consumes, and
//! derives from the resulting root:
//!
//! - a [`Fingerprint`] identifying the file content
//! - a [`FileKey`] identifying the file at a storage location
//!
//! The crate intentionally:
//! - does NOT open files or paths (callers hand it an opener)
//! - does NOT pick an async runtime
//! - does NOT persist chunks or keys
//!
//! Two reassemblers produce identical chunk sequences for any fragmentation:
//! [`GeneralReassembler`] copies every fragment into a fresh buffer, while
//! [`ZeroCopyBatchReassembler`] only copies bytes straddling a chunk boundary
//! and hands the rest over in large batches.
//!
//! # Sync
//!
//! ```
//! use chunkprint::{Blake3MerkleTree, FingerprintConfig, fingerprint_reader};
//!
//! let data = vec![0u8; 10_000];
//! let fingerprint = fingerprint_reader(
//!     &data[..],
//!     &FingerprintConfig::default(),
//!     Blake3MerkleTree::new(),
//! )?;
//! println!("fingerprint {}", fingerprint);
//! # Ok::<(), chunkprint::FingerprintError>(())
//! ```
//!
//! # Async
//!
//! ```
//! use bytes::Bytes;
//! use chunkprint::{FileHandle, FingerprintConfig};
//! use futures_util::stream;
//!
//! # tokio_test::block_on(async {
//! let opener = || {
//!     let fragments: Vec<std::io::Result<Bytes>> =
//!         vec![Ok(Bytes::from(vec![1u8; 700])), Ok(Bytes::from(vec![2u8; 700]))];
//!     async move { Ok::<_, std::io::Error>(stream::iter(fragments)) }
//! };
//!
//! let handle = FileHandle::new(opener, 1400, FingerprintConfig::default());
//! let fingerprint = handle.fingerprint().await?;
//! assert_eq!(handle.fingerprint().await?, fingerprint);
//! # Ok::<(), chunkprint::FingerprintError>(())
//! # }).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod digest;
mod error;
mod handle;
mod key;
mod reassembler;
mod sink;
mod source;

mod buffer; // internal (thread-local reuse)
mod hash; // internal blake3 impl
mod util;

pub use config::{
    CHUNK_SIZE, CONSTRAINED_BATCH_TARGET_BYTES, CONSTRAINED_MAX_FINGERPRINTABLE_BYTES,
    DEFAULT_BATCH_TARGET_BYTES, DEFAULT_MAX_FINGERPRINTABLE_BYTES, FingerprintConfig,
    ReassemblerKind,
};
pub use digest::{FileKey, Fingerprint};
pub use error::FingerprintError;
pub use handle::FileHandle;
pub use key::{Blake3KeyHasher, FileKeyParams, KeyHasher, derive_file_key};
pub use reassembler::{
    AnyReassembler, GeneralReassembler, Reassembler, ZeroCopyBatchReassembler, fingerprint_reader,
    reassemble_reader, reassemble_stream,
};
pub use sink::{Blake3MerkleTree, ChunkRecord, ChunkSink, MerkleAccumulator, RecordingSink};
pub use source::{FragmentStream, OpenSource};

#[cfg(feature = "async-io")]
pub use source::{DEFAULT_FRAGMENT_SIZE, ReaderFragments};
