//! Configuration for fingerprinting behavior.
//!
//! This module provides types to configure how a byte stream is reassembled
//! and fingerprinted:
//!
//! - [`FingerprintConfig`] - Batch sizing, size ceiling and reassembler choice
//! - [`ReassemblerKind`] - Which reassembler variant drives a traversal
//!
//! # Example
//!
//! ```
//! use chunkprint::{FingerprintConfig, ReassemblerKind};
//!
//! // Native defaults
//! let config = FingerprintConfig::default();
//!
//! // Memory-constrained runtime
//! let config = FingerprintConfig::constrained();
//!
//! // Custom batch size, general path
//! let config = FingerprintConfig::new(16 * 1024 * 1024, u64::MAX)?
//!     .with_reassembler(ReassemblerKind::General);
//!
//! # Ok::<(), chunkprint::FingerprintError>(())
//! ```

use crate::error::FingerprintError;
use crate::reassembler::{AnyReassembler, GeneralReassembler, ZeroCopyBatchReassembler};

/// Size of every chunk handed to the accumulator, except the terminal one.
pub const CHUNK_SIZE: usize = 1024;

/// Default batch target on native runtimes (128 MiB).
pub const DEFAULT_BATCH_TARGET_BYTES: usize = 128 * 1024 * 1024;

/// Batch target for memory-constrained runtimes (10 MiB).
pub const CONSTRAINED_BATCH_TARGET_BYTES: usize = 10 * 1024 * 1024;

/// Default size ceiling on native runtimes (no practical limit).
pub const DEFAULT_MAX_FINGERPRINTABLE_BYTES: u64 = u64::MAX;

/// Size ceiling for memory-constrained runtimes (1.5 GiB).
pub const CONSTRAINED_MAX_FINGERPRINTABLE_BYTES: u64 = 1536 * 1024 * 1024;

/// Reassembler variant used for a traversal.
///
/// Both variants hand the accumulator the same chunk sequence; they differ
/// only in how much they copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReassemblerKind {
    /// Rebuilds a carry + fragment buffer per read and slices chunks from it.
    General,
    /// Fixed remainder buffer plus batched slices borrowed from each fragment.
    #[default]
    ZeroCopyBatch,
}

/// Configuration for stream fingerprinting.
///
/// The chunk size is fixed at [`CHUNK_SIZE`]. What can be tuned:
///
/// - `batch_target_bytes` - Upper bound on a single batched push. Rounded
///   down to a multiple of [`CHUNK_SIZE`] when used.
/// - `max_fingerprintable_bytes` - Declared sizes above this are rejected
///   before the source is opened.
/// - `reassembler` - Which [`ReassemblerKind`] drives the traversal.
///
/// # Example
///
/// ```
/// use chunkprint::FingerprintConfig;
///
/// let config = FingerprintConfig::default().with_batch_target_bytes(1500);
/// assert_eq!(config.effective_batch_bytes(), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FingerprintConfig {
    /// Requested batch size in bytes.
    batch_target_bytes: usize,

    /// Hard ceiling on the declared file size.
    max_fingerprintable_bytes: u64,

    /// Variant selected for traversals.
    reassembler: ReassemblerKind,
}

impl FingerprintConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::InvalidConfig`] if `batch_target_bytes` is
    /// smaller than one chunk.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkprint::FingerprintConfig;
    ///
    /// let config = FingerprintConfig::new(4096, 1 << 30)?;
    /// assert_eq!(config.batch_target_bytes(), 4096);
    /// assert!(FingerprintConfig::new(512, 1 << 30).is_err());
    /// # Ok::<(), chunkprint::FingerprintError>(())
    /// ```
    pub fn new(
        batch_target_bytes: usize,
        max_fingerprintable_bytes: u64,
    ) -> Result<Self, FingerprintError> {
        if batch_target_bytes < CHUNK_SIZE {
            return Err(FingerprintError::InvalidConfig {
                message: "batch_target_bytes must hold at least one chunk",
            });
        }

        Ok(Self {
            batch_target_bytes,
            max_fingerprintable_bytes,
            reassembler: ReassemblerKind::default(),
        })
    }

    /// Defaults for memory-constrained runtimes (10 MiB batches, 1.5 GiB ceiling).
    pub const fn constrained() -> Self {
        Self {
            batch_target_bytes: CONSTRAINED_BATCH_TARGET_BYTES,
            max_fingerprintable_bytes: CONSTRAINED_MAX_FINGERPRINTABLE_BYTES,
            reassembler: ReassemblerKind::ZeroCopyBatch,
        }
    }

    /// Sets the batch target.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`FingerprintConfig::validate`] to check it.
    pub fn with_batch_target_bytes(mut self, bytes: usize) -> Self {
        self.batch_target_bytes = bytes;
        self
    }

    /// Sets the size ceiling.
    pub fn with_max_fingerprintable_bytes(mut self, bytes: u64) -> Self {
        self.max_fingerprintable_bytes = bytes;
        self
    }

    /// Selects the reassembler variant.
    pub fn with_reassembler(mut self, kind: ReassemblerKind) -> Self {
        self.reassembler = kind;
        self
    }

    /// Returns the requested batch target.
    pub fn batch_target_bytes(&self) -> usize {
        self.batch_target_bytes
    }

    /// Returns the batch size actually used: the target rounded down to a
    /// multiple of [`CHUNK_SIZE`], never less than one chunk.
    pub fn effective_batch_bytes(&self) -> usize {
        (self.batch_target_bytes / CHUNK_SIZE).max(1) * CHUNK_SIZE
    }

    /// Returns the size ceiling.
    pub fn max_fingerprintable_bytes(&self) -> u64 {
        self.max_fingerprintable_bytes
    }

    /// Returns the selected reassembler variant.
    pub fn reassembler_kind(&self) -> ReassemblerKind {
        self.reassembler
    }

    /// Rejects declared sizes above the ceiling.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkprint::{FingerprintConfig, FingerprintError};
    ///
    /// let config = FingerprintConfig::default().with_max_fingerprintable_bytes(10);
    /// assert!(config.check_size(10).is_ok());
    /// assert!(matches!(
    ///     config.check_size(11),
    ///     Err(FingerprintError::FileTooLarge { declared: 11, max: 10 })
    /// ));
    /// ```
    pub fn check_size(&self, declared: u64) -> Result<(), FingerprintError> {
        if declared > self.max_fingerprintable_bytes {
            return Err(FingerprintError::FileTooLarge {
                declared,
                max: self.max_fingerprintable_bytes,
            });
        }
        Ok(())
    }

    /// Builds a fresh reassembler of the configured variant.
    pub fn reassembler(&self) -> AnyReassembler {
        match self.reassembler {
            ReassemblerKind::General => AnyReassembler::General(GeneralReassembler::new()),
            ReassemblerKind::ZeroCopyBatch => AnyReassembler::ZeroCopyBatch(
                ZeroCopyBatchReassembler::new(self.effective_batch_bytes()),
            ),
        }
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), FingerprintError> {
        Self::new(self.batch_target_bytes, self.max_fingerprintable_bytes).map(|_| ())
    }
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            batch_target_bytes: DEFAULT_BATCH_TARGET_BYTES,
            max_fingerprintable_bytes: DEFAULT_MAX_FINGERPRINTABLE_BYTES,
            reassembler: ReassemblerKind::default(),
        }
    }
}
