//! Memoized fingerprint and file key computation for one file.
//!
//! [`FileHandle`] owns the source opener and runs at most one traversal at a
//! time. Callers arriving while a traversal runs wait for its outcome,
//! success or failure. The first success is cached; failures are not, so a
//! later call opens the source again.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use chunkprint::{FileHandle, FingerprintConfig};
//! use futures_util::stream;
//!
//! # tokio_test::block_on(async {
//! let content = Bytes::from(vec![7u8; 1800]);
//! let opener = {
//!     let content = content.clone();
//!     move || {
//!         let fragments: Vec<std::io::Result<Bytes>> = vec![Ok(content.clone())];
//!         async move { Ok::<_, std::io::Error>(stream::iter(fragments)) }
//!     }
//! };
//!
//! let handle = FileHandle::new(opener, content.len() as u64, FingerprintConfig::default());
//! let fingerprint = handle.fingerprint().await?;
//! let key = handle.compute_file_key(&b"owner"[..], vec![0u8; 32], &b"a.txt"[..]).await?;
//!
//! assert_eq!(handle.cached_fingerprint(), Some(fingerprint));
//! assert_eq!(handle.cached_file_key(), Some(key));
//! # Ok::<(), chunkprint::FingerprintError>(())
//! # }).unwrap();
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use async_lock::{Mutex, OnceCell};
use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::FingerprintConfig;
use crate::digest::{FileKey, Fingerprint};
use crate::error::FingerprintError;
use crate::key::{Blake3KeyHasher, FileKeyParams, KeyHasher, derive_file_key};
use crate::reassembler::reassemble_stream;
use crate::sink::{Blake3MerkleTree, MerkleAccumulator};
use crate::source::OpenSource;

type AccumulatorFactory<A> = Box<dyn Fn() -> A + Send + Sync>;

/// Fingerprint and file key for one file, each computed at most once.
///
/// - [`FileHandle::fingerprint`] checks the declared size, opens the source,
///   reassembles it into chunks, and caches the accumulator root. Concurrent
///   first callers share one traversal.
/// - [`FileHandle::compute_file_key`] derives the key from the fingerprint.
///
/// Callers waiting on a traversal that fails all receive its error. A failed
/// or cancelled traversal leaves nothing cached; the next call opens the
/// source again.
pub struct FileHandle<O, A = Blake3MerkleTree> {
    opener: O,
    declared_size: u64,
    config: FingerprintConfig,
    new_accumulator: AccumulatorFactory<A>,
    key_hasher: Box<dyn KeyHasher + Send + Sync>,
    fingerprint: OnceCell<Fingerprint>,
    /// Locked for the duration of a traversal; holds the last failure.
    in_flight: Mutex<Option<FingerprintError>>,
    /// Number of traversals that have failed so far.
    failed_attempts: AtomicU64,
    file_key: OnceCell<(FileKeyParams, FileKey)>,
}

impl<O: OpenSource> FileHandle<O> {
    /// Creates a handle using the BLAKE3 reference accumulator and key hasher.
    pub fn new(opener: O, declared_size: u64, config: FingerprintConfig) -> Self {
        Self::with_accumulator(opener, declared_size, config, Blake3MerkleTree::new)
    }
}

impl<O: OpenSource, A: MerkleAccumulator> FileHandle<O, A> {
    /// Creates a handle that builds a fresh accumulator per traversal.
    pub fn with_accumulator(
        opener: O,
        declared_size: u64,
        config: FingerprintConfig,
        new_accumulator: impl Fn() -> A + Send + Sync + 'static,
    ) -> Self {
        Self {
            opener,
            declared_size,
            config,
            new_accumulator: Box::new(new_accumulator),
            key_hasher: Box::new(Blake3KeyHasher),
            fingerprint: OnceCell::new(),
            in_flight: Mutex::new(None),
            failed_attempts: AtomicU64::new(0),
            file_key: OnceCell::new(),
        }
    }

    /// Replaces the key hasher used by [`FileHandle::compute_file_key`].
    pub fn with_key_hasher(mut self, hasher: impl KeyHasher + Send + Sync + 'static) -> Self {
        self.key_hasher = Box::new(hasher);
        self
    }

    /// Returns the size the caller declared for this file.
    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Returns the fingerprint if one has been computed.
    pub fn cached_fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint.get().copied()
    }

    /// Returns the first file key computed, if any.
    pub fn cached_file_key(&self) -> Option<FileKey> {
        self.file_key.get().map(|(_, key)| *key)
    }

    /// Returns the file fingerprint, computing it on first use.
    ///
    /// Later calls return the cached value without touching the source.
    /// Concurrent callers share one traversal: if it fails, each of them
    /// gets the same error and none of them retries.
    ///
    /// # Errors
    ///
    /// - [`FingerprintError::FileTooLarge`] if the declared size exceeds the
    ///   ceiling. The source is not opened.
    /// - [`FingerprintError::Io`] if opening or reading the source fails.
    /// - [`FingerprintError::Sink`] if the accumulator rejects a chunk.
    pub async fn fingerprint(&self) -> Result<Fingerprint, FingerprintError> {
        if let Some(fingerprint) = self.fingerprint.get() {
            return Ok(*fingerprint);
        }

        let seen = self.failed_attempts.load(Ordering::SeqCst);
        let mut last_failure = self.in_flight.lock().await;

        // A traversal completed while this caller waited for the lock.
        if let Some(fingerprint) = self.fingerprint.get() {
            return Ok(*fingerprint);
        }
        if self.failed_attempts.load(Ordering::SeqCst) != seen {
            if let Some(e) = last_failure.as_ref() {
                return Err(e.clone());
            }
        }

        match self.traverse().await {
            Ok(fingerprint) => {
                *last_failure = None;
                Ok(*self.fingerprint.get_or_init(|| async { fingerprint }).await)
            }
            Err(e) => {
                *last_failure = Some(e.clone());
                self.failed_attempts.fetch_add(1, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Returns the file key for the given storage coordinates.
    ///
    /// Computes the fingerprint first if needed. The key for the first set of
    /// coordinates is cached; other coordinates are derived on each call from
    /// the cached fingerprint.
    pub async fn compute_file_key(
        &self,
        owner: impl Into<Bytes>,
        bucket_id: impl Into<Bytes>,
        location: impl Into<Bytes>,
    ) -> Result<FileKey, FingerprintError> {
        let params = FileKeyParams::new(owner, bucket_id, location);
        if let Some((cached, key)) = self.file_key.get() {
            if *cached == params {
                return Ok(*key);
            }
        }

        let fingerprint = self.fingerprint().await?;
        let key = derive_file_key(
            &params,
            self.declared_size,
            &fingerprint,
            self.key_hasher.as_ref(),
        );
        debug!(file_key = %key, "file key derived");

        self.file_key.get_or_init(|| async { (params, key) }).await;
        Ok(key)
    }

    async fn traverse(&self) -> Result<Fingerprint, FingerprintError> {
        if let Err(e) = self.config.check_size(self.declared_size) {
            warn!(declared_size = self.declared_size, error = %e, "refusing to fingerprint");
            return Err(e);
        }

        debug!(
            declared_size = self.declared_size,
            reassembler = ?self.config.reassembler_kind(),
            "starting fingerprint traversal"
        );

        match self.run_traversal().await {
            Ok((bytes, fingerprint)) => {
                debug!(bytes, fingerprint = %fingerprint, "fingerprint computed");
                Ok(fingerprint)
            }
            Err(e) => {
                warn!(error = %e, "fingerprint traversal failed");
                Err(e)
            }
        }
    }

    async fn run_traversal(&self) -> Result<(u64, Fingerprint), FingerprintError> {
        let stream = self.opener.open().await?;
        let mut accumulator = (self.new_accumulator)();
        let mut reassembler = self.config.reassembler();

        let bytes = reassemble_stream(stream, &mut reassembler, &mut accumulator).await?;
        Ok((bytes, accumulator.root()))
    }
}

impl<O, A> fmt::Debug for FileHandle<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("declared_size", &self.declared_size)
            .field("config", &self.config)
            .field("fingerprint", &self.fingerprint.get())
            .finish_non_exhaustive()
    }
}
