// Shared fixtures for integration tests: scripted fragment sources and
// accumulators that can be inspected or made to fail.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use chunkprint::{
    Blake3MerkleTree, CHUNK_SIZE, ChunkSink, Fingerprint, FingerprintError, MerkleAccumulator,
    OpenSource,
};
use futures_core::Stream;

/// Deterministic test content.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + 7) as u8).collect()
}

/// Root of the reference tree over `data` split into plain chunks.
pub fn reference_root(data: &[u8]) -> Fingerprint {
    let mut tree = Blake3MerkleTree::new();
    for chunk in data.chunks(CHUNK_SIZE) {
        tree.push_chunk(chunk).unwrap();
    }
    tree.root()
}

/// Expected `(offset, length)` pairs for `len` bytes.
pub fn reference_boundaries(len: usize) -> Vec<(u64, usize)> {
    (0..len)
        .step_by(CHUNK_SIZE)
        .map(|start| (start as u64, CHUNK_SIZE.min(len - start)))
        .collect()
}

/// Splits `data` into fragments of `size` bytes.
pub fn fragments(data: &[u8], size: usize) -> Vec<Step> {
    data.chunks(size)
        .map(|c| Step::Fragment(Bytes::copy_from_slice(c)))
        .collect()
}

// ============================================================================
// Scripted fragment streams
// ============================================================================

/// One step of a scripted stream.
#[derive(Debug, Clone)]
pub enum Step {
    /// Yield this fragment.
    Fragment(Bytes),
    /// Yield an I/O error of this kind.
    Fail(io::ErrorKind),
    /// Return `Pending` once, waking immediately.
    YieldOnce,
    /// Return `Pending` forever without waking.
    Stall,
    /// Only valid as the first step: the open itself fails.
    FailOpen(io::ErrorKind),
}

/// Shared counters observed by tests.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    pub opens: Arc<AtomicUsize>,
    pub polls: Arc<AtomicUsize>,
    pub drops: Arc<AtomicUsize>,
}

impl Counters {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

/// A fragment stream that replays a script.
#[derive(Debug)]
pub struct ScriptedStream {
    steps: VecDeque<Step>,
    counters: Counters,
}

impl ScriptedStream {
    pub fn new(steps: Vec<Step>, counters: Counters) -> Self {
        Self {
            steps: steps.into(),
            counters,
        }
    }
}

impl Stream for ScriptedStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.counters.polls.fetch_add(1, Ordering::SeqCst);

        match self.steps.pop_front() {
            None => Poll::Ready(None),
            Some(Step::Fragment(bytes)) => Poll::Ready(Some(Ok(bytes))),
            Some(Step::Fail(kind)) | Some(Step::FailOpen(kind)) => {
                Poll::Ready(Some(Err(io::Error::new(kind, "scripted failure"))))
            }
            Some(Step::YieldOnce) => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Some(Step::Stall) => {
                self.steps.push_front(Step::Stall);
                Poll::Pending
            }
        }
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.counters.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Opens one queued script per attempt, then `fallback` forever.
#[derive(Debug)]
pub struct ScriptedOpener {
    scripts: Mutex<VecDeque<Vec<Step>>>,
    fallback: Vec<Step>,
    pub counters: Counters,
}

impl ScriptedOpener {
    pub fn new(fallback: Vec<Step>) -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            fallback,
            counters: Counters::default(),
        }
    }

    /// Queues a script for the next unscripted attempt.
    pub fn then(self, script: Vec<Step>) -> Self {
        self.scripts.lock().unwrap().push_back(script);
        self
    }
}

impl OpenSource for ScriptedOpener {
    type Stream = ScriptedStream;

    fn open(&self) -> impl Future<Output = io::Result<ScriptedStream>> + Send {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        let result = match script.first() {
            Some(Step::FailOpen(kind)) => Err(io::Error::new(*kind, "scripted open failure")),
            _ => Ok(ScriptedStream::new(script, self.counters.clone())),
        };
        async move { result }
    }
}

// ============================================================================
// Accumulators
// ============================================================================

/// Reference tree that rejects the chunk after `accept` successful ones.
#[derive(Debug, Default)]
pub struct FailAfter {
    accept: Option<usize>,
    tree: Blake3MerkleTree,
}

impl FailAfter {
    pub fn new(accept: Option<usize>) -> Self {
        Self {
            accept,
            tree: Blake3MerkleTree::new(),
        }
    }
}

impl ChunkSink for FailAfter {
    fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), FingerprintError> {
        match self.accept.as_mut() {
            Some(0) => return Err(FingerprintError::sink("leaf store full")),
            Some(n) => *n -= 1,
            None => {}
        }
        self.tree.push_chunk(chunk)
    }
}

impl MerkleAccumulator for FailAfter {
    fn root(&self) -> Fingerprint {
        self.tree.root()
    }
}

/// Accumulator whose chunk lengths stay visible after the handle drops it.
#[derive(Debug, Clone, Default)]
pub struct SharedLengths {
    pub lengths: Arc<Mutex<Vec<usize>>>,
    tree: Blake3MerkleTree,
}

impl SharedLengths {
    pub fn sharing(lengths: Arc<Mutex<Vec<usize>>>) -> Self {
        Self {
            lengths,
            tree: Blake3MerkleTree::new(),
        }
    }
}

impl ChunkSink for SharedLengths {
    fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), FingerprintError> {
        self.lengths.lock().unwrap().push(chunk.len());
        self.tree.push_chunk(chunk)
    }
}

impl MerkleAccumulator for SharedLengths {
    fn root(&self) -> Fingerprint {
        self.tree.root()
    }
}
