//! Fragment sources.
//!
//! A traversal pulls fragments from a [`FragmentStream`]: any `Stream` of
//! `io::Result<Bytes>`. Streams are not restartable, so a file handle holds
//! an [`OpenSource`] that yields a fresh stream per attempt.
//!
//! - [`OpenSource`] - Opens a fresh fragment stream; closures qualify
//! - [`ReaderFragments`] - Adapts a `futures_io::AsyncRead` (feature `async-io`)

#[cfg(feature = "async-io")]
mod reader;

#[cfg(feature = "async-io")]
pub use reader::{ReaderFragments, DEFAULT_FRAGMENT_SIZE};

use std::future::Future;
use std::io;

use bytes::Bytes;
use futures_core::Stream;

/// A pull-based sequence of byte fragments of arbitrary size.
pub trait FragmentStream: Stream<Item = io::Result<Bytes>> + Unpin + Send {}

impl<T> FragmentStream for T where T: Stream<Item = io::Result<Bytes>> + Unpin + Send {}

/// Opens a fresh fragment stream over the same content.
///
/// Called once per traversal. Dropping the returned stream releases it.
///
/// Any `Fn() -> impl Future<Output = io::Result<S>>` closure is an opener:
///
/// ```
/// use bytes::Bytes;
/// use chunkprint::OpenSource;
/// use futures_util::stream;
///
/// let content = Bytes::from_static(b"hello");
/// let opener = move || {
///     let fragments: Vec<std::io::Result<Bytes>> = vec![Ok(content.clone())];
///     async move { Ok::<_, std::io::Error>(stream::iter(fragments)) }
/// };
///
/// fn assert_opener<O: OpenSource>(_: &O) {}
/// assert_opener(&opener);
/// ```
pub trait OpenSource {
    /// The stream produced by each open.
    type Stream: FragmentStream;

    /// Opens the source.
    fn open(&self) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

impl<F, Fut, St> OpenSource for F
where
    F: Fn() -> Fut,
    Fut: Future<Output = io::Result<St>> + Send,
    St: FragmentStream,
{
    type Stream = St;

    fn open(&self) -> impl Future<Output = io::Result<St>> + Send {
        self()
    }
}
