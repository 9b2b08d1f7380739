//! Async reader adapter.
//!
//! Uses `futures_io::AsyncRead`, so it works with any runtime. Tokio readers
//! can be adapted with `tokio_util::compat`:
//!
//! ```ignore
//! use tokio_util::compat::TokioAsyncReadCompatExt;
//! use chunkprint::ReaderFragments;
//!
//! let file = tokio::fs::File::open("data.bin").await?;
//! let fragments = ReaderFragments::new(file.compat());
//! ```

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

/// Default read size (64 KiB).
pub const DEFAULT_FRAGMENT_SIZE: usize = 64 * 1024;

pin_project! {
    /// A fragment stream over an async reader.
    ///
    /// Each successful read becomes one fragment of at most the buffer size.
    /// Interrupted reads are retried; any other error ends the stream after
    /// being yielded once.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkprint::ReaderFragments;
    /// use futures_util::StreamExt;
    ///
    /// # tokio_test::block_on(async {
    /// let data = vec![1u8; 100];
    /// let mut fragments = ReaderFragments::with_fragment_size(&data[..], 64);
    ///
    /// let mut sizes = Vec::new();
    /// while let Some(fragment) = fragments.next().await {
    ///     sizes.push(fragment.unwrap().len());
    /// }
    /// assert_eq!(sizes, vec![64, 36]);
    /// # });
    /// ```
    pub struct ReaderFragments<R> {
        #[pin]
        reader: R,
        buffer: Vec<u8>,
        finished: bool,
    }
}

impl<R> ReaderFragments<R> {
    /// Wraps a reader with the default 64 KiB read size.
    pub fn new(reader: R) -> Self {
        Self::with_fragment_size(reader, DEFAULT_FRAGMENT_SIZE)
    }

    /// Wraps a reader reading at most `size` bytes per fragment.
    pub fn with_fragment_size(reader: R, size: usize) -> Self {
        Self {
            reader,
            buffer: vec![0u8; size.max(1)],
            finished: false,
        }
    }

    /// Consumes the adapter and returns the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncRead> Stream for ReaderFragments<R> {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            match this.reader.as_mut().poll_read(cx, this.buffer) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(Ok(0)) => {
                    *this.finished = true;
                    return Poll::Ready(None);
                }
                Poll::Ready(Ok(n)) => {
                    return Poll::Ready(Some(Ok(Bytes::copy_from_slice(&this.buffer[..n]))));
                }
            }
        }
    }
}
