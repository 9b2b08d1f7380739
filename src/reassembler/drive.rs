//! Drivers that feed a whole source through a reassembler.

use std::io::{ErrorKind, Read};

use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;

use crate::buffer::Buffer;
use crate::config::FingerprintConfig;
use crate::digest::Fingerprint;
use crate::error::FingerprintError;
use crate::sink::{ChunkSink, MerkleAccumulator};

use super::Reassembler;

/// Drives a fragment stream to completion through `reassembler` into `sink`.
///
/// The next fragment is only pulled once the previous one has been fully
/// dispatched, so a slow sink throttles the source. The stream is dropped
/// before returning on every path. Returns the number of bytes read.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use chunkprint::{reassemble_stream, GeneralReassembler, RecordingSink};
/// use futures_util::stream;
///
/// # tokio_test::block_on(async {
/// let fragments: Vec<std::io::Result<Bytes>> =
///     vec![Ok(Bytes::from(vec![0u8; 1500])), Ok(Bytes::from(vec![1u8; 600]))];
/// let mut sink = RecordingSink::new();
///
/// let total = reassemble_stream(
///     stream::iter(fragments),
///     &mut GeneralReassembler::new(),
///     &mut sink,
/// )
/// .await?;
///
/// assert_eq!(total, 2100);
/// assert_eq!(sink.boundaries(), vec![(0, 1024), (1024, 1024), (2048, 52)]);
/// # Ok::<(), chunkprint::FingerprintError>(())
/// # }).unwrap();
/// ```
pub async fn reassemble_stream<St, R, S>(
    mut stream: St,
    reassembler: &mut R,
    sink: &mut S,
) -> Result<u64, FingerprintError>
where
    St: Stream<Item = std::io::Result<Bytes>> + Unpin,
    R: Reassembler,
    S: ChunkSink + ?Sized,
{
    let mut total = 0u64;

    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        total += fragment.len() as u64;
        reassembler.feed(&fragment, sink)?;
    }

    reassembler.finish(sink)?;
    Ok(total)
}

/// Drives a blocking reader to completion through `reassembler` into `sink`.
///
/// Reads go through a pooled 64 KiB buffer. Interrupted reads are retried.
/// Returns the number of bytes read.
pub fn reassemble_reader<Rd, R, S>(
    mut reader: Rd,
    reassembler: &mut R,
    sink: &mut S,
) -> Result<u64, FingerprintError>
where
    Rd: Read,
    R: Reassembler,
    S: ChunkSink + ?Sized,
{
    let mut buffer = Buffer::take();
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        total += n as u64;
        reassembler.feed(&buffer[..n], sink)?;
    }

    reassembler.finish(sink)?;
    Ok(total)
}

/// Fingerprints a blocking reader in one shot.
///
/// No size ceiling applies here: there is no declared size to check.
///
/// # Example
///
/// ```
/// use chunkprint::{fingerprint_reader, Blake3MerkleTree, FingerprintConfig};
/// use std::io::Cursor;
///
/// let data = vec![42u8; 5000];
/// let fp = fingerprint_reader(
///     Cursor::new(&data),
///     &FingerprintConfig::default(),
///     Blake3MerkleTree::new(),
/// )?;
/// println!("{fp}");
/// # Ok::<(), chunkprint::FingerprintError>(())
/// ```
pub fn fingerprint_reader<Rd, A>(
    reader: Rd,
    config: &FingerprintConfig,
    mut accumulator: A,
) -> Result<Fingerprint, FingerprintError>
where
    Rd: Read,
    A: MerkleAccumulator,
{
    let mut reassembler = config.reassembler();
    reassemble_reader(reader, &mut reassembler, &mut accumulator)?;
    Ok(accumulator.root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReassemblerKind;
    use crate::reassembler::{GeneralReassembler, ZeroCopyBatchReassembler};
    use crate::sink::{Blake3MerkleTree, RecordingSink};
    use futures_util::stream;
    use std::io::Cursor;

    /// Yields a fixed number of bytes per read, with an interruption first.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
        interrupted: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(ErrorKind::Interrupted.into());
            }
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_reader_matches_direct_chunks() {
        let data: Vec<u8> = (0..10_000).map(|i| (i % 256) as u8).collect();
        let reader = Trickle {
            data: data.clone(),
            pos: 0,
            step: 777,
            interrupted: false,
        };

        let mut sink = RecordingSink::new();
        let total =
            reassemble_reader(reader, &mut ZeroCopyBatchReassembler::new(2048), &mut sink).unwrap();

        assert_eq!(total, 10_000);
        let expected: Vec<_> = data.chunks(1024).map(|c| c.to_vec()).collect();
        let actual: Vec<_> = sink.chunks().iter().map(|c| c.data.to_vec()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_reader_error_propagates() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk gone"))
            }
        }

        let mut sink = RecordingSink::new();
        let err = reassemble_reader(Broken, &mut GeneralReassembler::new(), &mut sink).unwrap_err();
        assert!(matches!(err, FingerprintError::Io(_)));
    }

    #[test]
    fn test_fingerprint_reader_variants_agree() {
        let data = vec![0x5Au8; 70_000];
        let general = FingerprintConfig::default().with_reassembler(ReassemblerKind::General);
        let batched = FingerprintConfig::default().with_batch_target_bytes(8192);

        let a = fingerprint_reader(Cursor::new(&data), &general, Blake3MerkleTree::new()).unwrap();
        let b = fingerprint_reader(Cursor::new(&data), &batched, Blake3MerkleTree::new()).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_stream_error_stops_traversal() {
        let fragments = vec![
            Ok(Bytes::from(vec![0u8; 2048])),
            Err(std::io::Error::other("connection reset")),
            Ok(Bytes::from(vec![1u8; 2048])),
        ];

        let mut sink = RecordingSink::new();
        let err = reassemble_stream(
            stream::iter(fragments),
            &mut GeneralReassembler::new(),
            &mut sink,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert_eq!(sink.chunks().len(), 2);
    }

    #[tokio::test]
    async fn test_stream_counts_bytes() {
        let fragments: Vec<std::io::Result<Bytes>> = vec![
            Ok(Bytes::new()),
            Ok(Bytes::from_static(b"abc")),
            Ok(Bytes::new()),
        ];

        let mut sink = RecordingSink::new();
        let total = reassemble_stream(
            stream::iter(fragments),
            &mut ZeroCopyBatchReassembler::new(1024),
            &mut sink,
        )
        .await
        .unwrap();

        assert_eq!(total, 3);
        assert_eq!(sink.boundaries(), vec![(0, 3)]);
    }
}
