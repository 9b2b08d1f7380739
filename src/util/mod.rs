//! Internal utility functions and helpers.
//!
//! This module contains small helper functions used throughout the crate.
//! It is an implementation detail and not part of the public API.

use bytes::Bytes;

/// Combines held bytes and a new fragment into one contiguous buffer.
///
/// Used by the general reassembler to rebuild its working buffer per read.
pub(crate) fn combine_bytes(a: &Bytes, b: &[u8]) -> Bytes {
    let mut combined = Vec::with_capacity(a.len() + b.len());
    combined.extend_from_slice(a);
    combined.extend_from_slice(b);
    Bytes::from(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_bytes() {
        let combined = combine_bytes(&Bytes::from_static(b"carry"), b"+new");
        assert_eq!(&combined[..], b"carry+new");
        assert!(combine_bytes(&Bytes::new(), b"").is_empty());
    }
}
