//! BLAKE3 primitives behind the reference accumulator and key hasher.
//!
//! - [`Blake3Hasher`] - Domain-separated leaf and parent hashing

mod blake3;

pub(crate) use blake3::Blake3Hasher;
