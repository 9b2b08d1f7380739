//! Internal read buffer management.
//!
//! This module provides a thread-local pool of fixed-size read buffers so
//! repeated blocking traversals do not reallocate. It is an implementation
//! detail and not part of the public API.

mod pool;

pub(crate) use pool::Buffer;
