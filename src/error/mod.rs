//! Error types for chunkprint.

use std::fmt;
use std::sync::Arc;

/// Errors that can occur while fingerprinting a stream.
///
/// Cloning is cheap: the underlying I/O and sink errors are shared, so every
/// caller waiting on one traversal receives the same failure.
#[derive(Debug, Clone)]
pub enum FingerprintError {
    /// The byte source failed to open or to yield a fragment.
    Io(Arc<std::io::Error>),

    /// The declared size exceeds the configured ceiling.
    FileTooLarge {
        /// The size the caller declared.
        declared: u64,
        /// The configured ceiling.
        max: u64,
    },

    /// The accumulator rejected a chunk.
    Sink(Arc<dyn std::error::Error + Send + Sync>),

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl FingerprintError {
    /// Wraps an accumulator failure.
    pub fn sink(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        FingerprintError::Sink(Arc::from(err.into()))
    }
}

impl fmt::Display for FingerprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintError::Io(e) => write!(f, "stream read error: {}", e),
            FingerprintError::FileTooLarge { declared, max } => {
                write!(f, "file too large: {} bytes (max {})", declared, max)
            }
            FingerprintError::Sink(e) => write!(f, "sink error: {}", e),
            FingerprintError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for FingerprintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FingerprintError::Io(e) => Some(e.as_ref()),
            FingerprintError::Sink(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FingerprintError {
    fn from(e: std::io::Error) -> Self {
        FingerprintError::Io(Arc::new(e))
    }
}
