//! Crate-wide error type

use thiserror::Error;

/// Errors returned by identifier and codec operations.
///
/// All failures are immediate and synchronous; no operation retries internally or
/// returns a partial result.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// A byte buffer did not have the exact length the operation requires.
    #[error("expected exactly {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    /// A textual representation was malformed (wrong length, misplaced
    /// separators, or characters outside the expected set).
    #[error("invalid string representation: {0}")]
    Format(&'static str),

    /// A version-specific parse succeeded structurally, but the version nibble
    /// embedded in byte 6 did not match the expected version.
    #[error("expected UUID version {expected}, got version {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    /// Codec construction parameters were rejected.
    #[error("invalid codec alphabet: {0}")]
    Alphabet(&'static str),

    /// A random byte count outside the supported `1..=1024` range was requested.
    #[error("random byte count must be between 1 and 1024, got {0}")]
    RandomLength(usize),
}
