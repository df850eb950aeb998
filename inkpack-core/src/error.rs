//! Error types for inkpack

use thiserror::Error;

/// Result type alias for inkpack operations
pub type Result<T> = std::result::Result<T, InkError>;

/// inkpack error types
#[derive(Error, Debug)]
pub enum InkError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Argument outside the range the operation accepts
    #[error("{name} out of range: {value} not in {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Read attempted with no bits left in the stream
    #[error("Unexpected end of stream")]
    EndOfStream,

    /// Input ended in the middle of an encoded value
    #[error("Truncated input: {0}")]
    Truncated(String),

    /// Value does not fit the target type
    #[error("Overflow: {0}")]
    Overflow(String),

    /// Algorithm byte names a codec this crate does not implement
    #[error("Unsupported algorithm byte: {0:#04x}")]
    UnsupportedAlgorithm(u8),

    /// Invalid data format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl InkError {
    pub(crate) fn out_of_range(name: &'static str, value: impl Into<u64>, min: u64, max: u64) -> Self {
        InkError::OutOfRange {
            name,
            value: value.into(),
            min,
            max,
        }
    }

    /// Check if error indicates the input ran out
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, InkError::EndOfStream | InkError::Truncated(_))
    }
}
