//! Error types for the spamsum fuzzy hashing crate.
//!
//! Construction-time problems (malformed signature text, unreadable input)
//! are errors. "Not similar" and "not comparable" are expected outcomes of
//! the algorithm and are reported as a score of 0, never as an error.

use thiserror::Error;

/// Main error type for spamsum operations.
#[derive(Debug, Error)]
pub enum SpamSumError {
    /// Signature text was empty.
    #[error("signature text is empty")]
    EmptySignature,

    /// Signature text is missing one of the two ':' separators.
    #[error("signature is missing a ':' separator")]
    MissingSeparator,

    /// The block size field did not parse as a base-10 integer.
    #[error("invalid block size field: {0:?}")]
    InvalidBlockSize(String),

    /// File or stream I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for spamsum operations.
pub type Result<T> = std::result::Result<T, SpamSumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SpamSumError::EmptySignature.to_string(),
            "signature text is empty"
        );
        assert_eq!(
            SpamSumError::InvalidBlockSize("banana".to_string()).to_string(),
            "invalid block size field: \"banana\""
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SpamSumError::from(io);
        assert!(matches!(err, SpamSumError::Io(_)));
    }
}
