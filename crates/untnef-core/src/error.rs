//! Error types for the untnef-core library.
//!
//! Decoding distinguishes two tiers: errors that abort a decode call
//! (a missing signature, an oversized input, an unreadable file) and
//! recoverable errors raised by the inner decoders, which the message
//! decoder swallows and at most reports as warnings.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for untnef operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all untnef operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input does not start with the TNEF signature
    #[error("wrong TNEF signature")]
    NoMarker,

    /// Input exceeds the configured size bound
    #[error("input of {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge {
        /// Size of the rejected input
        size: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Not enough bytes for a fixed-size structure
    #[error("truncated input at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        /// Byte offset where the structure starts
        offset: usize,
        /// Bytes required
        needed: usize,
        /// Bytes actually available
        available: usize,
    },

    /// Malformed MAPI property list
    #[error("invalid property list at offset {offset}: {details}")]
    PropertyDecode {
        /// Byte offset where the error occurred
        offset: usize,
        /// Detailed description of the issue
        details: String,
    },

    /// Malformed compressed RTF stream
    #[error("invalid compressed RTF: {0}")]
    Rtf(String),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new truncation error
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available,
        }
    }

    /// Creates a new property list error
    pub fn property_decode(offset: usize, details: impl Into<String>) -> Self {
        Self::PropertyDecode {
            offset,
            details: details.into(),
        }
    }

    /// Creates a new compressed RTF error
    pub fn rtf(msg: impl Into<String>) -> Self {
        Self::Rtf(msg.into())
    }

    /// Returns true if this error only degrades a single field and never
    /// aborts a decode call
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. } | Self::PropertyDecode { .. } | Self::Rtf(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::property_decode(12, "unknown property type 0x0099");
        assert!(err.to_string().contains("offset 12"));
        assert!(err.to_string().contains("0x0099"));

        let err = Error::InputTooLarge { size: 10, limit: 4 };
        assert!(err.to_string().contains("limit of 4"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::property_decode(0, "test").is_recoverable());
        assert!(Error::truncated(0, 9, 3).is_recoverable());
        assert!(Error::rtf("bad magic").is_recoverable());
        assert!(!Error::NoMarker.is_recoverable());
    }

    #[test]
    fn test_file_read_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::file_read("/tmp/winmail.dat", io);
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "gone");
    }
}
