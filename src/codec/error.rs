//! Error types for the stream codec.
//!
//! This module separates failures that lose frame synchronisation from
//! failures confined to a single message, so callers can decide whether a
//! connection is still usable.
//!
//! # Error Categories
//!
//! - [`FramingError`]: the declared length cannot delimit a message, so the stream position of the
//!   next message is unknown.
//! - [`EofError`]: the stream ended part-way through a message.
//! - [`CodecError`]: top-level enum wrapping the above plus message and fragmentation failures and
//!   I/O errors.
//!
//! `tokio_util` codecs speak [`io::Error`]; the conversion keeps the
//! structured error as the source.

use std::io;

use thiserror::Error;

use crate::{error::MessageError, fragment::FragmentationError};

/// Framing-level errors raised while delimiting messages.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// Declared length shorter than the common header.
    #[error("declared length {declared} is shorter than the {minimum}-byte header")]
    UndersizedFrame {
        /// Length declared by the header.
        declared: u32,
        /// Smallest valid message.
        minimum: usize,
    },

    /// Declared length above the negotiated maximum transfer size.
    #[error("declared length {declared} exceeds the maximum transfer size {max}")]
    OversizedFrame {
        /// Length declared by the header.
        declared: u32,
        /// Largest accepted transfer.
        max: usize,
    },
}

/// Premature end of stream.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EofError {
    /// EOF received before the common header was complete.
    #[error("premature EOF during header: {bytes_received} of {header_size} header bytes")]
    MidHeader {
        /// Header bytes received before EOF.
        bytes_received: usize,
        /// Size of the common header.
        header_size: usize,
    },

    /// EOF received after the header but before the declared length.
    #[error("premature EOF: {bytes_received} bytes of {expected} byte message received")]
    MidFrame {
        /// Bytes received before EOF.
        bytes_received: usize,
        /// Length declared by the header.
        expected: usize,
    },
}

/// Top-level codec error taxonomy.
///
/// # Examples
///
/// ```
/// use mbimwire::codec::{CodecError, FramingError};
///
/// let err = CodecError::Framing(FramingError::UndersizedFrame {
///     declared: 4,
///     minimum: 12,
/// });
/// assert!(err.should_disconnect());
/// assert_eq!(err.error_type(), "framing");
/// ```
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stream cannot be delimited.
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// A delimited message failed validation.
    #[error("invalid message: {0}")]
    Message(#[from] MessageError),

    /// An outbound message could not be split.
    #[error("cannot fragment message: {0}")]
    Fragmentation(#[from] FragmentationError),

    /// Transport layer I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// End-of-stream handling.
    #[error("EOF: {0}")]
    Eof(#[from] EofError),
}

impl CodecError {
    /// Returns true if the connection should be terminated.
    ///
    /// A rejected message whose boundaries were read correctly leaves the
    /// stream in sync; every other failure does not.
    #[must_use]
    pub fn should_disconnect(&self) -> bool {
        !matches!(self, Self::Message(_) | Self::Fragmentation(_))
    }

    /// Returns the error category as a string for logging.
    ///
    /// # Returns
    ///
    /// One of: `"framing"`, `"message"`, `"fragmentation"`, `"io"`, or
    /// `"eof"`.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Framing(_) => "framing",
            Self::Message(_) => "message",
            Self::Fragmentation(_) => "fragmentation",
            Self::Io(_) => "io",
            Self::Eof(_) => "eof",
        }
    }
}

impl From<CodecError> for io::Error {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io(e) => e,
            CodecError::Framing(_) | CodecError::Message(_) => {
                io::Error::new(io::ErrorKind::InvalidData, err)
            }
            CodecError::Fragmentation(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
            CodecError::Eof(_) => io::Error::new(io::ErrorKind::UnexpectedEof, err),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
