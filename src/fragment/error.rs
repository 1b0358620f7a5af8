//! Error types emitted by the fragmentation layer.
//!
//! Sequencing failures carry both the expected and the received fragment
//! position so a rejected stream can be diagnosed from the error alone.

use std::num::NonZeroUsize;

use thiserror::Error;

use super::FragmentHeader;
use crate::{error::MessageError, message::MessageType, status::ProtocolError};

/// Errors produced while collecting fragments of one logical message.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FragmentError {
    /// A fragment arrived out of order.
    #[error("expecting fragment '{expected}', got '{found}'")]
    OutOfSequence {
        /// Position the collector was waiting for.
        expected: FragmentHeader,
        /// Position carried by the rejected fragment.
        found: FragmentHeader,
    },
    /// A fragment of another message kind was offered to the series.
    #[error("expecting a {expected} fragment, got {found}")]
    TypeMismatch {
        /// Kind announced by the first fragment.
        expected: MessageType,
        /// Kind carried by the rejected fragment.
        found: MessageType,
    },
    /// A fragment was offered after the final one had been collected.
    #[error("fragment series already complete")]
    SeriesComplete,
    /// The fragment could not be decoded.
    #[error("malformed fragment: {0}")]
    Malformed(#[from] MessageError),
}

impl FragmentError {
    /// Protocol error code to report back to the peer for this failure.
    #[must_use]
    pub const fn protocol_error(&self) -> ProtocolError {
        match self {
            Self::OutOfSequence { .. } | Self::TypeMismatch { .. } | Self::SeriesComplete => {
                ProtocolError::FragmentOutOfSequence
            }
            Self::Malformed(_) => ProtocolError::LengthMismatch,
        }
    }
}

/// Errors produced while splitting outbound messages.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FragmentationError {
    /// The maximum fragment size leaves no room for payload.
    #[error("maximum fragment size {max} cannot carry the {overhead}-byte fragment headers")]
    FragmentSizeTooSmall {
        /// Requested maximum fragment size.
        max: usize,
        /// Header bytes every fragment carries.
        overhead: usize,
    },
    /// The message exceeds the limit but its kind cannot be fragmented.
    #[error("{0} message exceeds the maximum fragment size and cannot be fragmented")]
    NotFragmentable(MessageType),
    /// The fragment count does not fit the 32-bit `total` field.
    #[error("fragment count {count} overflows the 32-bit fragment header")]
    IndexOverflow {
        /// Number of fragments that would be required.
        count: usize,
    },
    /// The message to split is malformed.
    #[error(transparent)]
    Message(#[from] MessageError),
}

/// Errors produced by the keyed [`Reassembler`](crate::fragment::Reassembler).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyError {
    /// Sequencing or decoding of a fragment failed.
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    /// The reassembled message would exceed the configured size cap.
    #[error(
        "reassembled message for transaction {transaction_id} too large: {attempted} bytes \
         (limit {limit})"
    )]
    MessageTooLarge {
        /// Transaction the fragments belong to.
        transaction_id: u32,
        /// Size the message would have reached.
        attempted: usize,
        /// Configured cap.
        limit: NonZeroUsize,
    },
}
