//! Decode errors raised while reading messages.
//!
//! [`MessageError`] covers malformed input (short buffers, inconsistent length
//! fields, unknown type codes) and the accessor type checks. It also carries
//! the status and protocol error codes decoded from response bodies, which
//! describe device-level failures rather than failures of this crate.

use thiserror::Error;

use crate::{
    message::MessageType,
    status::{ProtocolError, StatusError},
};

/// Errors produced while reading or building a [`Message`](crate::Message).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    /// The message buffer holds no bytes at all.
    #[error("message is empty")]
    Empty,
    /// The buffer ends before a field the message layout requires.
    #[error("message truncated: need {needed} bytes, have {actual}")]
    Truncated {
        /// Bytes required to read the field.
        needed: usize,
        /// Bytes available in the buffer.
        actual: usize,
    },
    /// The declared length disagrees with the number of bytes received.
    #[error("message length mismatch: header declares {declared} bytes, buffer holds {actual}")]
    LengthMismatch {
        /// Length carried in the message header.
        declared: u32,
        /// Length of the buffer.
        actual: usize,
    },
    /// The declared length is too small to hold the fragment headers.
    #[error("fragment payload underflow: declared length {declared} is below {minimum}")]
    PayloadUnderflow {
        /// Length carried in the message header.
        declared: u32,
        /// Combined size of the message and fragment headers.
        minimum: usize,
    },
    /// The message would not fit the 32-bit length field.
    #[error("message too large: {length} bytes exceed the 32-bit length field")]
    TooLarge {
        /// Size of the message that was requested.
        length: usize,
    },
    /// The header carries a type code outside the protocol's enumeration.
    #[error("unknown message type 0x{0:08x}")]
    UnknownType(u32),
    /// A typed accessor was used on a message of a different kind.
    #[error("unexpected message type: expected {expected}, found {found}")]
    UnexpectedType {
        /// Kind the accessor reads.
        expected: MessageType,
        /// Kind carried by the message.
        found: MessageType,
    },
    /// A fragmented body was requested for a message kind without one.
    #[error("{0} messages do not carry a fragment header")]
    NotFragment(MessageType),
    /// A fragment header violates `current < total`.
    #[error("invalid fragment header: current {current}, total {total}")]
    InvalidFragmentHeader {
        /// Index carried by the fragment.
        current: u32,
        /// Fragment count carried by the fragment.
        total: u32,
    },
    /// An `OpenDone` or `CloseDone` response reported a non-zero status.
    #[error("{0}")]
    Status(StatusError),
    /// A `HostError` or `FunctionError` message reported a protocol failure.
    #[error("MBIM protocol error: {0}")]
    Protocol(ProtocolError),
}

impl MessageError {
    /// Protocol error code a host should report back when rejecting the input.
    ///
    /// Returns `None` for failures that came from the peer itself.
    #[must_use]
    pub const fn protocol_error(&self) -> Option<ProtocolError> {
        match self {
            Self::Empty
            | Self::Truncated { .. }
            | Self::LengthMismatch { .. }
            | Self::PayloadUnderflow { .. }
            | Self::TooLarge { .. } => Some(ProtocolError::LengthMismatch),
            Self::UnknownType(_)
            | Self::UnexpectedType { .. }
            | Self::NotFragment(_)
            | Self::InvalidFragmentHeader { .. } => Some(ProtocolError::Unknown),
            Self::Status(_) | Self::Protocol(_) => None,
        }
    }
}
