//! Tagged view over the kind-specific body of a message.

use super::{Message, MessageType};
use crate::{
    error::MessageError,
    fragment::FragmentHeader,
    status::{ProtocolError, StatusError},
};

/// Fragment header and payload of a `Command`, `CommandDone` or
/// `Indication` body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentBody<'a> {
    header: FragmentHeader,
    payload: &'a [u8],
}

impl<'a> FragmentBody<'a> {
    /// Return the fragment header.
    #[must_use]
    pub const fn header(&self) -> FragmentHeader { self.header }

    /// Borrow the payload bytes after the fragment header.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] { self.payload }
}

/// Decoded body of a message, one variant per message kind.
///
/// # Examples
///
/// ```
/// use mbimwire::{Message, MessageContents, StatusError};
///
/// let done = Message::open_done(1, StatusError::Busy);
/// assert_eq!(
///     done.contents(),
///     Ok(MessageContents::OpenDone { status: StatusError::Busy })
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageContents<'a> {
    Open { max_control_transfer: u32 },
    Close,
    OpenDone { status: StatusError },
    CloseDone { status: StatusError },
    HostError { error: ProtocolError },
    FunctionError { error: ProtocolError },
    Command(FragmentBody<'a>),
    CommandDone(FragmentBody<'a>),
    Indication(FragmentBody<'a>),
}

impl MessageContents<'_> {
    /// Return the message kind of this body.
    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        match self {
            Self::Open { .. } => MessageType::Open,
            Self::Close => MessageType::Close,
            Self::OpenDone { .. } => MessageType::OpenDone,
            Self::CloseDone { .. } => MessageType::CloseDone,
            Self::HostError { .. } => MessageType::HostError,
            Self::FunctionError { .. } => MessageType::FunctionError,
            Self::Command(_) => MessageType::Command,
            Self::CommandDone(_) => MessageType::CommandDone,
            Self::Indication(_) => MessageType::Indication,
        }
    }
}

impl Message {
    /// Decode the body according to the message kind.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::UnknownType`] for unknown type codes and the
    /// bounds errors of the typed accessors for short bodies.
    pub fn contents(&self) -> Result<MessageContents<'_>, MessageError> {
        let contents = match self.message_type()? {
            MessageType::Invalid => return Err(self.unknown_type()),
            MessageType::Open => MessageContents::Open {
                max_control_transfer: self.body_u32()?,
            },
            MessageType::Close => MessageContents::Close,
            MessageType::OpenDone => MessageContents::OpenDone {
                status: StatusError::from_code(self.body_u32()?),
            },
            MessageType::CloseDone => MessageContents::CloseDone {
                status: StatusError::from_code(self.body_u32()?),
            },
            MessageType::HostError => MessageContents::HostError {
                error: ProtocolError::from_code(self.body_u32()?),
            },
            MessageType::FunctionError => MessageContents::FunctionError {
                error: ProtocolError::from_code(self.body_u32()?),
            },
            MessageType::Command => MessageContents::Command(self.fragment_body()?),
            MessageType::CommandDone => MessageContents::CommandDone(self.fragment_body()?),
            MessageType::Indication => MessageContents::Indication(self.fragment_body()?),
        };
        Ok(contents)
    }

    fn fragment_body(&self) -> Result<FragmentBody<'_>, MessageError> {
        Ok(FragmentBody {
            header: self.fragment_header()?,
            payload: self.fragment_payload()?,
        })
    }
}
