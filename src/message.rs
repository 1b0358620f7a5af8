//! Owned MBIM messages and their typed accessors.
//!
//! A [`Message`] wraps the raw bytes of one protocol message in a shared
//! [`Bytes`] buffer: cloning bumps a reference count and the storage is freed
//! with the last clone. Messages are immutable; the only code that grows a
//! message is the fragment collector, which keeps its accumulator private until
//! the logical message is complete.
//!
//! The body layout depends on the type field in the header. Typed accessors
//! check that field before reading, and every read is bounds-checked so
//! truncated input surfaces as [`MessageError`] instead of a panic.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    byte_order::{FIELD_SIZE, read_le_u32},
    error::MessageError,
    fragment::{FRAGMENT_OVERHEAD, FragmentHeader},
    status::{ProtocolError, StatusError},
};

mod contents;
mod header;
mod kind;
mod printable;

pub(crate) use header::LENGTH_OFFSET;
pub use contents::{FragmentBody, MessageContents};
pub use header::{HEADER_SIZE, MessageHeader};
pub use kind::MessageType;
pub use printable::Printable;

/// Offset of the first body field.
const BODY_OFFSET: usize = HEADER_SIZE;
/// Declared length of a header-only message.
const BARE_LENGTH: u32 = 12;
/// Declared length of a message with a single `u32` body field.
const FIXED_LENGTH: u32 = 16;

/// One complete MBIM message.
///
/// # Examples
///
/// ```
/// use mbimwire::{Message, MessageType};
///
/// let open = Message::open(7, 4096);
/// assert_eq!(open.message_type(), Ok(MessageType::Open));
/// assert_eq!(open.raw().map(<[u8]>::len), Ok(16));
/// assert_eq!(open.open_max_control_transfer(), Ok(4096));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    data: Bytes,
}

impl Message {
    fn with_u32_body(message_type: MessageType, transaction_id: u32, value: u32) -> Self {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + FIELD_SIZE);
        MessageHeader::new(message_type, FIXED_LENGTH, transaction_id).encode(&mut buf);
        buf.put_u32_le(value);
        Self { data: buf.freeze() }
    }

    /// Build an `Open` request announcing the largest transfer the host
    /// accepts.
    #[must_use]
    pub fn open(transaction_id: u32, max_control_transfer: u32) -> Self {
        Self::with_u32_body(MessageType::Open, transaction_id, max_control_transfer)
    }

    /// Build a `Close` request.
    #[must_use]
    pub fn close(transaction_id: u32) -> Self {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE);
        MessageHeader::new(MessageType::Close, BARE_LENGTH, transaction_id).encode(&mut buf);
        Self { data: buf.freeze() }
    }

    /// Build an `OpenDone` response.
    #[must_use]
    pub fn open_done(transaction_id: u32, status: StatusError) -> Self {
        Self::with_u32_body(MessageType::OpenDone, transaction_id, status.code())
    }

    /// Build a `CloseDone` response.
    #[must_use]
    pub fn close_done(transaction_id: u32, status: StatusError) -> Self {
        Self::with_u32_body(MessageType::CloseDone, transaction_id, status.code())
    }

    /// Build a `HostError` message reporting `error` to the device.
    #[must_use]
    pub fn host_error(transaction_id: u32, error: ProtocolError) -> Self {
        Self::with_u32_body(MessageType::HostError, transaction_id, error.code())
    }

    /// Build a `FunctionError` message as sent by the device.
    #[must_use]
    pub fn function_error(transaction_id: u32, error: ProtocolError) -> Self {
        Self::with_u32_body(MessageType::FunctionError, transaction_id, error.code())
    }

    /// Build a single-fragment `Command`, `CommandDone` or `Indication`
    /// message carrying an opaque payload.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::NotFragment`] for other message kinds and
    /// [`MessageError::TooLarge`] when the message would not fit the length
    /// field.
    pub fn with_payload(
        message_type: MessageType,
        transaction_id: u32,
        payload: &[u8],
    ) -> Result<Self, MessageError> {
        if !message_type.is_fragment() {
            return Err(MessageError::NotFragment(message_type));
        }
        Self::from_fragment_parts(
            MessageHeader::new(message_type, 0, transaction_id),
            FragmentHeader::single(),
            payload,
        )
    }

    /// Assemble a fragment-typed message; the length in `header` is
    /// recomputed from the payload.
    pub(crate) fn from_fragment_parts(
        header: MessageHeader,
        fragment: FragmentHeader,
        payload: &[u8],
    ) -> Result<Self, MessageError> {
        let size = FRAGMENT_OVERHEAD + payload.len();
        let length = u32::try_from(size).map_err(|_| MessageError::TooLarge { length: size })?;
        let mut buf = BytesMut::with_capacity(size);
        MessageHeader::new(header.message_type(), length, header.transaction_id()).encode(&mut buf);
        fragment.encode(&mut buf);
        buf.put_slice(payload);
        Ok(Self { data: buf.freeze() })
    }

    /// Wrap bytes received from the transport without inspecting them.
    ///
    /// Accessors on the result stay bounds-checked; use [`Message::parse`]
    /// to reject inconsistent input up front.
    #[must_use]
    pub fn from_raw(data: impl Into<Bytes>) -> Self { Self { data: data.into() } }

    /// Wrap and validate bytes received from the transport.
    ///
    /// # Errors
    ///
    /// Returns a [`MessageError`] when the header is missing, the type code
    /// is unknown, the declared length differs from the buffer length, or
    /// the body is too short for the message kind.
    pub fn parse(data: impl Into<Bytes>) -> Result<Self, MessageError> {
        let message = Self::from_raw(data);
        message.validate()?;
        Ok(message)
    }

    /// Check the structural invariants of the message.
    ///
    /// # Errors
    ///
    /// See [`Message::parse`].
    pub fn validate(&self) -> Result<(), MessageError> {
        let header = self.header()?;
        let Some(min_body) = header.message_type().min_body_size() else {
            return Err(self.unknown_type());
        };
        if header.length() as usize != self.data.len() {
            return Err(MessageError::LengthMismatch {
                declared: header.length(),
                actual: self.data.len(),
            });
        }
        let needed = HEADER_SIZE + min_body;
        if self.data.len() < needed {
            return Err(MessageError::Truncated {
                needed,
                actual: self.data.len(),
            });
        }
        if header.message_type().is_fragment() {
            FragmentHeader::decode(&self.data)?;
        }
        Ok(())
    }

    fn unknown_type(&self) -> MessageError {
        MessageError::UnknownType(MessageHeader::raw_type(&self.data).unwrap_or_default())
    }

    /// Decode the common header.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Empty`] or [`MessageError::Truncated`] when
    /// the buffer is shorter than the header.
    pub fn header(&self) -> Result<MessageHeader, MessageError> { MessageHeader::decode(&self.data) }

    /// Return the message kind.
    ///
    /// # Errors
    ///
    /// Fails like [`Message::header`].
    pub fn message_type(&self) -> Result<MessageType, MessageError> {
        self.header().map(|header| header.message_type())
    }

    /// Return the total length declared in the header.
    ///
    /// # Errors
    ///
    /// Fails like [`Message::header`].
    pub fn length(&self) -> Result<u32, MessageError> { self.header().map(|header| header.length()) }

    /// Return the transaction id.
    ///
    /// # Errors
    ///
    /// Fails like [`Message::header`].
    pub fn transaction_id(&self) -> Result<u32, MessageError> {
        self.header().map(|header| header.transaction_id())
    }

    /// Borrow the whole raw buffer for transmission.
    ///
    /// The returned slice always spans exactly the length declared in the
    /// header.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Empty`] when the buffer holds no bytes,
    /// [`MessageError::Truncated`] when it is shorter than the header, and
    /// [`MessageError::LengthMismatch`] when the declared length differs
    /// from the buffer length.
    pub fn raw(&self) -> Result<&[u8], MessageError> {
        let declared = self.length()?;
        if declared as usize != self.data.len() {
            return Err(MessageError::LengthMismatch {
                declared,
                actual: self.data.len(),
            });
        }
        Ok(&self.data)
    }

    /// Borrow the shared buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &Bytes { &self.data }

    /// Consume the message, returning the shared buffer.
    #[must_use]
    pub fn into_bytes(self) -> Bytes { self.data }

    /// Number of bytes in the buffer.
    #[must_use]
    pub fn len(&self) -> usize { self.data.len() }

    /// Report whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Deep-copy the message into a freshly allocated buffer.
    #[must_use]
    pub fn dup(&self) -> Self {
        Self {
            data: Bytes::copy_from_slice(&self.data),
        }
    }

    fn expect_type(&self, expected: MessageType) -> Result<(), MessageError> {
        let found = self.message_type()?;
        if found == expected {
            Ok(())
        } else {
            Err(MessageError::UnexpectedType { expected, found })
        }
    }

    fn body_u32(&self) -> Result<u32, MessageError> {
        read_le_u32(&self.data, BODY_OFFSET).ok_or(MessageError::Truncated {
            needed: BODY_OFFSET + FIELD_SIZE,
            actual: self.data.len(),
        })
    }

    /// Return the maximum control transfer carried by an `Open` request.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::UnexpectedType`] for other message kinds and
    /// [`MessageError::Truncated`] when the body is missing.
    pub fn open_max_control_transfer(&self) -> Result<u32, MessageError> {
        self.expect_type(MessageType::Open)?;
        self.body_u32()
    }

    /// Return the status code of an `OpenDone` response.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::UnexpectedType`] for other message kinds and
    /// [`MessageError::Truncated`] when the body is missing.
    pub fn open_done_status_code(&self) -> Result<StatusError, MessageError> {
        self.expect_type(MessageType::OpenDone)?;
        self.body_u32().map(StatusError::from_code)
    }

    /// Interpret an `OpenDone` response as the outcome of the open request.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Status`] when the device reported a non-zero
    /// status, or the decode errors of [`Message::open_done_status_code`].
    pub fn open_done_result(&self) -> Result<(), MessageError> {
        status_result(self.open_done_status_code()?)
    }

    /// Return the status code of a `CloseDone` response.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::UnexpectedType`] for other message kinds and
    /// [`MessageError::Truncated`] when the body is missing.
    pub fn close_done_status_code(&self) -> Result<StatusError, MessageError> {
        self.expect_type(MessageType::CloseDone)?;
        self.body_u32().map(StatusError::from_code)
    }

    /// Interpret a `CloseDone` response as the outcome of the close request.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Status`] when the device reported a non-zero
    /// status, or the decode errors of [`Message::close_done_status_code`].
    pub fn close_done_result(&self) -> Result<(), MessageError> {
        status_result(self.close_done_status_code()?)
    }

    /// Return the protocol error code of a `HostError` or `FunctionError`
    /// message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::UnexpectedType`] for other message kinds and
    /// [`MessageError::Truncated`] when the body is missing.
    pub fn error_status_code(&self) -> Result<ProtocolError, MessageError> {
        let found = self.message_type()?;
        if !found.is_error() {
            return Err(MessageError::UnexpectedType {
                expected: MessageType::FunctionError,
                found,
            });
        }
        self.body_u32().map(ProtocolError::from_code)
    }

    /// Describe the failure reported by a `HostError` or `FunctionError`
    /// message.
    ///
    /// Error messages always signal failure, so this returns
    /// [`MessageError::Protocol`] for well-formed input and the decode error
    /// otherwise.
    #[must_use]
    pub fn error(&self) -> MessageError {
        match self.error_status_code() {
            Ok(code) => MessageError::Protocol(code),
            Err(err) => err,
        }
    }

    /// Interpret a `HostError` or `FunctionError` message as an outcome.
    ///
    /// # Errors
    ///
    /// Always fails, with the error described by [`Message::error`].
    pub fn error_result(&self) -> Result<(), MessageError> { Err(self.error()) }

    /// Report whether the message kind carries a fragment header.
    #[must_use]
    pub fn is_fragment(&self) -> bool { self.message_type().is_ok_and(MessageType::is_fragment) }

    fn fragment_type(&self) -> Result<MessageType, MessageError> {
        let message_type = self.message_type()?;
        assert!(
            message_type.is_fragment(),
            "fragment accessor used on a {message_type} message"
        );
        Ok(message_type)
    }

    /// Decode the fragment header of a `Command`, `CommandDone` or
    /// `Indication` message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Truncated`] for a short buffer and
    /// [`MessageError::InvalidFragmentHeader`] when `current >= total`.
    ///
    /// # Panics
    ///
    /// Panics when the message kind carries no fragment header; check
    /// [`Message::is_fragment`] first.
    pub fn fragment_header(&self) -> Result<FragmentHeader, MessageError> {
        self.fragment_type()?;
        FragmentHeader::decode(&self.data)
    }

    /// Borrow the payload following the fragment header.
    ///
    /// The payload spans `length - 20` bytes as declared in the header.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::PayloadUnderflow`] when the declared length
    /// cannot hold both headers and [`MessageError::Truncated`] when the
    /// buffer is shorter than declared.
    ///
    /// # Panics
    ///
    /// Panics when the message kind carries no fragment header.
    pub fn fragment_payload(&self) -> Result<&[u8], MessageError> {
        self.fragment_type()?;
        let declared = self.length()?;
        let end = declared as usize;
        if end < FRAGMENT_OVERHEAD {
            return Err(MessageError::PayloadUnderflow {
                declared,
                minimum: FRAGMENT_OVERHEAD,
            });
        }
        self.data
            .get(FRAGMENT_OVERHEAD..end)
            .ok_or(MessageError::Truncated {
                needed: end,
                actual: self.data.len(),
            })
    }
}

fn status_result(status: StatusError) -> Result<(), MessageError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(MessageError::Status(status))
    }
}

impl AsRef<[u8]> for Message {
    fn as_ref(&self) -> &[u8] { &self.data }
}

impl From<Message> for Bytes {
    fn from(message: Message) -> Self { message.data }
}
