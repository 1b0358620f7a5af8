use bytes::{BufMut, BytesMut};

use super::MessageType;
use crate::{byte_order::read_le_u32, error::MessageError};

/// Size in bytes of the header that starts every message.
pub const HEADER_SIZE: usize = 12;

/// Offset of the message type field.
pub(crate) const TYPE_OFFSET: usize = 0;
/// Offset of the total length field.
pub(crate) const LENGTH_OFFSET: usize = 4;
/// Offset of the transaction id field.
pub(crate) const TRANSACTION_ID_OFFSET: usize = 8;

/// Common header shared by every MBIM message.
///
/// The wire layout is three little-endian `u32` fields: type, total length in
/// bytes (header included) and transaction id.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use mbimwire::{MessageHeader, MessageType};
///
/// let header = MessageHeader::new(MessageType::Close, 12, 5);
/// let mut buf = BytesMut::new();
/// header.encode(&mut buf);
/// assert_eq!(MessageHeader::decode(&buf), Ok(header));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageHeader {
    message_type: MessageType,
    length: u32,
    transaction_id: u32,
}

impl MessageHeader {
    /// Create a header.
    #[must_use]
    pub const fn new(message_type: MessageType, length: u32, transaction_id: u32) -> Self {
        Self {
            message_type,
            length,
            transaction_id,
        }
    }

    /// Return the message kind.
    #[must_use]
    pub const fn message_type(&self) -> MessageType { self.message_type }

    /// Return the declared total length of the message in bytes.
    #[must_use]
    pub const fn length(&self) -> u32 { self.length }

    /// Return the transaction id.
    #[must_use]
    pub const fn transaction_id(&self) -> u32 { self.transaction_id }

    /// Decode the header from the start of `bytes`.
    ///
    /// Unknown type codes decode to [`MessageType::Invalid`]; use
    /// [`MessageHeader::raw_type`] to recover the original value.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Empty`] for an empty slice and
    /// [`MessageError::Truncated`] when fewer than [`HEADER_SIZE`] bytes are
    /// available.
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        if bytes.is_empty() {
            return Err(MessageError::Empty);
        }
        let (Some(code), Some(length), Some(transaction_id)) = (
            read_le_u32(bytes, TYPE_OFFSET),
            read_le_u32(bytes, LENGTH_OFFSET),
            read_le_u32(bytes, TRANSACTION_ID_OFFSET),
        ) else {
            return Err(MessageError::Truncated {
                needed: HEADER_SIZE,
                actual: bytes.len(),
            });
        };
        Ok(Self::new(MessageType::from_code(code), length, transaction_id))
    }

    /// Read the raw type code at the start of `bytes`, if present.
    #[must_use]
    pub fn raw_type(bytes: &[u8]) -> Option<u32> { read_le_u32(bytes, TYPE_OFFSET) }

    /// Append the encoded header to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(HEADER_SIZE);
        dst.put_u32_le(self.message_type.code());
        dst.put_u32_le(self.length);
        dst.put_u32_le(self.transaction_id);
    }
}
