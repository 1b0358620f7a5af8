//! Fragment header carried by `Command`, `CommandDone` and `Indication`
//! messages.

use bytes::{BufMut, BytesMut};
use derive_more::Display;

use crate::{byte_order::read_le_u32, error::MessageError, message::HEADER_SIZE};

/// Size in bytes of the fragment header inside fragmentable bodies.
pub const FRAGMENT_HEADER_SIZE: usize = 8;

/// Bytes every fragment spends on headers before its payload.
pub const FRAGMENT_OVERHEAD: usize = HEADER_SIZE + FRAGMENT_HEADER_SIZE;

/// Offset of the fragment count within a message.
pub(crate) const TOTAL_OFFSET: usize = HEADER_SIZE;
/// Offset of the fragment index within a message.
pub(crate) const CURRENT_OFFSET: usize = HEADER_SIZE + 4;

/// Header describing a single fragment of a `Command`, `CommandDone` or
/// `Indication` message.
///
/// `total` is the number of fragments making up the logical message and
/// `current` the zero-based position of this one. Decoded headers always
/// satisfy `current < total`.
///
/// # Examples
///
/// ```
/// use mbimwire::FragmentHeader;
/// let header = FragmentHeader::new(3, 2);
/// assert!(header.is_last());
/// assert_eq!(header.to_string(), "2/3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[display("{current}/{total}")]
pub struct FragmentHeader {
    total: u32,
    current: u32,
}

impl FragmentHeader {
    /// Create a fragment header.
    #[must_use]
    pub const fn new(total: u32, current: u32) -> Self { Self { total, current } }

    /// Header of a message sent as one self-contained fragment.
    #[must_use]
    pub const fn single() -> Self { Self::new(1, 0) }

    /// Return the number of fragments in the logical message.
    #[must_use]
    pub const fn total(&self) -> u32 { self.total }

    /// Return the zero-based index of this fragment.
    #[must_use]
    pub const fn current(&self) -> u32 { self.current }

    /// Report whether this is the final fragment.
    #[must_use]
    pub const fn is_last(&self) -> bool { self.total != 0 && self.current == self.total - 1 }

    /// Decode the fragment header of the message held in `bytes`.
    ///
    /// `bytes` is the whole message; the header is read after the common
    /// message header.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Truncated`] when the buffer ends early and
    /// [`MessageError::InvalidFragmentHeader`] when `current >= total`.
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        let (Some(total), Some(current)) = (
            read_le_u32(bytes, TOTAL_OFFSET),
            read_le_u32(bytes, CURRENT_OFFSET),
        ) else {
            return Err(MessageError::Truncated {
                needed: FRAGMENT_OVERHEAD,
                actual: bytes.len(),
            });
        };
        if current >= total {
            return Err(MessageError::InvalidFragmentHeader { current, total });
        }
        Ok(Self::new(total, current))
    }

    /// Append the encoded fragment header to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(FRAGMENT_HEADER_SIZE);
        dst.put_u32_le(self.total);
        dst.put_u32_le(self.current);
    }
}
