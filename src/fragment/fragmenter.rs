//! Outbound helper that splits oversized messages into transport fragments.
//!
//! [`Fragmenter`] cuts the payload of a `Command`, `CommandDone` or
//! `Indication` message into contiguous slices so that every fragment,
//! headers included, fits within the transport's maximum transfer size. The
//! fragments borrow the original message's buffer; nothing is copied until a
//! fragment is written out.

use std::num::NonZeroUsize;

use bytes::{BufMut, BytesMut};

use super::{FRAGMENT_OVERHEAD, FragmentHeader, FragmentationError};
use crate::{
    error::MessageError,
    message::{Message, MessageHeader},
};

/// Splits messages into fragments no larger than a fixed size.
#[derive(Clone, Copy, Debug)]
pub struct Fragmenter {
    max_fragment_size: NonZeroUsize,
}

impl Fragmenter {
    /// Create a fragmenter that caps whole fragments at `max_fragment_size`
    /// bytes.
    #[must_use]
    pub const fn new(max_fragment_size: NonZeroUsize) -> Self { Self { max_fragment_size } }

    /// Return the maximum fragment size in bytes, headers included.
    #[must_use]
    pub const fn max_fragment_size(&self) -> NonZeroUsize { self.max_fragment_size }

    /// Split `message` into fragments.
    ///
    /// Returns `Ok(None)` when the message already fits in one transfer and
    /// should be sent whole.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::FragmentSizeTooSmall`] when the limit
    /// cannot hold the fragment headers,
    /// [`FragmentationError::NotFragmentable`] for oversized messages of
    /// other kinds, [`FragmentationError::IndexOverflow`] when more than
    /// `u32::MAX` fragments would be needed, and
    /// [`FragmentationError::Message`] for malformed input.
    pub fn split<'a>(
        &self,
        message: &'a Message,
    ) -> Result<Option<FragmentBatch<'a>>, FragmentationError> {
        let max = self.max_fragment_size.get();
        let header = message.header()?;
        if header.length() as usize <= max {
            return Ok(None);
        }

        let capacity = max
            .checked_sub(FRAGMENT_OVERHEAD)
            .filter(|capacity| *capacity > 0)
            .ok_or(FragmentationError::FragmentSizeTooSmall {
                max,
                overhead: FRAGMENT_OVERHEAD,
            })?;
        if !header.message_type().is_fragment() {
            return Err(FragmentationError::NotFragmentable(header.message_type()));
        }

        let payload = message.fragment_payload()?;
        let count = payload.len().div_ceil(capacity);
        let total = u32::try_from(count).map_err(|_| FragmentationError::IndexOverflow { count })?;

        let mut fragments = Vec::with_capacity(count);
        let mut remaining = payload;
        for current in 0..total {
            let (chunk, rest) = remaining.split_at(remaining.len().min(capacity));
            let size = FRAGMENT_OVERHEAD + chunk.len();
            let length =
                u32::try_from(size).map_err(|_| MessageError::TooLarge { length: size })?;
            fragments.push(FragmentInfo {
                header: MessageHeader::new(
                    header.message_type(),
                    length,
                    header.transaction_id(),
                ),
                fragment: FragmentHeader::new(total, current),
                payload: chunk,
            });
            remaining = rest;
        }
        debug_assert!(
            remaining.is_empty(),
            "fragment walker left {} payload bytes unsent",
            remaining.len()
        );

        Ok(Some(FragmentBatch::new(fragments)))
    }
}

/// Split `message` into fragments of at most `max_fragment_size` bytes.
///
/// Free-function form of [`Fragmenter::split`].
///
/// # Errors
///
/// See [`Fragmenter::split`]; a zero limit is reported as
/// [`FragmentationError::FragmentSizeTooSmall`].
///
/// # Examples
///
/// ```
/// use mbimwire::{Message, MessageType, fragment::split};
///
/// let command = Message::with_payload(MessageType::Command, 9, &[0xab; 100]).unwrap();
/// let batch = split(&command, 40).unwrap().expect("message exceeds the limit");
/// let sizes: Vec<usize> = batch.iter().map(|fragment| fragment.payload().len()).collect();
/// assert_eq!(sizes, [20, 20, 20, 20, 20]);
/// ```
pub fn split(
    message: &Message,
    max_fragment_size: usize,
) -> Result<Option<FragmentBatch<'_>>, FragmentationError> {
    let max = NonZeroUsize::new(max_fragment_size).ok_or(
        FragmentationError::FragmentSizeTooSmall {
            max: max_fragment_size,
            overhead: FRAGMENT_OVERHEAD,
        },
    )?;
    Fragmenter::new(max).split(message)
}

/// Headers and borrowed payload slice of a single outbound fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentInfo<'a> {
    header: MessageHeader,
    fragment: FragmentHeader,
    payload: &'a [u8],
}

impl<'a> FragmentInfo<'a> {
    /// Return the common header of this fragment.
    #[must_use]
    pub const fn header(&self) -> MessageHeader { self.header }

    /// Return the fragment header.
    #[must_use]
    pub const fn fragment(&self) -> FragmentHeader { self.fragment }

    /// Borrow the payload slice carried by this fragment.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] { self.payload }

    /// Size of the encoded fragment in bytes.
    #[must_use]
    pub const fn encoded_len(&self) -> usize { FRAGMENT_OVERHEAD + self.payload.len() }

    /// Append the encoded fragment to `dst`.
    pub fn write_to(&self, dst: &mut BytesMut) {
        dst.reserve(self.encoded_len());
        self.header.encode(dst);
        self.fragment.encode(dst);
        dst.put_slice(self.payload);
    }

    /// Copy the fragment into an owned [`Message`].
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::TooLarge`] if the fragment does not fit the
    /// length field, which cannot happen for fragments produced by
    /// [`Fragmenter::split`].
    pub fn to_message(&self) -> Result<Message, MessageError> {
        Message::from_fragment_parts(self.header, self.fragment, self.payload)
    }
}

/// Ordered fragments produced for a single logical message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentBatch<'a> {
    fragments: Vec<FragmentInfo<'a>>,
}

impl<'a> FragmentBatch<'a> {
    fn new(fragments: Vec<FragmentInfo<'a>>) -> Self {
        debug_assert!(!fragments.is_empty(), "fragment batches must not be empty");
        Self { fragments }
    }

    /// Return the fragments as a slice.
    #[must_use]
    pub fn fragments(&self) -> &[FragmentInfo<'a>] { self.fragments.as_slice() }

    /// Iterate over the fragments in transmission order.
    pub fn iter(&self) -> std::slice::Iter<'_, FragmentInfo<'a>> { self.fragments.iter() }

    /// Number of fragments in the batch.
    #[expect(
        clippy::len_without_is_empty,
        reason = "batches are guaranteed non-empty"
    )]
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// Encode every fragment, in order, into `dst`.
    pub fn write_to(&self, dst: &mut BytesMut) {
        dst.reserve(self.fragments.iter().map(FragmentInfo::encoded_len).sum());
        for fragment in &self.fragments {
            fragment.write_to(dst);
        }
    }

    /// Copy every fragment into an owned [`Message`].
    ///
    /// # Errors
    ///
    /// See [`FragmentInfo::to_message`].
    pub fn to_messages(&self) -> Result<Vec<Message>, MessageError> {
        self.fragments.iter().map(FragmentInfo::to_message).collect()
    }

    /// Consume the batch, returning all fragments.
    #[must_use]
    pub fn into_fragments(self) -> Vec<FragmentInfo<'a>> { self.fragments }
}

impl<'a> IntoIterator for FragmentBatch<'a> {
    type Item = FragmentInfo<'a>;
    type IntoIter = std::vec::IntoIter<FragmentInfo<'a>>;

    fn into_iter(self) -> Self::IntoIter { self.fragments.into_iter() }
}

impl<'b, 'a> IntoIterator for &'b FragmentBatch<'a> {
    type Item = &'b FragmentInfo<'a>;
    type IntoIter = std::slice::Iter<'b, FragmentInfo<'a>>;

    fn into_iter(self) -> Self::IntoIter { self.fragments.iter() }
}
