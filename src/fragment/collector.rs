//! Inbound state machine that folds ordered fragments into one message.
//!
//! A [`FragmentCollector`] starts from fragment zero, accepts each following
//! fragment only when its index is exactly one past the last accepted one,
//! and hands back the finished [`Message`] once the final fragment arrives.
//! The accumulator is a private [`BytesMut`]; it is frozen into a shared
//! buffer only on completion, so no other holder can observe a half-built
//! message.

use bytes::BytesMut;

use super::{CURRENT_OFFSET, FRAGMENT_OVERHEAD, FragmentError, FragmentHeader, TOTAL_OFFSET};
use crate::{
    byte_order::patch_le_u32,
    error::MessageError,
    message::{LENGTH_OFFSET, Message, MessageType},
};

/// Outcome of offering fragments to a collector.
#[derive(Debug)]
pub enum Collected {
    /// More fragments are required.
    Pending(FragmentCollector),
    /// The logical message is complete.
    Complete(Message),
}

/// Accumulates the fragments of one logical message.
///
/// # Examples
///
/// ```
/// use mbimwire::{
///     Message,
///     MessageType,
///     fragment::{Collected, FragmentCollector, split},
/// };
///
/// let command = Message::with_payload(MessageType::Command, 3, &[7; 64]).unwrap();
/// let fragments = split(&command, 48).unwrap().unwrap().to_messages().unwrap();
///
/// let mut collector = FragmentCollector::init(&fragments[0]).unwrap();
/// for fragment in &fragments[1..] {
///     collector.add(fragment).unwrap();
/// }
/// let Collected::Complete(message) = collector.try_complete() else {
///     panic!("all fragments were added");
/// };
/// assert_eq!(message.fragment_payload().unwrap(), &[7; 64]);
/// ```
#[derive(Debug)]
pub struct FragmentCollector {
    buffer: BytesMut,
    message_type: MessageType,
    total: u32,
    current: u32,
}

impl FragmentCollector {
    /// Start collecting from the first fragment of a logical message.
    ///
    /// The accumulator begins as a copy of `fragment`, headers included.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::OutOfSequence`] when `fragment` is not
    /// fragment zero, and [`FragmentError::Malformed`] when it cannot be
    /// decoded. No state is created on failure.
    ///
    /// # Panics
    ///
    /// Panics when `fragment` is not a `Command`, `CommandDone` or
    /// `Indication` message.
    pub fn init(fragment: &Message) -> Result<Self, FragmentError> {
        let found = fragment.fragment_header()?;
        if found.current() != 0 {
            return Err(FragmentError::OutOfSequence {
                expected: FragmentHeader::new(found.total(), 0),
                found,
            });
        }
        let message_type = fragment.message_type()?;
        let payload = fragment.fragment_payload()?;
        let declared = FRAGMENT_OVERHEAD + payload.len();
        Ok(Self {
            buffer: BytesMut::from(&fragment.as_bytes()[..declared]),
            message_type,
            total: found.total(),
            current: 0,
        })
    }

    /// Start collecting and immediately check for completion, which lets a
    /// single-fragment message pass straight through.
    ///
    /// # Errors
    ///
    /// See [`FragmentCollector::init`].
    ///
    /// # Panics
    ///
    /// See [`FragmentCollector::init`].
    pub fn start(fragment: &Message) -> Result<Collected, FragmentError> {
        Self::init(fragment).map(Self::try_complete)
    }

    /// Append the next fragment.
    ///
    /// On failure the accumulator is left untouched; callers are expected
    /// to discard the collector since the logical message is lost.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::OutOfSequence`] unless `fragment` carries the
    /// index following the last accepted one,
    /// [`FragmentError::TypeMismatch`] when its kind differs from the first
    /// fragment's, [`FragmentError::SeriesComplete`] when the final fragment was already
    /// collected, and [`FragmentError::Malformed`] for undecodable input.
    ///
    /// # Panics
    ///
    /// Panics when `fragment` is not a `Command`, `CommandDone` or
    /// `Indication` message.
    pub fn add(&mut self, fragment: &Message) -> Result<(), FragmentError> {
        let found = fragment.fragment_header()?;
        let found_type = fragment.message_type()?;
        if found_type != self.message_type {
            return Err(FragmentError::TypeMismatch {
                expected: self.message_type,
                found: found_type,
            });
        }
        if self.is_complete() {
            return Err(FragmentError::SeriesComplete);
        }
        let expected = self.current + 1;
        if found.current() != expected {
            return Err(FragmentError::OutOfSequence {
                expected: FragmentHeader::new(self.total, expected),
                found,
            });
        }

        let payload = fragment.fragment_payload()?;
        let size = self.buffer.len() + payload.len();
        let length = u32::try_from(size).map_err(|_| MessageError::TooLarge { length: size })?;

        self.buffer.extend_from_slice(payload);
        self.patch(LENGTH_OFFSET, length);
        self.patch(CURRENT_OFFSET, found.current());
        self.current = found.current();
        Ok(())
    }

    /// Append the next fragment and check for completion.
    ///
    /// # Errors
    ///
    /// See [`FragmentCollector::add`].
    ///
    /// # Panics
    ///
    /// See [`FragmentCollector::add`].
    pub fn push(mut self, fragment: &Message) -> Result<Collected, FragmentError> {
        self.add(fragment)?;
        Ok(self.try_complete())
    }

    /// Report whether the final fragment has been collected.
    ///
    /// Completion is judged against the fragment count announced by the
    /// first fragment.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.current.checked_add(1) == Some(self.total) }

    /// Finish the message if the final fragment has been collected.
    ///
    /// The finished message reads as a single self-contained fragment:
    /// `current = 0`, `total = 1`.
    #[must_use]
    pub fn try_complete(mut self) -> Collected {
        if !self.is_complete() {
            return Collected::Pending(self);
        }
        self.patch(CURRENT_OFFSET, 0);
        self.patch(TOTAL_OFFSET, 1);
        Collected::Complete(Message::from_raw(self.buffer.freeze()))
    }

    /// Return the message kind announced by the first fragment.
    #[must_use]
    pub const fn message_type(&self) -> MessageType { self.message_type }

    /// Return the fragment count announced by the first fragment.
    #[must_use]
    pub const fn total(&self) -> u32 { self.total }

    /// Return the index of the last accepted fragment.
    #[must_use]
    pub const fn current(&self) -> u32 { self.current }

    /// Number of bytes accumulated so far, headers included.
    #[must_use]
    pub fn len(&self) -> usize { self.buffer.len() }

    /// Report whether the accumulator is empty, which never holds for a
    /// collector built by [`FragmentCollector::init`].
    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    fn patch(&mut self, offset: usize, value: u32) {
        let patched = patch_le_u32(&mut self.buffer, offset, value);
        debug_assert!(patched, "accumulator shorter than the fragment headers");
    }
}
