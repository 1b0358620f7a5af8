//! Framing codec cutting MBIM messages out of a byte stream.
//!
//! MBIM messages are self-delimiting: the common header declares the total
//! length of the message. [`MessageCodec`] waits for that header, checks the
//! declared length against the negotiated maximum transfer size and splits
//! exactly one message off the read buffer without copying. Logical messages
//! larger than one transfer arrive as fragments; feed decoded frames to a
//! [`Reassembler`](crate::fragment::Reassembler) to rebuild them. Outbound messages larger than
//! the maximum transfer are written as a run of fragments produced by the
//! [`Fragmenter`].
//!
//! # Error Handling
//!
//! Failures are reported as [`CodecError`] converted to [`io::Error`], as
//! `tokio_util` requires. See the [`error`] module for the categories.

use std::{io, num::NonZeroUsize};

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

use crate::{
    byte_order::read_le_u32,
    fragment::{FragmentationConfig, FragmentationError, Fragmenter},
    message::{HEADER_SIZE, LENGTH_OFFSET, Message},
    metrics::{self, Direction},
};

pub mod error;

pub use error::{CodecError, EofError, FramingError};

/// `tokio_util` codec for whole MBIM messages.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use mbimwire::{Message, codec::MessageCodec};
/// use tokio_util::codec::{Decoder, Encoder};
///
/// let mut codec = MessageCodec::default();
/// let mut buf = BytesMut::new();
/// codec.encode(Message::close(5), &mut buf).unwrap();
///
/// let decoded = codec.decode(&mut buf).unwrap().expect("a whole message");
/// assert_eq!(decoded, Message::close(5));
/// assert!(buf.is_empty());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MessageCodec {
    fragmenter: Fragmenter,
}

impl MessageCodec {
    /// Construct a codec using the transfer size in `config`.
    #[must_use]
    pub fn new(config: FragmentationConfig) -> Self {
        Self {
            fragmenter: Fragmenter::new(config.max_fragment_size),
        }
    }

    /// Return the largest message or fragment read or written in one piece.
    #[must_use]
    pub fn max_fragment_size(&self) -> NonZeroUsize { self.fragmenter.max_fragment_size() }

    fn declared_length(&self, src: &BytesMut) -> Result<Option<usize>, CodecError> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }
        let Some(declared) = read_le_u32(src, LENGTH_OFFSET) else {
            return Ok(None);
        };
        let length = declared as usize;
        if length < HEADER_SIZE {
            return Err(FramingError::UndersizedFrame {
                declared,
                minimum: HEADER_SIZE,
            }
            .into());
        }
        let max = self.max_fragment_size().get();
        if length > max {
            return Err(FramingError::OversizedFrame { declared, max }.into());
        }
        Ok(Some(length))
    }
}

impl Default for MessageCodec {
    fn default() -> Self { Self::new(FragmentationConfig::default()) }
}

impl Decoder for MessageCodec {
    type Item = Message;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let length = match self.declared_length(src) {
            Ok(Some(length)) => length,
            Ok(None) => return Ok(None),
            Err(err) => {
                debug!(error = %err, kind = err.error_type(), "rejecting inbound frame");
                return Err(err.into());
            }
        };
        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let frame = src.split_to(length).freeze();
        Message::parse(frame).map(Some).map_err(|err| {
            debug!(error = %err, "rejecting inbound message");
            CodecError::from(err).into()
        })
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        match self.decode(src)? {
            Some(message) => Ok(Some(message)),
            None => Err(CodecError::Eof(build_eof_error(src)).into()),
        }
    }
}

/// Describe where in a message the stream ended.
fn build_eof_error(src: &BytesMut) -> EofError {
    match read_le_u32(src, LENGTH_OFFSET).filter(|_| src.len() >= HEADER_SIZE) {
        Some(expected) => EofError::MidFrame {
            bytes_received: src.len(),
            expected: expected as usize,
        },
        None => EofError::MidHeader {
            bytes_received: src.len(),
            header_size: HEADER_SIZE,
        },
    }
}

impl Encoder<Message> for MessageCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if let Err(err) = item.validate() {
            debug!(error = %err, "refusing to write malformed message");
            return Err(CodecError::from(FragmentationError::from(err)).into());
        }
        match self.fragmenter.split(&item).map_err(CodecError::from)? {
            None => dst.extend_from_slice(item.raw().map_err(CodecError::from)?),
            Some(batch) => {
                trace!(
                    transaction_id = item.transaction_id().unwrap_or_default(),
                    fragments = batch.len(),
                    max_fragment_size = self.fragmenter.max_fragment_size().get(),
                    "writing fragmented message"
                );
                batch.write_to(dst);
                metrics::inc_fragments(Direction::Outbound, batch.len() as u64);
            }
        }
        Ok(())
    }
}
