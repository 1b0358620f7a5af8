//! Inbound helper that stitches fragments back into complete messages.
//!
//! [`Reassembler`] mirrors the outbound [`Fragmenter`](crate::fragment::Fragmenter)
//! by keeping one [`FragmentCollector`] per message kind and transaction id,
//! since host responses and device indications number their transactions
//! independently. It passes
//! messages that carry no fragment header straight through, guards against
//! unbounded allocation with a configurable cap, and purges stale partial
//! assemblies after a fixed timeout. The helper is transport-agnostic so the
//! codec and tests can drive it without depending on socket types.

use std::{
    collections::HashMap,
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use tracing::debug;

use super::{Collected, FragmentCollector, FragmentError, FragmentationConfig, ReassemblyError};
use crate::{
    message::{Message, MessageType},
    metrics::{self, Direction, DropReason},
};

/// Series identity: indications and command responses may share an id.
type SeriesKey = (MessageType, u32);

#[derive(Debug)]
struct PartialMessage {
    collector: FragmentCollector,
    started_at: Instant,
}

/// Stateful fragment re-assembler with timeout-based eviction.
///
/// # Examples
///
/// ```
/// use std::{num::NonZeroUsize, time::Duration};
///
/// use mbimwire::{
///     Message,
///     MessageType,
///     fragment::{Reassembler, split},
/// };
///
/// let indication = Message::with_payload(MessageType::Indication, 0, &[1; 90]).unwrap();
/// let fragments = split(&indication, 64).unwrap().unwrap().to_messages().unwrap();
///
/// let mut reassembler =
///     Reassembler::new(NonZeroUsize::new(1024).unwrap(), Duration::from_secs(5));
/// let mut complete = None;
/// for fragment in fragments {
///     complete = reassembler.push(fragment).unwrap();
/// }
/// assert_eq!(complete.unwrap().fragment_payload().unwrap(), &[1; 90]);
/// assert_eq!(reassembler.buffered_len(), 0);
/// ```
#[derive(Debug)]
pub struct Reassembler {
    max_message_size: NonZeroUsize,
    timeout: Duration,
    buffers: HashMap<SeriesKey, PartialMessage>,
}

impl Reassembler {
    /// Create a re-assembler that caps reconstructed messages at
    /// `max_message_size` bytes, headers included.
    #[must_use]
    pub fn new(max_message_size: NonZeroUsize, timeout: Duration) -> Self {
        Self {
            max_message_size,
            timeout,
            buffers: HashMap::new(),
        }
    }

    /// Create a re-assembler from the limits in `config`.
    #[must_use]
    pub fn from_config(config: FragmentationConfig) -> Self {
        Self::new(config.max_message_size, config.reassembly_timeout)
    }

    /// Process a message using the current time.
    ///
    /// Returns `Ok(Some(_))` when the message is complete, either because it
    /// carries no fragment header or because it was the final fragment, and
    /// `Ok(None)` while more fragments are required.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError`] when a fragment arrives out of order, is
    /// malformed, or would push the reconstructed message beyond the
    /// configured limit. The partial message for that transaction is
    /// discarded.
    pub fn push(&mut self, message: Message) -> Result<Option<Message>, ReassemblyError> {
        self.push_at(message, Instant::now())
    }

    /// Process a message using an explicit clock reading.
    ///
    /// Accepting an explicit `now` keeps eviction deterministic in tests and
    /// lets callers co-ordinate sweeps with their own timers.
    ///
    /// # Errors
    ///
    /// See [`Reassembler::push`].
    pub fn push_at(
        &mut self,
        message: Message,
        now: Instant,
    ) -> Result<Option<Message>, ReassemblyError> {
        self.purge_expired_at(now);

        let header = message.header().map_err(FragmentError::from)?;
        if !header.message_type().is_fragment() {
            return Ok(Some(message));
        }
        let transaction_id = header.transaction_id();
        let key = (header.message_type(), transaction_id);

        let (collector, started_at) = match self.buffers.remove(&key) {
            Some(mut partial) => {
                if let Err(err) = partial.collector.add(&message) {
                    debug!(transaction_id, error = %err, "dropping partial message");
                    metrics::inc_dropped(match err {
                        FragmentError::Malformed(_) => DropReason::Malformed,
                        FragmentError::OutOfSequence { .. }
                        | FragmentError::TypeMismatch { .. }
                        | FragmentError::SeriesComplete => DropReason::Sequence,
                    });
                    return Err(err.into());
                }
                (partial.collector, partial.started_at)
            }
            None => (FragmentCollector::init(&message)?, now),
        };
        metrics::inc_fragments(Direction::Inbound, 1);

        let attempted = collector.len();
        if attempted > self.max_message_size.get() {
            debug!(
                transaction_id,
                attempted,
                limit = self.max_message_size.get(),
                "dropping oversized partial message"
            );
            metrics::inc_dropped(DropReason::Oversized);
            return Err(ReassemblyError::MessageTooLarge {
                transaction_id,
                attempted,
                limit: self.max_message_size,
            });
        }

        let total = collector.total();
        match collector.try_complete() {
            Collected::Complete(message) => {
                if total > 1 {
                    metrics::inc_reassembled();
                }
                Ok(Some(message))
            }
            Collected::Pending(collector) => {
                self.buffers.insert(
                    key,
                    PartialMessage {
                        collector,
                        started_at,
                    },
                );
                Ok(None)
            }
        }
    }

    /// Remove any partial messages that exceeded the configured timeout.
    ///
    /// Returns the transaction ids of messages that were evicted.
    pub fn purge_expired(&mut self) -> Vec<u32> { self.purge_expired_at(Instant::now()) }

    /// Remove any partial messages that exceeded the configured timeout using
    /// an explicit clock reading.
    ///
    /// Returns the transaction ids of messages that were evicted.
    pub fn purge_expired_at(&mut self, now: Instant) -> Vec<u32> {
        let mut evicted = Vec::new();
        let timeout = self.timeout;

        self.buffers.retain(|&(message_type, transaction_id), partial| {
            let expired = now.saturating_duration_since(partial.started_at) >= timeout;
            if expired {
                debug!(
                    %message_type,
                    transaction_id,
                    received = partial.collector.current() + 1,
                    total = partial.collector.total(),
                    "evicting stale partial message"
                );
                metrics::inc_dropped(DropReason::Expired);
                evicted.push(transaction_id);
            }
            !expired
        });

        evicted
    }

    /// Number of partial messages currently buffered.
    #[must_use]
    pub fn buffered_len(&self) -> usize { self.buffers.len() }
}
