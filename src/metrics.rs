//! Metric helpers for `mbimwire`.
//!
//! This module defines metric names and simple helper functions
//! wrapping the [`metrics`](https://docs.rs/metrics) crate. Without the
//! `metrics` feature the helpers compile to nothing.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking fragments written or accepted.
pub const FRAGMENTS_TOTAL: &str = "mbimwire_fragments_total";
/// Name of the counter tracking messages rebuilt from several fragments.
pub const REASSEMBLED_TOTAL: &str = "mbimwire_messages_reassembled_total";
/// Name of the counter tracking partial messages discarded before completion.
pub const REASSEMBLY_DROPPED_TOTAL: &str = "mbimwire_reassembly_dropped_total";

/// Direction of fragment processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Fragments received from the device.
    Inbound,
    /// Fragments written to the device.
    Outbound,
}

impl Direction {
    /// Label value recorded for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Why a partial message was discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// A fragment arrived out of order or after the last one.
    Sequence,
    /// A fragment could not be decoded.
    Malformed,
    /// The message outgrew the configured cap.
    Oversized,
    /// The reassembly timeout elapsed.
    Expired,
}

impl DropReason {
    /// Label value recorded for this reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DropReason::Sequence => "sequence",
            DropReason::Malformed => "malformed",
            DropReason::Oversized => "oversized",
            DropReason::Expired => "expired",
        }
    }
}

/// Record `count` fragments for the given direction.
pub fn inc_fragments(direction: Direction, count: u64) {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_TOTAL, "direction" => direction.as_str()).increment(count);
    #[cfg(not(feature = "metrics"))]
    let _ = (direction, count);
}

/// Record a message completed from more than one fragment.
pub fn inc_reassembled() {
    #[cfg(feature = "metrics")]
    counter!(REASSEMBLED_TOTAL).increment(1);
}

/// Record a discarded partial message.
pub fn inc_dropped(reason: DropReason) {
    #[cfg(feature = "metrics")]
    counter!(REASSEMBLY_DROPPED_TOTAL, "reason" => reason.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}
