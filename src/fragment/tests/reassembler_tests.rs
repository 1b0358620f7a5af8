//! Tests for keyed reassembly ordering, limits, and eviction.

use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use tracing_test::traced_test;

use super::{fragment, typed_fragment};
use crate::{
    error::MessageError,
    fragment::{
        FRAGMENT_OVERHEAD,
        FragmentError,
        FragmentHeader,
        FragmentationConfig,
        Reassembler,
        ReassemblyError,
    },
    message::{Message, MessageType},
};

fn reassembler(max_message_size: usize) -> Reassembler {
    Reassembler::new(
        NonZeroUsize::new(max_message_size).expect("non-zero"),
        Duration::from_secs(30),
    )
}

fn setup_reassembler_with_first_fragment(transaction_id: u32, total: u32) -> Reassembler {
    let mut reassembler = reassembler(1024);
    assert!(
        reassembler
            .push(fragment(transaction_id, total, 0, b"first"))
            .expect("first fragment accepted")
            .is_none()
    );
    reassembler
}

#[test]
fn reassembler_passes_non_fragment_messages_through() {
    let mut reassembler = reassembler(64);
    let open = Message::open(1, 4096);
    assert_eq!(reassembler.push(open.clone()), Ok(Some(open)));
    assert_eq!(reassembler.buffered_len(), 0);
}

#[test]
fn reassembler_completes_single_fragment_at_max_message_size() {
    let max_message_size = FRAGMENT_OVERHEAD + 16;
    let mut reassembler = reassembler(max_message_size);

    let only = fragment(20, 1, 0, &[0; 16]);
    let assembled = reassembler
        .push(only.clone())
        .expect("fragment within limit should be accepted")
        .expect("single fragment should complete reassembly");
    assert_eq!(assembled, only);
    assert_eq!(reassembler.buffered_len(), 0);
}

#[test]
fn reassembler_completes_multi_fragment_at_max_message_size() {
    let max_message_size = FRAGMENT_OVERHEAD + 16;
    let mut reassembler = reassembler(max_message_size);

    assert!(
        reassembler
            .push(fragment(21, 2, 0, &[0; 8]))
            .expect("first fragment within limit")
            .is_none()
    );
    let assembled = reassembler
        .push(fragment(21, 2, 1, &[1; 8]))
        .expect("second fragment within limit")
        .expect("final fragment completes the message");
    assert_eq!(assembled.len(), max_message_size);
    assert_eq!(assembled.fragment_header(), Ok(FragmentHeader::single()));
}

#[test]
fn reassembler_keeps_transactions_apart() {
    let mut reassembler = reassembler(1024);
    assert_eq!(reassembler.push(fragment(1, 2, 0, b"a1")), Ok(None));
    assert_eq!(reassembler.push(fragment(2, 2, 0, b"b1")), Ok(None));
    assert_eq!(reassembler.buffered_len(), 2);

    let second = reassembler
        .push(fragment(2, 2, 1, b"b2"))
        .expect("in order")
        .expect("complete");
    assert_eq!(second.fragment_payload(), Ok(&b"b1b2"[..]));

    let first = reassembler
        .push(fragment(1, 2, 1, b"a2"))
        .expect("in order")
        .expect("complete");
    assert_eq!(first.fragment_payload(), Ok(&b"a1a2"[..]));
    assert_eq!(reassembler.buffered_len(), 0);
}

#[test]
#[traced_test]
fn reassembler_drops_series_on_out_of_order_fragment() {
    let mut reassembler = setup_reassembler_with_first_fragment(9, 3);

    let err = reassembler
        .push(fragment(9, 3, 2, b"skip"))
        .expect_err("fragment skipped an index");
    assert_eq!(
        err,
        ReassemblyError::Fragment(FragmentError::OutOfSequence {
            expected: FragmentHeader::new(3, 1),
            found: FragmentHeader::new(3, 2),
        })
    );
    assert_eq!(reassembler.buffered_len(), 0);
    assert!(logs_contain("dropping partial message"));

    // The series is gone, so its next fragment cannot start a new one.
    assert!(matches!(
        reassembler.push(fragment(9, 3, 1, b"late")),
        Err(ReassemblyError::Fragment(FragmentError::OutOfSequence { .. }))
    ));
}

#[test]
fn reassembler_rejects_series_not_starting_at_zero() {
    let mut reassembler = reassembler(1024);
    assert!(matches!(
        reassembler.push(fragment(5, 4, 2, b"mid")),
        Err(ReassemblyError::Fragment(FragmentError::OutOfSequence { .. }))
    ));
    assert_eq!(reassembler.buffered_len(), 0);
}

#[test]
#[traced_test]
fn reassembler_rejects_messages_over_the_cap() {
    let limit = FRAGMENT_OVERHEAD + 8;
    let mut reassembler = reassembler(limit);
    assert_eq!(reassembler.push(fragment(3, 2, 0, &[0; 6])), Ok(None));

    let err = reassembler
        .push(fragment(3, 2, 1, &[0; 3]))
        .expect_err("reassembled message too large");
    assert_eq!(
        err,
        ReassemblyError::MessageTooLarge {
            transaction_id: 3,
            attempted: limit + 1,
            limit: NonZeroUsize::new(limit).expect("non-zero"),
        }
    );
    assert_eq!(reassembler.buffered_len(), 0);
    assert!(logs_contain("dropping oversized partial message"));
}

#[test]
fn reassembler_rejects_oversized_first_fragment() {
    let mut reassembler = reassembler(FRAGMENT_OVERHEAD);
    assert!(matches!(
        reassembler.push(fragment(4, 2, 0, b"x")),
        Err(ReassemblyError::MessageTooLarge { attempted, .. }) if attempted == FRAGMENT_OVERHEAD + 1
    ));
    assert_eq!(reassembler.buffered_len(), 0);
}

#[test]
fn reassembler_reports_malformed_messages() {
    let mut reassembler = reassembler(1024);
    assert_eq!(
        reassembler.push(Message::from_raw(vec![3, 0, 0])),
        Err(ReassemblyError::Fragment(FragmentError::Malformed(
            MessageError::Truncated {
                needed: 12,
                actual: 3,
            }
        )))
    );
}

#[test]
#[traced_test]
fn reassembler_evicts_stale_partials() {
    let mut reassembler = Reassembler::new(
        NonZeroUsize::new(1024).expect("non-zero"),
        Duration::from_secs(5),
    );
    let start = Instant::now();
    assert_eq!(reassembler.push_at(fragment(1, 2, 0, b"old"), start), Ok(None));
    assert_eq!(
        reassembler.push_at(fragment(2, 2, 0, b"new"), start + Duration::from_secs(3)),
        Ok(None)
    );

    assert!(
        reassembler
            .purge_expired_at(start + Duration::from_secs(4))
            .is_empty()
    );
    assert_eq!(
        reassembler.purge_expired_at(start + Duration::from_secs(5)),
        vec![1]
    );
    assert_eq!(reassembler.buffered_len(), 1);
    assert!(logs_contain("evicting stale partial message"));

    // A late fragment for the evicted transaction no longer fits a series.
    assert!(
        reassembler
            .push_at(fragment(1, 2, 1, b"late"), start + Duration::from_secs(6))
            .is_err()
    );
    let finished = reassembler
        .push_at(fragment(2, 2, 1, b"er"), start + Duration::from_secs(7))
        .expect("still within its own timeout")
        .expect("complete");
    assert_eq!(finished.fragment_payload(), Ok(&b"newer"[..]));
}

#[test]
fn push_purges_before_accepting() {
    let mut reassembler = Reassembler::from_config(FragmentationConfig {
        reassembly_timeout: Duration::from_secs(1),
        ..FragmentationConfig::default()
    });
    let start = Instant::now();
    assert_eq!(reassembler.push_at(fragment(8, 3, 0, b"a"), start), Ok(None));
    assert_eq!(
        reassembler.push_at(Message::close(1), start + Duration::from_secs(2)),
        Ok(Some(Message::close(1)))
    );
    assert_eq!(reassembler.buffered_len(), 0);
}

#[test]
fn reassembler_handles_indications() {
    let mut reassembler = reassembler(1024);
    let indication =
        Message::with_payload(MessageType::Indication, 0, &[7; 40]).expect("indication");
    let fragments = crate::fragment::split(&indication, 32)
        .expect("split")
        .expect("fragmented")
        .to_messages()
        .expect("owned fragments");

    let mut last = None;
    for fragment in fragments {
        last = reassembler.push(fragment).expect("in order");
    }
    assert_eq!(last, Some(indication));
}

#[test]
fn reassembler_separates_kinds_sharing_a_transaction_id() {
    let mut reassembler = reassembler(1024);
    assert_eq!(
        reassembler.push(typed_fragment(MessageType::CommandDone, 5, 2, 0, &[1; 20])),
        Ok(None)
    );

    // An indication continuing "its" series cannot join the response.
    assert!(matches!(
        reassembler.push(typed_fragment(MessageType::Indication, 5, 3, 1, &[2; 20])),
        Err(ReassemblyError::Fragment(FragmentError::OutOfSequence { .. }))
    ));
    assert_eq!(reassembler.buffered_len(), 1);

    assert_eq!(
        reassembler.push(typed_fragment(MessageType::Indication, 5, 2, 0, b"ev")),
        Ok(None)
    );
    assert_eq!(reassembler.buffered_len(), 2);

    let response = reassembler
        .push(typed_fragment(MessageType::CommandDone, 5, 2, 1, &[1; 4]))
        .expect("in order")
        .expect("complete");
    assert_eq!(response.message_type(), Ok(MessageType::CommandDone));
    assert_eq!(response.fragment_payload(), Ok(&[1_u8; 24][..]));

    let event = reassembler
        .push(typed_fragment(MessageType::Indication, 5, 2, 1, b"ent"))
        .expect("in order")
        .expect("complete");
    assert_eq!(event.message_type(), Ok(MessageType::Indication));
    assert_eq!(event.fragment_payload(), Ok(&b"event"[..]));
    assert_eq!(reassembler.buffered_len(), 0);
}
