//! Tests for the fragment header codec.

use bytes::BytesMut;
use rstest::rstest;

use super::fragment;
use crate::{
    error::MessageError,
    fragment::{FRAGMENT_OVERHEAD, FragmentHeader},
};

#[test]
fn fragment_header_exposes_fields() {
    let header = FragmentHeader::new(4, 2);
    assert_eq!(header.total(), 4);
    assert_eq!(header.current(), 2);
    assert!(!header.is_last());
    assert!(FragmentHeader::new(4, 3).is_last());
    assert!(FragmentHeader::single().is_last());
}

#[test]
fn is_last_is_usable_in_const_context() {
    const LAST: bool = FragmentHeader::new(u32::MAX, u32::MAX - 1).is_last();
    const EMPTY: bool = FragmentHeader::new(0, 0).is_last();
    assert!(LAST);
    assert!(!EMPTY);
    assert!(!FragmentHeader::new(2, u32::MAX).is_last());
}

#[test]
fn fragment_header_encodes_little_endian() {
    let mut buf = BytesMut::new();
    FragmentHeader::new(0x0102_0304, 1).encode(&mut buf);
    assert_eq!(buf.as_ref(), [4, 3, 2, 1, 1, 0, 0, 0]);
}

#[rstest]
#[case::first(3, 0)]
#[case::last(3, 2)]
#[case::single(1, 0)]
fn fragment_header_decodes_from_message(#[case] total: u32, #[case] current: u32) {
    let message = fragment(1, total, current, b"xyz");
    assert_eq!(
        FragmentHeader::decode(message.as_bytes()),
        Ok(FragmentHeader::new(total, current))
    );
}

#[rstest]
#[case::equal(2, 2)]
#[case::zero_total(0, 0)]
#[case::beyond(1, 7)]
fn fragment_header_rejects_index_past_total(#[case] total: u32, #[case] current: u32) {
    let message = fragment(1, total, current, b"");
    assert_eq!(
        FragmentHeader::decode(message.as_bytes()),
        Err(MessageError::InvalidFragmentHeader { current, total })
    );
}

#[test]
fn fragment_header_decode_is_bounds_checked() {
    let message = fragment(1, 2, 0, b"");
    let short = &message.as_bytes()[..FRAGMENT_OVERHEAD - 1];
    assert_eq!(
        FragmentHeader::decode(short),
        Err(MessageError::Truncated {
            needed: FRAGMENT_OVERHEAD,
            actual: FRAGMENT_OVERHEAD - 1,
        })
    );
}
