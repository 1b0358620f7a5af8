#![doc(html_root_url = "https://docs.rs/mbimwire/latest")]
//! Message envelope and fragmentation core of the MBIM control protocol.
//!
//! This crate provides the owned [`Message`] type with typed accessors, the
//! outbound [`Fragmenter`](fragment::Fragmenter), the inbound
//! [`FragmentCollector`](fragment::FragmentCollector) and keyed
//! [`Reassembler`](fragment::Reassembler), and a `tokio_util` codec that
//! delimits messages on a byte stream.

pub mod byte_order;
pub mod codec;
pub mod error;
pub mod fragment;
pub mod message;
pub mod metrics;
pub mod status;

pub use codec::MessageCodec;
pub use error::MessageError;
pub use fragment::{
    Collected,
    FRAGMENT_OVERHEAD,
    FragmentBatch,
    FragmentCollector,
    FragmentError,
    FragmentHeader,
    FragmentInfo,
    FragmentationConfig,
    FragmentationError,
    Fragmenter,
    Reassembler,
    ReassemblyError,
};
pub use message::{
    FragmentBody,
    HEADER_SIZE,
    Message,
    MessageContents,
    MessageHeader,
    MessageType,
    Printable,
};
pub use status::{ProtocolError, StatusError};
