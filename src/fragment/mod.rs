//! Splitting and re-assembly of fragmentable MBIM messages.
//!
//! `Command`, `CommandDone` and `Indication` messages carry a fragment header
//! after the common header so that a logical message larger than the
//! transport's maximum transfer can travel as several fragments. Each
//! sub-module focuses on one concept: the outbound [`Fragmenter`], the
//! single-message [`FragmentCollector`], and the keyed [`Reassembler`] that
//! tracks one collector per transaction.

pub mod collector;
pub mod config;
pub mod error;
pub mod fragmenter;
pub mod header;
pub mod reassembler;

pub use collector::{Collected, FragmentCollector};
pub use config::{
    DEFAULT_MAX_CONTROL_TRANSFER,
    DEFAULT_MAX_MESSAGE_SIZE,
    DEFAULT_REASSEMBLY_TIMEOUT,
    FragmentationConfig,
};
pub use error::{FragmentError, FragmentationError, ReassemblyError};
pub use fragmenter::{FragmentBatch, FragmentInfo, Fragmenter, split};
pub(crate) use header::{CURRENT_OFFSET, TOTAL_OFFSET};
pub use header::{FRAGMENT_HEADER_SIZE, FRAGMENT_OVERHEAD, FragmentHeader};
pub use reassembler::Reassembler;
