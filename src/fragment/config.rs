//! Configuration used by fragmentation, reassembly and the stream codec.

use std::{num::NonZeroUsize, time::Duration};

use super::FRAGMENT_OVERHEAD;

/// Transfer size most MBIM functions accept when the host asks for nothing
/// larger.
pub const DEFAULT_MAX_CONTROL_TRANSFER: NonZeroUsize =
    NonZeroUsize::new(4096).expect("4096 is non-zero");

/// Default cap on a reassembled message.
pub const DEFAULT_MAX_MESSAGE_SIZE: NonZeroUsize =
    NonZeroUsize::new(64 * 1024).expect("64 KiB is non-zero");

/// Default lifetime of an incomplete reassembly.
pub const DEFAULT_REASSEMBLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings that bound fragment sizes and reassembly resource usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentationConfig {
    /// Largest on-wire message or fragment, headers included. This is the
    /// `max_control_transfer` negotiated by the `Open` request.
    pub max_fragment_size: NonZeroUsize,
    /// Hard cap on a message accepted from the wire or reassembled from
    /// fragments.
    pub max_message_size: NonZeroUsize,
    /// Duration after which incomplete reassemblies are evicted.
    pub reassembly_timeout: Duration,
}

impl FragmentationConfig {
    /// Derive a configuration from the negotiated maximum control transfer.
    ///
    /// Returns `None` when the transfer size cannot carry the fragment
    /// headers plus at least one payload byte, or when `max_message_size` is
    /// smaller than a single transfer.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::{num::NonZeroUsize, time::Duration};
    ///
    /// use mbimwire::fragment::FragmentationConfig;
    ///
    /// let max_message = NonZeroUsize::new(1 << 16).unwrap();
    /// let timeout = Duration::from_secs(2);
    /// assert!(FragmentationConfig::for_max_control_transfer(512, max_message, timeout).is_some());
    /// assert!(FragmentationConfig::for_max_control_transfer(20, max_message, timeout).is_none());
    /// ```
    #[must_use]
    pub fn for_max_control_transfer(
        max_control_transfer: usize,
        max_message_size: NonZeroUsize,
        reassembly_timeout: Duration,
    ) -> Option<Self> {
        if max_control_transfer <= FRAGMENT_OVERHEAD || max_message_size.get() < max_control_transfer
        {
            return None;
        }
        Some(Self {
            max_fragment_size: NonZeroUsize::new(max_control_transfer)?,
            max_message_size,
            reassembly_timeout,
        })
    }

    /// Payload bytes a single fragment can carry.
    #[must_use]
    pub fn fragment_payload_capacity(&self) -> usize {
        self.max_fragment_size.get().saturating_sub(FRAGMENT_OVERHEAD)
    }
}

impl Default for FragmentationConfig {
    fn default() -> Self {
        Self {
            max_fragment_size: DEFAULT_MAX_CONTROL_TRANSFER,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            reassembly_timeout: DEFAULT_REASSEMBLY_TIMEOUT,
        }
    }
}
