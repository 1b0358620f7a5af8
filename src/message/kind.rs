//! The closed set of MBIM message kinds and their wire codes.

use std::fmt;

/// Kind of an MBIM message, taken from the first header field.
///
/// Host-to-device requests use small codes; device-to-host responses and
/// indications set the high bit. [`MessageType::Invalid`] never appears on
/// the wire: it is the sentinel produced for unknown codes.
///
/// # Examples
///
/// ```
/// use mbimwire::MessageType;
///
/// assert_eq!(MessageType::from_code(0x8000_0003), MessageType::CommandDone);
/// assert_eq!(MessageType::from_code(0x55), MessageType::Invalid);
/// assert!(MessageType::Indication.is_fragment());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Sentinel for unknown type codes; never sent.
    Invalid,
    /// Host request opening the function.
    Open,
    /// Host request closing the function.
    Close,
    /// Host command, possibly fragmented.
    Command,
    /// Error reported by the host.
    HostError,
    /// Device response to `Open`.
    OpenDone,
    /// Device response to `Close`.
    CloseDone,
    /// Device response to `Command`, possibly fragmented.
    CommandDone,
    /// Error reported by the device.
    FunctionError,
    /// Unsolicited device event, possibly fragmented.
    Indication,
}

impl MessageType {
    /// Map a raw wire value onto a message kind, yielding
    /// [`MessageType::Invalid`] for codes outside the protocol.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0x0000_0001 => Self::Open,
            0x0000_0002 => Self::Close,
            0x0000_0003 => Self::Command,
            0x0000_0004 => Self::HostError,
            0x8000_0001 => Self::OpenDone,
            0x8000_0002 => Self::CloseDone,
            0x8000_0003 => Self::CommandDone,
            0x8000_0004 => Self::FunctionError,
            0x8000_0007 => Self::Indication,
            _ => Self::Invalid,
        }
    }

    /// Return the raw wire value.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Invalid => 0x0000_0000,
            Self::Open => 0x0000_0001,
            Self::Close => 0x0000_0002,
            Self::Command => 0x0000_0003,
            Self::HostError => 0x0000_0004,
            Self::OpenDone => 0x8000_0001,
            Self::CloseDone => 0x8000_0002,
            Self::CommandDone => 0x8000_0003,
            Self::FunctionError => 0x8000_0004,
            Self::Indication => 0x8000_0007,
        }
    }

    /// Return the diagnostic nickname.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Open => "open",
            Self::Close => "close",
            Self::Command => "command",
            Self::HostError => "host-error",
            Self::OpenDone => "open-done",
            Self::CloseDone => "close-done",
            Self::CommandDone => "command-done",
            Self::FunctionError => "function-error",
            Self::Indication => "indicate-status",
        }
    }

    /// Report whether messages of this kind carry a fragment header and may
    /// be split across transfers.
    #[must_use]
    pub const fn is_fragment(self) -> bool {
        matches!(self, Self::Command | Self::CommandDone | Self::Indication)
    }

    /// Report whether messages of this kind carry a protocol error code.
    #[must_use]
    pub const fn is_error(self) -> bool { matches!(self, Self::HostError | Self::FunctionError) }

    /// Smallest body, in bytes after the common header, a well-formed
    /// message of this kind carries. `None` for [`MessageType::Invalid`].
    #[must_use]
    pub const fn min_body_size(self) -> Option<usize> {
        match self {
            Self::Invalid => None,
            Self::Close => Some(0),
            Self::Open | Self::OpenDone | Self::CloseDone | Self::HostError | Self::FunctionError => {
                Some(4)
            }
            Self::Command | Self::CommandDone | Self::Indication => Some(8),
        }
    }
}

impl From<u32> for MessageType {
    fn from(code: u32) -> Self { Self::from_code(code) }
}

impl From<MessageType> for u32 {
    fn from(value: MessageType) -> Self { value.code() }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}
