//! Status and protocol error codes carried inside message bodies.
//!
//! [`StatusError`] is the outcome reported by `OpenDone` and `CloseDone`
//! responses (and by command responses further up the stack), where zero
//! means success. [`ProtocolError`] is the code carried by `HostError` and
//! `FunctionError` messages, which always describe a failure.
//!
//! Codes outside the known tables are preserved in an `Other` variant so the
//! raw value survives a decode/encode cycle.

use std::fmt;

/// Define a `u32` wire code enumeration with a static nickname table.
///
/// The generated enum gains an `Other(u32)` variant for unlisted codes, lossless
/// `u32` conversions and a [`Display`](fmt::Display) implementation printing the
/// nickname.
macro_rules! wire_codes {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident = $code:literal => $nick:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$variant_meta])* $variant,)+
            /// A code missing from the known table, kept verbatim.
            Other(u32),
        }

        impl $name {
            /// Map a raw wire value onto the enumeration.
            #[must_use]
            pub const fn from_code(code: u32) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    other => Self::Other(other),
                }
            }

            /// Return the raw wire value.
            #[must_use]
            pub const fn code(self) -> u32 {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Other(code) => code,
                }
            }

            /// Return the diagnostic nickname for this code.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $nick,)+
                    Self::Other(_) => "(unknown)",
                }
            }
        }

        impl From<u32> for $name {
            fn from(code: u32) -> Self { Self::from_code(code) }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self { value.code() }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
        }
    };
}

wire_codes! {
    /// Outcome code reported in `OpenDone`, `CloseDone` and command responses.
    pub enum StatusError {
        /// Success.
        None = 0 => "none",
        /// The device is busy.
        Busy = 1 => "busy",
        /// The operation failed.
        Failure = 2 => "failure",
        /// No SIM is inserted.
        SimNotInserted = 3 => "sim-not-inserted",
        /// The SIM is unusable.
        BadSim = 4 => "bad-sim",
        /// A PIN must be entered first.
        PinRequired = 5 => "pin-required",
        /// PIN verification is disabled.
        PinDisabled = 6 => "pin-disabled",
        /// The device is not registered with a network.
        NotRegistered = 7 => "not-registered",
        /// No network providers were found.
        ProvidersNotFound = 8 => "providers-not-found",
        /// The device does not support the operation.
        NoDeviceSupport = 9 => "no-device-support",
        /// The selected provider is not visible.
        ProviderNotVisible = 10 => "provider-not-visible",
        /// The requested data class is unavailable.
        DataClassNotAvailable = 11 => "data-class-not-available",
        /// Packet service is detached.
        PacketServiceDetached = 12 => "packet-service-detached",
        /// The maximum number of contexts is already active.
        MaxActivatedContexts = 13 => "max-activated-contexts",
        /// The device has not finished initialising.
        NotInitialized = 14 => "not-initialized",
        /// A voice call blocks the operation.
        VoiceCallInProgress = 15 => "voice-call-in-progress",
        /// The context is not active.
        ContextNotActivated = 16 => "context-not-activated",
        /// The service is not activated.
        ServiceNotActivated = 17 => "service-not-activated",
        /// The access string is invalid.
        InvalidAccessString = 18 => "invalid-access-string",
        /// The user name or password is invalid.
        InvalidUserNamePwd = 19 => "invalid-user-name-pwd",
        /// The radio is switched off.
        RadioPowerOff = 20 => "radio-power-off",
        /// The request parameters are invalid.
        InvalidParameters = 21 => "invalid-parameters",
        /// Reading from the SIM or device failed.
        ReadFailure = 22 => "read-failure",
        /// Writing to the SIM or device failed.
        WriteFailure = 23 => "write-failure",
        /// No phonebook is available.
        NoPhonebook = 25 => "no-phonebook",
        /// A parameter exceeds its maximum length.
        ParameterTooLong = 26 => "parameter-too-long",
        /// The SIM toolkit is busy.
        StkBusy = 27 => "stk-busy",
        /// The operation is not allowed.
        OperationNotAllowed = 28 => "operation-not-allowed",
        /// Device or SIM memory failed.
        MemoryFailure = 29 => "memory-failure",
        /// The memory index is out of range.
        InvalidMemoryIndex = 30 => "invalid-memory-index",
        /// Device or SIM memory is full.
        MemoryFull = 31 => "memory-full",
        /// The filter is not supported.
        FilterNotSupported = 32 => "filter-not-supported",
        /// The device service session limit is reached.
        DssInstanceLimit = 33 => "dss-instance-limit",
        /// The device service operation is invalid.
        InvalidDeviceServiceOperation = 34 => "invalid-device-service-operation",
        /// The AUTN value failed authentication.
        AuthIncorrectAutn = 35 => "auth-incorrect-autn",
        /// Authentication lost synchronisation.
        AuthSyncFailure = 36 => "auth-sync-failure",
        /// The AMF bit is not set.
        AuthAmfNotSet = 37 => "auth-amf-not-set",
        /// The context type is not supported.
        ContextNotSupported = 38 => "context-not-supported",
        /// The SMS service centre address is unknown.
        SmsUnknownSmscAddress = 100 => "sms-unknown-smsc-address",
        /// The network timed out sending an SMS.
        SmsNetworkTimeout = 101 => "sms-network-timeout",
        /// The SMS language is not supported.
        SmsLangNotSupported = 102 => "sms-lang-not-supported",
        /// The SMS encoding is not supported.
        SmsEncodingNotSupported = 103 => "sms-encoding-not-supported",
        /// The SMS format is not supported.
        SmsFormatNotSupported = 104 => "sms-format-not-supported",
    }
}

impl StatusError {
    /// Report whether the code signals success.
    #[must_use]
    pub const fn is_success(self) -> bool { matches!(self, Self::None) }
}

wire_codes! {
    /// Failure code carried by `HostError` and `FunctionError` messages.
    pub enum ProtocolError {
        /// Reserved code zero, not a valid error.
        Invalid = 0 => "invalid",
        /// A fragment did not arrive in time.
        TimeoutFragment = 1 => "timeout-fragment",
        /// A fragment arrived out of order.
        FragmentOutOfSequence = 2 => "fragment-out-of-sequence",
        /// A length field disagrees with the data received.
        LengthMismatch = 3 => "length-mismatch",
        /// A transaction id is already in use.
        DuplicatedTid = 4 => "duplicated-tid",
        /// The function has not been opened.
        NotOpened = 5 => "not-opened",
        /// An unspecified error occurred.
        Unknown = 6 => "unknown",
        /// The host cancelled the transaction.
        Cancel = 7 => "cancel",
        /// The message exceeds the maximum transfer size.
        MaxTransfer = 8 => "max-transfer",
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ProtocolError, StatusError};

    #[rstest]
    #[case(0, StatusError::None, "none")]
    #[case(2, StatusError::Failure, "failure")]
    #[case(38, StatusError::ContextNotSupported, "context-not-supported")]
    #[case(104, StatusError::SmsFormatNotSupported, "sms-format-not-supported")]
    fn status_codes_map_to_names(
        #[case] code: u32,
        #[case] expected: StatusError,
        #[case] name: &str,
    ) {
        let status = StatusError::from_code(code);
        assert_eq!(status, expected);
        assert_eq!(status.code(), code);
        assert_eq!(status.to_string(), name);
    }

    #[test]
    fn reserved_status_code_is_preserved() {
        let status = StatusError::from(24);
        assert_eq!(status, StatusError::Other(24));
        assert_eq!(u32::from(status), 24);
        assert_eq!(status.name(), "(unknown)");
        assert!(!status.is_success());
    }

    #[test]
    fn only_none_is_success() {
        assert!(StatusError::None.is_success());
        assert!(!StatusError::Busy.is_success());
    }

    #[rstest]
    #[case(2, ProtocolError::FragmentOutOfSequence, "fragment-out-of-sequence")]
    #[case(6, ProtocolError::Unknown, "unknown")]
    #[case(8, ProtocolError::MaxTransfer, "max-transfer")]
    #[case(0x1234, ProtocolError::Other(0x1234), "(unknown)")]
    fn protocol_codes_map_to_names(
        #[case] code: u32,
        #[case] expected: ProtocolError,
        #[case] name: &str,
    ) {
        let error = ProtocolError::from(code);
        assert_eq!(error, expected);
        assert_eq!(u32::from(error), code);
        assert_eq!(error.name(), name);
    }
}
