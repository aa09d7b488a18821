//! Error types for frame encoding, configuration and transmission.

use thiserror::Error;

/// Reasons an AX.25 frame or APRS information field could not be assembled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Ax25Error {
    /// A call sign longer than six characters.
    #[error("call sign is longer than 6 characters ({0})")]
    CallsignTooLong(usize),

    /// A call sign with no characters.
    #[error("call sign is empty")]
    EmptyCallsign,

    /// A call sign containing something other than ASCII letters and digits.
    #[error("call sign contains non-alphanumeric byte 0x{0:02x}")]
    InvalidCallsign(u8),

    /// An SSID above 15.
    #[error("SSID {0} is out of range 0-15")]
    InvalidSsid(u8),

    /// An SSID suffix that is not a decimal number.
    #[error("SSID suffix is not a number")]
    MalformedSsid,

    /// A digipeater path longer than AX.25 allows.
    #[error("digipeater path has {0} entries, at most 8 are allowed")]
    PathTooLong(usize),

    /// The assembled frame does not fit the output buffer.
    #[error("frame needs {needed} bytes but the buffer holds {capacity}")]
    FrameTooLong {
        /// Bytes the frame would occupy.
        needed: usize,
        /// Bytes available in the output buffer.
        capacity: usize,
    },

    /// The formatted information field exceeds its capacity.
    #[error("information field is longer than {0} bytes")]
    PayloadTooLong(usize),
}

/// Inconsistent modulator timing parameters.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ConfigError {
    /// The sample rate or baud rate is zero.
    #[error("sample rate and baud rate must be non-zero")]
    ZeroRate,

    /// The sample rate is not an integer multiple of the baud rate.
    #[error("{sample_rate_hz} Hz is not a whole multiple of {baud_rate} baud")]
    FractionalSamplesPerBit {
        /// Configured sample rate.
        sample_rate_hz: u32,
        /// Configured baud rate.
        baud_rate: u32,
    },

    /// The sample rate cannot represent the space tone.
    #[error("sample rate {0} Hz is below twice the space tone")]
    BelowNyquist(u32),
}

/// Failures of a complete keyed transmission.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TxError {
    /// The modulator refused the frame (busy, empty or oversized).
    #[error("modulator rejected the frame")]
    Rejected,

    /// The modulator was still busy when the wait bound elapsed.
    #[error("transmission still busy after {waited_ms} ms")]
    Timeout {
        /// Milliseconds spent waiting for completion.
        waited_ms: u32,
    },
}
