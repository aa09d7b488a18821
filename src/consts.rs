//! Constants used across the AX.25 / AFSK1200 implementation.
//!
//! This module collects the protocol-wide values for frame layout, HDLC
//! framing, Bell-202 tone plan and DAC quantization.
//!
//! ## Key Concepts
//!
//! - **Addresses**: 7 bytes each, a 6-character shifted call sign plus an SSID byte.
//! - **UI frames**: fixed control (`0x03`) and PID (`0xF0`) bytes follow the address field.
//! - **Flags**: `0x7E` delimits every frame and is never bit-stuffed.
//! - **Tones**: Mark (1200 Hz) and Space (2200 Hz) at 1200 baud.
//! - **DAC**: 4-bit codes, idle at mid-scale.

/// HDLC flag byte (`01111110`), sent as preamble and postamble.
pub const HDLC_FLAG: u8 = 0x7e;

/// AX.25 control field for an Unnumbered Information frame, P/F bit clear.
pub const AX25_CONTROL_UI: u8 = 0x03;

/// AX.25 protocol identifier for "no layer 3 protocol".
pub const AX25_PID_NO_LAYER3: u8 = 0xf0;

/// Maximum number of characters in a call sign.
pub const CALLSIGN_LEN: usize = 6;

/// Encoded length (in bytes) of one address entry.
pub const ADDRESS_LEN: usize = CALLSIGN_LEN + 1;

/// Largest SSID that fits the 4-bit SSID field.
pub const MAX_SSID: u8 = 15;

/// Base value of every SSID byte: the two reserved bits set.
pub const SSID_RESERVED_BITS: u8 = 0x60;

/// End-of-address-field marker, bit 0 of the last SSID byte.
pub const ADDRESS_EXTENSION_BIT: u8 = 0x01;

/// Maximum number of digipeaters AX.25 allows in a path.
pub const MAX_DIGIPEATERS: usize = 8;

/// Length (in bytes) of the frame check sequence.
pub const FCS_LEN: usize = 2;

/// Capacity of the frame buffer owned by the modulator.
pub const MAX_FRAME_LEN: usize = 4096;

/// Capacity of a formatted APRS information field.
pub const MAX_INFO_LEN: usize = 256;

/// Mark tone frequency in Hz (logical idle / no transition reference).
pub const MARK_HZ: u32 = 1_200;

/// Space tone frequency in Hz.
pub const SPACE_HZ: u32 = 2_200;

/// Bell-202 signalling rate.
pub const BAUD_RATE: u32 = 1_200;

/// Default sample-timer rate; gives exactly 8 samples per bit.
pub const SAMPLE_RATE_HZ: u32 = 9_600;

/// Number of entries in the one-cycle sine table.
pub const SINE_TABLE_LEN: usize = 64;

/// Largest DAC code (4-bit output).
pub const DAC_MAX_CODE: u8 = 0x0f;

/// DAC code written whenever nothing is being transmitted.
pub const IDLE_CODE: u8 = 8;

/// Peak deviation from [`IDLE_CODE`] of the synthesized sine.
pub const TONE_AMPLITUDE: u8 = 7;

/// Default number of preamble flags (40 flags = 320 bits ≈ 267 ms at 1200 baud).
pub const DEFAULT_PREAMBLE_FLAGS: u16 = 40;

/// Default number of postamble flags.
pub const DEFAULT_POSTAMBLE_FLAGS: u16 = 3;
