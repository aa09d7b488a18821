//! Fixed station and modem configuration.
//!
//! Nothing here is persisted; the values are compiled in or built at boot.

use crate::ax25::{Address, encode_ui_frame};
use crate::consts::{
    BAUD_RATE, DEFAULT_POSTAMBLE_FLAGS, DEFAULT_PREAMBLE_FLAGS, SAMPLE_RATE_HZ, SPACE_HZ,
};
use crate::error::{Ax25Error, ConfigError};

/// Timing parameters of the AFSK modulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct AfskConfig {
    /// Rate at which `tick()` is called.
    pub sample_rate_hz: u32,
    /// Line bit rate.
    pub baud_rate: u32,
    /// Flags sent before the frame; covers transmitter key-up and receiver
    /// squelch/PLL settling.
    pub preamble_flags: u16,
    /// Flags sent after the frame.
    pub postamble_flags: u16,
}

impl Default for AfskConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            baud_rate: BAUD_RATE,
            preamble_flags: DEFAULT_PREAMBLE_FLAGS,
            postamble_flags: DEFAULT_POSTAMBLE_FLAGS,
        }
    }
}

impl AfskConfig {
    /// Checks that the rates give a whole number of samples per bit and
    /// that the space tone is representable.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 || self.baud_rate == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if self.sample_rate_hz % self.baud_rate != 0 {
            return Err(ConfigError::FractionalSamplesPerBit {
                sample_rate_hz: self.sample_rate_hz,
                baud_rate: self.baud_rate,
            });
        }
        if self.sample_rate_hz <= 2 * SPACE_HZ {
            return Err(ConfigError::BelowNyquist(self.sample_rate_hz));
        }
        Ok(())
    }

    /// Sample ticks per line bit (8 for the defaults).
    pub const fn samples_per_bit(&self) -> Result<u32, ConfigError> {
        match self.validate() {
            Ok(()) => Ok(self.sample_rate_hz / self.baud_rate),
            Err(e) => Err(e),
        }
    }

    /// Length of the preamble in milliseconds.
    pub const fn preamble_ms(&self) -> u32 {
        if self.baud_rate == 0 {
            return 0;
        }
        self.preamble_flags as u32 * 8 * 1_000 / self.baud_rate
    }
}

const fn fixed(call: &str, ssid: u8) -> Address {
    match Address::new(call, ssid) {
        Ok(address) => address,
        Err(_) => panic!("invalid built-in address"),
    }
}

const DEFAULT_DESTINATION: Address = fixed("VU2CWN", 0);
const DEFAULT_SOURCE: Address = fixed("VU3LTQ", 5);
const DEFAULT_PATH: [Address; 2] = [fixed("WIDE1", 1), fixed("WIDE2", 1)];

/// Addresses every frame from this station carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationConfig {
    /// APRS destination (often a tocall or a fixed station).
    pub destination: Address,
    /// This station.
    pub source: Address,
    /// Digipeater path, always two entries.
    pub path: [Address; 2],
}

impl Default for StationConfig {
    /// `VU3LTQ-5 > VU2CWN via WIDE1-1,WIDE2-1`.
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION,
            source: DEFAULT_SOURCE,
            path: DEFAULT_PATH,
        }
    }
}

impl StationConfig {
    /// Builds a configuration from explicit addresses.
    pub const fn new(destination: Address, source: Address, path: [Address; 2]) -> Self {
        Self {
            destination,
            source,
            path,
        }
    }

    /// Encodes a UI frame carrying `info` into `out`, returning its length.
    ///
    /// See [`encode_ui_frame`].
    pub fn encode(&self, info: &[u8], out: &mut [u8]) -> Result<usize, Ax25Error> {
        encode_ui_frame(&self.destination, &self.source, &self.path, info, out)
    }
}

/// Delays and bounds used around a keyed transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct SequencerConfig {
    /// Settling time before PTT is asserted.
    pub pre_tx_delay_ms: u32,
    /// Transmitter key-up time between PTT and the first sample.
    pub tx_delay_ms: u32,
    /// Hold time after the last sample before PTT is released.
    pub post_tx_delay_ms: u32,
    /// Upper bound on waiting for the modulator to finish.
    pub timeout_ms: u32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            pre_tx_delay_ms: 200,
            tx_delay_ms: 500,
            post_tx_delay_ms: 100,
            timeout_ms: 15_000,
        }
    }
}
