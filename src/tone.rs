//! Bell-202 tone synthesis for a 4-bit DAC.
//!
//! A direct digital synthesizer: a Q16.16 phase accumulator walks a
//! 64-entry, one-cycle sine table, advancing by a per-tone increment each
//! sample tick. At 9600 Hz the Mark tone advances exactly 8 table entries a
//! tick (8 samples per cycle) while Space advances ~14.67, which is why the
//! fractional part of the accumulator is kept.
//!
//! The accumulator is shared between both tones and is never reset on a
//! Mark/Space switch, giving a continuous-phase waveform.
//!
//! Output codes are `IDLE_CODE ± TONE_AMPLITUDE`, i.e. 1..=15 centered on 8.

use crate::consts::{
    DAC_MAX_CODE, IDLE_CODE, MARK_HZ, SINE_TABLE_LEN, SPACE_HZ, TONE_AMPLITUDE,
};
use crate::error::ConfigError;

/// Fractional bits of the phase accumulator.
const PHASE_FRAC_BITS: u32 = 16;

/// One of the two AFSK tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Tone {
    /// 1200 Hz.
    #[default]
    Mark,
    /// 2200 Hz.
    Space,
}

impl Tone {
    /// The other tone.
    pub const fn toggled(self) -> Self {
        match self {
            Tone::Mark => Tone::Space,
            Tone::Space => Tone::Mark,
        }
    }

    /// Applies one NRZI-coded bit: `1` keeps the tone, `0` switches it.
    pub const fn nrzi(self, bit: bool) -> Self {
        if bit { self } else { self.toggled() }
    }

    /// Nominal frequency in Hz.
    pub const fn frequency_hz(self) -> u32 {
        match self {
            Tone::Mark => MARK_HZ,
            Tone::Space => SPACE_HZ,
        }
    }
}

/// Fixed-point position within one sine cycle (Q16.16 table index).
///
/// Wraps naturally: the table length is a power of two, so `u32` overflow
/// lands on a whole number of cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Phase(u32);

impl Phase {
    /// Raw accumulator value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Table entry this phase points at.
    pub const fn index(self) -> usize {
        ((self.0 >> PHASE_FRAC_BITS) as usize) & (SINE_TABLE_LEN - 1)
    }

    /// Phase after advancing by `step`.
    pub const fn advance(self, step: u32) -> Self {
        Phase(self.0.wrapping_add(step))
    }
}

/// Computes the Q16.16 per-sample increment for `freq_hz`, rounded.
///
/// Returns 0 for a zero sample rate.
pub const fn phase_step(freq_hz: u32, sample_rate_hz: u32) -> u32 {
    if sample_rate_hz == 0 {
        return 0;
    }
    let num = (freq_hz as u64 * SINE_TABLE_LEN as u64) << PHASE_FRAC_BITS;
    ((num + sample_rate_hz as u64 / 2) / sample_rate_hz as u64) as u32
}

/// Sine lookup and per-tone increments for a given sample rate.
///
/// Construction runs the `libm` sine once per table entry, so build it in
/// the main context before the sample timer starts.
#[derive(Debug, Clone)]
pub struct ToneSynthesizer {
    table: [u8; SINE_TABLE_LEN],
    mark_step: u32,
    space_step: u32,
}

impl ToneSynthesizer {
    /// Builds the synthesizer for `sample_rate_hz`.
    ///
    /// # Errors
    /// [`ConfigError::ZeroRate`] if `sample_rate_hz` is 0.
    pub fn new(sample_rate_hz: u32) -> Result<Self, ConfigError> {
        if sample_rate_hz == 0 {
            return Err(ConfigError::ZeroRate);
        }
        let mut table = [IDLE_CODE; SINE_TABLE_LEN];
        for (i, entry) in table.iter_mut().enumerate() {
            let angle = 2.0 * core::f64::consts::PI * i as f64 / SINE_TABLE_LEN as f64;
            let offset = libm::round(f64::from(TONE_AMPLITUDE) * libm::sin(angle)) as i16;
            *entry = (i16::from(IDLE_CODE) + offset).clamp(0, i16::from(DAC_MAX_CODE)) as u8;
        }
        Ok(Self {
            table,
            mark_step: phase_step(MARK_HZ, sample_rate_hz),
            space_step: phase_step(SPACE_HZ, sample_rate_hz),
        })
    }

    /// Per-sample phase increment for `tone`.
    pub const fn step(&self, tone: Tone) -> u32 {
        match tone {
            Tone::Mark => self.mark_step,
            Tone::Space => self.space_step,
        }
    }

    /// Returns the DAC code at `phase` and the phase for the next sample.
    ///
    /// Constant-time: one table read and one add.
    #[inline]
    pub fn next_sample(&self, tone: Tone, phase: Phase) -> (u8, Phase) {
        (self.table[phase.index()], phase.advance(self.step(tone)))
    }

    /// The quantized one-cycle table.
    pub fn table(&self) -> &[u8; SINE_TABLE_LEN] {
        &self.table
    }
}
