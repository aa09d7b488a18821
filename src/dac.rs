//! Output boundary for quantized samples.
//!
//! The modulator only knows [`SampleSink::write_sample`]. How the code gets
//! to the analog side (a single port write, a resistor ladder on separate
//! pins, a real DAC peripheral) is the sink's business.

use embedded_hal::digital::OutputPin;

use crate::consts::{DAC_MAX_CODE, IDLE_CODE};

/// Receives one 4-bit DAC code per sample tick.
///
/// Called from interrupt context: implementations must not block.
pub trait SampleSink {
    /// Outputs `code` (0..=15) until the next call.
    fn write_sample(&mut self, code: u8);
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn write_sample(&mut self, code: u8) {
        (**self).write_sample(code);
    }
}

/// Records every sample; used to inspect generated waveforms on a host.
#[cfg(feature = "std")]
impl SampleSink for Vec<u8> {
    fn write_sample(&mut self, code: u8) {
        self.push(code);
    }
}

/// A 4-bit R-2R (or binary-weighted) ladder on four GPIO outputs.
///
/// Only pins whose bit changed since the previous sample are written, which
/// keeps the per-tick cost low and the glitch window short when the pins
/// cannot be updated in one register write.
///
/// ## Example
///
/// ```rust
/// # use embedded_hal_mock::eh1::digital::{
/// #     Mock as Pin, State as PinState, Transaction as PinTransaction,
/// # };
/// use afsk1200::dac::{ParallelDac, SampleSink};
///
/// # let lsb = Pin::new(&[
/// #     PinTransaction::set(PinState::Low),
/// #     PinTransaction::set(PinState::High),
/// # ]);
/// # let bit1 = Pin::new(&[PinTransaction::set(PinState::Low)]);
/// # let bit2 = Pin::new(&[PinTransaction::set(PinState::Low)]);
/// # let msb = Pin::new(&[PinTransaction::set(PinState::High)]);
/// let mut dac = ParallelDac::new(lsb, bit1, bit2, msb); // drives mid-scale
/// dac.write_sample(9);
/// # dac.lsb.done();
/// # dac.bit1.done();
/// # dac.bit2.done();
/// # dac.msb.done();
/// ```
#[derive(Debug)]
pub struct ParallelDac<B0, B1, B2, B3>
where
    B0: OutputPin,
    B1: OutputPin,
    B2: OutputPin,
    B3: OutputPin,
{
    /// Bit 0 (smallest weight).
    pub lsb: B0,
    /// Bit 1.
    pub bit1: B1,
    /// Bit 2.
    pub bit2: B2,
    /// Bit 3 (largest weight).
    pub msb: B3,
    current: u8,
}

impl<B0, B1, B2, B3> ParallelDac<B0, B1, B2, B3>
where
    B0: OutputPin,
    B1: OutputPin,
    B2: OutputPin,
    B3: OutputPin,
{
    /// Takes the four pins and drives them to [`IDLE_CODE`].
    pub fn new(lsb: B0, bit1: B1, bit2: B2, msb: B3) -> Self {
        let mut dac = Self {
            lsb,
            bit1,
            bit2,
            msb,
            current: IDLE_CODE,
        };
        dac.write_all(IDLE_CODE);
        dac
    }

    /// Last code written.
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Gives the pins back.
    pub fn release(self) -> (B0, B1, B2, B3) {
        (self.lsb, self.bit1, self.bit2, self.msb)
    }

    fn write_all(&mut self, code: u8) {
        drive(&mut self.lsb, code & 0x01 != 0);
        drive(&mut self.bit1, code & 0x02 != 0);
        drive(&mut self.bit2, code & 0x04 != 0);
        drive(&mut self.msb, code & 0x08 != 0);
    }
}

impl<B0, B1, B2, B3> SampleSink for ParallelDac<B0, B1, B2, B3>
where
    B0: OutputPin,
    B1: OutputPin,
    B2: OutputPin,
    B3: OutputPin,
{
    fn write_sample(&mut self, code: u8) {
        let code = code & DAC_MAX_CODE;
        let changed = code ^ self.current;
        if changed & 0x01 != 0 {
            drive(&mut self.lsb, code & 0x01 != 0);
        }
        if changed & 0x02 != 0 {
            drive(&mut self.bit1, code & 0x02 != 0);
        }
        if changed & 0x04 != 0 {
            drive(&mut self.bit2, code & 0x04 != 0);
        }
        if changed & 0x08 != 0 {
            drive(&mut self.msb, code & 0x08 != 0);
        }
        self.current = code;
    }
}

// Pin errors are ignored: there is no recovery from inside a sample tick.
fn drive<P: OutputPin>(pin: &mut P, high: bool) {
    let _ = if high { pin.set_high() } else { pin.set_low() };
}
