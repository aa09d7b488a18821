//! Keyed transmission around a modulator.
//!
//! [`Transmitter`] owns the push-to-talk line and a delay source and runs one
//! frame through a [`Modem`]:
//!
//! 1. wait `pre_tx_delay_ms`, assert PTT, wait `tx_delay_ms`
//! 2. `generate` + `start` the frame
//! 3. poll every millisecond until the modem is idle or `timeout_ms` passes
//! 4. wait `post_tx_delay_ms`, `stop` the modem, release PTT
//!
//! PTT is released on every path out of [`Transmitter::transmit`].

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::SequencerConfig;
use crate::error::TxError;

const POLL_INTERVAL_MS: u32 = 1;

/// Main-context control surface of a modulator.
pub trait Modem {
    /// Loads `frame` for transmission; `false` if refused.
    fn generate(&mut self, frame: &[u8]) -> bool;

    /// Starts the loaded frame; `false` if there is nothing to start.
    fn start(&mut self) -> bool;

    /// Aborts and returns the output to idle.
    fn stop(&mut self);

    /// `true` while samples are being produced.
    fn is_busy(&self) -> bool;

    /// Line bits not yet sent.
    fn bits_remaining(&self) -> u32;

    /// Non-blocking completion check.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` while busy.
    fn poll_complete(&self) -> nb::Result<(), Infallible> {
        if self.is_busy() {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }
}

/// Drives a [`Modem`] together with a PTT output.
///
/// ## Type Parameters
///
/// - `M`: the modulator, e.g. [`crate::afsk::AfskEngine`] or a shared handle
/// - `PTT`: push-to-talk output, active high unless
///   [`with_active_low_ptt`](Transmitter::with_active_low_ptt) is used
/// - `D`: millisecond delay source
#[derive(Debug)]
pub struct Transmitter<M, PTT, D>
where
    M: Modem,
    PTT: OutputPin,
    D: DelayNs,
{
    /// The modulator.
    pub modem: M,
    /// Push-to-talk line.
    pub ptt: PTT,
    /// Delay source used between steps and while polling.
    pub delay: D,
    config: SequencerConfig,
    active_low: bool,
}

impl<M, PTT, D> Transmitter<M, PTT, D>
where
    M: Modem,
    PTT: OutputPin,
    D: DelayNs,
{
    /// Takes ownership of the parts and releases PTT.
    pub fn new(modem: M, ptt: PTT, delay: D, config: SequencerConfig) -> Self {
        let mut tx = Self {
            modem,
            ptt,
            delay,
            config,
            active_low: false,
        };
        tx.key(false);
        tx
    }

    /// Treats a low PTT output as "transmit" and releases it.
    pub fn with_active_low_ptt(mut self) -> Self {
        self.active_low = true;
        self.key(false);
        self
    }

    /// Timing in use.
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Sends one frame with PTT asserted.
    ///
    /// # Returns
    /// Milliseconds spent waiting for the modem to finish.
    ///
    /// # Errors
    /// - [`TxError::Rejected`]: the modem refused the frame
    /// - [`TxError::Timeout`]: still busy after `timeout_ms`; the modem has
    ///   been stopped
    pub fn transmit(&mut self, frame: &[u8]) -> Result<u32, TxError> {
        self.delay.delay_ms(self.config.pre_tx_delay_ms);
        self.key(true);
        self.delay.delay_ms(self.config.tx_delay_ms);

        if !self.modem.generate(frame) || !self.modem.start() {
            warn!("TX rejected: {} byte frame", frame.len());
            self.modem.stop();
            self.key(false);
            return Err(TxError::Rejected);
        }
        info!(
            "TX {} bytes, {} line bits",
            frame.len(),
            self.modem.bits_remaining()
        );

        let waited = self.wait_complete();

        self.delay.delay_ms(self.config.post_tx_delay_ms);
        self.modem.stop();
        self.key(false);

        match waited {
            Ok(waited_ms) => {
                debug!("TX done after {} ms", waited_ms);
                Ok(waited_ms)
            }
            Err(waited_ms) => {
                warn!("TX timeout after {} ms", waited_ms);
                Err(TxError::Timeout { waited_ms })
            }
        }
    }

    /// Gives the parts back.
    pub fn release(self) -> (M, PTT, D) {
        (self.modem, self.ptt, self.delay)
    }

    fn wait_complete(&mut self) -> Result<u32, u32> {
        let mut waited_ms = 0u32;
        loop {
            match self.modem.poll_complete() {
                Ok(()) => return Ok(waited_ms),
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(never)) => match never {},
            }
            if waited_ms >= self.config.timeout_ms {
                return Err(waited_ms);
            }
            self.delay.delay_ms(POLL_INTERVAL_MS);
            waited_ms = waited_ms.saturating_add(POLL_INTERVAL_MS);
        }
    }

    // A failed PTT write cannot be retried meaningfully; the next call
    // drives the line again.
    fn key(&mut self, transmit: bool) {
        let _ = if transmit != self.active_low {
            self.ptt.set_high()
        } else {
            self.ptt.set_low()
        };
    }
}
