//! Interrupt-driven AFSK1200 modulator.
//!
//! This module provides [`AfskEngine`], which turns an AX.25 frame into a
//! continuous-phase Bell-202 waveform one DAC code at a time. The engine is
//! split along execution contexts:
//!
//! - **main context**: [`generate()`](AfskEngine::generate),
//!   [`start()`](AfskEngine::start), [`stop()`](AfskEngine::stop) and the
//!   status getters
//! - **sample interrupt**: [`tick()`](AfskEngine::tick), called once per
//!   sample period (every ~104 µs at 9600 Hz)
//!
//! `tick()` does a bounded amount of work (one table lookup, one sink write
//! and at most one line-bit fetch) and never allocates.
//!
//! ## Example
//!
//! ```rust
//! use afsk1200::afsk::AfskEngine;
//! use afsk1200::config::{AfskConfig, StationConfig};
//!
//! let mut samples: Vec<u8> = Vec::new();
//! let mut engine = AfskEngine::new(&mut samples, AfskConfig::default()).unwrap();
//!
//! let mut frame = [0u8; 128];
//! let len = StationConfig::default().encode(b">HELLO", &mut frame).unwrap();
//! assert!(engine.generate(&frame[..len]));
//! assert!(engine.start());
//! while engine.is_busy() {
//!     engine.tick(); // normally the sample-timer interrupt
//! }
//! ```
//!
//! ## Line coding
//!
//! Every line bit, flags included, is NRZI coded: a `0` switches between
//! Mark and Space, a `1` keeps the current tone. Zero-bit insertion only
//! applies inside the frame (see [`crate::hdlc`]).

use heapless::Vec;

use crate::config::AfskConfig;
use crate::consts::{IDLE_CODE, MAX_FRAME_LEN};
use crate::dac::SampleSink;
use crate::error::ConfigError;
use crate::hdlc::{BitCursor, TxPhase, line_bit_count};
use crate::sequencer::Modem;
use crate::timer::Tickable;
use crate::tone::{Phase, Tone, ToneSynthesizer};

/// Bit-clock, line coder and tone generator for one radio channel.
///
/// The engine owns its copy of the frame for the lifetime of a
/// transmission, so the caller's buffer is free as soon as
/// [`generate()`](AfskEngine::generate) returns.
///
/// ## Type Parameters
///
/// - `S`: the [`SampleSink`] receiving one code per tick
#[derive(Debug)]
pub struct AfskEngine<S>
where
    S: SampleSink,
{
    sink: S,
    synth: ToneSynthesizer,
    config: AfskConfig,
    frame: Vec<u8, MAX_FRAME_LEN>,
    cursor: BitCursor,
    tone: Tone,
    phase: Phase,
    samples_per_bit: u32,
    samples_into_bit: u32,
    planned_bits: u32,
    bits_remaining: u32,
    busy: bool,
}

impl<S> AfskEngine<S>
where
    S: SampleSink,
{
    /// Creates an idle engine and drives the sink to [`IDLE_CODE`].
    ///
    /// # Errors
    /// Any [`ConfigError`] from [`AfskConfig::validate`].
    pub fn new(sink: S, config: AfskConfig) -> Result<Self, ConfigError> {
        let samples_per_bit = config.samples_per_bit()?;
        let mut engine = Self {
            sink,
            synth: ToneSynthesizer::new(config.sample_rate_hz)?,
            config,
            frame: Vec::new(),
            cursor: BitCursor::new(config.preamble_flags, config.postamble_flags),
            tone: Tone::Mark,
            phase: Phase::default(),
            samples_per_bit,
            samples_into_bit: 0,
            planned_bits: 0,
            bits_remaining: 0,
            busy: false,
        };
        engine.sink.write_sample(IDLE_CODE);
        Ok(engine)
    }

    /// Loads `frame` as the next transmission plan.
    ///
    /// Copies the bytes and counts the exact number of line bits (preamble
    /// flags, stuffed frame bits, postamble flags).
    ///
    /// # Returns
    /// - `true`: a plan is loaded and [`start()`](AfskEngine::start) may be called
    /// - `false`: the engine is busy (nothing changed), or `frame` is empty or
    ///   longer than [`MAX_FRAME_LEN`] (any previous plan is discarded)
    pub fn generate(&mut self, frame: &[u8]) -> bool {
        if self.busy {
            warn!("generate ignored: transmission in progress");
            return false;
        }

        self.frame.clear();
        self.cursor = BitCursor::new(self.config.preamble_flags, self.config.postamble_flags);
        self.samples_into_bit = 0;
        self.planned_bits = 0;
        self.bits_remaining = 0;

        if frame.is_empty() {
            return false;
        }
        if self.frame.extend_from_slice(frame).is_err() {
            warn!("generate ignored: {} byte frame exceeds buffer", frame.len());
            return false;
        }

        let bits = line_bit_count(
            &self.frame,
            self.config.preamble_flags,
            self.config.postamble_flags,
        );
        self.planned_bits = u32::try_from(bits).unwrap_or(u32::MAX);
        self.bits_remaining = self.planned_bits;
        debug!(
            "AFSK plan: {} frame bytes, {} line bits",
            frame.len(),
            self.planned_bits
        );
        true
    }

    /// Begins emitting the loaded plan on the next [`tick()`](AfskEngine::tick).
    ///
    /// # Returns
    /// `false` (and does nothing) if no unsent plan is loaded or the engine is
    /// already busy.
    pub fn start(&mut self) -> bool {
        if self.busy || self.planned_bits == 0 || self.cursor.phase() != TxPhase::Idle {
            return false;
        }

        self.cursor.begin();
        match self.cursor.next_bit(&self.frame) {
            Some(bit) => self.tone = self.tone.nrzi(bit),
            None => return false,
        }
        self.samples_into_bit = 0;
        self.busy = true;
        info!("AFSK start: {} bits", self.bits_remaining);
        true
    }

    /// Emits one sample and advances the bit clock.
    ///
    /// Call exactly once per sample period from the timer interrupt. Every
    /// call writes exactly one code to the sink. When idle (before `start`,
    /// after completion or `stop`) that code is [`IDLE_CODE`], so the last
    /// waveform sample is held for a full period and the tick after it
    /// returns the output to mid-scale.
    pub fn tick(&mut self) {
        if !self.busy {
            self.sink.write_sample(IDLE_CODE);
            return;
        }

        let (code, next) = self.synth.next_sample(self.tone, self.phase);
        self.phase = next;
        self.sink.write_sample(code);

        self.samples_into_bit += 1;
        if self.samples_into_bit < self.samples_per_bit {
            return;
        }
        self.samples_into_bit = 0;
        self.bits_remaining = self.bits_remaining.saturating_sub(1);

        match self.cursor.next_bit(&self.frame) {
            Some(bit) => self.tone = self.tone.nrzi(bit),
            None => self.finish(),
        }
    }

    /// Aborts any transmission and drives the output to [`IDLE_CODE`].
    ///
    /// Remaining planned bits are discarded. Safe to call at any time,
    /// repeatedly.
    pub fn stop(&mut self) {
        if self.busy {
            debug!("AFSK stop with {} bits left", self.bits_remaining);
        }
        self.cursor.halt();
        self.bits_remaining = 0;
        self.samples_into_bit = 0;
        self.busy = false;
        self.sink.write_sample(IDLE_CODE);
    }

    /// `true` between a successful `start` and completion or `stop`.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Line bits not yet fully sent.
    ///
    /// Decrements once per completed bit interval and reaches 0 on the same
    /// tick `is_busy()` turns `false`.
    pub fn bits_remaining(&self) -> u32 {
        self.bits_remaining
    }

    /// Line bits in the loaded plan.
    pub fn planned_bits(&self) -> u32 {
        self.planned_bits
    }

    /// Region of the plan currently being sent.
    pub fn phase(&self) -> TxPhase {
        self.cursor.phase()
    }

    /// Tone of the bit currently being sent.
    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// Current synthesizer phase.
    pub fn phase_accumulator(&self) -> Phase {
        self.phase
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &AfskConfig {
        &self.config
    }

    /// Shared access to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the engine and returns the sink.
    pub fn release(self) -> S {
        self.sink
    }

    fn finish(&mut self) {
        self.busy = false;
        self.bits_remaining = 0;
    }
}

impl<S: SampleSink> Tickable for AfskEngine<S> {
    fn tick(&mut self) {
        AfskEngine::tick(self);
    }
}

impl<S: SampleSink> Modem for AfskEngine<S> {
    fn generate(&mut self, frame: &[u8]) -> bool {
        AfskEngine::generate(self, frame)
    }

    fn start(&mut self) -> bool {
        AfskEngine::start(self)
    }

    fn stop(&mut self) {
        AfskEngine::stop(self);
    }

    fn is_busy(&self) -> bool {
        AfskEngine::is_busy(self)
    }

    fn bits_remaining(&self) -> u32 {
        AfskEngine::bits_remaining(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StationConfig;
    use crate::consts::HDLC_FLAG;
    use crate::hdlc::HdlcBits;

    type Engine = AfskEngine<std::vec::Vec<u8>>;

    fn engine(preamble_flags: u16, postamble_flags: u16) -> Engine {
        let config = AfskConfig {
            preamble_flags,
            postamble_flags,
            ..AfskConfig::default()
        };
        AfskEngine::new(std::vec::Vec::new(), config).unwrap()
    }

    fn run_to_completion(engine: &mut Engine) -> usize {
        let mut ticks = 0;
        while engine.is_busy() {
            engine.tick();
            ticks += 1;
            assert!(ticks < 1_000_000);
        }
        ticks
    }

    #[test]
    fn test_new_engine_is_idle() {
        let mut engine = engine(1, 1);
        assert!(!engine.is_busy());
        assert_eq!(engine.phase(), TxPhase::Idle);
        engine.tick();
        engine.tick();
        assert_eq!(engine.sink().as_slice(), &[IDLE_CODE; 3]);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = AfskConfig {
            sample_rate_hz: 9_000,
            ..AfskConfig::default()
        };
        assert!(AfskEngine::new(std::vec::Vec::new(), config).is_err());
    }

    #[test]
    fn test_start_requires_a_plan() {
        let mut engine = engine(1, 1);
        assert!(!engine.start());
        assert!(!engine.generate(&[]));
        assert!(!engine.start());
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_oversized_frame_is_refused() {
        let mut engine = engine(1, 1);
        let big = vec![0u8; MAX_FRAME_LEN + 1];
        assert!(!engine.generate(&big));
        assert_eq!(engine.planned_bits(), 0);
        assert!(!engine.start());
    }

    #[test]
    fn test_generate_while_busy_is_a_no_op() {
        let mut engine = engine(1, 1);
        assert!(engine.generate(&[0x55]));
        let planned = engine.planned_bits();
        assert!(engine.start());
        assert!(!engine.generate(&[0x00, 0x00, 0x00]));
        assert!(!engine.start());
        assert_eq!(engine.planned_bits(), planned);
    }

    #[test]
    fn test_sample_count_matches_plan() {
        let mut engine = engine(2, 1);
        assert!(engine.generate(&[0xff, 0x00]));
        // 16 flag bits + 8 ones with one stuffed zero + 8 zeros + 8 flag bits
        assert_eq!(engine.planned_bits(), 16 + 9 + 8 + 8);
        assert!(engine.start());

        let ticks = run_to_completion(&mut engine);
        assert_eq!(ticks, 41 * 8);
        assert_eq!(engine.phase(), TxPhase::Done);

        engine.tick();
        let samples = engine.release();
        // idle at construction, one code per tick, idle on the tick after
        assert_eq!(samples.len(), 1 + ticks + 1);
        assert_eq!(samples[0], IDLE_CODE);
        assert_eq!(*samples.last().unwrap(), IDLE_CODE);
        assert!(samples[1..=ticks].iter().all(|&c| (1..=15).contains(&c)));
    }

    #[test]
    fn test_bits_remaining_is_monotonic() {
        let mut engine = engine(1, 1);
        assert!(engine.generate(b"\x7e\x01"));
        let planned = engine.planned_bits();
        assert!(engine.start());

        let mut last = engine.bits_remaining();
        assert_eq!(last, planned);
        let mut ticks = 0u32;
        while engine.is_busy() {
            engine.tick();
            ticks += 1;
            let now = engine.bits_remaining();
            if ticks % 8 == 0 {
                assert_eq!(now, last - 1);
            } else {
                assert_eq!(now, last);
            }
            assert_eq!(now == 0, !engine.is_busy());
            last = now;
        }
        assert_eq!(ticks, planned * 8);
    }

    #[test]
    fn test_nrzi_tone_sequence() {
        // 0x0B is sent as 1 1 0 1 0 0 0 0
        let mut engine = engine(0, 0);
        assert!(engine.generate(&[0x0b]));
        assert!(engine.start());

        let mut tones = vec![engine.tone()];
        for _ in 0..7 {
            for _ in 0..8 {
                engine.tick();
            }
            tones.push(engine.tone());
        }
        use Tone::{Mark, Space};
        assert_eq!(tones, [Mark, Mark, Space, Space, Mark, Space, Mark, Space]);
    }

    #[test]
    fn test_flags_toggle_through_nrzi() {
        let mut engine = engine(1, 0);
        assert!(engine.generate(&[0xff]));
        assert!(engine.start());

        let mut tones = vec![engine.tone()];
        for _ in 0..7 {
            for _ in 0..8 {
                engine.tick();
            }
            tones.push(engine.tone());
        }
        // 0 1 1 1 1 1 1 0
        use Tone::{Mark, Space};
        assert_eq!(tones, [Space, Space, Space, Space, Space, Space, Space, Mark]);
    }

    #[test]
    fn test_phase_is_continuous_across_tone_changes() {
        let mut engine = engine(2, 0);
        assert!(engine.generate(&[0x00, 0x0f]));
        assert!(engine.start());

        let step_mark = ToneSynthesizer::new(9_600).unwrap().step(Tone::Mark);
        let step_space = ToneSynthesizer::new(9_600).unwrap().step(Tone::Space);
        while engine.is_busy() {
            let before = engine.phase_accumulator().raw();
            let step = match engine.tone() {
                Tone::Mark => step_mark,
                Tone::Space => step_space,
            };
            engine.tick();
            assert_eq!(engine.phase_accumulator().raw(), before.wrapping_add(step));
        }
    }

    #[test]
    fn test_final_sample_is_held_for_one_period() {
        let mut engine = engine(0, 1);
        assert!(engine.generate(&[0x00]));
        assert!(engine.start());

        let mut writes = std::vec::Vec::new();
        while engine.is_busy() {
            let before = engine.sink().len();
            engine.tick();
            writes.push(engine.sink().len() - before);
        }
        assert!(writes.iter().all(|&n| n == 1));

        let last = *engine.sink().last().unwrap();
        assert_ne!(last, IDLE_CODE);
        engine.tick();
        let samples = engine.release();
        assert_eq!(&samples[samples.len() - 2..], &[last, IDLE_CODE]);
    }

    #[test]
    fn test_stop_forces_idle() {
        let mut engine = engine(4, 1);
        assert!(engine.generate(&[0x12, 0x34]));
        assert!(engine.start());
        for _ in 0..37 {
            engine.tick();
        }
        assert!(engine.is_busy());

        engine.stop();
        assert!(!engine.is_busy());
        assert_eq!(engine.bits_remaining(), 0);
        assert_eq!(engine.phase(), TxPhase::Done);
        engine.stop();
        engine.tick();
        assert!(!engine.start());

        let samples = engine.release();
        assert_eq!(&samples[samples.len() - 3..], &[IDLE_CODE; 3]);
    }

    #[test]
    fn test_completed_plan_needs_regenerate() {
        let mut engine = engine(1, 1);
        assert!(engine.generate(&[HDLC_FLAG]));
        assert!(engine.start());
        let _ = run_to_completion(&mut engine);
        assert!(!engine.start());
        assert!(engine.generate(&[HDLC_FLAG]));
        assert!(engine.start());
    }

    #[test]
    fn test_station_frame_end_to_end() {
        let mut frame = [0u8; 128];
        let len = StationConfig::default().encode(b">HELLO", &mut frame).unwrap();

        let mut engine = engine(40, 3);
        assert!(engine.generate(&frame[..len]));
        let expected = HdlcBits::new(&frame[..len], 40, 3).count() as u32;
        assert_eq!(engine.planned_bits(), expected);
        assert!(engine.planned_bits() >= (40 + 3 + len as u32) * 8);

        assert!(engine.start());
        let ticks = run_to_completion(&mut engine);
        assert_eq!(ticks as u32, expected * 8);
        engine.tick();
        assert_eq!(*engine.sink().last().unwrap(), IDLE_CODE);
    }
}
