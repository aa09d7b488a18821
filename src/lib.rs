//! # afsk1200
//!
//! A portable, no_std Rust AX.25/APRS transmitter: it assembles UI frames and
//! modulates them as Bell-202 AFSK1200 audio on a 4-bit DAC, one sample per
//! timer interrupt.
//!
//! This crate implements the transmit chain using:
//! - an AX.25 UI frame encoder with CRC-16/X-25 frame check sequence
//! - HDLC flags, zero-bit insertion and NRZI applied on the fly
//! - a continuous-phase tone synthesizer over a 64-entry sine table
//! - interrupt-safe engine access with `critical-section`
//! - optional tick sources using either timer interrupts or blocking delay
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]`; `Vec<u8>` becomes a recording sample sink |
//! | `delay-loop`          | Uses `embedded_hal::delay::DelayNs` for sample timing |
//! | `timer-isr` (default) | Shares the engine with a timer ISR through `critical_section` |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust
//! use afsk1200::afsk::AfskEngine;
//! use afsk1200::aprs::status_report;
//! use afsk1200::config::{AfskConfig, StationConfig};
//!
//! let info = status_report("T=21.5C", "73").unwrap();
//! let mut frame = [0u8; 330];
//! let len = StationConfig::default()
//!     .encode(info.as_bytes(), &mut frame)
//!     .unwrap();
//!
//! let mut samples: Vec<u8> = Vec::new();
//! let mut engine = AfskEngine::new(&mut samples, AfskConfig::default()).unwrap();
//! assert!(engine.generate(&frame[..len]));
//! assert!(engine.start());
//! while engine.is_busy() {
//!     engine.tick(); // Call at 9600 Hz, ~104 µs intervals
//! }
//! ```
//!
//! On hardware, install the engine globally and tick it from the sample
//! timer:
//!
//! ```rust,ignore
//! afsk1200::init_afsk_engine!(ParallelDac<PA0, PA1, PA4, PA15>);
//!
//! #[interrupt]
//! fn TIM3() {
//!     afsk1200::tick_afsk_timer!();
//! }
//! ```
//!
//! and key the radio with [`sequencer::Transmitter`] over a
//! [`timer::SharedEngine`].
//!
//! ## Integration Notes
//!
//! - Every sample tick must run on time; a late or dropped tick corrupts
//!   the frame on air
//! - Use [`timer::compute_reload_value`] to derive the timer period
//! - Only one engine instance should be active at a time in interrupt-driven mode

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

pub use heapless;

#[macro_use]
mod fmt;

pub mod afsk;
pub mod aprs;
pub mod ax25;
pub mod config;
pub mod consts;
pub mod crc;
pub mod dac;
pub mod error;
pub mod hdlc;
pub mod sequencer;
pub mod timer;
pub mod tone;
