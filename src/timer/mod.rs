//! Sample-timer glue for the modulator.
//!
//! The engine exposes a single [`Tickable::tick`] entry point; this module
//! wires it to a time base. Two approaches are provided: an interrupt
//! service routine sharing the engine through `critical_section`
//! (`timer-isr` feature), or a blocking delay loop (`delay-loop` feature).
//!
//! Contains:
//! - [`Tickable`]: the one-method interface the time base drives
//! - [`compute_reload_value`] / [`actual_sample_rate`]: timer period helpers
//! - `global_engine_*` functions and the `*_afsk_*!` macros (feature `timer-isr`)
//! - `run_tick_loop` / `drive_to_completion` (feature `delay-loop`)
//!
//! Reload values for a 9600 Hz sample rate:
//!
//! | Timer clock | Period (counts) | ARR | Actual rate |
//! |-------------|-----------------|-----|-------------|
//! |   16 MHz    |            1667 | 1666|  9598 Hz    |
//! |   84 MHz    |            8750 | 8749|  9600 Hz    |
//! |  168 MHz    |           17500 |17499|  9600 Hz    |

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// Something advanced once per sample period.
///
/// Implementations must return quickly and never block: they run inside the
/// sample-timer interrupt.
pub trait Tickable {
    /// Advances by one sample.
    fn tick(&mut self);
}

/// Nanoseconds per sample at `sample_rate_hz`, rounded (104 167 ns at 9600 Hz).
pub const fn tick_period_ns(sample_rate_hz: u32) -> u32 {
    if sample_rate_hz == 0 {
        return 0;
    }
    ((1_000_000_000u64 + sample_rate_hz as u64 / 2) / sample_rate_hz as u64) as u32
}

/// Timer counts per sample for an up-counting timer clocked at `timer_clk_hz`.
///
/// Rounded to the nearest count and never below 1. Hardware that reloads
/// from an auto-reload register wants `period - 1`.
pub const fn compute_reload_value(timer_clk_hz: u32, sample_rate_hz: u32) -> u32 {
    if sample_rate_hz == 0 {
        return 1;
    }
    let period = (timer_clk_hz as u64 + sample_rate_hz as u64 / 2) / sample_rate_hz as u64;
    if period < 1 { 1 } else { period as u32 }
}

/// Sample rate a timer actually produces with the given period.
pub const fn actual_sample_rate(timer_clk_hz: u32, period: u32) -> u32 {
    if period == 0 {
        return 0;
    }
    timer_clk_hz / period
}
