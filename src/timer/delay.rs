use embedded_hal::delay::DelayNs;

use crate::sequencer::Modem;
use crate::timer::Tickable;

/// Runs a blocking loop that repeatedly calls `tick()` on `engine`.
///
/// For targets where a timer interrupt is unavailable. The loop spends
/// `tick_ns` in `delay` after every tick, so the effective sample period is
/// `tick_ns` plus the tick's own run time; calibrate `tick_ns` accordingly.
///
/// # Arguments
/// - `engine`: the modulator (or anything [`Tickable`])
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL
/// - `tick_ns`: nominal sample period, see [`super::tick_period_ns`]
///
/// # Notes
/// - This loop never returns; it is intended for single-purpose polling firmware.
pub fn run_tick_loop<T: Tickable, D: DelayNs>(engine: &mut T, delay: &mut D, tick_ns: u32) -> ! {
    loop {
        engine.tick();
        delay.delay_ns(tick_ns);
    }
}

/// Ticks a started modem until it goes idle and returns the ticks spent.
///
/// Termination follows from the finite plan; call `start()` first or this
/// returns immediately.
pub fn drive_to_completion<M, D>(modem: &mut M, delay: &mut D, tick_ns: u32) -> u32
where
    M: Modem + Tickable,
    D: DelayNs,
{
    let mut ticks = 0u32;
    while modem.is_busy() {
        modem.tick();
        delay.delay_ns(tick_ns);
        ticks = ticks.saturating_add(1);
    }
    ticks
}
