use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;

use crate::sequencer::Modem;
use crate::timer::Tickable;

/// A modulator shared between the main context and the sample interrupt.
pub type GlobalEngine<T> = Mutex<RefCell<Option<T>>>;

/// Used to initialize the global static engine for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust
/// use afsk1200::afsk::AfskEngine;
/// use afsk1200::timer::{GlobalEngine, global_engine_init};
///
/// static AFSK: GlobalEngine<AfskEngine<Vec<u8>>> = global_engine_init();
/// ```
pub const fn global_engine_init<T>() -> GlobalEngine<T> {
    Mutex::new(RefCell::new(None))
}

/// Installs `engine` in the global slot, replacing any previous one.
///
/// Call from `main()` before enabling the sample-timer interrupt.
pub fn global_engine_setup<T>(global: &'static GlobalEngine<T>, engine: T) {
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(engine));
    });
}

/// Removes and returns the engine from the global slot.
pub fn global_engine_take<T>(global: &'static GlobalEngine<T>) -> Option<T> {
    critical_section::with(|cs| global.borrow(cs).take())
}

/// Runs the tick at each interrupt
///
/// Does nothing until [`global_engine_setup`] has been called.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM3() {
///     global_timer_tick(&AFSK);
/// }
/// ```
pub fn global_timer_tick<T: Tickable>(global: &'static GlobalEngine<T>) {
    critical_section::with(|cs| {
        if let Some(engine) = global.borrow(cs).borrow_mut().as_mut() {
            engine.tick();
        }
    });
}

/// Runs `f` on the installed engine inside a critical section.
///
/// Returns `None` if no engine is installed. Keep `f` short: the sample
/// interrupt is held off while it runs.
pub fn with_global_engine<T, R>(
    global: &'static GlobalEngine<T>,
    f: impl FnOnce(&mut T) -> R,
) -> Option<R> {
    critical_section::with(|cs| global.borrow(cs).borrow_mut().as_mut().map(f))
}

/// Main-context handle to a [`GlobalEngine`], usable wherever a [`Modem`]
/// is expected (e.g. [`crate::sequencer::Transmitter`]).
///
/// Every call takes the critical section briefly, so the interrupt keeps
/// ticking between status polls.
pub struct SharedEngine<T: 'static> {
    global: &'static GlobalEngine<T>,
}

impl<T: 'static> SharedEngine<T> {
    /// Wraps the global slot.
    pub const fn new(global: &'static GlobalEngine<T>) -> Self {
        Self { global }
    }
}

impl<T: 'static> Clone for SharedEngine<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for SharedEngine<T> {}

impl<T: 'static> fmt::Debug for SharedEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEngine").finish_non_exhaustive()
    }
}

impl<T: Modem + 'static> Modem for SharedEngine<T> {
    fn generate(&mut self, frame: &[u8]) -> bool {
        with_global_engine(self.global, |engine| engine.generate(frame)).unwrap_or(false)
    }

    fn start(&mut self) -> bool {
        with_global_engine(self.global, |engine| engine.start()).unwrap_or(false)
    }

    fn stop(&mut self) {
        let _ = with_global_engine(self.global, |engine| engine.stop());
    }

    fn is_busy(&self) -> bool {
        with_global_engine(self.global, |engine| engine.is_busy()).unwrap_or(false)
    }

    fn bits_remaining(&self) -> u32 {
        with_global_engine(self.global, |engine| engine.bits_remaining()).unwrap_or(0)
    }
}
