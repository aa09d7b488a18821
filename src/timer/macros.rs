/// Declares a static global `AFSK_ENGINE` protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `AFSK_ENGINE` suitable for use in
/// interrupt-based environments, where both the main context and the sample
/// ISR need to reach the same modulator.
///
/// # Arguments
/// - `$sink`: The concrete [`SampleSink`](crate::dac::SampleSink) type
///
/// # Example
/// ```rust,ignore
/// init_afsk_engine!(ParallelDac<PA0, PA1, PA4, PA15>);
/// ```
#[macro_export]
macro_rules! init_afsk_engine {
    ( $sink:ty ) => {
        /// Modulator shared with the sample-timer interrupt.
        pub static AFSK_ENGINE: $crate::critical_section::Mutex<
            ::core::cell::RefCell<::core::option::Option<$crate::afsk::AfskEngine<$sink>>>,
        > = $crate::critical_section::Mutex::new(::core::cell::RefCell::new(
            ::core::option::Option::None,
        ));
    };
}

/// Builds an engine and installs it in the global `AFSK_ENGINE`.
///
/// Evaluates to `Result<(), ConfigError>`.
///
/// # Arguments
/// - `$sink`: The sink instance (e.g. a [`ParallelDac`](crate::dac::ParallelDac))
/// - `$config`: An [`AfskConfig`](crate::config::AfskConfig)
///
/// # Example
/// ```rust,ignore
/// main() {
///     setup_afsk_engine!(dac, AfskConfig::default()).unwrap();
/// }
/// ```
///
/// # Notes
/// - Requires `init_afsk_engine!` to have been used earlier.
#[macro_export]
macro_rules! setup_afsk_engine {
    ( $sink:expr, $config:expr ) => {
        $crate::afsk::AfskEngine::new($sink, $config)
            .map(|engine| $crate::timer::global_engine_setup(&AFSK_ENGINE, engine))
    };
}

/// Calls `tick()` on the global `AFSK_ENGINE` if it has been initialized.
///
/// Intended to be the whole body of the sample-timer ISR.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM3() {
///     tick_afsk_timer!();
/// }
/// ```
///
/// # Notes
/// - Safe to call repeatedly; does nothing if the engine hasn't been set up yet.
#[macro_export]
macro_rules! tick_afsk_timer {
    () => {
        $crate::timer::global_timer_tick(&AFSK_ENGINE)
    };
}
