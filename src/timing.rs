//! Per-phase timing instrumentation. Phases are recorded as tracing spans, so whether and where
//! the timings end up is decided by whatever subscriber the caller installed (see
//! `setup_tracing`).

/// Opens a span covering the rest of the enclosing scope.
#[macro_export]
macro_rules! timing_phase {
    ($($args:tt)*) => {
        let _guard = tracing::info_span!($($args)*).entered();
    };
}
