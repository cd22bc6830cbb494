use log::{log_enabled, warn, Level};
use std::time::{Duration, Instant};

/// Scoped timer for one step phase. Traces start/end when trace logging is on
/// and adds the elapsed time to `output` on drop.
pub struct ScopedTimer<'a> {
    label: &'static str,
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'static str, output: &'a mut Duration) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
            output,
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        *self.output += elapsed;
        if log_enabled!(Level::Trace) {
            log::trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Emits a warning when a frame took longer than `budget_ms`. Returns whether it did.
pub fn warn_if_frame_budget_exceeded(duration: Duration, budget_ms: f64) -> bool {
    let elapsed_ms = duration.as_secs_f64() * 1000.0;
    if budget_ms > 0.0 && elapsed_ms > budget_ms {
        warn!("Frame exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
        return true;
    }
    false
}
