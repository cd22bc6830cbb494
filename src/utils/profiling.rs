use std::time::Duration;

/// Timing and population data for the most recent step.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfile {
    pub collision_time: Duration,
    pub sweep_time: Duration,
    pub gravity_time: Duration,
    pub spring_time: Duration,
    pub drag_time: Duration,
    pub integrator_time: Duration,

    pub body_count: usize,
    pub spring_edge_count: usize,
    pub collisions: usize,
    pub merges: usize,
    pub deleted: usize,
}

impl StepProfile {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total_time(&self) -> Duration {
        self.collision_time
            + self.sweep_time
            + self.gravity_time
            + self.spring_time
            + self.drag_time
            + self.integrator_time
    }

    pub fn report(&self) {
        let total_us = self.total_time().as_micros() as f64;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "step: {} bodies, {} springs, {} collisions, {} merges, {} deleted, {:.2} ms",
            self.body_count,
            self.spring_edge_count,
            self.collisions,
            self.merges,
            self.deleted,
            total_us / 1000.0
        );
        for (label, phase) in [
            ("collisions", self.collision_time),
            ("sweep", self.sweep_time),
            ("gravity", self.gravity_time),
            ("springs", self.spring_time),
            ("drag", self.drag_time),
            ("integrate", self.integrator_time),
        ] {
            log::debug!(
                "  {label:<10} {:.2} ms ({:.1}%)",
                phase.as_secs_f64() * 1000.0,
                phase.as_micros() as f64 / total_us * 100.0
            );
        }
    }
}

/// Frames-per-second counter fed with wall-clock frame durations.
///
/// The reported value is refreshed once per accumulated second.
#[derive(Debug, Default, Clone, Copy)]
pub struct FpsCounter {
    frames: u32,
    window: Duration,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, frame: Duration) {
        self.frames += 1;
        self.window += frame;
        if self.window > Duration::from_secs(1) {
            self.fps = self.frames;
            self.frames = 0;
            self.window = Duration::ZERO;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
