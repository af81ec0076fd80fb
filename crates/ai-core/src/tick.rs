/// Per-frame timing handed to every controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    /// Simulation time at the start of this tick.
    pub time_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, time_seconds: f32) -> Self {
        Self {
            tick,
            dt_seconds,
            time_seconds,
        }
    }

    /// Context for the first frame of a fixed-step simulation.
    pub fn first(dt_seconds: f32) -> Self {
        Self::new(0, dt_seconds, 0.0)
    }

    /// Context for the frame following this one, keeping the same step.
    pub fn next(self) -> Self {
        Self {
            tick: self.tick + 1,
            dt_seconds: self.dt_seconds,
            time_seconds: self.time_seconds + self.dt_seconds,
        }
    }

    /// Step length clamped to be non-negative.
    pub fn dt(&self) -> f32 {
        self.dt_seconds.max(0.0)
    }
}
