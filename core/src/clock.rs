/// Fixed-step simulation clock: one step per rendered frame, independent of
/// wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    dt: f32,
    steps: u64,
}

impl FrameClock {
    pub fn new(dt: f32) -> Self {
        Self { dt, steps: 0 }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Record one step and return its index (starting at 1).
    pub fn advance(&mut self) -> u64 {
        self.steps += 1;
        self.steps
    }

    /// Simulated seconds. Multiplied, not summed, so it carries no accumulated error.
    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * f64::from(self.dt)
    }
}
