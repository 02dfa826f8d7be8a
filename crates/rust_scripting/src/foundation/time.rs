//! Time management utilities

use std::time::Instant;

/// Elapsed time for one tick, in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Timestep(f32);

impl Timestep {
    /// Create a timestep from seconds
    pub const fn from_seconds(seconds: f32) -> Self {
        Self(seconds)
    }

    /// Seconds
    pub const fn seconds(self) -> f32 {
        self.0
    }

    /// Milliseconds
    pub fn millis(self) -> f32 {
        self.0 * 1000.0
    }
}

impl From<f32> for Timestep {
    fn from(seconds: f32) -> Self {
        Self(seconds)
    }
}

impl From<Timestep> for f32 {
    fn from(ts: Timestep) -> Self {
        ts.0
    }
}

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Measure the frame that just ended and return its timestep
    pub fn tick(&mut self) -> Timestep {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        Timestep(self.delta_time)
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed-step accumulator
///
/// Variable frame times are banked and drained in whole steps so physics
/// always advances by the same amount.
#[derive(Debug, Clone)]
pub struct FixedStepAccumulator {
    step: f32,
    max_steps: u32,
    accumulated: f32,
}

impl FixedStepAccumulator {
    /// Create an accumulator; `step` must be positive
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step: if step > 0.0 { step } else { 1.0 / 120.0 },
            max_steps: max_steps.max(1),
            accumulated: 0.0,
        }
    }

    /// Fixed step length
    pub fn step(&self) -> Timestep {
        Timestep(self.step)
    }

    /// Bank `elapsed` and return how many whole steps to run now
    ///
    /// Time beyond `max_steps` steps is discarded so a long stall cannot
    /// cause a runaway catch-up.
    pub fn advance(&mut self, elapsed: Timestep) -> u32 {
        self.accumulated += elapsed.seconds().max(0.0);
        let mut steps = 0;
        while self.accumulated >= self.step && steps < self.max_steps {
            self.accumulated -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulated >= self.step {
            log::debug!("Dropping {:.4}s of physics time after {} steps", self.accumulated, steps);
            self.accumulated = 0.0;
        }
        steps
    }

    /// Fraction of a step currently banked, in [0, 1)
    pub fn alpha(&self) -> f32 {
        self.accumulated / self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accumulator_runs_whole_steps() {
        let mut acc = FixedStepAccumulator::new(0.25, 8);

        assert_eq!(acc.advance(Timestep::from_seconds(0.1)), 0);
        assert_eq!(acc.advance(Timestep::from_seconds(0.2)), 1);
        assert_relative_eq!(acc.alpha(), 0.2, epsilon = 1e-5);
        assert_eq!(acc.advance(Timestep::from_seconds(0.5)), 2);
    }

    #[test]
    fn test_accumulator_caps_steps_and_drops_backlog() {
        let mut acc = FixedStepAccumulator::new(0.1, 3);

        assert_eq!(acc.advance(Timestep::from_seconds(10.0)), 3);
        assert_eq!(acc.advance(Timestep::from_seconds(0.0)), 0);
    }

    #[test]
    fn test_accumulator_rejects_non_positive_step() {
        let acc = FixedStepAccumulator::new(0.0, 0);
        assert_relative_eq!(acc.step().seconds(), 1.0 / 120.0);
    }

    #[test]
    fn test_timer_counts_frames() {
        let mut timer = Timer::new();
        timer.tick();
        timer.tick();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() >= timer.delta_time());
    }
}
