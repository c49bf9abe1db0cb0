//! Fixed-timestep frame loop.
//!
//! Scene simulation (the viewer's movement) advances in fixed 60 Hz steps
//! through an accumulator; the per-frame callback, where the atmosphere
//! updater publishes, runs exactly once per tick.

use std::time::{Duration, Instant};

use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame time fed to the accumulator; longer frames are clamped so a
/// stall does not trigger a burst of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Target pause between frames when pacing to real time.
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Accumulator-driven frame loop.
pub struct GameLoop {
    previous_time: Instant,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Run one frame against wall-clock time.
    ///
    /// `step_fn(fixed_dt, sim_time)` runs zero or more times, then
    /// `frame_fn(frame_index)` runs once.
    pub fn tick(&mut self, step_fn: impl FnMut(f64, f64), frame_fn: impl FnMut(u64)) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(elapsed, step_fn, frame_fn);
    }

    /// Run one frame with an explicit frame time in seconds.
    pub fn advance(
        &mut self,
        frame_time: f64,
        mut step_fn: impl FnMut(f64, f64),
        mut frame_fn: impl FnMut(u64),
    ) {
        let frame_time = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time.max(0.0)
        };

        self.accumulator += frame_time;
        while self.accumulator >= FIXED_DT {
            step_fn(FIXED_DT, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        frame_fn(self.frame_count);
        self.frame_count += 1;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step() {
        let mut game_loop = GameLoop::new();
        let mut steps = 0u32;
        game_loop.advance(FIXED_DT, |_, _| steps += 1, |_| {});
        assert_eq!(steps, 1);
        assert!(game_loop.accumulator.abs() < 1e-12);
    }

    #[test]
    fn test_multiple_steps_accumulate_sim_time() {
        let mut game_loop = GameLoop::new();
        let mut steps = 0u32;
        game_loop.advance(3.0 * FIXED_DT, |_, _| steps += 1, |_| {});
        assert_eq!(steps, 3);
        assert!((game_loop.total_sim_time() - 3.0 * FIXED_DT).abs() < 1e-12);
    }

    #[test]
    fn test_frame_runs_once_even_without_steps() {
        let mut game_loop = GameLoop::new();
        let mut steps = 0u32;
        let mut frames = Vec::new();
        game_loop.advance(0.5 * FIXED_DT, |_, _| steps += 1, |i| frames.push(i));
        game_loop.advance(0.0, |_, _| steps += 1, |i| frames.push(i));
        assert_eq!(steps, 0);
        assert_eq!(frames, vec![0, 1]);
        assert_eq!(game_loop.frame_count(), 2);
    }

    #[test]
    fn test_max_frame_time_clamp() {
        let mut game_loop = GameLoop::new();
        let mut steps = 0u32;
        game_loop.advance(1.0, |_, _| steps += 1, |_| {});
        let max_steps = (MAX_FRAME_TIME / FIXED_DT).ceil() as u32;
        assert!(steps > 0 && steps <= max_steps, "got {steps} steps");
        assert_eq!(game_loop.update_count(), u64::from(steps));
    }

    #[test]
    fn test_negative_frame_time_ignored() {
        let mut game_loop = GameLoop::new();
        game_loop.advance(-1.0, |_, _| {}, |_| {});
        assert_eq!(game_loop.accumulator, 0.0);
    }

    #[test]
    fn test_sim_time_passed_to_steps() {
        let mut game_loop = GameLoop::new();
        let mut times = Vec::new();
        game_loop.advance(2.0 * FIXED_DT + 1e-9, |_, t| times.push(t), |_| {});
        assert_eq!(times.len(), 2);
        assert_eq!(times[0], 0.0);
        assert!((times[1] - FIXED_DT).abs() < 1e-12);
    }
}
