//! Wall-clock time source and the cloud wind-phase derivation.
//!
//! Cloud motion is keyed to UTC time-of-day rather than session time, so every
//! viewer sees the same cloud phase no matter when their session started.

use chrono::{NaiveTime, Timelike, Utc};
use glam::Vec4;

/// Seconds in one UTC day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Wind phases wrap every 12 hours.
pub const PHASE_PERIOD: f64 = SECONDS_PER_DAY / 2.0;

/// The slow wind phase advances at this fraction of the fast one.
pub const SLOW_PHASE_DIVISOR: f64 = 20.0;

/// Source of UTC time-of-day.
pub trait Clock {
    /// Seconds elapsed since UTC midnight, in `[0, 86400)`.
    fn utc_seconds_of_day(&self) -> f64;
}

/// Reads the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn utc_seconds_of_day(&self) -> f64 {
        seconds_of_day(&Utc::now())
    }
}

/// A clock frozen at a fixed time-of-day. Useful for tests and replays.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedClock {
    seconds: f64,
}

impl FixedClock {
    /// Freeze at `seconds` past midnight, wrapped into a single day.
    pub fn new(seconds: f64) -> Self {
        Self {
            seconds: seconds.rem_euclid(SECONDS_PER_DAY),
        }
    }

    /// Freeze at the given wall-clock time.
    pub fn at(time: NaiveTime) -> Self {
        Self::new(seconds_of_day(&time))
    }

    /// Move the frozen time forward, wrapping at midnight.
    pub fn advance(&mut self, seconds: f64) {
        *self = Self::new(self.seconds + seconds);
    }
}

impl Clock for FixedClock {
    fn utc_seconds_of_day(&self) -> f64 {
        self.seconds
    }
}

/// Fractional seconds since midnight for any chrono time value.
pub fn seconds_of_day<T: Timelike>(time: &T) -> f64 {
    // chrono represents a leap second as nanosecond >= 1e9.
    let nanos = time.nanosecond().min(999_999_999);
    f64::from(time.num_seconds_from_midnight()) + f64::from(nanos) * 1e-9
}

fn wrap_phase(value: f64) -> f32 {
    let phase = value.rem_euclid(PHASE_PERIOD) as f32;
    // Rounding to f32 can land exactly on the period.
    if phase.is_finite() && phase < PHASE_PERIOD as f32 {
        phase
    } else {
        0.0
    }
}

/// Encode the two cloud wind phases for a given speed and time-of-day.
///
/// Returns `(slow, fast, 0.0, 1.0)` where `fast = speed * t mod 43200` and
/// `slow` advances twenty times slower. Both components lie in `[0, 43200)`.
pub fn time_vector(cloud_speed: f32, seconds_of_day: f64) -> Vec4 {
    let travelled = f64::from(cloud_speed) * seconds_of_day;
    Vec4::new(
        wrap_phase(travelled / SLOW_PHASE_DIVISOR),
        wrap_phase(travelled),
        0.0,
        1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_am_at_speed_six() {
        let v = time_vector(6.0, 3600.0);
        assert_eq!(v, Vec4::new(1080.0, 21600.0, 0.0, 1.0));
    }

    #[test]
    fn test_zero_speed_freezes_phases() {
        for t in [0.0, 1.0, 3600.0, 43_200.0, 86_399.9] {
            let v = time_vector(0.0, t);
            assert_eq!(v.x, 0.0);
            assert_eq!(v.y, 0.0);
            assert_eq!(v.w, 1.0);
        }
    }

    #[test]
    fn test_phases_stay_in_range() {
        for speed in [0.5_f32, 1.0, 6.0, 12.0] {
            let mut t = 0.0;
            while t < SECONDS_PER_DAY {
                let v = time_vector(speed, t);
                assert!((0.0..PHASE_PERIOD as f32).contains(&v.x), "slow {v:?}");
                assert!((0.0..PHASE_PERIOD as f32).contains(&v.y), "fast {v:?}");
                assert_eq!(v.z, 0.0);
                t += 137.3;
            }
        }
    }

    #[test]
    fn test_fast_phase_monotonic_then_wraps() {
        let mut previous = time_vector(1.0, 0.0).y;
        for second in 1..43_200 {
            let phase = time_vector(1.0, f64::from(second)).y;
            assert!(phase >= previous, "phase went backwards at {second}s");
            previous = phase;
        }
        assert_eq!(time_vector(1.0, PHASE_PERIOD).y, 0.0);
    }

    #[test]
    fn test_fast_phase_repeats_after_period() {
        let speed = 4.0_f32;
        let period = PHASE_PERIOD / f64::from(speed);
        for t in [0.0, 12.5, 600.0, 5000.0] {
            let a = time_vector(speed, t).y;
            let b = time_vector(speed, t + period).y;
            assert!((a - b).abs() < 1e-3, "{a} != {b} at t={t}");
        }
    }

    #[test]
    fn test_slow_phase_is_twentieth_of_fast_before_wrap() {
        let v = time_vector(2.0, 1000.0);
        assert!((v.x - v.y / 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_fixed_clock_wraps_into_day() {
        assert_eq!(FixedClock::new(86_400.0 + 5.0).utc_seconds_of_day(), 5.0);
        assert_eq!(FixedClock::new(-1.0).utc_seconds_of_day(), 86_399.0);
    }

    #[test]
    fn test_fixed_clock_from_naive_time() {
        let time = NaiveTime::from_hms_opt(1, 0, 0).unwrap();
        assert_eq!(FixedClock::at(time).utc_seconds_of_day(), 3600.0);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let mut clock = FixedClock::new(86_000.0);
        clock.advance(500.0);
        assert_eq!(clock.utc_seconds_of_day(), 100.0);
    }

    #[test]
    fn test_seconds_of_day_includes_fraction() {
        let time = NaiveTime::from_hms_milli_opt(0, 0, 10, 500).unwrap();
        assert!((seconds_of_day(&time) - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_system_clock_in_day_range() {
        let t = SystemClock.utc_seconds_of_day();
        assert!((0.0..SECONDS_PER_DAY).contains(&t));
    }
}
