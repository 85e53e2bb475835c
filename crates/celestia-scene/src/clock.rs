//! Scene clock: the single time source for per-frame rules.

use std::time::Instant;

use tracing::warn;

/// Largest delta reported by one tick (250ms). Longer stalls, such as a
/// minimised window, are clamped so time-scaled motion does not jump.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Timing for one tick, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Time since the scene was created.
    pub elapsed: f64,
    /// Time since the previous tick, clamped to [`MAX_FRAME_TIME`].
    pub delta: f64,
}

/// Monotonic elapsed-time accumulator, reset when the scene is built.
#[derive(Clone, Debug)]
pub struct Clock {
    origin: Instant,
    last: Instant,
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(origin: Instant) -> Self {
        Self {
            origin,
            last: origin,
            elapsed: 0.0,
        }
    }

    /// Advance to `now`. Timestamps earlier than the previous tick report a
    /// zero delta and leave elapsed time where it was.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let mut delta = now.saturating_duration_since(self.last).as_secs_f64();
        if now > self.last {
            self.last = now;
        }
        if delta > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                delta * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            delta = MAX_FRAME_TIME;
        }
        self.elapsed = self
            .elapsed
            .max(self.last.duration_since(self.origin).as_secs_f64());

        FrameTime {
            elapsed: self.elapsed,
            delta,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_starts_at_zero() {
        let origin = Instant::now();
        let mut clock = Clock::started_at(origin);
        assert_eq!(clock.elapsed(), 0.0);
        let frame = clock.tick(origin);
        assert_eq!(frame, FrameTime::default());
    }

    #[test]
    fn test_elapsed_and_delta() {
        let origin = Instant::now();
        let mut clock = Clock::started_at(origin);
        clock.tick(origin + Duration::from_millis(16));
        let frame = clock.tick(origin + Duration::from_millis(48));
        assert!((frame.elapsed - 0.048).abs() < 1e-9);
        assert!((frame.delta - 0.032).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_order_timestamp_is_monotonic() {
        let origin = Instant::now();
        let mut clock = Clock::started_at(origin);
        clock.tick(origin + Duration::from_millis(100));
        let frame = clock.tick(origin + Duration::from_millis(50));
        assert_eq!(frame.delta, 0.0);
        assert!((frame.elapsed - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_long_stall_clamps_delta_not_elapsed() {
        let origin = Instant::now();
        let mut clock = Clock::started_at(origin);
        let frame = clock.tick(origin + Duration::from_secs(3));
        assert_eq!(frame.delta, MAX_FRAME_TIME);
        assert!((frame.elapsed - 3.0).abs() < 1e-9);
    }
}
