//! Monotonic clock driving the per-frame animation.

use std::time::Instant;

/// Whether the host loop is still producing frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Measures time since the render loop started.
///
/// Elapsed time is always read against the fixed start instant, so the
/// animation never accumulates per-frame rounding.
#[derive(Clone, Debug)]
pub struct FrameClock {
    start: Instant,
    frame_count: u64,
    state: LoopState,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            frame_count: 0,
            state: LoopState::Running,
        }
    }

    /// Seconds from the start instant to `now`. Saturates at zero.
    pub fn elapsed_at(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.start).as_secs_f64()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed_at(Instant::now())
    }

    /// Count a new frame and return its elapsed time.
    pub fn begin_frame(&mut self) -> f64 {
        self.begin_frame_at(Instant::now())
    }

    pub fn begin_frame_at(&mut self, now: Instant) -> f64 {
        self.frame_count += 1;
        self.elapsed_at(now)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Terminal; a stopped clock is never restarted.
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_clock_is_running() {
        let clock = FrameClock::new();
        assert_eq!(clock.state(), LoopState::Running);
        assert_eq!(clock.frame_count(), 0);
    }

    #[test]
    fn test_elapsed_is_measured_from_start() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let elapsed = clock.begin_frame_at(start + Duration::from_millis(2500));
        assert!((elapsed - 2.5).abs() < 1e-9);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_elapsed_does_not_accumulate() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        for ms in [16, 33, 50, 1000] {
            clock.begin_frame_at(start + Duration::from_millis(ms));
        }
        let elapsed = clock.begin_frame_at(start + Duration::from_secs(10));
        assert!((elapsed - 10.0).abs() < 1e-9);
        assert_eq!(clock.frame_count(), 5);
    }

    #[test]
    fn test_earlier_instant_saturates_to_zero() {
        let start = Instant::now() + Duration::from_secs(5);
        let clock = FrameClock::starting_at(start);
        assert_eq!(clock.elapsed_at(Instant::now()), 0.0);
    }

    #[test]
    fn test_stop_is_terminal() {
        let mut clock = FrameClock::new();
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.state(), LoopState::Stopped);
    }

    #[test]
    fn test_monotonic_elapsed() {
        let clock = FrameClock::new();
        let first = clock.elapsed();
        let second = clock.elapsed();
        assert!(second >= first);
    }
}
