//! Fixed-timestep update gate
//!
//! The automaton advances at a fixed wall-clock rate no matter how fast frames
//! are rendered. A frame performs at most one step; when the host falls behind
//! by more than two intervals the schedule snaps to the present instead of
//! queueing catch-up work.

use std::time::{Duration, Instant};

/// Decides, once per frame, whether a simulation step is due
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    interval: Duration,
    last_step: Instant,
    was_running: bool,
    steps: u64,
}

impl UpdateScheduler {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_step: now,
            was_running: true,
            steps: 0,
        }
    }

    pub fn last_step(&self) -> Instant {
        self.last_step
    }

    /// Steps granted since construction
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Returns `true` when the caller should dispatch one step and swap.
    ///
    /// While paused nothing is granted and no backlog builds up; on the first
    /// running frame after a pause `last_step` restarts from `now`.
    pub fn tick(&mut self, now: Instant, running: bool) -> bool {
        if !running {
            self.was_running = false;
            return false;
        }

        if !self.was_running {
            self.was_running = true;
            self.last_step = now;
            return false;
        }

        let elapsed = now.saturating_duration_since(self.last_step);
        if elapsed <= self.interval {
            return false;
        }

        self.last_step = if elapsed > self.interval * 2 {
            now
        } else {
            self.last_step + self.interval
        };
        self.steps += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIXTY_HZ: Duration = Duration::from_nanos(1_000_000_000 / 60);

    /// Runs the scheduler for `seconds` of simulated time at `fps` frames per
    /// second and returns (frames, steps).
    fn simulate(fps: u64, seconds: u64) -> (u64, u64) {
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(SIXTY_HZ, start);
        let frame = Duration::from_nanos(1_000_000_000 / fps);
        let frames = fps * seconds;
        let mut steps = 0;

        for i in 1..=frames {
            if scheduler.tick(start + frame * i as u32, true) {
                steps += 1;
            }
        }
        (frames, steps)
    }

    #[test]
    fn test_step_count_independent_of_frame_rate() {
        let seconds = 5;
        let expected = (Duration::from_secs(seconds).as_nanos() / SIXTY_HZ.as_nanos()) as u64;

        for fps in [60, 61, 90, 120, 144, 240, 500, 1000] {
            let (_, steps) = simulate(fps, seconds);
            assert!(
                steps <= expected && steps + 3 >= expected,
                "{fps} fps produced {steps} steps, expected about {expected}"
            );
        }
    }

    #[test]
    fn test_frame_rate_equal_to_step_rate_steps_every_frame() {
        let (frames, steps) = simulate(60, 5);
        // The first frame lands exactly one interval after construction.
        assert_eq!(steps, frames - 1);
    }

    #[test]
    fn test_slow_frames_step_at_most_once() {
        for fps in [10, 24, 30, 59] {
            let (frames, steps) = simulate(fps, 3);
            assert_eq!(steps, frames, "{fps} fps should step exactly once per frame");
        }
    }

    #[test]
    fn test_no_step_before_interval() {
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(SIXTY_HZ, start);

        assert!(!scheduler.tick(start, true));
        assert!(!scheduler.tick(start + SIXTY_HZ, true));
        assert!(scheduler.tick(start + SIXTY_HZ + Duration::from_micros(1), true));
        assert_eq!(scheduler.steps(), 1);
    }

    #[test]
    fn test_paused_never_steps() {
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(SIXTY_HZ, start);

        for i in 1..=600u32 {
            assert!(!scheduler.tick(start + Duration::from_millis(10) * i, false));
        }
        assert_eq!(scheduler.steps(), 0);
    }

    #[test]
    fn test_resume_does_not_burst() {
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(SIXTY_HZ, start);

        assert!(!scheduler.tick(start + Duration::from_millis(5), false));

        // Ten seconds later the user presses Start.
        let resume = start + Duration::from_secs(10);
        assert!(!scheduler.tick(resume, true));
        assert_eq!(scheduler.last_step(), resume);

        // Frames shortly after the resume must not step.
        assert!(!scheduler.tick(resume + Duration::from_millis(8), true));
        assert!(!scheduler.tick(resume + Duration::from_millis(16), true));
        assert!(scheduler.tick(resume + Duration::from_millis(17), true));
        assert!(!scheduler.tick(resume + Duration::from_millis(18), true));
    }

    #[test]
    fn test_long_stall_snaps_to_now() {
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(SIXTY_HZ, start);

        let stalled = start + Duration::from_secs(2);
        assert!(scheduler.tick(stalled, true));
        assert_eq!(scheduler.last_step(), stalled);
        assert!(!scheduler.tick(stalled + Duration::from_millis(1), true));
    }
}
