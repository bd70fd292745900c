//! # Frame timing
//!
//! Tracks the interval between consecutive frames over a sliding window and
//! derives the FPS and frame-time figures shown in the settings panel.
//!
//! ```rust
//! use lifeview::performance::PerformanceMonitor;
//! use std::time::Instant;
//!
//! let mut monitor = PerformanceMonitor::new();
//!
//! // Once per rendered frame
//! monitor.record_frame(Instant::now());
//!
//! let stats = monitor.stats();
//! println!("{:.1} fps", stats.fps);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Derived frame statistics
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    /// Frames per second over the sample window
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    /// Shortest frame in the sample window
    pub min_frame_time_ms: f32,
    /// Longest frame in the sample window
    pub max_frame_time_ms: f32,
    /// Frames recorded since startup
    pub frames: u64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            frames: 0,
        }
    }
}

/// Sliding-window frame timer
pub struct PerformanceMonitor {
    /// Ring buffer of recent frame intervals
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    last_frame: Option<Instant>,
    frames: u64,
    stats: FrameStats,
    last_update: Option<Instant>,
    /// Minimum time between recomputations of `stats`
    update_interval: Duration,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        // ~2 seconds at 60fps
        Self::with_config(120, Duration::from_millis(100))
    }

    pub fn with_config(max_samples: usize, update_interval: Duration) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            last_frame: None,
            frames: 0,
            stats: FrameStats::default(),
            last_update: None,
            update_interval,
        }
    }

    /// Marks the start of a frame at `now`.
    pub fn record_frame(&mut self, now: Instant) {
        self.frames += 1;

        if let Some(previous) = self.last_frame.replace(now) {
            if self.frame_times.len() >= self.max_samples {
                self.frame_times.pop_front();
            }
            self.frame_times
                .push_back(now.saturating_duration_since(previous));
        }

        let due = self
            .last_update
            .map_or(true, |last| now.saturating_duration_since(last) >= self.update_interval);
        if due {
            self.update_stats();
            self.last_update = Some(now);
        }
    }

    fn update_stats(&mut self) {
        self.stats.frames = self.frames;
        if self.frame_times.is_empty() {
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let average = total.as_secs_f32() / self.frame_times.len() as f32;
        let (min, max) = self.frame_times.iter().fold(
            (Duration::MAX, Duration::ZERO),
            |(min, max), &t| (min.min(t), max.max(t)),
        );

        self.stats.frame_time_ms = average * 1000.0;
        self.stats.fps = if average > 0.0 { 1.0 / average } else { 0.0 };
        self.stats.min_frame_time_ms = min.as_secs_f32() * 1000.0;
        self.stats.max_frame_time_ms = max.as_secs_f32() * 1000.0;
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}
