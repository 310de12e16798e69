//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer tracking delta time, frame count and periodic FPS reports
pub struct FrameTimer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    report_interval: Duration,
    last_report: Instant,
    frames_since_report: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl FrameTimer {
    /// Create a new timer that produces an FPS sample every `report_interval`
    pub fn new(report_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            report_interval,
            last_report: now,
            frames_since_report: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    ///
    /// Returns the FPS over the last report window when that window has elapsed.
    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f32> {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.frames_since_report += 1;

        let window = now.saturating_duration_since(self.last_report);
        if window < self.report_interval || window.is_zero() {
            return None;
        }

        let fps = self.frames_since_report as f32 / window.as_secs_f32();
        self.last_report = now;
        self.frames_since_report = 0;
        Some(fps)
    }

    /// Get the time since the last frame in seconds
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total time accumulated across ticks
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tick_counts_frames() {
        let mut timer = FrameTimer::new(Duration::from_secs(60));
        let start = timer.last_frame;
        timer.tick_at(start + Duration::from_millis(10));
        timer.tick_at(start + Duration::from_millis(20));

        assert_eq!(timer.frame_count(), 2);
        assert_relative_eq!(timer.delta_time(), 0.01, epsilon = 1e-6);
        assert_relative_eq!(timer.total_time(), 0.02, epsilon = 1e-6);
        assert_relative_eq!(timer.average_fps(), 100.0, epsilon = 1e-2);
    }

    #[test]
    fn test_fps_report_after_interval() {
        let mut timer = FrameTimer::new(Duration::from_secs(1));
        let start = timer.last_frame;

        for i in 1..10 {
            assert!(timer.tick_at(start + Duration::from_millis(100 * i)).is_none());
        }
        let fps = timer.tick_at(start + Duration::from_secs(1));
        assert_relative_eq!(fps.unwrap_or_default(), 10.0, epsilon = 1e-3);

        // Window restarts after a report
        assert!(timer.tick_at(start + Duration::from_millis(1100)).is_none());
    }

    #[test]
    fn test_average_fps_without_frames() {
        let timer = FrameTimer::default();
        assert_eq!(timer.average_fps(), 0.0);
    }
}
