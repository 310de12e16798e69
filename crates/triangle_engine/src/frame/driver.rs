//! Frame loop driver
//!
//! Each iteration polls events, derives the geometry and transform from the
//! current framebuffer size and clock, and hands the frame to the renderer.
//! The loop ends only through the window's close flag.

use super::geometry::FrameGeometry;
use super::transform::{rotation_degrees, FrameTransform};
use crate::config::DemoConfig;
use crate::foundation::time::FrameTimer;
use crate::render::{FrameOutcome, FrameRenderer, RenderFrame, RenderResult};
use crate::window::{dispatch_event, WindowBackend};

/// How long a non-drawable (minimized) frame blocks waiting for events
pub const IDLE_WAIT_SECONDS: f64 = 0.1;

/// Counters collected while the loop runs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frames that reached the screen
    pub frames_presented: u64,
    /// Frames skipped because the framebuffer had a zero dimension
    pub frames_skipped: u64,
    /// Frames dropped to rebuild an out-of-date swapchain
    pub swapchain_rebuilds: u64,
    /// Average frames per second over the whole run
    pub average_fps: f32,
}

/// Result of a single loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The frame was presented
    Presented,
    /// Nothing to draw into this frame
    Skipped,
    /// The renderer rebuilt its swapchain instead of presenting
    SwapchainRebuilt,
    /// The close flag was already set; nothing happened
    Closed,
}

/// Drives one window and one renderer until the window closes
///
/// Field order matters: the renderer owns GPU objects bound to the window's
/// surface and must drop first.
pub struct FrameLoop<W: WindowBackend, R: FrameRenderer> {
    renderer: R,
    window: W,
    clear_color: [f32; 4],
    rotation_speed: f64,
    timer: FrameTimer,
    stats: FrameStats,
}

impl<W: WindowBackend, R: FrameRenderer> FrameLoop<W, R> {
    /// Create a loop over an open window and a ready renderer
    pub fn new(window: W, renderer: R, config: &DemoConfig) -> Self {
        Self {
            renderer,
            window,
            clear_color: config.render.clear_color,
            rotation_speed: config.animation.rotation_degrees_per_second,
            timer: FrameTimer::default(),
            stats: FrameStats::default(),
        }
    }

    /// Run one iteration
    ///
    /// Returns [`StepOutcome::Closed`] without polling when the close flag is
    /// already set. A close requested during this iteration's poll still lets
    /// the frame render; the next call sees the flag.
    pub fn step(&mut self) -> RenderResult<StepOutcome> {
        if self.window.should_close() {
            return Ok(StepOutcome::Closed);
        }

        for event in self.window.poll_events() {
            dispatch_event(&mut self.window, event);
        }

        let (width, height) = self.window.framebuffer_size();
        let geometry = FrameGeometry::from_framebuffer(width, height);
        if !geometry.is_drawable() {
            self.stats.frames_skipped += 1;
            log::trace!("Skipping frame for {}x{} framebuffer", width, height);
            self.window.wait_events_timeout(IDLE_WAIT_SECONDS);
            return Ok(StepOutcome::Skipped);
        }

        let angle = rotation_degrees(self.window.time(), self.rotation_speed);
        let frame = RenderFrame {
            geometry,
            transform: FrameTransform::new(geometry.aspect_ratio, angle),
            clear_color: self.clear_color,
        };

        let outcome = match self.renderer.render(&frame)? {
            FrameOutcome::Presented => {
                self.stats.frames_presented += 1;
                StepOutcome::Presented
            }
            FrameOutcome::SwapchainRebuilt => {
                self.stats.swapchain_rebuilds += 1;
                StepOutcome::SwapchainRebuilt
            }
        };

        if let Some(fps) = self.timer.tick() {
            log::debug!(
                "{:.1} FPS ({} presented, {} skipped, {} rebuilds)",
                fps,
                self.stats.frames_presented,
                self.stats.frames_skipped,
                self.stats.swapchain_rebuilds
            );
        }

        Ok(outcome)
    }

    /// Iterate until the close flag is set, then wait for the GPU to go idle
    pub fn run(&mut self) -> RenderResult<FrameStats> {
        log::info!("Entering frame loop");
        while self.step()? != StepOutcome::Closed {}

        self.renderer.wait_idle()?;
        self.stats.average_fps = self.timer.average_fps();
        log::info!(
            "Frame loop finished: {} presented, {} skipped, {} rebuilds, {:.1} average FPS",
            self.stats.frames_presented,
            self.stats.frames_skipped,
            self.stats.swapchain_rebuilds,
            self.stats.average_fps
        );
        Ok(self.stats)
    }

    /// Counters so far
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// The driven window
    pub const fn window(&self) -> &W {
        &self.window
    }

    /// The driven renderer
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Mat4Ext};
    use crate::frame::geometry::Viewport;
    use crate::render::mock::RecordingRenderer;
    use crate::window::mock::MockWindow;
    use approx::assert_relative_eq;
    use glfw::{Action, Key, Modifiers, WindowEvent};

    fn escape_press() -> WindowEvent {
        WindowEvent::Key(Key::Escape, 9, Action::Press, Modifiers::empty())
    }

    fn frame_loop(window: MockWindow) -> FrameLoop<MockWindow, RecordingRenderer> {
        FrameLoop::new(window, RecordingRenderer::default(), &DemoConfig::default())
    }

    #[test]
    fn test_resize_between_frames_uses_new_size() {
        let mut window = MockWindow::new(640, 480);
        window.size_script.extend([(640, 480), (800, 600)]);
        let mut driver = frame_loop(window);

        assert_eq!(driver.step().unwrap(), StepOutcome::Presented);
        assert_eq!(driver.step().unwrap(), StepOutcome::Presented);

        let frames = &driver.renderer().frames;
        assert_eq!(frames[0].geometry.aspect_ratio, 640.0 / 480.0);
        assert_eq!(
            frames[1].geometry.viewport,
            Viewport {
                x: 0,
                y: 0,
                width: 800,
                height: 600
            }
        );
        assert_eq!(frames[1].geometry.aspect_ratio, 800.0 / 600.0);
        assert_eq!(
            frames[1].transform.projection,
            Mat4::orthographic(-800.0 / 600.0, 800.0 / 600.0, -1.0, 1.0, 1.0, -1.0)
        );
    }

    #[test]
    fn test_zero_height_frame_is_skipped() {
        let mut window = MockWindow::new(640, 480);
        window.size_script.extend([(640, 0), (640, 480)]);
        let mut driver = frame_loop(window);

        assert_eq!(driver.step().unwrap(), StepOutcome::Skipped);
        assert!(driver.renderer().frames.is_empty());
        assert_eq!(driver.window().polls, 1);

        assert_eq!(driver.step().unwrap(), StepOutcome::Presented);
        // Only the skipped frame blocked for events
        assert_eq!(driver.window().waits, vec![IDLE_WAIT_SECONDS]);
        let stats = driver.stats();
        assert_eq!(stats.frames_skipped, 1);
        assert_eq!(stats.frames_presented, 1);
    }

    #[test]
    fn test_minimized_window_waits_instead_of_spinning() {
        let mut window = MockWindow::new(0, 0);
        window.close_after_polls = Some(4);
        let mut driver = frame_loop(window);

        let stats = driver.run().unwrap();

        assert_eq!(stats.frames_skipped, 4);
        assert_eq!(stats.frames_presented, 0);
        assert_eq!(driver.window().waits.len(), 4);
        assert!(driver.renderer().frames.is_empty());
    }

    #[test]
    fn test_rotation_uses_window_clock() {
        let mut window = MockWindow::new(640, 480);
        window.time_step = 1.0;
        let mut driver = frame_loop(window);

        driver.step().unwrap();
        let first = &driver.renderer().frames[0];
        assert_relative_eq!(
            first.transform.model_view,
            Mat4::rotation_z_degrees(50.0),
            epsilon = 1e-6
        );

        for _ in 0..7 {
            driver.step().unwrap();
        }
        // t = 8s: 400 degrees wraps to 40
        let eighth = &driver.renderer().frames[7];
        assert_relative_eq!(
            eighth.transform.model_view,
            Mat4::rotation_z_degrees(40.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_clear_color_comes_from_config() {
        let mut config = DemoConfig::default();
        config.render.clear_color = [0.1, 0.2, 0.3, 1.0];
        let mut driver =
            FrameLoop::new(MockWindow::new(640, 480), RecordingRenderer::default(), &config);

        driver.step().unwrap();
        assert_eq!(driver.renderer().frames[0].clear_color, [0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_escape_ends_run_after_current_frame() {
        let mut window = MockWindow::new(640, 480);
        window.event_batches.extend([vec![], vec![escape_press()]]);
        let mut driver = frame_loop(window);

        let stats = driver.run().unwrap();

        // The frame whose poll delivered Escape is still drawn
        assert_eq!(stats.frames_presented, 2);
        assert_eq!(driver.window().polls, 2);
        assert_eq!(driver.window().close_requests, 1);
        assert_eq!(driver.renderer().wait_idle_calls, 1);
    }

    #[test]
    fn test_closed_window_never_polls() {
        let mut window = MockWindow::new(640, 480);
        window.close_flag = true;
        let mut driver = frame_loop(window);

        assert_eq!(driver.step().unwrap(), StepOutcome::Closed);
        let stats = driver.run().unwrap();

        assert_eq!(stats.frames_presented, 0);
        assert_eq!(driver.window().polls, 0);
        assert!(driver.renderer().frames.is_empty());
    }

    #[test]
    fn test_os_close_stops_loop() {
        let mut window = MockWindow::new(640, 480);
        window.close_after_polls = Some(5);
        let mut driver = frame_loop(window);

        let stats = driver.run().unwrap();
        assert_eq!(stats.frames_presented, 5);
        assert!(driver.window().should_close());
    }

    #[test]
    fn test_swapchain_rebuilds_are_counted() {
        let mut renderer = RecordingRenderer::default();
        renderer.rebuild_on = vec![1];
        let mut window = MockWindow::new(640, 480);
        window.close_after_polls = Some(3);
        let mut driver = FrameLoop::new(window, renderer, &DemoConfig::default());

        let stats = driver.run().unwrap();
        assert_eq!(stats.frames_presented, 2);
        assert_eq!(stats.swapchain_rebuilds, 1);
    }

    #[test]
    fn test_renderer_failure_propagates() {
        let mut renderer = RecordingRenderer::default();
        renderer.fail_on = Some(1);
        let mut window = MockWindow::new(640, 480);
        window.close_after_polls = Some(10);
        let mut driver = FrameLoop::new(window, renderer, &DemoConfig::default());

        assert!(driver.run().is_err());
        assert_eq!(driver.stats().frames_presented, 1);
        assert_eq!(driver.renderer().wait_idle_calls, 0);
    }
}
