//! Backend-agnostic window traits
//!
//! The frame loop and the bootstrap only see these traits, so both can be
//! driven by an in-memory window in tests.

use super::WindowResult;
use crate::config::WindowConfig;
use glfw::WindowEvent;

/// A window with a close flag, an event queue and a framebuffer
///
/// # Close flag
/// The close flag cannot be cleared: once
/// [`request_close`](Self::request_close) has been called, or the OS asked the
/// window to close, [`should_close`](Self::should_close) stays `true`.
pub trait WindowBackend {
    /// Check if the window should close
    fn should_close(&self) -> bool;

    /// Request that the window close at the end of the current frame
    fn request_close(&mut self);

    /// Poll (non-blocking) and return every pending event
    fn poll_events(&mut self) -> Vec<WindowEvent>;

    /// Block until an event arrives or `timeout_seconds` pass
    ///
    /// Events that arrive are queued for the next [`poll_events`](Self::poll_events).
    fn wait_events_timeout(&mut self, timeout_seconds: f64);

    /// Current drawable size in pixels
    ///
    /// May differ from the window size under display scaling, and may be
    /// zero in either dimension while minimized.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Seconds elapsed since the windowing library was initialized
    fn time(&self) -> f64;
}

/// A windowing library that must be initialized before a window exists
///
/// Window creation consumes the platform: a window owns the library state
/// for the rest of its life, and a failed creation releases it on drop.
pub trait Platform: Sized {
    /// Window type produced by this platform
    type Window: WindowBackend;

    /// Initialize the windowing library
    fn init() -> WindowResult<Self>;

    /// Create the single application window
    fn create_window(self, config: &WindowConfig) -> WindowResult<Self::Window>;
}

/// Window capabilities the Vulkan backend needs to create a surface
pub trait VulkanSurfaceSource {
    /// Instance extensions required to present to this window
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>>;

    /// Create a surface for `instance`; the caller owns the returned handle
    fn create_surface(&mut self, instance: ash::vk::Instance) -> WindowResult<ash::vk::SurfaceKHR>;
}
