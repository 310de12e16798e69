//! Window management using GLFW
//!
//! Provides window creation, event polling and Vulkan surface creation.

use super::backend::{Platform, VulkanSurfaceSource, WindowBackend};
use super::{WindowError, WindowResult};
use crate::config::WindowConfig;
use std::sync::atomic::{AtomicUsize, Ordering};

static REPORTED_ERRORS: AtomicUsize = AtomicUsize::new(0);

/// GLFW error callback
///
/// Registered through [`glfw::init`] so it is in place before the library
/// starts. Writes the description to the error log and returns; errors
/// reported here never stop the frame loop.
#[allow(clippy::needless_pass_by_value)]
pub fn report_glfw_error(error: glfw::Error, description: String) {
    REPORTED_ERRORS.fetch_add(1, Ordering::Relaxed);
    log::error!("GLFW error ({:?}): {}", error, description);
}

/// Number of errors GLFW has reported through [`report_glfw_error`]
pub fn reported_error_count() -> usize {
    REPORTED_ERRORS.load(Ordering::Relaxed)
}

/// Initialized GLFW library with no window yet
pub struct GlfwPlatform {
    glfw: glfw::Glfw,
}

impl Platform for GlfwPlatform {
    type Window = GlfwWindow;

    fn init() -> WindowResult<Self> {
        let glfw = glfw::init(report_glfw_error)
            .map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;
        log::debug!("GLFW initialized");
        Ok(Self { glfw })
    }

    fn create_window(self, config: &WindowConfig) -> WindowResult<GlfwWindow> {
        let mut glfw = self.glfw;

        // Vulkan owns presentation, so no OpenGL context is requested
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        // On failure `glfw` drops here, which terminates the library
        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| WindowError::CreationFailed {
                width: config.width,
                height: config.height,
                title: config.title.clone(),
            })?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        log::info!(
            "Created window \"{}\" ({}x{})",
            config.title,
            config.width,
            config.height
        );

        Ok(GlfwWindow {
            glfw,
            window,
            events,
        })
    }
}

/// GLFW window wrapper
///
/// Dropping it destroys the window, then releases the library.
pub struct GlfwWindow {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl WindowBackend for GlfwWindow {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn request_close(&mut self) {
        self.window.set_should_close(true);
    }

    fn poll_events(&mut self) -> Vec<glfw::WindowEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .map(|(_, event)| event)
            .collect()
    }

    fn wait_events_timeout(&mut self, timeout_seconds: f64) {
        self.glfw.wait_events_timeout(timeout_seconds);
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (
            u32::try_from(width).unwrap_or(0),
            u32::try_from(height).unwrap_or(0),
        )
    }

    fn time(&self) -> f64 {
        self.glfw.get_time()
    }
}

impl VulkanSurfaceSource for GlfwWindow {
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or(WindowError::VulkanUnsupported)
    }

    fn create_surface(&mut self, instance: ash::vk::Instance) -> WindowResult<ash::vk::SurfaceKHR> {
        let mut surface = ash::vk::SurfaceKHR::null();
        let result = self
            .window
            .create_window_surface(instance, std::ptr::null(), &mut surface);

        if result == ash::vk::Result::SUCCESS {
            Ok(surface)
        } else {
            Err(WindowError::SurfaceCreation(result))
        }
    }
}

impl Drop for GlfwWindow {
    fn drop(&mut self) {
        log::debug!("Destroying window");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_callback_logs_and_returns() {
        let before = reported_error_count();

        report_glfw_error(glfw::Error::InvalidValue, "width must be positive".to_string());
        report_glfw_error(glfw::Error::InvalidValue, "height must be positive".to_string());

        // Both calls returned, so a running loop would carry on
        assert_eq!(reported_error_count() - before, 2);
    }
}
