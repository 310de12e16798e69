//! Window management subsystem
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │   FrameLoop / app bootstrap     │
//! └─────────────┬───────────────────┘
//!               │ generic over
//!      ┌────────▼────────┐
//!      │ Platform +      │ ← traits (backend.rs)
//!      │ WindowBackend   │
//!      └────────┬────────┘
//!               │ implemented by
//!      ┌────────▼────────┐
//!      │ GlfwPlatform /  │ ← GLFW (glfw_window.rs)
//!      │ GlfwWindow      │
//!      └─────────────────┘
//! ```
//!
//! - **`backend`**: the traits the frame loop is written against
//! - **`glfw_window`**: the GLFW implementation and the error callback
//! - **`input`**: the key callback (Escape closes the window)

mod backend;
mod glfw_window;
mod input;
#[cfg(test)]
pub(crate) mod mock;

pub use backend::{Platform, VulkanSurfaceSource, WindowBackend};
pub use glfw_window::{report_glfw_error, reported_error_count, GlfwPlatform, GlfwWindow};
pub use input::{dispatch_event, handle_key, KeyResponse};

use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing library refused to initialize
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// The window (and its surface) could not be created
    #[error("Window creation failed ({width}x{height} \"{title}\")")]
    CreationFailed {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested title
        title: String,
    },

    /// The windowing library cannot present with Vulkan on this system
    #[error("Vulkan is not supported by the windowing system")]
    VulkanUnsupported,

    /// Surface creation for a Vulkan instance failed
    #[error("Failed to create Vulkan surface: {0:?}")]
    SurfaceCreation(ash::vk::Result),
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;
