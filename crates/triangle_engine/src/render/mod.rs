//! Rendering
//!
//! The frame loop talks to a [`FrameRenderer`]; [`vulkan::VulkanRenderer`] is
//! the real implementation. Each frame the renderer receives a
//! [`RenderFrame`] carrying everything the old fixed-function sequence set
//! implicitly: viewport, clear color, projection and model-view.

pub mod vertex;
pub mod vulkan;

pub use vertex::{ColorVertex, AUXILIARY_TRIANGLE_POSITIONS, TRIANGLE_VERTICES};

use crate::frame::{FrameGeometry, FrameTransform};
use crate::window::WindowError;
use ash::vk;
use thiserror::Error;

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Viewport and aspect ratio derived from this frame's framebuffer size
    pub geometry: FrameGeometry,
    /// Projection and model-view for this frame
    pub transform: FrameTransform,
    /// RGBA color the frame is cleared to
    pub clear_color: [f32; 4],
}

/// What happened to a frame handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame reached the screen
    Presented,
    /// The swapchain was out of date; it was rebuilt and the frame dropped
    SwapchainRebuilt,
}

/// Renderer seam used by the frame loop
pub trait FrameRenderer {
    /// Clear, draw the triangle and present
    ///
    /// Only called with a drawable geometry (both dimensions nonzero).
    fn render(&mut self, frame: &RenderFrame) -> RenderResult<FrameOutcome>;

    /// Block until the GPU has finished all submitted work
    fn wait_idle(&mut self) -> RenderResult<()>;
}

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The Vulkan loader library could not be loaded
    #[error("Vulkan loader unavailable: {0}")]
    LoaderUnavailable(String),

    /// A Vulkan call returned an error code
    #[error("Vulkan API error during {context}: {result:?}")]
    Api {
        /// Operation that failed
        context: &'static str,
        /// Result code returned by the driver
        result: vk::Result,
    },

    /// No physical device can render and present to the window
    #[error("No suitable GPU: {0}")]
    NoSuitableDevice(String),

    /// No memory type satisfies a resource's requirements
    #[error("No memory type matches filter {type_filter:#b} with {properties:?}")]
    NoSuitableMemoryType {
        /// Allowed memory type bits
        type_filter: u32,
        /// Required property flags
        properties: vk::MemoryPropertyFlags,
    },

    /// SPIR-V could not be read or was malformed
    #[error("Shader error: {0}")]
    Shader(String),

    /// Window-side failure during surface setup
    #[error(transparent)]
    Window(#[from] WindowError),
}

impl RenderError {
    /// Wrap a Vulkan result code with the operation it came from
    pub fn api(context: &'static str) -> impl Fn(vk::Result) -> Self {
        move |result| Self::Api { context, result }
    }
}

/// Result alias for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
