//! Vulkan rendering backend
//!
//! RAII wrappers over the handful of Vulkan objects a single triangle needs.
//! Every wrapper owns a cloned `ash::Device` (or the loader it was created
//! with) and destroys its handle on drop, so a failure halfway through
//! initialization releases exactly what was created so far.

mod buffer;
mod commands;
mod context;
mod pipeline;
mod renderer;
mod shader;
mod swapchain;
mod sync;

pub use buffer::{find_memory_type, Buffer};
pub use commands::CommandPool;
pub use context::{
    device_type_score, LogicalDevice, PhysicalDeviceInfo, VulkanContext, VulkanInstance,
};
pub use pipeline::{Framebuffers, RenderPass, TrianglePipeline};
pub use renderer::VulkanRenderer;
pub use shader::ShaderModule;
pub use swapchain::{
    choose_extent, choose_image_count, choose_present_mode, choose_surface_format, Swapchain,
};
pub use sync::{Fence, FrameSync, Semaphore};
