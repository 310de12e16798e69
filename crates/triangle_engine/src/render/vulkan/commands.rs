//! Command pool and per-frame command buffers

use crate::render::{RenderError, RenderResult};
use ash::{vk, Device};

/// Command pool whose buffers are re-recorded every frame
pub struct CommandPool {
    device: Device,
    pool: vk::CommandPool,
    buffers: Vec<vk::CommandBuffer>,
}

impl CommandPool {
    /// Create a pool on `queue_family` with `count` primary command buffers
    pub fn new(device: Device, queue_family: u32, count: usize) -> RenderResult<Self> {
        let pool_info = vk::CommandPoolCreateInfo::builder()
            .queue_family_index(queue_family)
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

        let pool = unsafe { device.create_command_pool(&pool_info, None) }
            .map_err(RenderError::api("command pool creation"))?;

        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(u32::try_from(count).unwrap_or(u32::MAX));

        match unsafe { device.allocate_command_buffers(&alloc_info) } {
            Ok(buffers) => Ok(Self {
                device,
                pool,
                buffers,
            }),
            Err(e) => {
                unsafe { device.destroy_command_pool(pool, None) };
                Err(RenderError::api("command buffer allocation")(e))
            }
        }
    }

    /// Command buffer for frame slot `index`
    pub fn buffer(&self, index: usize) -> vk::CommandBuffer {
        self.buffers[index % self.buffers.len()]
    }
}

impl Drop for CommandPool {
    fn drop(&mut self) {
        unsafe {
            // Destroying the pool frees its buffers
            self.device.destroy_command_pool(self.pool, None);
        }
    }
}
