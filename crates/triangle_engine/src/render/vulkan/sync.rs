//! Vulkan synchronization primitives
//!
//! Semaphores order GPU work (acquire -> render -> present); fences let the
//! CPU wait for a frame slot to come back before reusing it.

use crate::render::{RenderError, RenderResult};
use ash::{vk, Device};

/// Binary semaphore with RAII cleanup
pub struct Semaphore {
    device: Device,
    semaphore: vk::Semaphore,
}

impl Semaphore {
    /// Create a new semaphore
    pub fn new(device: Device) -> RenderResult<Self> {
        let create_info = vk::SemaphoreCreateInfo::builder();
        let semaphore = unsafe { device.create_semaphore(&create_info, None) }
            .map_err(RenderError::api("semaphore creation"))?;
        Ok(Self { device, semaphore })
    }

    /// Get the semaphore handle
    pub const fn handle(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl Drop for Semaphore {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_semaphore(self.semaphore, None);
        }
    }
}

/// Fence wrapper with RAII cleanup
pub struct Fence {
    device: Device,
    fence: vk::Fence,
}

impl Fence {
    /// Create a new fence, optionally already signaled
    pub fn new(device: Device, signaled: bool) -> RenderResult<Self> {
        let flags = if signaled {
            vk::FenceCreateFlags::SIGNALED
        } else {
            vk::FenceCreateFlags::empty()
        };
        let create_info = vk::FenceCreateInfo::builder().flags(flags);
        let fence = unsafe { device.create_fence(&create_info, None) }
            .map_err(RenderError::api("fence creation"))?;
        Ok(Self { device, fence })
    }

    /// Block until the fence is signaled
    pub fn wait(&self, timeout: u64) -> RenderResult<()> {
        unsafe { self.device.wait_for_fences(&[self.fence], true, timeout) }
            .map_err(RenderError::api("fence wait"))
    }

    /// Return the fence to the unsignaled state
    pub fn reset(&self) -> RenderResult<()> {
        unsafe { self.device.reset_fences(&[self.fence]) }.map_err(RenderError::api("fence reset"))
    }

    /// Get the fence handle
    pub const fn handle(&self) -> vk::Fence {
        self.fence
    }
}

impl Drop for Fence {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_fence(self.fence, None);
        }
    }
}

/// Objects guarding one frame in flight
pub struct FrameSync {
    /// Signaled when the acquired swapchain image may be written
    pub image_available: Semaphore,
    /// Signaled when this slot's submission finishes; starts signaled
    pub in_flight: Fence,
}

impl FrameSync {
    /// Create the objects for one frame slot
    pub fn new(device: &Device) -> RenderResult<Self> {
        Ok(Self {
            image_available: Semaphore::new(device.clone())?,
            in_flight: Fence::new(device.clone(), true)?,
        })
    }

    /// Create `count` frame slots
    pub fn create_frames(device: &Device, count: usize) -> RenderResult<Vec<Self>> {
        (0..count).map(|_| Self::new(device)).collect()
    }
}
