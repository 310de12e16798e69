//! SPIR-V shader modules

use crate::render::{RenderError, RenderResult};
use ash::{vk, Device};
use std::io::Cursor;
use std::path::Path;

/// Shader module wrapper with RAII cleanup
pub struct ShaderModule {
    device: Device,
    module: vk::ShaderModule,
}

impl ShaderModule {
    /// Create a shader module from SPIR-V bytes
    pub fn from_bytes(device: Device, bytes: &[u8]) -> RenderResult<Self> {
        // read_spv checks the length and magic number and fixes alignment
        let code = ash::util::read_spv(&mut Cursor::new(bytes))
            .map_err(|e| RenderError::Shader(format!("Invalid SPIR-V: {e}")))?;

        let create_info = vk::ShaderModuleCreateInfo::builder().code(&code);
        let module = unsafe { device.create_shader_module(&create_info, None) }
            .map_err(RenderError::api("shader module creation"))?;

        Ok(Self { device, module })
    }

    /// Load a compiled shader from disk
    pub fn from_file(device: Device, path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            RenderError::Shader(format!("Failed to read shader {}: {e}", path.display()))
        })?;
        log::debug!("Loaded shader {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(device, &bytes)
    }

    /// Get shader module handle
    pub const fn handle(&self) -> vk::ShaderModule {
        self.module
    }
}

impl Drop for ShaderModule {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_shader_module(self.module, None);
        }
    }
}
