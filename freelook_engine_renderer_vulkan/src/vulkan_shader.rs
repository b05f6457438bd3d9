/// Shader - Vulkan implementation of the render Shader trait

use freelook_engine::freelook::render::{Shader as RendererShader, ShaderStage};
use ash::vk;
use std::ffi::CString;

/// Vulkan shader module
pub struct Shader {
    pub(crate) module: vk::ShaderModule,
    pub(crate) stage: ShaderStage,
    pub(crate) entry_point: CString,
    /// Vulkan device (for cleanup)
    pub(crate) device: ash::Device,
}

impl RendererShader for Shader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_shader_module(self.module, None);
        }
    }
}
