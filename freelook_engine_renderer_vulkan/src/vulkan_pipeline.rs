/// Pipeline - Vulkan implementation of the render Pipeline trait

use freelook_engine::freelook::render::Pipeline as RendererPipeline;
use ash::vk;

/// Vulkan graphics pipeline
pub struct Pipeline {
    pub(crate) pipeline: vk::Pipeline,
    /// Pipeline layout (push constants and descriptor set binding)
    pub(crate) pipeline_layout: vk::PipelineLayout,
    pub(crate) sampled_texture: bool,
    /// Vulkan device (for cleanup)
    pub(crate) device: ash::Device,
}

impl RendererPipeline for Pipeline {
    fn sampled_texture(&self) -> bool {
        self.sampled_texture
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_pipeline(self.pipeline, None);
            // The descriptor set layout is shared and owned by the renderer
            self.device.destroy_pipeline_layout(self.pipeline_layout, None);
        }
    }
}
