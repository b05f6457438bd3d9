/// Texture - Vulkan implementation of the render Texture trait

use freelook_engine::freelook::render::{Texture as RendererTexture, TextureInfo};
use ash::vk;
use gpu_allocator::vulkan::Allocation;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Sampled 2D texture with its own sampler and descriptor set
pub struct Texture {
    ctx: Arc<GpuContext>,
    /// Vulkan image
    pub(crate) image: vk::Image,
    /// Vulkan image view
    pub(crate) view: vk::ImageView,
    pub(crate) sampler: vk::Sampler,
    /// Combined image sampler at set 0, binding 0 (freed with its pool)
    pub(crate) descriptor_set: vk::DescriptorSet,
    /// GPU memory allocation
    allocation: Option<Allocation>,
    /// Read-only texture properties
    info: TextureInfo,
}

impl Texture {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        ctx: Arc<GpuContext>,
        image: vk::Image,
        view: vk::ImageView,
        sampler: vk::Sampler,
        descriptor_set: vk::DescriptorSet,
        allocation: Allocation,
        info: TextureInfo,
    ) -> Self {
        Self {
            ctx,
            image,
            view,
            sampler,
            descriptor_set,
            allocation: Some(allocation),
            info,
        }
    }
}

impl RendererTexture for Texture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_sampler(self.sampler, None);
            self.ctx.device.destroy_image_view(self.view, None);
        }

        if let Some(allocation) = self.allocation.take() {
            self.ctx.free(allocation);
        }

        unsafe {
            self.ctx.device.destroy_image(self.image, None);
        }
    }
}
