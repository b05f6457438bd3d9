/// Buffer - Vulkan implementation of the render Buffer trait

use freelook_engine::freelook::{
    Result,
    render::{check_buffer_range, Buffer as RendererBuffer},
};
use freelook_engine::engine_err;
use ash::vk;
use gpu_allocator::vulkan::Allocation;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Vulkan buffer implementation (host-visible, persistently mapped)
pub struct Buffer {
    /// Shared GPU context (device, allocator)
    ctx: Arc<GpuContext>,
    /// Vulkan buffer
    pub(crate) buffer: vk::Buffer,
    /// GPU memory allocation
    allocation: Option<Allocation>,
    /// Buffer size
    size: u64,
}

impl Buffer {
    pub fn new(
        ctx: Arc<GpuContext>,
        buffer: vk::Buffer,
        allocation: Allocation,
        size: u64,
    ) -> Self {
        Self {
            ctx,
            buffer,
            allocation: Some(allocation),
            size,
        }
    }
}

impl RendererBuffer for Buffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        check_buffer_range(self.size, offset, data.len() as u64)?;

        let allocation = self.allocation.as_ref()
            .ok_or_else(|| engine_err!("freelook::vulkan", "Buffer update failed: no GPU allocation"))?;

        let mapped_ptr = allocation
            .mapped_ptr()
            .ok_or_else(|| engine_err!("freelook::vulkan", "Buffer is not CPU-accessible"))?
            .as_ptr() as *mut u8;

        unsafe {
            std::ptr::copy_nonoverlapping(
                data.as_ptr(),
                mapped_ptr.add(offset as usize),
                data.len(),
            );
        }

        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if let Some(allocation) = self.allocation.take() {
            self.ctx.free(allocation);
        }
        unsafe {
            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}
