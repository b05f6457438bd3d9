/// GpuContext - Shared GPU resources for all Vulkan objects
///
/// Contains everything resources need after creation:
/// - Device for Vulkan API calls
/// - Allocator for memory management
/// - Queue and command pool for one-shot upload operations

use freelook_engine::freelook::{Error, Result};
use freelook_engine::{engine_error, engine_err, engine_warn};
use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, Allocator};
use std::mem::ManuallyDrop;
use std::sync::Mutex;

/// Shared GPU context for all Vulkan resources.
///
/// Shared (via `Arc`) by buffers, textures and the swapchain so each of them
/// can release its own memory on drop.
///
/// Device and instance destruction is handled by `VulkanRenderer::drop()`.
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// GPU memory allocator
    /// Wrapped in ManuallyDrop so it is dropped BEFORE the device is destroyed
    pub(crate) allocator: ManuallyDrop<Mutex<Allocator>>,

    /// Graphics queue for command submission
    pub graphics_queue: vk::Queue,

    /// Graphics queue family index
    pub graphics_queue_family: u32,

    /// Reusable command pool for one-shot upload operations
    /// (created with TRANSIENT + RESET_COMMAND_BUFFER flags)
    pub(crate) upload_command_pool: Mutex<vk::CommandPool>,
}

impl GpuContext {
    pub fn new(
        device: ash::Device,
        allocator: Allocator,
        graphics_queue: vk::Queue,
        graphics_queue_family: u32,
        upload_command_pool: vk::CommandPool,
    ) -> Self {
        Self {
            device,
            allocator: ManuallyDrop::new(Mutex::new(allocator)),
            graphics_queue,
            graphics_queue_family,
            upload_command_pool: Mutex::new(upload_command_pool),
        }
    }

    /// Allocate GPU memory, mapping exhaustion to `Error::OutOfMemory`
    pub(crate) fn allocate(&self, desc: &AllocationCreateDesc) -> Result<Allocation> {
        let mut allocator = self.allocator.lock()
            .map_err(|_| engine_err!("freelook::vulkan", "GPU allocator lock poisoned"))?;

        allocator.allocate(desc).map_err(|e| {
            let size_mb = desc.requirements.size as f64 / (1024.0 * 1024.0);
            engine_error!("freelook::vulkan", "Out of GPU memory for {} ({:.2} MB): {}", desc.name, size_mb, e);
            Error::OutOfMemory
        })
    }

    /// Return an allocation to the allocator
    ///
    /// Never panics: this runs from `Drop` impls.
    pub(crate) fn free(&self, allocation: Allocation) {
        match self.allocator.lock() {
            Ok(mut allocator) => {
                if let Err(e) = allocator.free(allocation) {
                    engine_warn!("freelook::vulkan", "Failed to free GPU allocation: {}", e);
                }
            }
            Err(_) => {
                engine_warn!("freelook::vulkan", "GPU allocator lock poisoned, leaking allocation");
            }
        }
    }

    /// Record commands into a one-shot command buffer, submit and wait for completion
    pub(crate) fn immediate_submit<F>(&self, record: F) -> Result<()>
    where
        F: FnOnce(&ash::Device, vk::CommandBuffer),
    {
        let pool = self.upload_command_pool.lock()
            .map_err(|_| engine_err!("freelook::vulkan", "Upload command pool lock poisoned"))?;

        unsafe {
            let allocate_info = vk::CommandBufferAllocateInfo::default()
                .command_pool(*pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);

            let command_buffers = self.device.allocate_command_buffers(&allocate_info)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to allocate upload command buffer: {:?}", e))?;
            let command_buffer = command_buffers[0];

            let result = self.record_and_wait(command_buffer, record);

            self.device.free_command_buffers(*pool, &command_buffers);
            result
        }
    }

    unsafe fn record_and_wait<F>(&self, command_buffer: vk::CommandBuffer, record: F) -> Result<()>
    where
        F: FnOnce(&ash::Device, vk::CommandBuffer),
    {
        let begin_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

        self.device.begin_command_buffer(command_buffer, &begin_info)
            .map_err(|e| engine_err!("freelook::vulkan", "Failed to begin upload command buffer: {:?}", e))?;

        record(&self.device, command_buffer);

        self.device.end_command_buffer(command_buffer)
            .map_err(|e| engine_err!("freelook::vulkan", "Failed to end upload command buffer: {:?}", e))?;

        let command_buffers = [command_buffer];
        let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers);

        self.device.queue_submit(self.graphics_queue, &[submit_info], vk::Fence::null())
            .map_err(|e| engine_err!("freelook::vulkan", "Failed to submit upload commands: {:?}", e))?;

        self.device.queue_wait_idle(self.graphics_queue)
            .map_err(|e| engine_err!("freelook::vulkan", "Failed to wait for upload completion: {:?}", e))
    }
}
