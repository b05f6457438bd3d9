/// VulkanRenderer - Vulkan implementation of the Renderer trait

use freelook_engine::freelook::{Renderer, Result, Error};
use freelook_engine::freelook::render::{
    CommandList as RendererCommandList,
    Texture as RendererTexture, Buffer as RendererBuffer,
    Shader as RendererShader, Pipeline as RendererPipeline,
    TextureDesc, TextureInfo, BufferDesc, ShaderDesc, PipelineDesc,
    BufferUsage, ClearValue, RendererStats, Config,
};
use freelook_engine::{engine_debug, engine_info, engine_warn, engine_error, engine_err, engine_bail, engine_bail_warn, engine_warn_err};
use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::ffi::CString;
use std::sync::Arc;

use crate::vulkan_buffer::Buffer;
use crate::vulkan_command_list::CommandList;
use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{
    buffer_format_to_vk, clear_values_to_vk, compare_op_to_vk, cull_mode_to_vk, filter_to_vk,
    front_face_to_vk, shader_stage_to_vk, stage_flags_to_vk, texture_format_to_vk,
    topology_to_vk, wrap_to_vk,
};
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_shader::Shader;
use crate::vulkan_swapchain::{AcquiredImage, Swapchain};
use crate::vulkan_texture::Texture;

/// Frames recorded on the CPU while the GPU works on the previous one
const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Descriptor sets per pool; a new pool is added when one runs out
const DESCRIPTOR_SETS_PER_POOL: u32 = 64;

/// Per-frame-in-flight synchronization and command recording
struct FrameSync {
    command_list: CommandList,
    image_available: vk::Semaphore,
    in_flight: vk::Fence,
}

/// Debug messenger created when validation is compiled in and enabled
type DebugMessenger = (ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT);

/// Vulkan renderer
///
/// Owns the device, the swapchain and the per-frame synchronization.
/// Resources it creates share its `GpuContext` and release themselves on drop;
/// drop them before the renderer.
pub struct VulkanRenderer {
    /// Vulkan entry (keeps the loader alive)
    _entry: ash::Entry,
    instance: ash::Instance,
    debug_messenger: Option<DebugMessenger>,
    device: ash::Device,

    /// Shared GPU context for all resources (textures, buffers, swapchain)
    ctx: Arc<GpuContext>,

    /// Swapchain (taken in Drop so it is destroyed before the device)
    swapchain: Option<Swapchain>,

    /// Pool for the per-frame command buffers
    command_pool: vk::CommandPool,
    frames: Vec<FrameSync>,
    current_frame: usize,
    /// Swapchain image of the frame being recorded
    current_image: Option<u32>,

    /// Layout of the single combined image sampler used by textured pipelines
    texture_set_layout: vk::DescriptorSetLayout,
    /// Descriptor pools for texture sets (grows when exhausted)
    descriptor_pools: Vec<vk::DescriptorPool>,

    /// Window size last reported through `resize`
    window_size: (u32, u32),
    needs_recreate: bool,

    stats: RendererStats,
}

impl VulkanRenderer {
    /// Create a new Vulkan renderer presenting to `window`
    ///
    /// # Arguments
    ///
    /// * `window` - Window for surface creation
    /// * `size` - Current framebuffer size in pixels
    /// * `config` - Renderer configuration
    pub fn new<W: HasDisplayHandle + HasWindowHandle>(
        window: &W,
        size: (u32, u32),
        config: Config,
    ) -> Result<Self> {
        unsafe {
            let entry = ash::Entry::load()
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to load Vulkan library: {:?}", e);
                    Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
                })?;

            let app_name = CString::new(config.app_name.as_str())
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Invalid application name: {}", e);
                    Error::InitializationFailed(format!("Invalid application name: {}", e))
                })?;
            let (major, minor, patch) = config.app_version;

            let app_info = vk::ApplicationInfo::default()
                .application_name(&app_name)
                .application_version(vk::make_api_version(0, major, minor, patch))
                .engine_name(c"Freelook")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(vk::API_VERSION_1_1);

            let display_handle = window.display_handle()
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to get display handle: {}", e);
                    Error::InitializationFailed(format!("Failed to get display handle: {}", e))
                })?;
            let mut extension_names = ash_window::enumerate_required_extensions(display_handle.as_raw())
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to get required extensions: {}", e);
                    Error::InitializationFailed(format!("Failed to get required extensions: {}", e))
                })?
                .to_vec();

            let enable_validation = cfg!(feature = "vulkan-validation") && config.enable_validation;
            if config.enable_validation && !enable_validation {
                engine_warn!("freelook::vulkan",
                    "Validation requested but the vulkan-validation feature is not compiled in");
            }

            if enable_validation {
                extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
            }

            let layer_names = if enable_validation {
                vec![c"VK_LAYER_KHRONOS_validation".as_ptr()]
            } else {
                vec![]
            };

            let create_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_names)
                .enabled_extension_names(&extension_names);

            let instance = entry
                .create_instance(&create_info, None)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to create Vulkan instance: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
                })?;

            let debug_messenger = if enable_validation {
                match Self::create_debug_messenger(&entry, &instance) {
                    Ok(messenger) => messenger,
                    Err(e) => {
                        instance.destroy_instance(None);
                        return Err(e);
                    }
                }
            } else {
                None
            };

            // From here on a failure leaks the instance; initialization errors are fatal
            let window_handle = window.window_handle()
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to get window handle: {}", e);
                    Error::InitializationFailed(format!("Failed to get window handle: {}", e))
                })?;
            let surface = ash_window::create_surface(
                &entry,
                &instance,
                display_handle.as_raw(),
                window_handle.as_raw(),
                None,
            )
            .map_err(|e| {
                engine_error!("freelook::vulkan", "Failed to create surface: {:?}", e);
                Error::InitializationFailed(format!("Failed to create surface: {:?}", e))
            })?;

            let surface_loader = ash::khr::surface::Instance::new(&entry, &instance);

            let (physical_device, graphics_family_index, present_family_index) =
                Self::pick_physical_device(&instance, &surface_loader, surface)?;

            let properties = instance.get_physical_device_properties(physical_device);
            let device_name = properties
                .device_name_as_c_str()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "unknown".to_string());
            engine_info!("freelook::vulkan", "Using GPU: {} ({:?})", device_name, properties.device_type);

            // Create Logical Device
            let queue_priorities = [1.0];
            let mut queue_create_infos = vec![
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(graphics_family_index)
                    .queue_priorities(&queue_priorities),
            ];
            if graphics_family_index != present_family_index {
                queue_create_infos.push(
                    vk::DeviceQueueCreateInfo::default()
                        .queue_family_index(present_family_index)
                        .queue_priorities(&queue_priorities),
                );
            }

            let device_extension_names = [ash::khr::swapchain::NAME.as_ptr()];

            let device_create_info = vk::DeviceCreateInfo::default()
                .queue_create_infos(&queue_create_infos)
                .enabled_extension_names(&device_extension_names);

            let device = instance
                .create_device(physical_device, &device_create_info, None)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to create logical device: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create device: {:?}", e))
                })?;

            let graphics_queue = device.get_device_queue(graphics_family_index, 0);
            let present_queue = device.get_device_queue(present_family_index, 0);

            let allocator = Allocator::new(&AllocatorCreateDesc {
                instance: instance.clone(),
                device: device.clone(),
                physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            })
            .map_err(|e| {
                engine_error!("freelook::vulkan", "Failed to create GPU allocator: {:?}", e);
                Error::InitializationFailed(format!("Failed to create allocator: {:?}", e))
            })?;

            // Upload command pool (TRANSIENT + RESET for reusable one-shot uploads)
            let upload_pool_create_info = vk::CommandPoolCreateInfo::default()
                .queue_family_index(graphics_family_index)
                .flags(vk::CommandPoolCreateFlags::TRANSIENT | vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

            let upload_command_pool = device.create_command_pool(&upload_pool_create_info, None)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to create upload command pool: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create upload command pool: {:?}", e))
                })?;

            let ctx = Arc::new(GpuContext::new(
                device.clone(),
                allocator,
                graphics_queue,
                graphics_family_index,
                upload_command_pool,
            ));

            // Everything created below is owned by `renderer`, whose Drop cleans up on failure
            let mut renderer = Self {
                _entry: entry,
                instance,
                debug_messenger,
                device,
                ctx,
                swapchain: None,
                command_pool: vk::CommandPool::null(),
                frames: Vec::with_capacity(MAX_FRAMES_IN_FLIGHT),
                current_frame: 0,
                current_image: None,
                texture_set_layout: vk::DescriptorSetLayout::null(),
                descriptor_pools: Vec::new(),
                window_size: size,
                needs_recreate: false,
                stats: RendererStats::default(),
            };

            renderer.swapchain = Some(Swapchain::new(
                Arc::clone(&renderer.ctx),
                &renderer.instance,
                physical_device,
                surface,
                surface_loader,
                present_queue,
                size,
                config.vsync,
            )?);

            renderer.create_frames()?;
            renderer.texture_set_layout = Self::create_texture_set_layout(&renderer.device)?;
            let pool = Self::create_descriptor_pool(&renderer.device)?;
            renderer.descriptor_pools.push(pool);

            Ok(renderer)
        }
    }

    unsafe fn create_debug_messenger(entry: &ash::Entry, instance: &ash::Instance) -> Result<Option<DebugMessenger>> {
        #[cfg(feature = "vulkan-validation")]
        {
            let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);
            crate::debug::reset_validation_stats();

            let debug_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
                .message_severity(crate::debug::messenger_severity_flags())
                .message_type(
                    vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                        | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                        | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
                )
                .pfn_user_callback(Some(crate::debug::vulkan_debug_callback));

            let messenger = debug_utils
                .create_debug_utils_messenger(&debug_info, None)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to create debug messenger: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create debug messenger: {:?}", e))
                })?;

            Ok(Some((debug_utils, messenger)))
        }

        #[cfg(not(feature = "vulkan-validation"))]
        {
            let _ = (entry, instance);
            Ok(None)
        }
    }

    /// First device with a graphics queue and surface support, discrete GPUs first
    ///
    /// Returns (device, graphics family, present family).
    unsafe fn pick_physical_device(
        instance: &ash::Instance,
        surface_loader: &ash::khr::surface::Instance,
        surface: vk::SurfaceKHR,
    ) -> Result<(vk::PhysicalDevice, u32, u32)> {
        let physical_devices = instance
            .enumerate_physical_devices()
            .map_err(|e| {
                engine_error!("freelook::vulkan", "Failed to enumerate physical devices: {:?}", e);
                Error::InitializationFailed(format!("Failed to enumerate physical devices: {:?}", e))
            })?;

        let mut candidates: Vec<(vk::PhysicalDevice, u32, u32, bool)> = Vec::new();

        for physical_device in physical_devices {
            let queue_families = instance.get_physical_device_queue_family_properties(physical_device);

            let graphics = queue_families
                .iter()
                .position(|qf| qf.queue_flags.contains(vk::QueueFlags::GRAPHICS))
                .map(|i| i as u32);

            let present = (0..queue_families.len() as u32).find(|&i| {
                surface_loader
                    .get_physical_device_surface_support(physical_device, i, surface)
                    .unwrap_or(false)
            });

            if let (Some(graphics), Some(present)) = (graphics, present) {
                let discrete = instance.get_physical_device_properties(physical_device).device_type
                    == vk::PhysicalDeviceType::DISCRETE_GPU;
                candidates.push((physical_device, graphics, present, discrete));
            }
        }

        candidates.sort_by_key(|&(_, _, _, discrete)| !discrete);

        candidates
            .first()
            .map(|&(device, graphics, present, _)| (device, graphics, present))
            .ok_or_else(|| {
                engine_error!("freelook::vulkan", "No Vulkan GPU can present to this window");
                Error::InitializationFailed("No Vulkan GPU can present to this window".to_string())
            })
    }

    /// Command pool, command buffers, semaphores and fences for each frame in flight
    unsafe fn create_frames(&mut self) -> Result<()> {
        let pool_create_info = vk::CommandPoolCreateInfo::default()
            .queue_family_index(self.ctx.graphics_queue_family)
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

        self.command_pool = self.device.create_command_pool(&pool_create_info, None)
            .map_err(|e| {
                engine_error!("freelook::vulkan", "Failed to create command pool: {:?}", e);
                Error::InitializationFailed(format!("Failed to create command pool: {:?}", e))
            })?;

        let allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(self.command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(MAX_FRAMES_IN_FLIGHT as u32);

        let command_buffers = self.device.allocate_command_buffers(&allocate_info)
            .map_err(|e| {
                engine_error!("freelook::vulkan", "Failed to allocate command buffers: {:?}", e);
                Error::InitializationFailed(format!("Failed to allocate command buffers: {:?}", e))
            })?;

        // Fences start signaled so the first wait returns immediately
        let fence_create_info = vk::FenceCreateInfo::default()
            .flags(vk::FenceCreateFlags::SIGNALED);
        let semaphore_create_info = vk::SemaphoreCreateInfo::default();

        for command_buffer in command_buffers {
            let image_available = self.device.create_semaphore(&semaphore_create_info, None)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to create image-available semaphore: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create semaphore: {:?}", e))
                })?;

            let in_flight = match self.device.create_fence(&fence_create_info, None) {
                Ok(fence) => fence,
                Err(e) => {
                    self.device.destroy_semaphore(image_available, None);
                    engine_error!("freelook::vulkan", "Failed to create frame fence: {:?}", e);
                    return Err(Error::InitializationFailed(format!("Failed to create fence: {:?}", e)));
                }
            };

            self.frames.push(FrameSync {
                command_list: CommandList::new(self.device.clone(), command_buffer),
                image_available,
                in_flight,
            });
        }

        Ok(())
    }

    fn create_texture_set_layout(device: &ash::Device) -> Result<vk::DescriptorSetLayout> {
        let binding = vk::DescriptorSetLayoutBinding::default()
            .binding(0)
            .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
            .descriptor_count(1)
            .stage_flags(vk::ShaderStageFlags::FRAGMENT);

        let create_info = vk::DescriptorSetLayoutCreateInfo::default()
            .bindings(std::slice::from_ref(&binding));

        unsafe {
            device.create_descriptor_set_layout(&create_info, None)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to create texture descriptor set layout: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create descriptor set layout: {:?}", e))
                })
        }
    }

    /// Create a descriptor pool with fixed capacity.
    /// Called during init and when the current pool is exhausted.
    fn create_descriptor_pool(device: &ash::Device) -> Result<vk::DescriptorPool> {
        let pool_sizes = [vk::DescriptorPoolSize {
            ty: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
            descriptor_count: DESCRIPTOR_SETS_PER_POOL,
        }];
        let info = vk::DescriptorPoolCreateInfo::default()
            .pool_sizes(&pool_sizes)
            .max_sets(DESCRIPTOR_SETS_PER_POOL);

        unsafe {
            device.create_descriptor_pool(&info, None)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to create descriptor pool: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create descriptor pool: {:?}", e))
                })
        }
    }

    /// Allocate a texture descriptor set, adding a pool when the last one is full
    fn allocate_texture_set(&mut self) -> Result<vk::DescriptorSet> {
        let layouts = [self.texture_set_layout];

        if let Some(&pool) = self.descriptor_pools.last() {
            let allocate_info = vk::DescriptorSetAllocateInfo::default()
                .descriptor_pool(pool)
                .set_layouts(&layouts);

            match unsafe { self.device.allocate_descriptor_sets(&allocate_info) } {
                Ok(sets) => return Ok(sets[0]),
                Err(vk::Result::ERROR_OUT_OF_POOL_MEMORY) | Err(vk::Result::ERROR_FRAGMENTED_POOL) => {
                    engine_debug!("freelook::vulkan", "Descriptor pool {} exhausted, adding another",
                        self.descriptor_pools.len());
                }
                Err(e) => {
                    engine_bail!("freelook::vulkan", "Failed to allocate descriptor set: {:?}", e);
                }
            }
        }

        let pool = Self::create_descriptor_pool(&self.device)?;
        self.descriptor_pools.push(pool);

        let allocate_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(pool)
            .set_layouts(&layouts);

        unsafe {
            self.device.allocate_descriptor_sets(&allocate_info)
                .map(|sets| sets[0])
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to allocate descriptor set: {:?}", e))
        }
    }

    fn swapchain_mut(&mut self) -> Result<&mut Swapchain> {
        self.swapchain
            .as_mut()
            .ok_or_else(|| engine_err!("freelook::vulkan", "Swapchain not available"))
    }

    /// Rebuild the swapchain for the last known window size
    ///
    /// Returns false while the surface is zero-sized.
    fn recreate_swapchain(&mut self) -> Result<bool> {
        let (width, height) = self.window_size;
        let ready = self.swapchain_mut()?.recreate(width, height)?;
        self.needs_recreate = !ready;
        if ready {
            self.stats.swapchain_recreations += 1;
        }
        Ok(ready)
    }

    fn skip_frame(&mut self) -> Result<Option<&mut dyn RendererCommandList>> {
        self.stats.frames_skipped += 1;
        Ok(None)
    }

    /// Upload pixels through a staging buffer and leave the image shader-readable
    unsafe fn upload_texture_pixels(&self, image: vk::Image, desc: &TextureDesc) -> Result<()> {
        let buffer_size = desc.data.len() as u64;

        let staging_buffer_create_info = vk::BufferCreateInfo::default()
            .size(buffer_size)
            .usage(vk::BufferUsageFlags::TRANSFER_SRC)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let staging_buffer = self.device.create_buffer(&staging_buffer_create_info, None)
            .map_err(|e| engine_err!("freelook::vulkan", "Failed to create texture staging buffer: {:?}", e))?;

        let staging_requirements = self.device.get_buffer_memory_requirements(staging_buffer);
        let staging_allocation = match self.ctx.allocate(&AllocationCreateDesc {
            name: "texture_staging_buffer",
            requirements: staging_requirements,
            location: MemoryLocation::CpuToGpu,
            linear: true,
            allocation_scheme: AllocationScheme::GpuAllocatorManaged,
        }) {
            Ok(allocation) => allocation,
            Err(e) => {
                self.device.destroy_buffer(staging_buffer, None);
                return Err(e);
            }
        };

        let result = (|| -> Result<()> {
            self.device.bind_buffer_memory(staging_buffer, staging_allocation.memory(), staging_allocation.offset())
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to bind staging buffer memory: {:?}", e))?;

            let mapped_ptr = staging_allocation.mapped_ptr()
                .ok_or_else(|| engine_err!("freelook::vulkan", "Staging buffer is not mapped"))?
                .as_ptr() as *mut u8;
            std::ptr::copy_nonoverlapping(desc.data.as_ptr(), mapped_ptr, desc.data.len());

            let subresource_range = vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            };

            self.ctx.immediate_submit(|device, command_buffer| {
                // UNDEFINED -> TRANSFER_DST_OPTIMAL
                let barrier_to_transfer = vk::ImageMemoryBarrier::default()
                    .old_layout(vk::ImageLayout::UNDEFINED)
                    .new_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
                    .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                    .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                    .image(image)
                    .subresource_range(subresource_range)
                    .src_access_mask(vk::AccessFlags::empty())
                    .dst_access_mask(vk::AccessFlags::TRANSFER_WRITE);

                device.cmd_pipeline_barrier(
                    command_buffer,
                    vk::PipelineStageFlags::TOP_OF_PIPE,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::DependencyFlags::empty(),
                    &[],
                    &[],
                    &[barrier_to_transfer],
                );

                let region = vk::BufferImageCopy::default()
                    .buffer_offset(0)
                    .buffer_row_length(0)
                    .buffer_image_height(0)
                    .image_subresource(vk::ImageSubresourceLayers {
                        aspect_mask: vk::ImageAspectFlags::COLOR,
                        mip_level: 0,
                        base_array_layer: 0,
                        layer_count: 1,
                    })
                    .image_offset(vk::Offset3D { x: 0, y: 0, z: 0 })
                    .image_extent(vk::Extent3D {
                        width: desc.width,
                        height: desc.height,
                        depth: 1,
                    });

                device.cmd_copy_buffer_to_image(
                    command_buffer,
                    staging_buffer,
                    image,
                    vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                    &[region],
                );

                // TRANSFER_DST_OPTIMAL -> SHADER_READ_ONLY_OPTIMAL
                let barrier_to_shader = vk::ImageMemoryBarrier::default()
                    .old_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
                    .new_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)
                    .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                    .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                    .image(image)
                    .subresource_range(subresource_range)
                    .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
                    .dst_access_mask(vk::AccessFlags::SHADER_READ);

                device.cmd_pipeline_barrier(
                    command_buffer,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::PipelineStageFlags::FRAGMENT_SHADER,
                    vk::DependencyFlags::empty(),
                    &[],
                    &[],
                    &[barrier_to_shader],
                );
            })
        })();

        self.ctx.free(staging_allocation);
        self.device.destroy_buffer(staging_buffer, None);
        result
    }
}

impl Renderer for VulkanRenderer {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn RendererBuffer>> {
        if desc.size == 0 {
            engine_error!("freelook::vulkan", "Cannot create a zero-sized buffer");
            return Err(Error::InvalidResource("Buffer size is zero".to_string()));
        }

        unsafe {
            let usage = match desc.usage {
                BufferUsage::Vertex => vk::BufferUsageFlags::VERTEX_BUFFER,
            };

            let buffer_create_info = vk::BufferCreateInfo::default()
                .size(desc.size)
                .usage(usage)
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = self.device.create_buffer(&buffer_create_info, None)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to create buffer of size {} bytes: {:?}", desc.size, e))?;

            let requirements = self.device.get_buffer_memory_requirements(buffer);

            let allocation = match self.ctx.allocate(&AllocationCreateDesc {
                name: "buffer",
                requirements,
                location: MemoryLocation::CpuToGpu,
                linear: true,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            }) {
                Ok(allocation) => allocation,
                Err(e) => {
                    self.device.destroy_buffer(buffer, None);
                    return Err(e);
                }
            };

            // From here the Buffer owns both handles and releases them on error
            let bind_result = self.device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset());
            let vk_buffer = Buffer::new(Arc::clone(&self.ctx), buffer, allocation, desc.size);

            bind_result
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to bind buffer memory: {:?}", e))?;

            Ok(Arc::new(vk_buffer))
        }
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn RendererTexture>> {
        desc.validate().map_err(|e| {
            engine_error!("freelook::vulkan", "Invalid texture: {}", e);
            e
        })?;

        let format = texture_format_to_vk(desc.format);

        unsafe {
            let image_create_info = vk::ImageCreateInfo::default()
                .image_type(vk::ImageType::TYPE_2D)
                .format(format)
                .extent(vk::Extent3D {
                    width: desc.width,
                    height: desc.height,
                    depth: 1,
                })
                .mip_levels(1)
                .array_layers(1)
                .samples(vk::SampleCountFlags::TYPE_1)
                .tiling(vk::ImageTiling::OPTIMAL)
                .usage(vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::TRANSFER_DST)
                .sharing_mode(vk::SharingMode::EXCLUSIVE)
                .initial_layout(vk::ImageLayout::UNDEFINED);

            let image = self.device.create_image(&image_create_info, None)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to create texture image: {:?}", e))?;

            let requirements = self.device.get_image_memory_requirements(image);
            let allocation = match self.ctx.allocate(&AllocationCreateDesc {
                name: "texture",
                requirements,
                location: MemoryLocation::GpuOnly,
                linear: false,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            }) {
                Ok(allocation) => allocation,
                Err(e) => {
                    self.device.destroy_image(image, None);
                    return Err(e);
                }
            };

            // Handles not yet owned by a Texture are released on the error path
            let mut view = vk::ImageView::null();
            let mut sampler = vk::Sampler::null();

            let result = (|| -> Result<()> {
                self.device.bind_image_memory(image, allocation.memory(), allocation.offset())
                    .map_err(|e| engine_err!("freelook::vulkan", "Failed to bind texture image memory: {:?}", e))?;

                self.upload_texture_pixels(image, &desc)?;

                let view_create_info = vk::ImageViewCreateInfo::default()
                    .image(image)
                    .view_type(vk::ImageViewType::TYPE_2D)
                    .format(format)
                    .components(vk::ComponentMapping {
                        r: vk::ComponentSwizzle::IDENTITY,
                        g: vk::ComponentSwizzle::IDENTITY,
                        b: vk::ComponentSwizzle::IDENTITY,
                        a: vk::ComponentSwizzle::IDENTITY,
                    })
                    .subresource_range(vk::ImageSubresourceRange {
                        aspect_mask: vk::ImageAspectFlags::COLOR,
                        base_mip_level: 0,
                        level_count: 1,
                        base_array_layer: 0,
                        layer_count: 1,
                    });

                view = self.device.create_image_view(&view_create_info, None)
                    .map_err(|e| engine_err!("freelook::vulkan", "Failed to create texture image view: {:?}", e))?;

                let filter = filter_to_vk(desc.filter);
                let address_mode = wrap_to_vk(desc.wrap);
                let sampler_create_info = vk::SamplerCreateInfo::default()
                    .mag_filter(filter)
                    .min_filter(filter)
                    .mipmap_mode(vk::SamplerMipmapMode::NEAREST)
                    .address_mode_u(address_mode)
                    .address_mode_v(address_mode)
                    .address_mode_w(address_mode)
                    .min_lod(0.0)
                    .max_lod(0.0)
                    .border_color(vk::BorderColor::INT_OPAQUE_BLACK);

                sampler = self.device.create_sampler(&sampler_create_info, None)
                    .map_err(|e| engine_err!("freelook::vulkan", "Failed to create texture sampler: {:?}", e))?;

                Ok(())
            })();

            let descriptor_set = match result.and_then(|()| self.allocate_texture_set()) {
                Ok(set) => set,
                Err(e) => {
                    if sampler != vk::Sampler::null() {
                        self.device.destroy_sampler(sampler, None);
                    }
                    if view != vk::ImageView::null() {
                        self.device.destroy_image_view(view, None);
                    }
                    self.ctx.free(allocation);
                    self.device.destroy_image(image, None);
                    return Err(e);
                }
            };

            let image_info = vk::DescriptorImageInfo::default()
                .sampler(sampler)
                .image_view(view)
                .image_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);

            let write = vk::WriteDescriptorSet::default()
                .dst_set(descriptor_set)
                .dst_binding(0)
                .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                .image_info(std::slice::from_ref(&image_info));

            self.device.update_descriptor_sets(&[write], &[]);

            engine_debug!("freelook::vulkan", "Texture created: {}x{} {:?}", desc.width, desc.height, desc.format);

            Ok(Arc::new(Texture::new(
                Arc::clone(&self.ctx),
                image,
                view,
                sampler,
                descriptor_set,
                allocation,
                TextureInfo {
                    width: desc.width,
                    height: desc.height,
                    format: desc.format,
                },
            )))
        }
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn RendererShader>> {
        if desc.code.is_empty() || desc.code.len() % 4 != 0 {
            engine_error!("freelook::vulkan", "Shader code is not SPIR-V (size: {} bytes)", desc.code.len());
            return Err(Error::InvalidResource(format!(
                "Shader code must be a non-empty multiple of 4 bytes, got {}",
                desc.code.len()
            )));
        }

        // read_spv copies into aligned words and checks the magic number
        let code = ash::util::read_spv(&mut std::io::Cursor::new(desc.code))
            .map_err(|e| {
                engine_error!("freelook::vulkan", "Invalid SPIR-V: {}", e);
                Error::InvalidResource(format!("Invalid SPIR-V: {}", e))
            })?;

        let entry_point = CString::new(desc.entry_point.as_str())
            .map_err(|e| {
                engine_error!("freelook::vulkan", "Invalid shader entry point: {}", e);
                Error::InvalidResource(format!("Invalid shader entry point: {}", e))
            })?;

        let create_info = vk::ShaderModuleCreateInfo::default().code(&code);

        let module = unsafe {
            self.device.create_shader_module(&create_info, None)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to create shader module: {:?}", e))?
        };

        Ok(Arc::new(Shader {
            module,
            stage: desc.stage,
            entry_point,
            device: self.device.clone(),
        }))
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn RendererPipeline>> {
        if desc.vertex_shader.stage() != freelook_engine::freelook::render::ShaderStage::Vertex
            || desc.fragment_shader.stage() != freelook_engine::freelook::render::ShaderStage::Fragment
        {
            engine_error!("freelook::vulkan", "Pipeline shaders bound to the wrong stages");
            return Err(Error::InvalidResource("Pipeline shaders bound to the wrong stages".to_string()));
        }

        let render_pass = self.swapchain
            .as_ref()
            .map(|swapchain| swapchain.render_pass())
            .ok_or_else(|| engine_err!("freelook::vulkan", "Swapchain not available"))?;

        unsafe {
            // Downcast shaders to Vulkan types
            let vertex_shader = &*(Arc::as_ptr(&desc.vertex_shader) as *const Shader);
            let fragment_shader = &*(Arc::as_ptr(&desc.fragment_shader) as *const Shader);

            let shader_stages = [
                vk::PipelineShaderStageCreateInfo::default()
                    .stage(shader_stage_to_vk(vertex_shader.stage))
                    .module(vertex_shader.module)
                    .name(&vertex_shader.entry_point),
                vk::PipelineShaderStageCreateInfo::default()
                    .stage(shader_stage_to_vk(fragment_shader.stage))
                    .module(fragment_shader.module)
                    .name(&fragment_shader.entry_point),
            ];

            let vertex_bindings: Vec<vk::VertexInputBindingDescription> = desc.vertex_layout.bindings
                .iter()
                .map(|binding| vk::VertexInputBindingDescription {
                    binding: binding.binding,
                    stride: binding.stride,
                    input_rate: vk::VertexInputRate::VERTEX,
                })
                .collect();

            let vertex_attributes: Vec<vk::VertexInputAttributeDescription> = desc.vertex_layout.attributes
                .iter()
                .map(|attribute| vk::VertexInputAttributeDescription {
                    location: attribute.location,
                    binding: attribute.binding,
                    format: buffer_format_to_vk(attribute.format),
                    offset: attribute.offset,
                })
                .collect();

            let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default()
                .vertex_binding_descriptions(&vertex_bindings)
                .vertex_attribute_descriptions(&vertex_attributes);

            let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
                .topology(topology_to_vk(desc.topology))
                .primitive_restart_enable(false);

            // Viewport state (dynamic)
            let viewports = [vk::Viewport::default()];
            let scissors = [vk::Rect2D::default()];
            let viewport_state = vk::PipelineViewportStateCreateInfo::default()
                .viewports(&viewports)
                .scissors(&scissors);

            let rasterization_state = vk::PipelineRasterizationStateCreateInfo::default()
                .depth_clamp_enable(false)
                .rasterizer_discard_enable(false)
                .polygon_mode(vk::PolygonMode::FILL)
                .line_width(1.0)
                .cull_mode(cull_mode_to_vk(desc.rasterization.cull_mode))
                .front_face(front_face_to_vk(desc.rasterization.front_face))
                .depth_bias_enable(false);

            let depth_stencil_state = vk::PipelineDepthStencilStateCreateInfo::default()
                .depth_test_enable(desc.depth_stencil.depth_test_enable)
                .depth_write_enable(desc.depth_stencil.depth_write_enable)
                .depth_compare_op(compare_op_to_vk(desc.depth_stencil.depth_compare_op))
                .depth_bounds_test_enable(false)
                .stencil_test_enable(false);

            let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
                .sample_shading_enable(false)
                .rasterization_samples(vk::SampleCountFlags::TYPE_1);

            let color_blend_attachment = vk::PipelineColorBlendAttachmentState::default()
                .color_write_mask(vk::ColorComponentFlags::RGBA)
                .blend_enable(false);

            let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
                .logic_op_enable(false)
                .attachments(std::slice::from_ref(&color_blend_attachment));

            let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
            let dynamic_state = vk::PipelineDynamicStateCreateInfo::default()
                .dynamic_states(&dynamic_states);

            let push_constant_ranges: Vec<vk::PushConstantRange> = desc.push_constant_ranges
                .iter()
                .map(|range| vk::PushConstantRange {
                    stage_flags: stage_flags_to_vk(range.stages),
                    offset: range.offset,
                    size: range.size,
                })
                .collect();

            let set_layouts = [self.texture_set_layout];
            let mut layout_create_info = vk::PipelineLayoutCreateInfo::default()
                .push_constant_ranges(&push_constant_ranges);
            if desc.sampled_texture {
                layout_create_info = layout_create_info.set_layouts(&set_layouts);
            }

            let layout = self.device.create_pipeline_layout(&layout_create_info, None)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to create pipeline layout: {:?}", e))?;

            let pipeline_create_info = vk::GraphicsPipelineCreateInfo::default()
                .stages(&shader_stages)
                .vertex_input_state(&vertex_input_state)
                .input_assembly_state(&input_assembly_state)
                .viewport_state(&viewport_state)
                .rasterization_state(&rasterization_state)
                .depth_stencil_state(&depth_stencil_state)
                .multisample_state(&multisample_state)
                .color_blend_state(&color_blend_state)
                .dynamic_state(&dynamic_state)
                .layout(layout)
                .render_pass(render_pass)
                .subpass(0);

            let pipelines = match self.device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                &[pipeline_create_info],
                None,
            ) {
                Ok(pipelines) => pipelines,
                Err((_, e)) => {
                    self.device.destroy_pipeline_layout(layout, None);
                    engine_bail!("freelook::vulkan", "Failed to create graphics pipeline: {:?}", e);
                }
            };

            Ok(Arc::new(Pipeline {
                pipeline: pipelines[0],
                pipeline_layout: layout,
                sampled_texture: desc.sampled_texture,
                device: self.device.clone(),
            }))
        }
    }

    fn begin_frame(&mut self, clear_values: &[ClearValue]) -> Result<Option<&mut dyn RendererCommandList>> {
        if self.current_image.is_some() {
            engine_bail_warn!("freelook::vulkan", "begin_frame called while a frame is already open");
        }

        let (width, height) = self.window_size;
        if width == 0 || height == 0 {
            return self.skip_frame();
        }

        if self.needs_recreate && !self.recreate_swapchain()? {
            return self.skip_frame();
        }

        let frame_index = self.current_frame;
        let in_flight = self.frames[frame_index].in_flight;
        let image_available = self.frames[frame_index].image_available;

        unsafe {
            self.device.wait_for_fences(&[in_flight], true, u64::MAX)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to wait for frame fence: {:?}", e))?;
        }

        if self.swapchain_mut()?.is_empty() {
            self.needs_recreate = true;
            return self.skip_frame();
        }

        let image_index = match self.swapchain_mut()?.acquire_next_image(image_available)? {
            AcquiredImage::Ready(index) => index,
            AcquiredImage::OutOfDate => {
                engine_debug!("freelook::vulkan", "Swapchain out of date, recreating");
                self.recreate_swapchain()?;
                return self.skip_frame();
            }
        };

        // Only reset once an image is acquired, so a skipped frame never leaves the fence unsignaled
        unsafe {
            self.device.reset_fences(&[in_flight])
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to reset frame fence: {:?}", e))?;
        }

        let (render_pass, framebuffer, extent) = {
            let swapchain = self.swapchain_mut()?;
            (swapchain.render_pass(), swapchain.framebuffer(image_index), swapchain.extent())
        };

        let vk_clear_values = clear_values_to_vk(clear_values);
        let render_pass_info = vk::RenderPassBeginInfo::default()
            .render_pass(render_pass)
            .framebuffer(framebuffer)
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            })
            .clear_values(&vk_clear_values);

        let command_list = &mut self.frames[frame_index].command_list;
        command_list.begin(&render_pass_info)?;
        self.current_image = Some(image_index);

        Ok(Some(command_list as &mut dyn RendererCommandList))
    }

    fn end_frame(&mut self) -> Result<()> {
        let image_index = self.current_image.take()
            .ok_or_else(|| engine_warn_err!("freelook::vulkan", "end_frame called without an open frame"))?;

        let frame_index = self.current_frame;
        self.current_frame = (self.current_frame + 1) % MAX_FRAMES_IN_FLIGHT;

        let frame = &mut self.frames[frame_index];
        frame.command_list.end()?;
        let (draw_calls, vertices) = frame.command_list.counters();
        let command_buffer = frame.command_list.command_buffer();
        let image_available = frame.image_available;
        let in_flight = frame.in_flight;

        let render_finished = self.swapchain_mut()?.render_finished_semaphore(image_index);

        unsafe {
            let wait_semaphores = [image_available];
            let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
            let signal_semaphores = [render_finished];
            let command_buffers = [command_buffer];

            let submit_info = vk::SubmitInfo::default()
                .wait_semaphores(&wait_semaphores)
                .wait_dst_stage_mask(&wait_stages)
                .command_buffers(&command_buffers)
                .signal_semaphores(&signal_semaphores);

            self.device
                .queue_submit(self.ctx.graphics_queue, &[submit_info], in_flight)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to submit commands to GPU queue: {:?}", e))?;
        }

        if self.swapchain_mut()?.present(image_index)? {
            self.needs_recreate = true;
        }

        self.stats.frames_presented += 1;
        self.stats.draw_calls = draw_calls;
        self.stats.vertices = vertices;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.window_size != (width, height) {
            self.window_size = (width, height);
            self.needs_recreate = true;
        }
    }

    fn wait_idle(&self) -> Result<()> {
        unsafe {
            self.device
                .device_wait_idle()
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to wait idle: {:?}", e))
        }
    }

    fn stats(&self) -> RendererStats {
        self.stats
    }
}

impl Drop for VulkanRenderer {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();

            // 1. Swapchain: framebuffers, depth buffer, render pass, surface
            self.swapchain.take();

            // 2. Per-frame objects (command buffers go with their pool)
            for frame in self.frames.drain(..) {
                self.device.destroy_semaphore(frame.image_available, None);
                self.device.destroy_fence(frame.in_flight, None);
            }
            if self.command_pool != vk::CommandPool::null() {
                self.device.destroy_command_pool(self.command_pool, None);
            }

            // 3. Descriptor pools (frees every texture set) and the shared layout
            for pool in self.descriptor_pools.drain(..) {
                self.device.destroy_descriptor_pool(pool, None);
            }
            if self.texture_set_layout != vk::DescriptorSetLayout::null() {
                self.device.destroy_descriptor_set_layout(self.texture_set_layout, None);
            }

            // 4. Upload command pool from GpuContext
            if let Ok(mut pool) = self.ctx.upload_command_pool.lock() {
                if *pool != vk::CommandPool::null() {
                    self.device.destroy_command_pool(*pool, None);
                    *pool = vk::CommandPool::null();
                }
            }

            // 5. Drop allocator: free VkDeviceMemory pages BEFORE destroying device
            match Arc::get_mut(&mut self.ctx) {
                Some(ctx) => std::mem::ManuallyDrop::drop(&mut ctx.allocator),
                None => engine_warn!("freelook::vulkan",
                    "GPU resources outlive the renderer, leaking allocator"),
            }

            // 6. Destroy debug messenger BEFORE device and instance
            if let Some((debug_utils, messenger)) = self.debug_messenger.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            // 7. Destroy device and instance
            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}
