/// Swapchain - presentation surface, render pass and per-image framebuffers
///
/// The render pass (color + depth) is created once and stays valid across
/// recreation; only image views, the depth buffer and framebuffers are rebuilt.

use freelook_engine::freelook::{Error, Result};
use freelook_engine::{engine_debug, engine_error, engine_err};
use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{choose_extent, choose_image_count, choose_present_mode, choose_surface_format, has_stencil};

/// Depth formats tried in order
const DEPTH_FORMAT_CANDIDATES: [vk::Format; 3] = [
    vk::Format::D32_SFLOAT,
    vk::Format::X8_D24_UNORM_PACK32,
    vk::Format::D24_UNORM_S8_UINT,
];

/// Result of acquiring the next swapchain image
pub(crate) enum AcquiredImage {
    /// Image ready for rendering
    Ready(u32),
    /// Surface changed; the swapchain must be recreated before rendering
    OutOfDate,
}

/// Depth attachment sized to the swapchain
struct DepthBuffer {
    image: vk::Image,
    view: vk::ImageView,
    allocation: Option<Allocation>,
}

/// Vulkan swapchain with its render pass, depth buffer and framebuffers
pub struct Swapchain {
    ctx: Arc<GpuContext>,
    physical_device: vk::PhysicalDevice,

    /// Present queue
    present_queue: vk::Queue,

    /// Surface
    surface: vk::SurfaceKHR,
    surface_loader: ash::khr::surface::Instance,

    /// Swapchain
    swapchain: vk::SwapchainKHR,
    swapchain_loader: ash::khr::swapchain::Device,
    image_views: Vec<vk::ImageView>,
    surface_format: vk::SurfaceFormatKHR,
    present_mode: vk::PresentModeKHR,
    extent: vk::Extent2D,

    depth_format: vk::Format,
    depth: Option<DepthBuffer>,

    render_pass: vk::RenderPass,
    framebuffers: Vec<vk::Framebuffer>,

    /// One semaphore per swapchain image (signaled by submit, waited by present)
    render_finished_semaphores: Vec<vk::Semaphore>,
}

impl Swapchain {
    /// Create a new swapchain
    ///
    /// # Arguments
    ///
    /// * `ctx` - Shared GPU context
    /// * `instance` - Vulkan instance (for the swapchain loader and format queries)
    /// * `physical_device` - Device the surface is presented from
    /// * `surface` - Window surface (owned by the swapchain from now on)
    /// * `surface_loader` - Surface loader
    /// * `present_queue` - Queue for presenting
    /// * `size` - Window size in pixels, used when the surface leaves the extent open
    /// * `vsync` - Use FIFO presentation
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ctx: Arc<GpuContext>,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        surface_loader: ash::khr::surface::Instance,
        present_queue: vk::Queue,
        size: (u32, u32),
        vsync: bool,
    ) -> Result<Self> {
        unsafe {
            let surface_formats = surface_loader
                .get_physical_device_surface_formats(physical_device, surface)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to query surface formats: {:?}", e);
                    Error::InitializationFailed(format!("Failed to get surface formats: {:?}", e))
                })?;

            let surface_format = choose_surface_format(&surface_formats).ok_or_else(|| {
                engine_error!("freelook::vulkan", "Surface reports no formats");
                Error::InitializationFailed("Surface reports no formats".to_string())
            })?;

            let present_modes = surface_loader
                .get_physical_device_surface_present_modes(physical_device, surface)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to query present modes: {:?}", e);
                    Error::InitializationFailed(format!("Failed to get present modes: {:?}", e))
                })?;
            let present_mode = choose_present_mode(vsync, &present_modes);

            let depth_format = DEPTH_FORMAT_CANDIDATES
                .iter()
                .copied()
                .find(|&format| {
                    instance
                        .get_physical_device_format_properties(physical_device, format)
                        .optimal_tiling_features
                        .contains(vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT)
                })
                .ok_or_else(|| {
                    engine_error!("freelook::vulkan", "No supported depth attachment format");
                    Error::InitializationFailed("No supported depth attachment format".to_string())
                })?;

            let render_pass = Self::create_render_pass(&ctx.device, surface_format.format, depth_format)?;

            let swapchain_loader = ash::khr::swapchain::Device::new(instance, &ctx.device);

            let mut swapchain = Self {
                ctx,
                physical_device,
                present_queue,
                surface,
                surface_loader,
                swapchain: vk::SwapchainKHR::null(),
                swapchain_loader,
                image_views: Vec::new(),
                surface_format,
                present_mode,
                extent: vk::Extent2D::default(),
                depth_format,
                depth: None,
                render_pass,
                framebuffers: Vec::new(),
                render_finished_semaphores: Vec::new(),
            };

            swapchain.build(size.0, size.1)?;

            engine_debug!("freelook::vulkan", "Swapchain created: {}x{} {:?} {:?}, depth {:?}",
                swapchain.extent.width, swapchain.extent.height,
                surface_format.format, present_mode, depth_format);

            Ok(swapchain)
        }
    }

    /// Render pass compatible with every framebuffer of this swapchain
    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// True when the swapchain has no presentable images (minimized window)
    pub fn is_empty(&self) -> bool {
        self.framebuffers.is_empty()
    }

    pub(crate) fn framebuffer(&self, image_index: u32) -> vk::Framebuffer {
        self.framebuffers[image_index as usize]
    }

    pub(crate) fn render_finished_semaphore(&self, image_index: u32) -> vk::Semaphore {
        self.render_finished_semaphores[image_index as usize]
    }

    /// Acquire the next image, signaling `image_available` when it is ready
    pub(crate) fn acquire_next_image(&mut self, image_available: vk::Semaphore) -> Result<AcquiredImage> {
        unsafe {
            match self.swapchain_loader.acquire_next_image(
                self.swapchain,
                u64::MAX,
                image_available,
                vk::Fence::null(),
            ) {
                // Suboptimal images are still presentable; recreation happens after present
                Ok((image_index, _suboptimal)) => Ok(AcquiredImage::Ready(image_index)),
                Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(AcquiredImage::OutOfDate),
                Err(e) => Err(engine_err!("freelook::vulkan", "Failed to acquire next swapchain image: {:?}", e)),
            }
        }
    }

    /// Present an image once rendering has finished
    ///
    /// Returns true when the swapchain should be recreated.
    pub(crate) fn present(&mut self, image_index: u32) -> Result<bool> {
        unsafe {
            let swapchains = [self.swapchain];
            let image_indices = [image_index];
            let wait_semaphores = [self.render_finished_semaphores[image_index as usize]];

            let present_info = vk::PresentInfoKHR::default()
                .wait_semaphores(&wait_semaphores)
                .swapchains(&swapchains)
                .image_indices(&image_indices);

            match self.swapchain_loader.queue_present(self.present_queue, &present_info) {
                Ok(suboptimal) => Ok(suboptimal),
                Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(true),
                Err(e) => Err(engine_err!("freelook::vulkan", "Failed to present swapchain image: {:?}", e)),
            }
        }
    }

    /// Rebuild for a new surface size
    ///
    /// Returns false when the surface is currently zero-sized; the old
    /// images are released and nothing is presentable until the next call.
    pub fn recreate(&mut self, width: u32, height: u32) -> Result<bool> {
        unsafe {
            self.ctx.device.device_wait_idle()
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to wait idle before swapchain recreate: {:?}", e))?;
        }
        self.destroy_size_dependent();
        self.build(width, height)?;

        engine_debug!("freelook::vulkan", "Swapchain recreated: {}x{}", self.extent.width, self.extent.height);
        Ok(!self.is_empty())
    }

    fn create_render_pass(device: &ash::Device, color_format: vk::Format, depth_format: vk::Format) -> Result<vk::RenderPass> {
        let attachments = [
            vk::AttachmentDescription::default()
                .format(color_format)
                .samples(vk::SampleCountFlags::TYPE_1)
                .load_op(vk::AttachmentLoadOp::CLEAR)
                .store_op(vk::AttachmentStoreOp::STORE)
                .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
                .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
                .initial_layout(vk::ImageLayout::UNDEFINED)
                .final_layout(vk::ImageLayout::PRESENT_SRC_KHR),
            vk::AttachmentDescription::default()
                .format(depth_format)
                .samples(vk::SampleCountFlags::TYPE_1)
                .load_op(vk::AttachmentLoadOp::CLEAR)
                .store_op(vk::AttachmentStoreOp::DONT_CARE)
                .stencil_load_op(vk::AttachmentLoadOp::CLEAR)
                .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
                .initial_layout(vk::ImageLayout::UNDEFINED)
                .final_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL),
        ];

        let color_attachment_ref = vk::AttachmentReference::default()
            .attachment(0)
            .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);

        let depth_attachment_ref = vk::AttachmentReference::default()
            .attachment(1)
            .layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL);

        let subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(std::slice::from_ref(&color_attachment_ref))
            .depth_stencil_attachment(&depth_attachment_ref);

        let stages = vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
            | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS;

        let dependency = vk::SubpassDependency::default()
            .src_subpass(vk::SUBPASS_EXTERNAL)
            .dst_subpass(0)
            .src_stage_mask(stages)
            .src_access_mask(vk::AccessFlags::empty())
            .dst_stage_mask(stages)
            .dst_access_mask(
                vk::AccessFlags::COLOR_ATTACHMENT_WRITE
                    | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            );

        let render_pass_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(std::slice::from_ref(&subpass))
            .dependencies(std::slice::from_ref(&dependency));

        unsafe {
            device.create_render_pass(&render_pass_info, None).map_err(|e| {
                engine_error!("freelook::vulkan", "Failed to create render pass: {:?}", e);
                Error::InitializationFailed(format!("Failed to create render pass: {:?}", e))
            })
        }
    }

    /// Create swapchain, image views, depth buffer, framebuffers and semaphores
    fn build(&mut self, width: u32, height: u32) -> Result<()> {
        unsafe {
            let capabilities = self.surface_loader
                .get_physical_device_surface_capabilities(self.physical_device, self.surface)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to get surface capabilities: {:?}", e);
                    Error::InitializationFailed(format!("Failed to get surface capabilities: {:?}", e))
                })?;

            let extent = choose_extent(&capabilities, width, height);
            self.extent = extent;
            if extent.width == 0 || extent.height == 0 {
                return Ok(());
            }

            let old_swapchain = self.swapchain;
            let swapchain_create_info = vk::SwapchainCreateInfoKHR::default()
                .surface(self.surface)
                .min_image_count(choose_image_count(&capabilities))
                .image_format(self.surface_format.format)
                .image_color_space(self.surface_format.color_space)
                .image_extent(extent)
                .image_array_layers(1)
                .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
                .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
                .pre_transform(capabilities.current_transform)
                .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
                .present_mode(self.present_mode)
                .clipped(true)
                .old_swapchain(old_swapchain);

            let swapchain = self.swapchain_loader
                .create_swapchain(&swapchain_create_info, None)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to create swapchain: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create swapchain: {:?}", e))
                })?;

            if old_swapchain != vk::SwapchainKHR::null() {
                self.swapchain_loader.destroy_swapchain(old_swapchain, None);
            }
            self.swapchain = swapchain;

            let images = self.swapchain_loader
                .get_swapchain_images(swapchain)
                .map_err(|e| {
                    engine_error!("freelook::vulkan", "Failed to get swapchain images: {:?}", e);
                    Error::InitializationFailed(format!("Failed to get swapchain images: {:?}", e))
                })?;

            for &image in &images {
                let view = self.create_view(image, self.surface_format.format, vk::ImageAspectFlags::COLOR)?;
                self.image_views.push(view);
            }

            let depth = self.create_depth_buffer(extent)?;
            let depth_view = depth.view;
            self.depth = Some(depth);

            for &color_view in &self.image_views {
                let attachments = [color_view, depth_view];
                let framebuffer_info = vk::FramebufferCreateInfo::default()
                    .render_pass(self.render_pass)
                    .attachments(&attachments)
                    .width(extent.width)
                    .height(extent.height)
                    .layers(1);

                let framebuffer = self.ctx.device.create_framebuffer(&framebuffer_info, None)
                    .map_err(|e| engine_err!("freelook::vulkan", "Failed to create framebuffer: {:?}", e))?;
                self.framebuffers.push(framebuffer);
            }

            let semaphore_create_info = vk::SemaphoreCreateInfo::default();
            for _ in 0..images.len() {
                let semaphore = self.ctx.device.create_semaphore(&semaphore_create_info, None)
                    .map_err(|e| {
                        engine_error!("freelook::vulkan", "Failed to create render-finished semaphore: {:?}", e);
                        Error::InitializationFailed(format!("Failed to create semaphore: {:?}", e))
                    })?;
                self.render_finished_semaphores.push(semaphore);
            }

            Ok(())
        }
    }

    fn create_view(&self, image: vk::Image, format: vk::Format, aspect_mask: vk::ImageAspectFlags) -> Result<vk::ImageView> {
        let create_info = vk::ImageViewCreateInfo::default()
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
                aspect_mask,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            });

        unsafe {
            self.ctx.device.create_image_view(&create_info, None)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to create swapchain image view: {:?}", e))
        }
    }

    fn create_depth_buffer(&self, extent: vk::Extent2D) -> Result<DepthBuffer> {
        unsafe {
            let image_create_info = vk::ImageCreateInfo::default()
                .image_type(vk::ImageType::TYPE_2D)
                .format(self.depth_format)
                .extent(vk::Extent3D {
                    width: extent.width,
                    height: extent.height,
                    depth: 1,
                })
                .mip_levels(1)
                .array_layers(1)
                .samples(vk::SampleCountFlags::TYPE_1)
                .tiling(vk::ImageTiling::OPTIMAL)
                .usage(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT)
                .sharing_mode(vk::SharingMode::EXCLUSIVE)
                .initial_layout(vk::ImageLayout::UNDEFINED);

            let image = self.ctx.device.create_image(&image_create_info, None)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to create depth image: {:?}", e))?;

            let requirements = self.ctx.device.get_image_memory_requirements(image);
            let allocation = match self.ctx.allocate(&AllocationCreateDesc {
                name: "depth_buffer",
                requirements,
                location: MemoryLocation::GpuOnly,
                linear: false,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            }) {
                Ok(allocation) => allocation,
                Err(e) => {
                    self.ctx.device.destroy_image(image, None);
                    return Err(e);
                }
            };

            let mut depth = DepthBuffer {
                image,
                view: vk::ImageView::null(),
                allocation: None,
            };

            if let Err(e) = self.ctx.device.bind_image_memory(image, allocation.memory(), allocation.offset()) {
                self.ctx.free(allocation);
                self.ctx.device.destroy_image(image, None);
                return Err(engine_err!("freelook::vulkan", "Failed to bind depth image memory: {:?}", e));
            }
            depth.allocation = Some(allocation);

            let mut aspect_mask = vk::ImageAspectFlags::DEPTH;
            if has_stencil(self.depth_format) {
                aspect_mask |= vk::ImageAspectFlags::STENCIL;
            }

            match self.create_view(image, self.depth_format, aspect_mask) {
                Ok(view) => depth.view = view,
                Err(e) => {
                    self.destroy_depth_buffer(depth);
                    return Err(e);
                }
            }

            Ok(depth)
        }
    }

    fn destroy_depth_buffer(&self, mut depth: DepthBuffer) {
        unsafe {
            if depth.view != vk::ImageView::null() {
                self.ctx.device.destroy_image_view(depth.view, None);
            }
            if let Some(allocation) = depth.allocation.take() {
                self.ctx.free(allocation);
            }
            self.ctx.device.destroy_image(depth.image, None);
        }
    }

    /// Destroy everything `build` creates except the swapchain handle itself
    /// (kept as `old_swapchain` for the next build)
    fn destroy_size_dependent(&mut self) {
        unsafe {
            for framebuffer in self.framebuffers.drain(..) {
                self.ctx.device.destroy_framebuffer(framebuffer, None);
            }
            for view in self.image_views.drain(..) {
                self.ctx.device.destroy_image_view(view, None);
            }
            for semaphore in self.render_finished_semaphores.drain(..) {
                self.ctx.device.destroy_semaphore(semaphore, None);
            }
        }
        if let Some(depth) = self.depth.take() {
            self.destroy_depth_buffer(depth);
        }
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.device_wait_idle().ok();
        }

        self.destroy_size_dependent();

        unsafe {
            if self.swapchain != vk::SwapchainKHR::null() {
                self.swapchain_loader.destroy_swapchain(self.swapchain, None);
            }
            self.ctx.device.destroy_render_pass(self.render_pass, None);
            self.surface_loader.destroy_surface(self.surface, None);
        }
    }
}
