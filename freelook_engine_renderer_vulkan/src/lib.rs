/*!
# Freelook Engine - Vulkan Renderer Backend

Vulkan implementation of the freelook rendering traits, using Ash for the
Vulkan bindings and gpu-allocator for memory management.

```no_run
use freelook_engine::freelook::render::Config;
use freelook_engine_renderer_vulkan::VulkanRenderer;
# fn run(window: &winit::window::Window) -> freelook_engine::freelook::Result<()> {
let size = window.inner_size();
let renderer = VulkanRenderer::new(window, (size.width, size.height), Config::default())?;
# Ok(())
# }
```
*/

mod vulkan;
mod vulkan_context;
mod vulkan_format;
mod vulkan_buffer;
mod vulkan_texture;
mod vulkan_shader;
mod vulkan_pipeline;
mod vulkan_swapchain;
mod vulkan_command_list;

#[cfg(feature = "vulkan-validation")]
mod debug;

pub use vulkan::VulkanRenderer;

// Validation message counters, only with the validation layers compiled in
#[cfg(feature = "vulkan-validation")]
pub use debug::{get_validation_stats, print_validation_stats_report, ValidationStats};

/// Namespace mirroring `freelook_engine::freelook`
pub mod freelook {
    pub use crate::vulkan::VulkanRenderer;
}
