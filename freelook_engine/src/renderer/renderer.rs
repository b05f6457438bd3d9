/// Renderer trait - resource factory and frame lifecycle

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{
    Buffer, Texture, Shader, Pipeline, CommandList, ClearValue,
    BufferDesc, TextureDesc, ShaderDesc, PipelineDesc,
};

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable validation/debug layers
    pub enable_validation: bool,
    /// Application name
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
    /// Wait for vertical blank when presenting
    pub vsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_validation: cfg!(debug_assertions),
            app_name: "Freelook Application".to_string(),
            app_version: (1, 0, 0),
            vsync: true,
        }
    }
}

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Frames presented since creation
    pub frames_presented: u64,
    /// Frames skipped (zero-sized or out-of-date surface)
    pub frames_skipped: u64,
    /// Draw calls recorded in the last presented frame
    pub draw_calls: u32,
    /// Vertices submitted in the last presented frame
    pub vertices: u64,
    /// Number of times the swapchain was rebuilt
    pub swapchain_recreations: u32,
}

/// Main renderer trait
///
/// Central factory for GPU resources plus the begin/end frame lifecycle.
/// Implemented by backend-specific renderers (e.g., VulkanRenderer).
pub trait Renderer {
    /// Create a vertex or uniform buffer
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create a sampled texture and upload its pixels
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a shader module from SPIR-V
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>>;

    /// Create a graphics pipeline compatible with the presentation pass
    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Start a frame: acquire an image, clear it and open the render pass
    ///
    /// Returns `None` when the frame must be skipped (minimized window,
    /// surface being rebuilt). `end_frame` must not be called in that case.
    fn begin_frame(&mut self, clear_values: &[ClearValue]) -> Result<Option<&mut dyn CommandList>>;

    /// Close the render pass, submit and present the frame
    fn end_frame(&mut self) -> Result<()>;

    /// Notify the renderer of a new framebuffer size
    fn resize(&mut self, width: u32, height: u32);

    /// Wait for all GPU operations to complete
    fn wait_idle(&self) -> Result<()>;

    /// Get statistics about the renderer
    fn stats(&self) -> RendererStats;
}
