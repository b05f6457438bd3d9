/// CommandList trait - for recording draw commands inside a frame

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::{Buffer, Pipeline, ShaderStageFlags, Texture, UniformSet};

/// Command list for recording rendering commands
///
/// Obtained from `Renderer::begin_frame`. The render pass (with clears) is
/// already open; `Renderer::end_frame` closes it and presents.
pub trait CommandList {
    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Set the scissor rectangle
    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    /// Bind a graphics pipeline
    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()>;

    /// Bind a vertex buffer at binding 0
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    /// Bind a sampled texture for the currently bound pipeline
    fn bind_texture(&mut self, texture: &Arc<dyn Texture>) -> Result<()>;

    /// Push constants to the currently bound pipeline
    ///
    /// # Arguments
    ///
    /// * `stages` - Shader stages that will access the push constants
    /// * `offset` - Offset in bytes into push constant range
    /// * `data` - Data to push
    fn push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]) -> Result<()>;

    /// Upload per-draw uniforms
    ///
    /// The default encodes the set as `DrawPushConstants` in one push.
    fn set_uniforms(&mut self, uniforms: &UniformSet) -> Result<()> {
        let constants = uniforms.to_push_constants();
        self.push_constants(ShaderStageFlags::VERTEX_FRAGMENT, 0, bytemuck::bytes_of(&constants))
    }

    /// Draw vertices
    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()>;
}

/// Viewport dimensions and depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Full-framebuffer viewport with a [0, 1] depth range
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// 2D rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Clear value for an attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// Color clear value (RGBA)
    Color([f32; 4]),
    /// Depth/stencil clear value
    DepthStencil { depth: f32, stencil: u32 },
}
