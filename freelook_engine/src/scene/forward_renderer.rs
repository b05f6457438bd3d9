/// Frame rendering strategies.
///
/// A FrameRenderer records the draws for a Scene into a command list that
/// the backend has already opened (render pass begun, attachments cleared).

use crate::error::Result;
use crate::camera::ViewProjection;
use crate::renderer::{CommandList, Rect2D, UniformSet, Viewport};
use super::scene::Scene;

/// Counters for one recorded frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub vertices: u64,
}

/// Strategy for drawing a scene.
pub trait FrameRenderer {
    /// Record the draws for every visible drawable in `scene`.
    fn render_frame(
        &mut self,
        scene: &Scene,
        view_projection: &ViewProjection,
        framebuffer_size: (u32, u32),
        cmd: &mut dyn CommandList,
    ) -> Result<FrameStats>;
}

/// Forward renderer - draws each drawable sequentially in scene order.
///
/// Per drawable: bind pipeline, bind vertex buffer, bind texture (if any),
/// upload uniforms, draw.
#[derive(Debug, Default)]
pub struct ForwardRenderer;

impl ForwardRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl FrameRenderer for ForwardRenderer {
    fn render_frame(
        &mut self,
        scene: &Scene,
        view_projection: &ViewProjection,
        (width, height): (u32, u32),
        cmd: &mut dyn CommandList,
    ) -> Result<FrameStats> {
        cmd.set_viewport(Viewport::full(width, height))?;
        cmd.set_scissor(Rect2D::full(width, height))?;

        let mut stats = FrameStats::default();
        for (_, drawable) in scene.visible_drawables() {
            let geometry = drawable.geometry();
            let material = drawable.material();

            cmd.bind_pipeline(drawable.pipeline())?;
            cmd.bind_vertex_buffer(&geometry.vertex_buffer, 0)?;
            if let Some(texture) = drawable.texture() {
                cmd.bind_texture(texture)?;
            }
            cmd.set_uniforms(&UniformSet {
                model: *drawable.model(),
                view: view_projection.view,
                projection: view_projection.projection,
                object_color: material.object_color,
                light_color: material.light_color,
            })?;
            cmd.draw(geometry.vertex_count, geometry.first_vertex)?;

            stats.draw_calls += 1;
            stats.vertices += geometry.vertex_count as u64;
        }

        Ok(stats)
    }
}

#[cfg(test)]
#[path = "forward_renderer_tests.rs"]
mod tests;
