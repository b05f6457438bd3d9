/// CommandList - Vulkan implementation of the render CommandList trait
///
/// One per frame in flight. The renderer opens the command buffer and the
/// render pass in `begin_frame` and closes both in `end_frame`; in between
/// the command list is handed out to record draws.

use freelook_engine::freelook::Result;
use freelook_engine::freelook::render::{
    CommandList as RendererCommandList,
    Pipeline as RendererPipeline,
    Buffer as RendererBuffer,
    Texture as RendererTexture,
    ShaderStageFlags, Viewport, Rect2D,
};
use freelook_engine::{engine_bail, engine_err};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_buffer::Buffer;
use crate::vulkan_format::{flipped_viewport, rect_to_vk, stage_flags_to_vk};
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_texture::Texture;

/// Pipeline state needed after binding
#[derive(Clone, Copy)]
struct BoundPipeline {
    layout: vk::PipelineLayout,
    sampled_texture: bool,
}

/// Vulkan command list implementation
pub struct CommandList {
    device: ash::Device,
    command_buffer: vk::CommandBuffer,
    /// Whether the render pass is open and draws may be recorded
    recording: bool,
    bound_pipeline: Option<BoundPipeline>,
    draw_calls: u32,
    vertices: u64,
}

impl CommandList {
    pub(crate) fn new(device: ash::Device, command_buffer: vk::CommandBuffer) -> Self {
        Self {
            device,
            command_buffer,
            recording: false,
            bound_pipeline: None,
            draw_calls: 0,
            vertices: 0,
        }
    }

    /// Get the underlying Vulkan command buffer
    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    /// Draw calls and vertices recorded since the last `begin`
    pub(crate) fn counters(&self) -> (u32, u64) {
        (self.draw_calls, self.vertices)
    }

    /// Reset the command buffer and open the render pass
    pub(crate) fn begin(&mut self, render_pass_info: &vk::RenderPassBeginInfo) -> Result<()> {
        if self.recording {
            engine_bail!("freelook::vulkan", "Command list already recording");
        }

        unsafe {
            self.device
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to reset command buffer: {:?}", e))?;

            let begin_info = vk::CommandBufferBeginInfo::default()
                .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

            self.device
                .begin_command_buffer(self.command_buffer, &begin_info)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to begin command buffer: {:?}", e))?;

            self.device.cmd_begin_render_pass(
                self.command_buffer,
                render_pass_info,
                vk::SubpassContents::INLINE,
            );
        }

        self.recording = true;
        self.bound_pipeline = None;
        self.draw_calls = 0;
        self.vertices = 0;
        Ok(())
    }

    /// Close the render pass and the command buffer
    pub(crate) fn end(&mut self) -> Result<()> {
        if !self.recording {
            engine_bail!("freelook::vulkan", "Command list not recording");
        }
        self.recording = false;

        unsafe {
            self.device.cmd_end_render_pass(self.command_buffer);
            self.device
                .end_command_buffer(self.command_buffer)
                .map_err(|e| engine_err!("freelook::vulkan", "Failed to end command buffer: {:?}", e))
        }
    }

    fn ensure_recording(&self) -> Result<()> {
        if !self.recording {
            engine_bail!("freelook::vulkan", "Command list not recording");
        }
        Ok(())
    }

    fn bound_pipeline(&self, operation: &str) -> Result<BoundPipeline> {
        self.ensure_recording()?;
        self.bound_pipeline
            .ok_or_else(|| engine_err!("freelook::vulkan", "{}: no pipeline bound", operation))
    }
}

impl RendererCommandList for CommandList {
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.ensure_recording()?;
        unsafe {
            self.device.cmd_set_viewport(self.command_buffer, 0, &[flipped_viewport(viewport)]);
        }
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.ensure_recording()?;
        unsafe {
            self.device.cmd_set_scissor(self.command_buffer, 0, &[rect_to_vk(scissor)]);
        }
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn RendererPipeline>) -> Result<()> {
        self.ensure_recording()?;

        // Downcast to Vulkan type
        let vk_pipeline = unsafe { &*(Arc::as_ptr(pipeline) as *const Pipeline) };

        unsafe {
            self.device.cmd_bind_pipeline(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                vk_pipeline.pipeline,
            );
        }

        self.bound_pipeline = Some(BoundPipeline {
            layout: vk_pipeline.pipeline_layout,
            sampled_texture: vk_pipeline.sampled_texture,
        });
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn RendererBuffer>, offset: u64) -> Result<()> {
        self.ensure_recording()?;

        if offset >= buffer.size() {
            engine_bail!("freelook::vulkan",
                "bind_vertex_buffer: offset {} outside buffer of {} bytes", offset, buffer.size());
        }

        let vk_buffer = unsafe { &*(Arc::as_ptr(buffer) as *const Buffer) };

        unsafe {
            self.device.cmd_bind_vertex_buffers(
                self.command_buffer,
                0,
                &[vk_buffer.buffer],
                &[offset],
            );
        }
        Ok(())
    }

    fn bind_texture(&mut self, texture: &Arc<dyn RendererTexture>) -> Result<()> {
        let bound = self.bound_pipeline("bind_texture")?;
        if !bound.sampled_texture {
            engine_bail!("freelook::vulkan", "bind_texture: bound pipeline does not sample a texture");
        }

        let vk_texture = unsafe { &*(Arc::as_ptr(texture) as *const Texture) };

        unsafe {
            self.device.cmd_bind_descriptor_sets(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                bound.layout,
                0,
                &[vk_texture.descriptor_set],
                &[],
            );
        }
        Ok(())
    }

    fn push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]) -> Result<()> {
        let bound = self.bound_pipeline("push_constants")?;

        unsafe {
            self.device.cmd_push_constants(
                self.command_buffer,
                bound.layout,
                stage_flags_to_vk(stages),
                offset,
                data,
            );
        }
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.bound_pipeline("draw")?;

        unsafe {
            self.device.cmd_draw(self.command_buffer, vertex_count, 1, first_vertex, 0);
        }

        self.draw_calls += 1;
        self.vertices += vertex_count as u64;
        Ok(())
    }
}
