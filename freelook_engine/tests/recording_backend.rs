#![allow(dead_code)]
//! Recording backend - a CPU-only Renderer for integration tests
//!
//! Implements the public renderer traits and records every call as a
//! string so tests can check what a full frame produced.

use std::sync::{Arc, Mutex};
use freelook_engine::freelook::platform::Platform;
use freelook_engine::freelook::render::{
    Buffer, BufferDesc, ClearValue, CommandList, Pipeline, PipelineDesc, Rect2D, Renderer,
    RendererStats, Shader, ShaderDesc, ShaderStage, ShaderStageFlags, Texture, TextureDesc,
    TextureInfo, Viewport,
};
use freelook_engine::freelook::Result;

pub struct RecordingBuffer {
    pub data: Mutex<Vec<u8>>,
}

impl Buffer for RecordingBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let mut contents = self.data.lock().unwrap();
        freelook_engine::freelook::render::check_buffer_range(contents.len() as u64, offset, data.len() as u64)?;
        contents[offset as usize..offset as usize + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.data.lock().unwrap().len() as u64
    }
}

pub struct RecordingTexture(pub TextureInfo);

impl Texture for RecordingTexture {
    fn info(&self) -> &TextureInfo {
        &self.0
    }
}

pub struct RecordingShader(pub ShaderStage);

impl Shader for RecordingShader {
    fn stage(&self) -> ShaderStage {
        self.0
    }
}

pub struct RecordingPipeline {
    pub sampled_texture: bool,
    pub push_constant_size: u32,
}

impl Pipeline for RecordingPipeline {
    fn sampled_texture(&self) -> bool {
        self.sampled_texture
    }
}

#[derive(Default)]
pub struct RecordingCommands {
    pub log: Vec<String>,
    pub pushes: Vec<Vec<u8>>,
}

impl CommandList for RecordingCommands {
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.log.push(format!("viewport {}x{}", viewport.width, viewport.height));
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.log.push(format!("scissor {}x{}", scissor.width, scissor.height));
        Ok(())
    }

    fn bind_pipeline(&mut self, _pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.log.push("pipeline".to_string());
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, _buffer: &Arc<dyn Buffer>, _offset: u64) -> Result<()> {
        self.log.push("vertices".to_string());
        Ok(())
    }

    fn bind_texture(&mut self, _texture: &Arc<dyn Texture>) -> Result<()> {
        self.log.push("texture".to_string());
        Ok(())
    }

    fn push_constants(&mut self, _stages: ShaderStageFlags, _offset: u32, data: &[u8]) -> Result<()> {
        self.pushes.push(data.to_vec());
        self.log.push("uniforms".to_string());
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, _first_vertex: u32) -> Result<()> {
        self.log.push(format!("draw {}", vertex_count));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub commands: RecordingCommands,
    pub frames: Vec<Vec<ClearValue>>,
    pub stats: RendererStats,
    pub in_frame: bool,
}

impl Renderer for RecordingRenderer {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        Ok(Arc::new(RecordingBuffer { data: Mutex::new(vec![0; desc.size as usize]) }))
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        desc.validate()?;
        Ok(Arc::new(RecordingTexture(TextureInfo {
            width: desc.width,
            height: desc.height,
            format: desc.format,
        })))
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
        Ok(Arc::new(RecordingShader(desc.stage)))
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        Ok(Arc::new(RecordingPipeline {
            sampled_texture: desc.sampled_texture,
            push_constant_size: desc.push_constant_ranges.iter().map(|r| r.size).sum(),
        }))
    }

    fn begin_frame(&mut self, clear_values: &[ClearValue]) -> Result<Option<&mut dyn CommandList>> {
        self.in_frame = true;
        self.frames.push(clear_values.to_vec());
        Ok(Some(&mut self.commands as &mut dyn CommandList))
    }

    fn end_frame(&mut self) -> Result<()> {
        self.in_frame = false;
        self.stats.frames_presented += 1;
        Ok(())
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn wait_idle(&self) -> Result<()> {
        Ok(())
    }

    fn stats(&self) -> RendererStats {
        self.stats
    }
}

/// Platform with a manually advanced clock
pub struct ScriptedPlatform {
    pub time: f64,
    pub size: (u32, u32),
    pub closing: bool,
}

impl ScriptedPlatform {
    pub fn new(width: u32, height: u32) -> Self {
        Self { time: 0.0, size: (width, height), closing: false }
    }
}

impl Platform for ScriptedPlatform {
    fn should_close(&self) -> bool {
        self.closing
    }

    fn request_close(&mut self) {
        self.closing = true;
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn time(&self) -> f64 {
        self.time
    }
}
