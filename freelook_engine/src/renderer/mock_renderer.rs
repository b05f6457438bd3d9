/// Mock Renderer for unit tests (no GPU required)
///
/// Records every command it receives so tests can assert on call order,
/// pushed uniform bytes and frame lifecycle without a graphics device.

use std::sync::{Arc, Mutex};

use crate::renderer::{
    Renderer, Buffer, Texture, Shader, Pipeline, CommandList,
    BufferDesc, TextureDesc, ShaderDesc, ShaderStage, ShaderStageFlags, PipelineDesc,
    Viewport, Rect2D, ClearValue, TextureInfo, RendererStats, check_buffer_range,
};
use crate::error::Result;
use crate::engine_bail;

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub name: String,
    pub data: Mutex<Vec<u8>>,
}

impl MockBuffer {
    pub fn new(size: u64, name: String) -> Self {
        Self {
            name,
            data: Mutex::new(vec![0; size as usize]),
        }
    }
}

impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let mut contents = self.data.lock().unwrap();
        check_buffer_range(contents.len() as u64, offset, data.len() as u64)?;
        let start = offset as usize;
        contents[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.data.lock().unwrap().len() as u64
    }
}

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub name: String,
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

// ============================================================================
// Mock Shader / Pipeline
// ============================================================================

#[derive(Debug)]
pub struct MockShader {
    pub stage: ShaderStage,
    pub name: String,
}

impl Shader for MockShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }
}

#[derive(Debug)]
pub struct MockPipeline {
    pub name: String,
    pub sampled_texture: bool,
}

impl MockPipeline {
    pub fn new(name: &str, sampled_texture: bool) -> Self {
        Self {
            name: name.to_string(),
            sampled_texture,
        }
    }
}

impl Pipeline for MockPipeline {
    fn sampled_texture(&self) -> bool {
        self.sampled_texture
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[derive(Debug, Default)]
pub struct MockCommandList {
    pub commands: Vec<String>,
    pub viewports: Vec<Viewport>,
    pub scissors: Vec<Rect2D>,
    pub push_constants: Vec<(ShaderStageFlags, u32, Vec<u8>)>,
    pub draws: Vec<(u32, u32)>,
    /// When set, the named command fails with a backend error
    pub fail_on: Option<&'static str>,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, command: &'static str) -> Result<()> {
        self.commands.push(command.to_string());
        if self.fail_on == Some(command) {
            engine_bail!("freelook::MockCommandList", "{} failed", command);
        }
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.viewports.push(viewport);
        self.record("set_viewport")
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.scissors.push(scissor);
        self.record("set_scissor")
    }

    fn bind_pipeline(&mut self, _pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.record("bind_pipeline")
    }

    fn bind_vertex_buffer(&mut self, _buffer: &Arc<dyn Buffer>, _offset: u64) -> Result<()> {
        self.record("bind_vertex_buffer")
    }

    fn bind_texture(&mut self, _texture: &Arc<dyn Texture>) -> Result<()> {
        self.record("bind_texture")
    }

    fn push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]) -> Result<()> {
        self.push_constants.push((stages, offset, data.to_vec()));
        self.record("push_constants")
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.draws.push((vertex_count, first_vertex));
        self.record("draw")
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

#[derive(Debug, Default)]
pub struct MockRenderer {
    pub command_list: MockCommandList,
    pub created: Vec<String>,
    pub clear_values: Vec<Vec<ClearValue>>,
    pub resizes: Vec<(u32, u32)>,
    /// Number of upcoming begin_frame calls that return None
    pub skip_frames: u32,
    pub frame_open: bool,
    pub stats: RendererStats,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_name(&mut self, kind: &str) -> String {
        let name = format!("{}_{}", kind, self.created.len());
        self.created.push(name.clone());
        name
    }
}

impl Renderer for MockRenderer {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        let name = self.next_name("buffer");
        Ok(Arc::new(MockBuffer::new(desc.size, name)))
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        desc.validate()?;
        let name = self.next_name("texture");
        Ok(Arc::new(MockTexture {
            info: TextureInfo {
                width: desc.width,
                height: desc.height,
                format: desc.format,
            },
            name,
        }))
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
        let name = self.next_name("shader");
        Ok(Arc::new(MockShader { stage: desc.stage, name }))
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        let name = self.next_name("pipeline");
        Ok(Arc::new(MockPipeline::new(&name, desc.sampled_texture)))
    }

    fn begin_frame(&mut self, clear_values: &[ClearValue]) -> Result<Option<&mut dyn CommandList>> {
        if self.frame_open {
            engine_bail!("freelook::MockRenderer", "begin_frame called twice");
        }
        if self.skip_frames > 0 {
            self.skip_frames -= 1;
            self.stats.frames_skipped += 1;
            return Ok(None);
        }
        self.frame_open = true;
        self.clear_values.push(clear_values.to_vec());
        self.command_list.commands.push("begin_frame".to_string());
        Ok(Some(&mut self.command_list as &mut dyn CommandList))
    }

    fn end_frame(&mut self) -> Result<()> {
        if !self.frame_open {
            engine_bail!("freelook::MockRenderer", "end_frame without begin_frame");
        }
        self.frame_open = false;
        self.command_list.commands.push("end_frame".to_string());
        self.stats.frames_presented += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn wait_idle(&self) -> Result<()> {
        Ok(())
    }

    fn stats(&self) -> RendererStats {
        self.stats
    }
}
