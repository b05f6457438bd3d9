/// SPIR-V loading and pipeline setup for the demo programs
///
/// Each program is a `<name>.vert.spv` / `<name>.frag.spv` pair compiled from
/// the GLSL sources in `shaders/`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use freelook_engine::freelook::{Error, Renderer, Result};
use freelook_engine::freelook::render::{
    DepthStencilState, DrawPushConstants, Pipeline, PipelineDesc, PrimitiveTopology,
    RasterizationState, Shader, ShaderDesc, ShaderStage, VertexLayout,
};
use freelook_engine::engine_debug;

/// Directory holding the compiled shaders
pub fn default_shader_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
}

/// Read `<dir>/<name>.<stage>.spv`
pub fn read_spirv(dir: &Path, name: &str, stage: ShaderStage) -> Result<Vec<u8>> {
    let extension = match stage {
        ShaderStage::Vertex => "vert",
        ShaderStage::Fragment => "frag",
    };
    let path = dir.join(format!("{}.{}.spv", name, extension));

    std::fs::read(&path).map_err(|e| {
        Error::InitializationFailed(format!(
            "Cannot read shader '{}': {} (compile it with `glslc shaders/{}.{} -o {}`)",
            path.display(),
            e,
            name,
            extension,
            path.display()
        ))
    })
}

/// Vertex and fragment shaders of one program
pub struct Program {
    pub vertex: Arc<dyn Shader>,
    pub fragment: Arc<dyn Shader>,
}

impl Program {
    pub fn load(renderer: &mut dyn Renderer, dir: &Path, name: &str) -> Result<Self> {
        let vertex_code = read_spirv(dir, name, ShaderStage::Vertex)?;
        let fragment_code = read_spirv(dir, name, ShaderStage::Fragment)?;

        let vertex = renderer.create_shader(ShaderDesc {
            code: &vertex_code,
            stage: ShaderStage::Vertex,
            entry_point: "main".to_string(),
        })?;
        let fragment = renderer.create_shader(ShaderDesc {
            code: &fragment_code,
            stage: ShaderStage::Fragment,
            entry_point: "main".to_string(),
        })?;

        engine_debug!("freelook::demo", "Loaded shader program '{}'", name);
        Ok(Self { vertex, fragment })
    }

    /// Pipeline description for this program with the draw push constants
    pub fn pipeline_desc(&self, vertex_layout: VertexLayout, sampled_texture: bool) -> PipelineDesc {
        PipelineDesc {
            vertex_shader: Arc::clone(&self.vertex),
            fragment_shader: Arc::clone(&self.fragment),
            vertex_layout,
            topology: PrimitiveTopology::TriangleList,
            push_constant_ranges: vec![DrawPushConstants::range()],
            sampled_texture,
            rasterization: RasterizationState::default(),
            depth_stencil: DepthStencilState::default(),
        }
    }

    pub fn create_pipeline(
        &self,
        renderer: &mut dyn Renderer,
        vertex_layout: VertexLayout,
        sampled_texture: bool,
    ) -> Result<Arc<dyn Pipeline>> {
        renderer.create_pipeline(self.pipeline_desc(vertex_layout, sampled_texture))
    }
}
