/// Demo scenes: flat triangle, textured cube, ten rotating cubes, lit cube
/// with a light marker.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use freelook_engine::freelook::{Renderer, Result};
use freelook_engine::freelook::camera::CameraConfig;
use freelook_engine::freelook::render::{Buffer, BufferDesc};
use freelook_engine::freelook::scene::{Drawable, DrawableKey, Geometry, Material, Scene};
use freelook_engine::engine_info;
use glam::{Mat4, Vec3};

use crate::geometry::{self, PlainVertex, TexturedVertex, CUBE_VERTEX_COUNT};
use crate::shaders::Program;
use crate::texture;

/// Where the ten cubes of the `cubes` scene sit
pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

pub const LIGHT_POSITION: Vec3 = Vec3::new(1.2, 1.0, 2.0);
pub const LIGHT_MARKER_SCALE: f32 = 0.2;
pub const LIGHT_COLOR: Vec3 = Vec3::ONE;
pub const LIT_OBJECT_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.31);
pub const TRIANGLE_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.2);

/// Tilt of the single textured cube, degrees about X
const CUBE_TILT_DEGREES: f32 = -20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneKind {
    Triangle,
    Cube,
    #[default]
    Cubes,
    Light,
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "triangle" => Ok(SceneKind::Triangle),
            "cube" => Ok(SceneKind::Cube),
            "cubes" => Ok(SceneKind::Cubes),
            "light" => Ok(SceneKind::Light),
            other => Err(format!(
                "Unknown scene '{}' (expected triangle, cube, cubes or light)",
                other
            )),
        }
    }
}

impl SceneKind {
    /// Camera start state for this scene
    pub fn camera(&self) -> CameraConfig {
        let z = match self {
            SceneKind::Light => 6.0,
            _ => 3.0,
        };
        CameraConfig::at(Vec3::new(0.0, 0.0, z))
    }
}

/// Model matrix of cube `index` of the `cubes` scene at `time` seconds
///
/// Spins `time * index` radians about Z, then `time` about X.
pub fn cube_model(index: usize, time: f32) -> Mat4 {
    let position = CUBE_POSITIONS[index % CUBE_POSITIONS.len()];
    Mat4::from_translation(position)
        * Mat4::from_rotation_z(time * index as f32)
        * Mat4::from_rotation_x(time)
}

pub fn light_marker_model() -> Mat4 {
    Mat4::from_translation(LIGHT_POSITION) * Mat4::from_scale(Vec3::splat(LIGHT_MARKER_SCALE))
}

/// A built scene plus the drawables animated each frame
pub struct DemoScene {
    kind: SceneKind,
    scene: Scene,
    spinning: Vec<(DrawableKey, usize)>,
}

impl DemoScene {
    /// Create the GPU resources and drawables of `kind`
    pub fn build(
        kind: SceneKind,
        renderer: &mut dyn Renderer,
        shader_dir: &Path,
        texture_path: Option<&Path>,
    ) -> Result<Self> {
        let mut scene = Scene::new();
        let mut spinning = Vec::new();

        match kind {
            SceneKind::Triangle => {
                let program = Program::load(renderer, shader_dir, "flat")?;
                let pipeline = program.create_pipeline(renderer, PlainVertex::layout(), false)?;
                let vertices = geometry::triangle();
                let buffer = upload(renderer, bytemuck::cast_slice(&vertices))?;

                scene.add(Drawable::new(
                    Geometry::new(buffer, vertices.len() as u32),
                    pipeline,
                    None,
                    Material { object_color: TRIANGLE_COLOR, light_color: LIGHT_COLOR },
                )?);
            }
            SceneKind::Cube | SceneKind::Cubes => {
                let program = Program::load(renderer, shader_dir, "textured")?;
                let pipeline = program.create_pipeline(renderer, TexturedVertex::layout(), true)?;
                let texture = renderer.create_texture(texture::load_or_generate(texture_path)?)?;
                let buffer = upload(renderer, bytemuck::cast_slice(&geometry::textured_cube()))?;

                let count = if kind == SceneKind::Cube { 1 } else { CUBE_POSITIONS.len() };
                for index in 0..count {
                    let model = if kind == SceneKind::Cube {
                        Mat4::from_rotation_x(CUBE_TILT_DEGREES.to_radians())
                    } else {
                        cube_model(index, 0.0)
                    };
                    let key = scene.add(
                        Drawable::new(
                            Geometry::new(Arc::clone(&buffer), CUBE_VERTEX_COUNT),
                            Arc::clone(&pipeline),
                            Some(Arc::clone(&texture)),
                            Material::default(),
                        )?
                        .with_model(model),
                    );
                    if kind == SceneKind::Cubes {
                        spinning.push((key, index));
                    }
                }
            }
            SceneKind::Light => {
                let lit = Program::load(renderer, shader_dir, "lit")?;
                let marker = Program::load(renderer, shader_dir, "marker")?;
                let lit_pipeline = lit.create_pipeline(renderer, PlainVertex::layout(), false)?;
                let marker_pipeline = marker.create_pipeline(renderer, PlainVertex::layout(), false)?;
                let buffer = upload(renderer, bytemuck::cast_slice(&geometry::plain_cube()))?;

                scene.add(Drawable::new(
                    Geometry::new(Arc::clone(&buffer), CUBE_VERTEX_COUNT),
                    lit_pipeline,
                    None,
                    Material { object_color: LIT_OBJECT_COLOR, light_color: LIGHT_COLOR },
                )?);
                scene.add(
                    Drawable::new(
                        Geometry::new(buffer, CUBE_VERTEX_COUNT),
                        marker_pipeline,
                        None,
                        Material { object_color: LIGHT_COLOR, light_color: LIGHT_COLOR },
                    )?
                    .with_model(light_marker_model()),
                );
            }
        }

        engine_info!("freelook::demo", "Scene {:?} ready ({} drawables)", kind, scene.len());
        Ok(Self { kind, scene, spinning })
    }

    /// Advance the animated drawables to `time` seconds
    pub fn animate(&mut self, time: f32) {
        for &(key, index) in &self.spinning {
            self.scene.set_model(key, cube_model(index, time));
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

fn upload(renderer: &mut dyn Renderer, bytes: &[u8]) -> Result<Arc<dyn Buffer>> {
    let buffer = renderer.create_buffer(BufferDesc::vertices(bytes))?;
    buffer.update(0, bytes)?;
    Ok(buffer)
}
