/// Drawable - one prepared draw: geometry, pipeline, optional texture,
/// material colors and a model matrix.

use std::sync::Arc;
use glam::{Mat4, Vec3};
use slotmap::new_key_type;
use crate::error::{Error, Result};
use crate::renderer::{Buffer, Pipeline, Texture};

new_key_type! {
    /// Stable key for a Drawable within a Scene.
    ///
    /// Keys remain valid even after other drawables are removed.
    pub struct DrawableKey;
}

/// Vertex data for a non-indexed draw
#[derive(Clone)]
pub struct Geometry {
    pub vertex_buffer: Arc<dyn Buffer>,
    pub vertex_count: u32,
    pub first_vertex: u32,
}

impl Geometry {
    pub fn new(vertex_buffer: Arc<dyn Buffer>, vertex_count: u32) -> Self {
        Self {
            vertex_buffer,
            vertex_count,
            first_vertex: 0,
        }
    }
}

/// Flat material colors fed to the fragment stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub object_color: Vec3,
    pub light_color: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            object_color: Vec3::ONE,
            light_color: Vec3::ONE,
        }
    }
}

#[derive(Clone)]
pub struct Drawable {
    geometry: Geometry,
    pipeline: Arc<dyn Pipeline>,
    texture: Option<Arc<dyn Texture>>,
    material: Material,
    model: Mat4,
}

impl Drawable {
    /// Build a drawable, checking that it can actually be drawn
    ///
    /// Fails when the vertex count is zero or when the texture binding
    /// does not match what the pipeline samples.
    pub fn new(
        geometry: Geometry,
        pipeline: Arc<dyn Pipeline>,
        texture: Option<Arc<dyn Texture>>,
        material: Material,
    ) -> Result<Self> {
        if geometry.vertex_count == 0 {
            return Err(Error::InvalidResource("Drawable has no vertices".to_string()));
        }
        match (pipeline.sampled_texture(), texture.is_some()) {
            (true, false) => {
                return Err(Error::InvalidResource(
                    "Pipeline samples a texture but none was given".to_string(),
                ))
            }
            (false, true) => {
                return Err(Error::InvalidResource(
                    "Texture given for a pipeline that samples none".to_string(),
                ))
            }
            _ => {}
        }
        Ok(Self {
            geometry,
            pipeline,
            texture,
            material,
            model: Mat4::IDENTITY,
        })
    }

    /// Builder-style model matrix
    pub fn with_model(mut self, model: Mat4) -> Self {
        self.model = model;
        self
    }

    // ===== GETTERS =====

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn pipeline(&self) -> &Arc<dyn Pipeline> {
        &self.pipeline
    }

    pub fn texture(&self) -> Option<&Arc<dyn Texture>> {
        self.texture.as_ref()
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    // ===== SETTERS =====

    pub fn set_model(&mut self, model: Mat4) {
        self.model = model;
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }
}
