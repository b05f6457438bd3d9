/// Per-draw uniform values and their push-constant encoding
///
/// Layout of `DrawPushConstants` (std430-compatible, 96 bytes):
///
/// | offset | size | field        | stage    |
/// |--------|------|--------------|----------|
/// | 0      | 64   | mvp          | vertex   |
/// | 64     | 16   | object_color | fragment |
/// | 80     | 16   | light_color  | fragment |

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use crate::renderer::{PushConstantRange, ShaderStageFlags};

/// Size in bytes of `DrawPushConstants`
pub const DRAW_PUSH_CONSTANTS_SIZE: u32 = std::mem::size_of::<DrawPushConstants>() as u32;

/// Uniform values for one draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformSet {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub object_color: Vec3,
    pub light_color: Vec3,
}

impl UniformSet {
    /// projection * view * model
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    pub fn to_push_constants(&self) -> DrawPushConstants {
        DrawPushConstants {
            mvp: self.mvp(),
            object_color: self.object_color.extend(1.0),
            light_color: self.light_color.extend(1.0),
        }
    }
}

impl Default for UniformSet {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            object_color: Vec3::ONE,
            light_color: Vec3::ONE,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawPushConstants {
    pub mvp: Mat4,
    pub object_color: Vec4,
    pub light_color: Vec4,
}

impl DrawPushConstants {
    /// Push constant range covering the whole block for both stages
    pub fn range() -> PushConstantRange {
        PushConstantRange {
            stages: ShaderStageFlags::VERTEX_FRAGMENT,
            offset: 0,
            size: DRAW_PUSH_CONSTANTS_SIZE,
        }
    }
}

#[cfg(test)]
#[path = "uniforms_tests.rs"]
mod tests;
