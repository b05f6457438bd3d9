/// Vertex data for the demo scenes

use bytemuck::{Pod, Zeroable};
use freelook_engine::freelook::render::{BufferFormat, VertexLayout};

/// Position, vertex color and texture coordinates
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl TexturedVertex {
    pub fn layout() -> VertexLayout {
        VertexLayout::interleaved(&[
            BufferFormat::R32G32B32_SFLOAT,
            BufferFormat::R32G32B32_SFLOAT,
            BufferFormat::R32G32_SFLOAT,
        ])
    }
}

/// Position only; color comes from the material
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlainVertex {
    pub position: [f32; 3],
}

impl PlainVertex {
    pub fn layout() -> VertexLayout {
        VertexLayout::interleaved(&[BufferFormat::R32G32B32_SFLOAT])
    }
}

/// Vertex tint of the textured cube
const CUBE_TINT: [f32; 3] = [1.0, 0.0, 1.0];

/// Unit cube faces, corners counter-clockwise seen from outside
const CUBE_FACES: [[[f32; 3]; 4]; 6] = [
    // -Z
    [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]],
    // +Z
    [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]],
    // -X
    [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]],
    // +X
    [[0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]],
    // -Y
    [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]],
    // +Y
    [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]],
];

const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Two triangles per face
const FACE_TRIANGLES: [usize; 6] = [0, 1, 2, 2, 3, 0];

/// Vertices per cube (6 faces, 2 triangles each)
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// 36 non-indexed vertices of a unit cube centered on the origin
pub fn textured_cube() -> Vec<TexturedVertex> {
    CUBE_FACES
        .iter()
        .flat_map(|face| {
            FACE_TRIANGLES.iter().map(move |&corner| TexturedVertex {
                position: face[corner],
                color: CUBE_TINT,
                uv: FACE_UVS[corner],
            })
        })
        .collect()
}

/// Same cube without color or texture coordinates
pub fn plain_cube() -> Vec<PlainVertex> {
    textured_cube()
        .into_iter()
        .map(|v| PlainVertex { position: v.position })
        .collect()
}

/// One triangle in the z = 0 plane
pub fn triangle() -> [PlainVertex; 3] {
    [
        PlainVertex { position: [-0.5, -0.5, 0.0] },
        PlainVertex { position: [0.5, -0.5, 0.0] },
        PlainVertex { position: [0.0, 0.5, 0.0] },
    ]
}
