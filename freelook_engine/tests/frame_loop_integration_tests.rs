//! Integration tests for the frame loop
//!
//! Drives complete frames through the public API with a CPU-only
//! recording backend. No GPU required.
//!
//! Run with: cargo test --test frame_loop_integration_tests

mod recording_backend;

use std::sync::Arc;
use freelook_engine::freelook::camera::CameraConfig;
use freelook_engine::freelook::input::Key;
use freelook_engine::freelook::render::{
    BufferDesc, BufferFormat, DepthStencilState, DrawPushConstants, PipelineDesc,
    PrimitiveTopology, RasterizationState, Renderer, ShaderDesc, ShaderStage, TextureDesc,
    TextureFilter, TextureFormat, TextureWrap, VertexLayout,
};
use freelook_engine::freelook::scene::{Drawable, Geometry, Material, Scene};
use freelook_engine::freelook::{FrameLoop, FrameLoopConfig, FrameOutcome};
use freelook_engine::glam::{Mat4, Vec3, Vec4};
use recording_backend::{RecordingRenderer, ScriptedPlatform};

// ============================================================================
// HELPERS
// ============================================================================

fn build_light_scene(renderer: &mut RecordingRenderer) -> Scene {
    let positions = [0.0f32; 36 * 3];
    let bytes: &[u8] = bytemuck::cast_slice(&positions);
    let buffer = renderer.create_buffer(BufferDesc::vertices(bytes)).unwrap();
    buffer.update(0, bytes).unwrap();

    let vs = renderer
        .create_shader(ShaderDesc { code: &[], stage: ShaderStage::Vertex, entry_point: "main".to_string() })
        .unwrap();
    let fs = renderer
        .create_shader(ShaderDesc { code: &[], stage: ShaderStage::Fragment, entry_point: "main".to_string() })
        .unwrap();
    let desc = PipelineDesc {
        vertex_shader: vs,
        fragment_shader: fs,
        vertex_layout: VertexLayout::interleaved(&[BufferFormat::R32G32B32_SFLOAT]),
        topology: PrimitiveTopology::TriangleList,
        push_constant_ranges: vec![DrawPushConstants::range()],
        sampled_texture: false,
        rasterization: RasterizationState::default(),
        depth_stencil: DepthStencilState::default(),
    };
    let lit = renderer.create_pipeline(desc.clone()).unwrap();
    let marker = renderer.create_pipeline(desc).unwrap();

    let mut scene = Scene::new();
    scene.add(
        Drawable::new(
            Geometry::new(buffer.clone(), 36),
            lit,
            None,
            Material { object_color: Vec3::new(1.0, 0.5, 0.31), light_color: Vec3::ONE },
        )
        .unwrap(),
    );
    scene.add(
        Drawable::new(Geometry::new(buffer, 36), marker, None, Material::default())
            .unwrap()
            .with_model(Mat4::from_translation(Vec3::new(1.2, 1.0, 2.0)) * Mat4::from_scale(Vec3::splat(0.2))),
    );
    scene
}

fn read_constants(bytes: &[u8]) -> DrawPushConstants {
    bytemuck::pod_read_unaligned(bytes)
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_integration_light_scene_frame() {
    let mut renderer = RecordingRenderer::default();
    let scene = build_light_scene(&mut renderer);
    let mut platform = ScriptedPlatform::new(640, 480);
    let mut frame_loop = FrameLoop::new(FrameLoopConfig {
        camera: CameraConfig::at(Vec3::new(0.0, 0.0, 6.0)),
        fps_log_interval: None,
        ..FrameLoopConfig::default()
    });

    let outcome = frame_loop.run_frame(&mut platform, &mut renderer, &scene).unwrap();

    match outcome {
        FrameOutcome::Rendered(stats) => {
            assert_eq!(stats.draw_calls, 2);
            assert_eq!(stats.vertices, 72);
        }
        other => panic!("expected a rendered frame, got {:?}", other),
    }
    assert_eq!(
        renderer.commands.log,
        vec![
            "viewport 640x480", "scissor 640x480",
            "pipeline", "vertices", "uniforms", "draw 36",
            "pipeline", "vertices", "uniforms", "draw 36",
        ]
    );

    assert_eq!(renderer.commands.pushes[0].len(), 96);
    let first = read_constants(&renderer.commands.pushes[0]);
    assert_eq!(first.object_color, Vec4::new(1.0, 0.5, 0.31, 1.0));

    // The marker cube center lands in front of the camera, right of and above the center
    let second = read_constants(&renderer.commands.pushes[1]);
    let clip = second.mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert!(clip.w > 0.0);
    assert!(clip.x / clip.w > 0.0);
    assert!(clip.y / clip.w > 0.0);
}

#[test]
fn test_integration_walk_and_quit() {
    let mut renderer = RecordingRenderer::default();
    let scene = build_light_scene(&mut renderer);
    let mut platform = ScriptedPlatform::new(800, 600);
    let mut frame_loop = FrameLoop::new(FrameLoopConfig { fps_log_interval: None, ..FrameLoopConfig::default() });

    frame_loop.input_mut().on_key_event(Key::W, true);
    for frame in 0..=10 {
        platform.time = frame as f64 * 0.1;
        frame_loop.run_frame(&mut platform, &mut renderer, &scene).unwrap();
    }
    frame_loop.input_mut().on_key_event(Key::W, false);

    // One second of forward motion at 2.5 units/s from z = 3
    assert!(frame_loop.camera().position().abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-3));

    frame_loop.input_mut().on_key_event(Key::Q, true);
    platform.time = 1.1;
    let outcome = frame_loop.run_frame(&mut platform, &mut renderer, &scene).unwrap();

    assert_eq!(outcome, FrameOutcome::Exit);
    assert!(platform.closing);
    assert_eq!(renderer.stats().frames_presented, 11);
    assert!(!renderer.in_frame);
}

#[test]
fn test_integration_textured_drawable_binds_texture() {
    let mut renderer = RecordingRenderer::default();
    let texture = renderer
        .create_texture(TextureDesc {
            width: 2,
            height: 2,
            format: TextureFormat::R8G8B8A8_SRGB,
            data: vec![255; 16],
            filter: TextureFilter::Linear,
            wrap: TextureWrap::Repeat,
        })
        .unwrap();
    let buffer = renderer.create_buffer(BufferDesc::vertices(&[0u8; 36 * 32])).unwrap();
    let vs = renderer
        .create_shader(ShaderDesc { code: &[], stage: ShaderStage::Vertex, entry_point: "main".to_string() })
        .unwrap();
    let fs = renderer
        .create_shader(ShaderDesc { code: &[], stage: ShaderStage::Fragment, entry_point: "main".to_string() })
        .unwrap();
    let pipeline = renderer
        .create_pipeline(PipelineDesc {
            vertex_shader: vs,
            fragment_shader: fs,
            vertex_layout: VertexLayout::interleaved(&[
                BufferFormat::R32G32B32_SFLOAT,
                BufferFormat::R32G32B32_SFLOAT,
                BufferFormat::R32G32_SFLOAT,
            ]),
            topology: PrimitiveTopology::TriangleList,
            push_constant_ranges: vec![DrawPushConstants::range()],
            sampled_texture: true,
            rasterization: RasterizationState::default(),
            depth_stencil: DepthStencilState::default(),
        })
        .unwrap();
    let mut scene = Scene::new();
    scene.add(Drawable::new(Geometry::new(buffer, 36), pipeline, Some(Arc::clone(&texture)), Material::default()).unwrap());

    let mut frame_loop = FrameLoop::new(FrameLoopConfig { fps_log_interval: None, ..FrameLoopConfig::default() });
    frame_loop.run_frame(&mut ScriptedPlatform::new(640, 480), &mut renderer, &scene).unwrap();

    assert!(renderer.commands.log.contains(&"texture".to_string()));
    assert_eq!(texture.info().width, 2);
}

#[test]
fn test_integration_texture_with_wrong_size_is_rejected() {
    let mut renderer = RecordingRenderer::default();

    let result = renderer.create_texture(TextureDesc {
        width: 4,
        height: 4,
        format: TextureFormat::R8G8B8A8_SRGB,
        data: vec![0; 10],
        filter: TextureFilter::Nearest,
        wrap: TextureWrap::ClampToEdge,
    });

    assert!(result.is_err());
}
