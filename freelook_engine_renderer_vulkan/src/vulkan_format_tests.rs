//! Unit tests for Vulkan conversion functions
//!
//! Pure functions only, no GPU required.

use super::*;

// ============================================================================
// FORMAT CONVERSION TESTS
// ============================================================================

#[test]
fn test_texture_format_to_vk() {
    assert_eq!(texture_format_to_vk(TextureFormat::R8G8B8A8_SRGB), vk::Format::R8G8B8A8_SRGB);
    assert_eq!(texture_format_to_vk(TextureFormat::R8G8B8A8_UNORM), vk::Format::R8G8B8A8_UNORM);
}

#[test]
fn test_buffer_format_to_vk_float_formats() {
    assert_eq!(buffer_format_to_vk(BufferFormat::R32_SFLOAT), vk::Format::R32_SFLOAT);
    assert_eq!(buffer_format_to_vk(BufferFormat::R32G32_SFLOAT), vk::Format::R32G32_SFLOAT);
    assert_eq!(buffer_format_to_vk(BufferFormat::R32G32B32_SFLOAT), vk::Format::R32G32B32_SFLOAT);
    assert_eq!(
        buffer_format_to_vk(BufferFormat::R32G32B32A32_SFLOAT),
        vk::Format::R32G32B32A32_SFLOAT
    );
}

#[test]
fn test_stage_flags_to_vk() {
    assert_eq!(stage_flags_to_vk(ShaderStageFlags::VERTEX), vk::ShaderStageFlags::VERTEX);
    assert_eq!(stage_flags_to_vk(ShaderStageFlags::FRAGMENT), vk::ShaderStageFlags::FRAGMENT);
    assert_eq!(
        stage_flags_to_vk(ShaderStageFlags::VERTEX_FRAGMENT),
        vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT
    );
    assert_eq!(stage_flags_to_vk(ShaderStageFlags::empty()), vk::ShaderStageFlags::empty());
}

#[test]
fn test_shader_stage_to_vk() {
    assert_eq!(shader_stage_to_vk(ShaderStage::Vertex), vk::ShaderStageFlags::VERTEX);
    assert_eq!(shader_stage_to_vk(ShaderStage::Fragment), vk::ShaderStageFlags::FRAGMENT);
}

// ============================================================================
// PIPELINE STATE TESTS
// ============================================================================

#[test]
fn test_pipeline_state_conversions() {
    assert_eq!(topology_to_vk(PrimitiveTopology::TriangleList), vk::PrimitiveTopology::TRIANGLE_LIST);
    assert_eq!(topology_to_vk(PrimitiveTopology::LineList), vk::PrimitiveTopology::LINE_LIST);
    assert_eq!(cull_mode_to_vk(CullMode::None), vk::CullModeFlags::NONE);
    assert_eq!(cull_mode_to_vk(CullMode::Back), vk::CullModeFlags::BACK);
    assert_eq!(front_face_to_vk(FrontFace::CounterClockwise), vk::FrontFace::COUNTER_CLOCKWISE);
    assert_eq!(compare_op_to_vk(CompareOp::Less), vk::CompareOp::LESS);
    assert_eq!(compare_op_to_vk(CompareOp::LessOrEqual), vk::CompareOp::LESS_OR_EQUAL);
}

#[test]
fn test_sampler_conversions() {
    assert_eq!(filter_to_vk(TextureFilter::Linear), vk::Filter::LINEAR);
    assert_eq!(filter_to_vk(TextureFilter::Nearest), vk::Filter::NEAREST);
    assert_eq!(wrap_to_vk(TextureWrap::Repeat), vk::SamplerAddressMode::REPEAT);
    assert_eq!(wrap_to_vk(TextureWrap::ClampToEdge), vk::SamplerAddressMode::CLAMP_TO_EDGE);
}

// ============================================================================
// DYNAMIC STATE TESTS
// ============================================================================

#[test]
fn test_flipped_viewport_negates_height() {
    let vp = flipped_viewport(Viewport::full(640, 480));

    assert_eq!(vp.x, 0.0);
    assert_eq!(vp.y, 480.0);
    assert_eq!(vp.width, 640.0);
    assert_eq!(vp.height, -480.0);
    assert_eq!(vp.min_depth, 0.0);
    assert_eq!(vp.max_depth, 1.0);
}

#[test]
fn test_rect_to_vk() {
    let rect = rect_to_vk(Rect2D { x: 4, y: 8, width: 100, height: 50 });

    assert_eq!(rect.offset.x, 4);
    assert_eq!(rect.offset.y, 8);
    assert_eq!(rect.extent.width, 100);
    assert_eq!(rect.extent.height, 50);
}

#[test]
fn test_clear_values_defaults() {
    let values = clear_values_to_vk(&[]);

    unsafe {
        assert_eq!(values[0].color.float32, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(values[1].depth_stencil.depth, 1.0);
        assert_eq!(values[1].depth_stencil.stencil, 0);
    }
}

#[test]
fn test_clear_values_in_attachment_order() {
    // Depth given first still lands in the depth slot
    let values = clear_values_to_vk(&[
        ClearValue::DepthStencil { depth: 0.5, stencil: 3 },
        ClearValue::Color([0.2, 0.3, 0.3, 1.0]),
    ]);

    unsafe {
        assert_eq!(values[0].color.float32, [0.2, 0.3, 0.3, 1.0]);
        assert_eq!(values[1].depth_stencil.depth, 0.5);
        assert_eq!(values[1].depth_stencil.stencil, 3);
    }
}

// ============================================================================
// SWAPCHAIN SELECTION TESTS
// ============================================================================

fn surface_format(format: vk::Format) -> vk::SurfaceFormatKHR {
    vk::SurfaceFormatKHR {
        format,
        color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
    }
}

#[test]
fn test_choose_surface_format_prefers_bgra_srgb() {
    let formats = [
        surface_format(vk::Format::B8G8R8A8_UNORM),
        surface_format(vk::Format::R8G8B8A8_SRGB),
        surface_format(vk::Format::B8G8R8A8_SRGB),
    ];

    let chosen = choose_surface_format(&formats).unwrap();
    assert_eq!(chosen.format, vk::Format::B8G8R8A8_SRGB);
}

#[test]
fn test_choose_surface_format_falls_back_to_first() {
    let formats = [
        surface_format(vk::Format::A2B10G10R10_UNORM_PACK32),
        surface_format(vk::Format::B8G8R8A8_UNORM),
    ];

    let chosen = choose_surface_format(&formats).unwrap();
    assert_eq!(chosen.format, vk::Format::A2B10G10R10_UNORM_PACK32);
}

#[test]
fn test_choose_surface_format_empty() {
    assert!(choose_surface_format(&[]).is_none());
}

#[test]
fn test_choose_present_mode_vsync_is_fifo() {
    let available = [vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::FIFO];
    assert_eq!(choose_present_mode(true, &available), vk::PresentModeKHR::FIFO);
}

#[test]
fn test_choose_present_mode_without_vsync() {
    let available = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::IMMEDIATE, vk::PresentModeKHR::MAILBOX];
    assert_eq!(choose_present_mode(false, &available), vk::PresentModeKHR::MAILBOX);

    let available = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::IMMEDIATE];
    assert_eq!(choose_present_mode(false, &available), vk::PresentModeKHR::IMMEDIATE);

    let available = [vk::PresentModeKHR::FIFO];
    assert_eq!(choose_present_mode(false, &available), vk::PresentModeKHR::FIFO);
}

fn capabilities(current: (u32, u32)) -> vk::SurfaceCapabilitiesKHR {
    vk::SurfaceCapabilitiesKHR {
        min_image_count: 2,
        max_image_count: 3,
        current_extent: vk::Extent2D { width: current.0, height: current.1 },
        min_image_extent: vk::Extent2D { width: 1, height: 1 },
        max_image_extent: vk::Extent2D { width: 4096, height: 4096 },
        ..Default::default()
    }
}

#[test]
fn test_choose_extent_uses_surface_extent() {
    let extent = choose_extent(&capabilities((800, 600)), 640, 480);
    assert_eq!((extent.width, extent.height), (800, 600));
}

#[test]
fn test_choose_extent_uses_window_size_when_undefined() {
    let caps = capabilities((u32::MAX, u32::MAX));

    let extent = choose_extent(&caps, 640, 480);
    assert_eq!((extent.width, extent.height), (640, 480));

    let extent = choose_extent(&caps, 10_000, 0);
    assert_eq!((extent.width, extent.height), (4096, 1));
}

#[test]
fn test_choose_image_count() {
    assert_eq!(choose_image_count(&capabilities((1, 1))), 3);

    let mut caps = capabilities((1, 1));
    caps.max_image_count = 2;
    assert_eq!(choose_image_count(&caps), 2);

    caps.max_image_count = 0;
    assert_eq!(choose_image_count(&caps), 3);
}

#[test]
fn test_has_stencil() {
    assert!(has_stencil(vk::Format::D24_UNORM_S8_UINT));
    assert!(!has_stencil(vk::Format::D32_SFLOAT));
}
