use glam::Vec3;
use super::*;
use crate::camera::CameraConfig;

const EPS: f32 = 1e-5;

fn input_with(keys: &[Key]) -> InputState {
    let mut input = InputState::new();
    for key in keys {
        input.on_key_event(*key, true);
    }
    input
}

// ============================================================================
// Single keys
// ============================================================================

#[test]
fn test_forward_one_second_moves_base_speed() {
    let controller = MovementController::default();
    let mut camera = Camera::default();
    let start = camera.position();

    controller.step(&mut camera, &input_with(&[Key::W]), Vec3::Y, 1.0);

    let expected = start + camera.direction() * 2.5;
    assert!(camera.position().abs_diff_eq(expected, EPS));
}

#[test]
fn test_backward_moves_opposite() {
    let controller = MovementController::default();
    let camera = Camera::default();

    let offset = controller.displacement(&camera, &input_with(&[Key::S]), Vec3::Y, 0.5);

    assert!(offset.abs_diff_eq(-camera.direction() * 1.25, EPS));
}

#[test]
fn test_strafe_right_along_cross_product() {
    let controller = MovementController::default();
    let camera = Camera::default();

    let offset = controller.displacement(&camera, &input_with(&[Key::D]), Vec3::Y, 1.0);

    assert!(offset.abs_diff_eq(Vec3::new(2.5, 0.0, 0.0), EPS));
}

#[test]
fn test_opposite_keys_cancel() {
    let controller = MovementController::default();
    let camera = Camera::default();

    let offset = controller.displacement(&camera, &input_with(&[Key::W, Key::S, Key::A, Key::D]), Vec3::Y, 1.0);

    assert!(offset.abs_diff_eq(Vec3::ZERO, EPS));
}

#[test]
fn test_no_keys_no_motion() {
    let controller = MovementController::default();
    let mut camera = Camera::default();

    controller.step(&mut camera, &InputState::new(), Vec3::Y, 1.0);

    assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 3.0));
}

#[test]
fn test_zero_or_invalid_delta_time_no_motion() {
    let controller = MovementController::default();
    let camera = Camera::default();
    let input = input_with(&[Key::W]);

    assert_eq!(controller.displacement(&camera, &input, Vec3::Y, 0.0), Vec3::ZERO);
    assert_eq!(controller.displacement(&camera, &input, Vec3::Y, -1.0), Vec3::ZERO);
    assert_eq!(controller.displacement(&camera, &input, Vec3::Y, f32::NAN), Vec3::ZERO);
}

// ============================================================================
// Diagonal motion
// ============================================================================

#[test]
fn test_additive_diagonal_is_faster_but_bounded() {
    let controller = MovementController::default();
    let camera = Camera::default();

    let single = controller.displacement(&camera, &input_with(&[Key::W]), Vec3::Y, 1.0).length();
    let diagonal = controller.displacement(&camera, &input_with(&[Key::W, Key::D]), Vec3::Y, 1.0).length();

    assert!(diagonal > single);
    assert!(diagonal <= single * std::f32::consts::SQRT_2 + EPS);
}

#[test]
fn test_normalized_diagonal_matches_single_speed() {
    let controller = MovementController::new(MovementConfig {
        mode: MovementMode::Normalized,
        ..MovementConfig::default()
    });
    let camera = Camera::default();

    let diagonal = controller.displacement(&camera, &input_with(&[Key::W, Key::D]), Vec3::Y, 1.0);

    assert!((diagonal.length() - 2.5).abs() < EPS);
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_degenerate_strafe_axis_contributes_nothing() {
    let controller = MovementController::default();
    let camera = Camera::new(&CameraConfig { yaw: 0.0, ..CameraConfig::default() });

    // View direction +X is parallel to this up vector.
    let offset = controller.displacement(&camera, &input_with(&[Key::D]), Vec3::X, 1.0);

    assert_eq!(offset, Vec3::ZERO);
}

#[test]
fn test_nearly_parallel_up_strafe_contributes_nothing() {
    let controller = MovementController::default();
    // Default camera looks down -Z up to float rounding.
    let camera = Camera::default();

    let strafe = controller.displacement(&camera, &input_with(&[Key::D]), Vec3::Z, 1.0);
    assert_eq!(strafe, Vec3::ZERO);

    let forward = controller.displacement(&camera, &input_with(&[Key::W, Key::D]), Vec3::Z, 1.0);
    assert!(forward.abs_diff_eq(camera.direction() * 2.5, EPS));
}

#[test]
fn test_custom_bindings() {
    let controller = MovementController::new(MovementConfig {
        bindings: MovementBindings {
            forward: Key::Up,
            backward: Key::Down,
            left: Key::Left,
            right: Key::Right,
        },
        ..MovementConfig::default()
    });
    let camera = Camera::default();

    let ignored = controller.displacement(&camera, &input_with(&[Key::W]), Vec3::Y, 1.0);
    let moved = controller.displacement(&camera, &input_with(&[Key::Up]), Vec3::Y, 1.0);

    assert_eq!(ignored, Vec3::ZERO);
    assert!(moved.abs_diff_eq(camera.direction() * 2.5, EPS));
}
