//! Unit tests for winit_input.rs

use winit::dpi::PhysicalPosition;
use winit::event::{DeviceId, ElementState, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, NativeKeyCode, PhysicalKey};
use super::*;

fn device() -> DeviceId {
    // SAFETY: dummy ids are only compared, never passed back to the platform.
    unsafe { DeviceId::dummy() }
}

// ============================================================================
// Mapping
// ============================================================================

#[test]
fn test_map_movement_keys() {
    assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
    assert_eq!(map_key(KeyCode::KeyA), Some(Key::A));
    assert_eq!(map_key(KeyCode::KeyS), Some(Key::S));
    assert_eq!(map_key(KeyCode::KeyD), Some(Key::D));
    assert_eq!(map_key(KeyCode::KeyQ), Some(Key::Q));
    assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
}

#[test]
fn test_unmapped_key() {
    assert_eq!(map_key(KeyCode::F12), None);
}

#[test]
fn test_map_mouse_buttons() {
    assert_eq!(map_mouse_button(winit::event::MouseButton::Left), MouseButton::Left);
    assert_eq!(map_mouse_button(winit::event::MouseButton::Right), MouseButton::Right);
    assert_eq!(map_mouse_button(winit::event::MouseButton::Back), MouseButton::Other(4));
    assert_eq!(map_mouse_button(winit::event::MouseButton::Other(9)), MouseButton::Other(9));
}

#[test]
fn test_scroll_offsets() {
    assert_eq!(scroll_offset(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
    assert_eq!(scroll_offset(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0))), -2.0);
}

// ============================================================================
// Event application
// ============================================================================

#[test]
fn test_apply_key() {
    let mut input = InputState::new();

    assert!(apply_key(&mut input, PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed));
    assert!(input.is_key_down(Key::W));
    assert!(apply_key(&mut input, PhysicalKey::Code(KeyCode::KeyW), ElementState::Released));
    assert!(!input.is_key_down(Key::W));
    assert!(!apply_key(&mut input, PhysicalKey::Code(KeyCode::F1), ElementState::Pressed));
    assert!(!apply_key(&mut input, PhysicalKey::Unidentified(NativeKeyCode::Unidentified), ElementState::Pressed));
}

#[test]
fn test_cursor_events_produce_delta() {
    let mut input = InputState::new();

    apply_window_event(&mut input, &WindowEvent::CursorMoved {
        device_id: device(),
        position: PhysicalPosition::new(100.0, 50.0),
    });
    apply_window_event(&mut input, &WindowEvent::CursorMoved {
        device_id: device(),
        position: PhysicalPosition::new(110.0, 55.0),
    });

    assert_eq!(input.take_cursor_delta(), (10.0, 5.0));
}

#[test]
fn test_wheel_event_zooms() {
    let mut input = InputState::new();

    apply_window_event(&mut input, &WindowEvent::MouseWheel {
        device_id: device(),
        delta: MouseScrollDelta::LineDelta(0.0, 3.0),
        phase: TouchPhase::Moved,
    });

    assert_eq!(input.zoom(), 42.0);
}

#[test]
fn test_mouse_input_event() {
    let mut input = InputState::new();

    apply_window_event(&mut input, &WindowEvent::MouseInput {
        device_id: device(),
        state: ElementState::Pressed,
        button: winit::event::MouseButton::Left,
    });

    assert_eq!(input.take_button_presses(), vec![MouseButton::Left]);
}

#[test]
fn test_focus_lost_releases_keys_and_cursor() {
    let mut input = InputState::new();
    input.on_key_event(Key::W, true);
    input.on_cursor_move(10.0, 10.0);

    assert!(apply_window_event(&mut input, &WindowEvent::Focused(false)));

    assert!(!input.is_key_down(Key::W));
    assert_eq!(input.cursor_position(), None);
}

#[test]
fn test_unrelated_event_ignored() {
    let mut input = InputState::new();
    assert!(!apply_window_event(&mut input, &WindowEvent::Focused(true)));
    assert!(!apply_window_event(&mut input, &WindowEvent::CloseRequested));
}
