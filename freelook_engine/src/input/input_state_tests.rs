//! Unit tests for input_state.rs

use crate::input::{InputState, Key, MouseButton, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};

// ============================================================================
// CURSOR
// ============================================================================

#[test]
fn test_first_cursor_move_sets_baseline_only() {
    let mut input = InputState::new();

    input.on_cursor_move(100.0, 50.0);

    assert_eq!(input.take_cursor_delta(), (0.0, 0.0));
    assert_eq!(input.cursor_position(), Some((100.0, 50.0)));
}

#[test]
fn test_cursor_delta_from_previous_position() {
    let mut input = InputState::new();

    input.on_cursor_move(100.0, 50.0);
    input.on_cursor_move(110.0, 55.0);

    assert_eq!(input.take_cursor_delta(), (10.0, 5.0));
}

#[test]
fn test_cursor_moves_accumulate_within_frame() {
    let mut input = InputState::new();

    input.on_cursor_move(0.0, 0.0);
    input.on_cursor_move(3.0, -1.0);
    input.on_cursor_move(5.0, -4.0);

    assert_eq!(input.take_cursor_delta(), (5.0, -4.0));
}

#[test]
fn test_take_cursor_delta_resets() {
    let mut input = InputState::new();
    input.on_cursor_move(0.0, 0.0);
    input.on_cursor_move(2.0, 2.0);

    let _ = input.take_cursor_delta();

    assert_eq!(input.take_cursor_delta(), (0.0, 0.0));
    assert_eq!(input.pending_cursor_delta(), (0.0, 0.0));
}

#[test]
fn test_non_finite_cursor_is_ignored() {
    let mut input = InputState::new();
    input.on_cursor_move(10.0, 10.0);

    input.on_cursor_move(f64::NAN, 12.0);
    input.on_cursor_move(11.0, f64::INFINITY);
    input.on_cursor_move(12.0, 13.0);

    assert_eq!(input.take_cursor_delta(), (2.0, 3.0));
}

#[test]
fn test_reset_cursor_prevents_jump() {
    let mut input = InputState::new();
    input.on_cursor_move(10.0, 10.0);

    input.reset_cursor();
    input.on_cursor_move(500.0, 400.0);

    assert_eq!(input.take_cursor_delta(), (0.0, 0.0));
}

// ============================================================================
// KEYS
// ============================================================================

#[test]
fn test_key_state_tracks_press_and_release() {
    let mut input = InputState::new();

    input.on_key_event(Key::W, true);
    assert!(input.is_key_down(Key::W));
    assert!(!input.is_key_down(Key::S));

    input.on_key_event(Key::W, false);
    assert!(!input.is_key_down(Key::W));
}

#[test]
fn test_key_repeat_keeps_key_down() {
    let mut input = InputState::new();

    input.on_key_event(Key::A, true);
    input.on_key_event(Key::A, true);

    assert!(input.is_key_down(Key::A));
}

#[test]
fn test_release_all() {
    let mut input = InputState::new();
    input.on_key_event(Key::D, true);
    input.on_mouse_button(MouseButton::Left, true);

    input.release_all();

    assert!(!input.is_key_down(Key::D));
    assert!(!input.is_button_down(MouseButton::Left));
}

// ============================================================================
// SCROLL / ZOOM
// ============================================================================

#[test]
fn test_default_zoom() {
    assert_eq!(InputState::new().zoom(), DEFAULT_ZOOM);
}

#[test]
fn test_scroll_up_narrows_zoom() {
    let mut input = InputState::new();

    input.on_scroll(5.0);

    assert_eq!(input.zoom(), 40.0);
}

#[test]
fn test_zoom_clamped_to_range() {
    let mut input = InputState::new();

    input.on_scroll(1000.0);
    assert_eq!(input.zoom(), MIN_ZOOM);

    input.on_scroll(-1000.0);
    assert_eq!(input.zoom(), MAX_ZOOM);
}

#[test]
fn test_zoom_stays_in_range_for_any_sequence() {
    let mut input = InputState::new();
    for offset in [3.0, -7.5, 100.0, 0.25, -0.5, -60.0, 44.0, 1.0] {
        input.on_scroll(offset);
        assert!(input.zoom() >= MIN_ZOOM && input.zoom() <= MAX_ZOOM);
    }
}

#[test]
fn test_non_finite_scroll_is_ignored() {
    let mut input = InputState::new();
    input.on_scroll(f64::NAN);
    assert_eq!(input.zoom(), DEFAULT_ZOOM);
}

#[test]
fn test_with_zoom_clamps() {
    assert_eq!(InputState::with_zoom(0.0).zoom(), MIN_ZOOM);
    assert_eq!(InputState::with_zoom(90.0).zoom(), MAX_ZOOM);
    assert_eq!(InputState::with_zoom(f32::NAN).zoom(), DEFAULT_ZOOM);
}

// ============================================================================
// MOUSE BUTTONS
// ============================================================================

#[test]
fn test_button_presses_are_edge_triggered() {
    let mut input = InputState::new();

    input.on_mouse_button(MouseButton::Left, true);
    input.on_mouse_button(MouseButton::Left, true);

    assert_eq!(input.take_button_presses(), vec![MouseButton::Left]);
    assert!(input.take_button_presses().is_empty());
    assert!(input.is_button_down(MouseButton::Left));

    input.on_mouse_button(MouseButton::Left, false);
    input.on_mouse_button(MouseButton::Left, true);
    assert_eq!(input.take_button_presses(), vec![MouseButton::Left]);
}

#[test]
fn test_mouse_button_numbers() {
    assert_eq!(MouseButton::Left.number(), 1);
    assert_eq!(MouseButton::Right.number(), 2);
    assert_eq!(MouseButton::Middle.number(), 3);
    assert_eq!(MouseButton::Other(8).number(), 8);
}
