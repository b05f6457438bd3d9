/// Translation of winit window events into `InputState` updates.

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use crate::input::{InputState, Key, MouseButton};

/// Pixels of touchpad scroll treated as one wheel line
pub const PIXELS_PER_SCROLL_LINE: f64 = 20.0;

/// Map a physical key code to an engine key
pub fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ControlLeft => Key::LeftControl,
        KeyCode::Escape => Key::Escape,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        _ => return None,
    };
    Some(key)
}

pub fn map_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Other(4),
        winit::event::MouseButton::Forward => MouseButton::Other(5),
        winit::event::MouseButton::Other(n) => MouseButton::Other(n),
    }
}

/// Vertical scroll amount in wheel lines (positive = away from the user)
pub fn scroll_offset(delta: MouseScrollDelta) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y as f64,
        MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_SCROLL_LINE,
    }
}

/// Apply a physical key press/release
pub fn apply_key(input: &mut InputState, key: PhysicalKey, state: ElementState) -> bool {
    match key {
        PhysicalKey::Code(code) => match map_key(code) {
            Some(key) => {
                input.on_key_event(key, state.is_pressed());
                true
            }
            None => false,
        },
        PhysicalKey::Unidentified(_) => false,
    }
}

/// Record the input carried by a window event
///
/// Returns true when the event changed `input`. Losing focus releases every
/// key and forgets the cursor baseline so nothing stays stuck or jumps.
pub fn apply_window_event(input: &mut InputState, event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => apply_key(input, event.physical_key, event.state),
        WindowEvent::CursorMoved { position, .. } => {
            input.on_cursor_move(position.x, position.y);
            true
        }
        WindowEvent::MouseWheel { delta, .. } => {
            input.on_scroll(scroll_offset(*delta));
            true
        }
        WindowEvent::MouseInput { state, button, .. } => {
            input.on_mouse_button(map_mouse_button(*button), state.is_pressed());
            true
        }
        WindowEvent::Focused(false) => {
            input.release_all();
            input.reset_cursor();
            true
        }
        WindowEvent::CursorLeft { .. } => {
            input.reset_cursor();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "winit_input_tests.rs"]
mod tests;
