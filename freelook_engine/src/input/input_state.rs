/// Frame-scoped input accumulator.
///
/// Cursor motion is stored as a delta relative to the previous reported
/// position. The very first position only establishes the baseline, so the
/// camera does not jump when the window first receives the pointer.

use rustc_hash::FxHashSet;
use crate::input::{Key, MouseButton};

/// Narrowest zoom value (degrees of field of view by default)
pub const MIN_ZOOM: f32 = 1.0;
/// Widest zoom value
pub const MAX_ZOOM: f32 = 45.0;
/// Zoom at startup
pub const DEFAULT_ZOOM: f32 = 45.0;

#[derive(Debug, Clone)]
pub struct InputState {
    /// Last reported cursor position, None until the first cursor event
    cursor_last: Option<(f64, f64)>,
    /// Motion accumulated since the last `take_cursor_delta`
    cursor_delta: (f64, f64),
    keys_down: FxHashSet<Key>,
    /// Presses received since the last `take_button_presses`, in arrival order
    buttons_pressed: Vec<MouseButton>,
    buttons_down: FxHashSet<MouseButton>,
    zoom: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::with_zoom(DEFAULT_ZOOM)
    }

    /// Create with a starting zoom (clamped to [MIN_ZOOM, MAX_ZOOM])
    pub fn with_zoom(zoom: f32) -> Self {
        let zoom = if zoom.is_finite() { zoom.clamp(MIN_ZOOM, MAX_ZOOM) } else { DEFAULT_ZOOM };
        Self {
            cursor_last: None,
            cursor_delta: (0.0, 0.0),
            keys_down: FxHashSet::default(),
            buttons_pressed: Vec::new(),
            buttons_down: FxHashSet::default(),
            zoom,
        }
    }

    // ===== EVENTS =====

    /// Record an absolute cursor position
    ///
    /// The first call (or the first after `reset_cursor`) only sets the
    /// baseline and contributes a zero delta.
    pub fn on_cursor_move(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            crate::engine_trace!("freelook::InputState", "Ignoring non-finite cursor position ({}, {})", x, y);
            return;
        }
        if let Some((last_x, last_y)) = self.cursor_last {
            self.cursor_delta.0 += x - last_x;
            self.cursor_delta.1 += y - last_y;
        }
        self.cursor_last = Some((x, y));
    }

    /// Record a key press or release
    pub fn on_key_event(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// Apply a vertical scroll offset: `zoom -= offset`, clamped
    pub fn on_scroll(&mut self, offset: f64) {
        if !offset.is_finite() {
            crate::engine_trace!("freelook::InputState", "Ignoring non-finite scroll offset {}", offset);
            return;
        }
        self.zoom = (self.zoom - offset as f32).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Record a mouse button press or release
    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            if self.buttons_down.insert(button) {
                self.buttons_pressed.push(button);
            }
        } else {
            self.buttons_down.remove(&button);
        }
    }

    /// Forget the cursor baseline; the next move starts a fresh delta
    pub fn reset_cursor(&mut self) {
        self.cursor_last = None;
        self.cursor_delta = (0.0, 0.0);
    }

    /// Release every held key and button (window lost focus)
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.buttons_down.clear();
    }

    // ===== FRAME CONSUMPTION =====

    /// Return the motion accumulated since the previous call and reset it
    pub fn take_cursor_delta(&mut self) -> (f64, f64) {
        std::mem::take(&mut self.cursor_delta)
    }

    /// Return presses received since the previous call and reset them
    pub fn take_button_presses(&mut self) -> Vec<MouseButton> {
        std::mem::take(&mut self.buttons_pressed)
    }

    // ===== GETTERS =====

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn cursor_position(&self) -> Option<(f64, f64)> {
        self.cursor_last
    }

    /// Pending (not yet consumed) cursor delta
    pub fn pending_cursor_delta(&self) -> (f64, f64) {
        self.cursor_delta
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "input_state_tests.rs"]
mod tests;
