/// Keyboard-driven camera translation.
///
/// Speed is `base_speed * delta_time`. In additive mode each active key
/// contributes its own full-speed displacement, so diagonal motion is
/// faster than straight motion. Normalized mode scales the combined
/// direction to unit length first.

use glam::Vec3;
use crate::camera::Camera;
use crate::input::{InputState, Key};

/// Default translation speed in world units per second
pub const DEFAULT_MOVE_SPEED: f32 = 2.5;

/// How simultaneous movement keys combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    /// Sum of per-key displacements (diagonals are up to √2 faster)
    #[default]
    Additive,
    /// Combined direction normalized, then scaled by speed
    Normalized,
}

/// Keys mapped to the four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementBindings {
    pub forward: Key,
    pub backward: Key,
    pub left: Key,
    pub right: Key,
}

impl Default for MovementBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            backward: Key::S,
            left: Key::A,
            right: Key::D,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementConfig {
    pub base_speed: f32,
    pub mode: MovementMode,
    pub bindings: MovementBindings,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            base_speed: DEFAULT_MOVE_SPEED,
            mode: MovementMode::default(),
            bindings: MovementBindings::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MovementController {
    config: MovementConfig,
}

impl MovementController {
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// Displacement for one frame without applying it
    ///
    /// Forward/back are evaluated before strafing. A degenerate strafe axis
    /// (view direction parallel to `up`) contributes nothing.
    pub fn displacement(&self, camera: &Camera, input: &InputState, up: Vec3, delta_time: f32) -> Vec3 {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return Vec3::ZERO;
        }
        let speed = self.config.base_speed * delta_time;
        let bindings = &self.config.bindings;
        let direction = camera.direction();
        let right = camera.right(up);

        let mut axes = Vec3::ZERO;
        if input.is_key_down(bindings.forward) {
            axes += direction;
        }
        if input.is_key_down(bindings.backward) {
            axes -= direction;
        }
        if let Some(right) = right {
            if input.is_key_down(bindings.left) {
                axes -= right;
            }
            if input.is_key_down(bindings.right) {
                axes += right;
            }
        }

        match self.config.mode {
            MovementMode::Additive => axes * speed,
            MovementMode::Normalized => axes.normalize_or_zero() * speed,
        }
    }

    /// Apply one frame of movement to the camera position
    pub fn step(&self, camera: &mut Camera, input: &InputState, up: Vec3, delta_time: f32) {
        let offset = self.displacement(camera, input, up, delta_time);
        camera.translate(offset);
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MovementConfig) {
        self.config = config;
    }
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

#[cfg(test)]
#[path = "movement_tests.rs"]
mod tests;
