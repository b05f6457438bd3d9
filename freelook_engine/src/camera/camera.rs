/// Camera - free-look camera driven by yaw/pitch angles.
///
/// Orientation is stored as two angles in degrees. The view direction is
/// always derived from the current angles, so it can never go stale.
/// The camera does not build matrices; see `ViewProjectionBuilder`.

use glam::Vec3;

/// Pitch is clamped to ±PITCH_LIMIT degrees so the view never flips over the poles.
pub const PITCH_LIMIT: f32 = 89.0;

/// Squared length of direction x up below which the look basis is collapsed
const PARALLEL_EPSILON: f32 = 1e-6;

/// Start-up (and reset) state of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Degrees, clamped to ±PITCH_LIMIT on use.
    pub pitch: f32,
    /// World up axis used for strafing and the view matrix.
    pub up: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            up: Vec3::Y,
        }
    }
}

impl CameraConfig {
    /// Default orientation at a different start position
    pub fn at(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    up: Vec3,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            up: Vec3::Y,
        };
        camera.reset(config);
        camera
    }

    /// Return to the configured start state
    pub fn reset(&mut self, config: &CameraConfig) {
        self.position = if config.position.is_finite() { config.position } else { Vec3::ZERO };
        self.yaw = if config.yaw.is_finite() { config.yaw } else { -90.0 };
        self.pitch = if config.pitch.is_finite() {
            config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
        } else {
            0.0
        };
        self.up = config.up.try_normalize().unwrap_or(Vec3::Y);
    }

    /// Rotate by the given angles in degrees
    ///
    /// Yaw accumulates without bound. Pitch is clamped to ±PITCH_LIMIT.
    /// Non-finite deltas leave the camera untouched.
    pub fn apply_look_delta(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if !delta_yaw.is_finite() || !delta_pitch.is_finite() {
            crate::engine_trace!(
                "freelook::Camera",
                "Ignoring non-finite look delta ({}, {})",
                delta_yaw,
                delta_pitch
            );
            return;
        }
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move by a world-space offset. Non-finite offsets are ignored.
    pub fn translate(&mut self, offset: Vec3) {
        if offset.is_finite() {
            self.position += offset;
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        if position.is_finite() {
            self.position = position;
        }
    }

    // ===== GETTERS =====

    /// Unit view direction derived from yaw and pitch
    pub fn direction(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Strafe axis: normalize(direction x up), None when direction is (nearly) parallel to up
    pub fn right(&self, up: Vec3) -> Option<Vec3> {
        let up = up.try_normalize()?;
        let axis = self.direction().cross(up);
        if axis.length_squared() < PARALLEL_EPSILON {
            return None;
        }
        axis.try_normalize()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
