/// View and projection matrices for the current frame.
///
/// Matrices are right-handed with OpenGL-style clip depth conventions as
/// produced by `glam` (`look_at_rh`, `perspective_rh`). Backends with a
/// different clip space (Vulkan's flipped Y) correct it in their viewport.

use glam::{Mat4, Vec3};
use crate::camera::Camera;

pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;

/// How the zoom value feeds the vertical field of view
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FovMode {
    /// Zoom passed straight through as radians
    ZoomAsRadians,
    /// Zoom interpreted as degrees
    #[default]
    ZoomAsDegrees,
    /// Constant field of view in degrees, zoom ignored
    Fixed(f32),
}

impl FovMode {
    /// Vertical field of view in radians for the given zoom
    pub fn fov_radians(&self, zoom: f32) -> f32 {
        match *self {
            FovMode::ZoomAsRadians => zoom,
            FovMode::ZoomAsDegrees => zoom.to_radians(),
            FovMode::Fixed(degrees) => degrees.to_radians(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub near: f32,
    pub far: f32,
    pub fov_mode: FovMode,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            fov_mode: FovMode::default(),
        }
    }
}

/// Per-frame matrices, never persisted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewProjection {
    pub view: Mat4,
    pub projection: Mat4,
}

impl ViewProjection {
    /// projection * view
    pub fn combined(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl Default for ViewProjection {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

/// Builds matrices from camera state, falling back to the last good
/// result when the inputs are degenerate (zero-sized framebuffer,
/// non-finite aspect, collapsed look basis).
#[derive(Debug, Clone)]
pub struct ViewProjectionBuilder {
    config: ProjectionConfig,
    previous: ViewProjection,
    degenerate: bool,
}

impl ViewProjectionBuilder {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            config,
            previous: ViewProjection::default(),
            degenerate: false,
        }
    }

    pub fn build(&mut self, camera: &Camera, up: Vec3, framebuffer_size: (u32, u32), zoom: f32) -> ViewProjection {
        match self.try_build(camera, up, framebuffer_size, zoom) {
            Ok(result) => {
                if self.degenerate {
                    crate::engine_debug!("freelook::ViewProjectionBuilder", "Projection inputs valid again");
                }
                self.degenerate = false;
                self.previous = result;
                result
            }
            Err(reason) => {
                if !self.degenerate {
                    crate::engine_debug!(
                        "freelook::ViewProjectionBuilder",
                        "Reusing previous matrices: {}",
                        reason
                    );
                }
                self.degenerate = true;
                self.previous
            }
        }
    }

    fn try_build(&self, camera: &Camera, up: Vec3, (width, height): (u32, u32), zoom: f32) -> Result<ViewProjection, String> {
        if width == 0 || height == 0 {
            return Err(format!("framebuffer is {}x{}", width, height));
        }
        let aspect = width as f32 / height as f32;
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(format!("invalid aspect ratio {}", aspect));
        }
        let fov = self.config.fov_mode.fov_radians(zoom);
        if !fov.is_finite() || fov <= 0.0 {
            return Err(format!("invalid field of view {}", fov));
        }
        let ProjectionConfig { near, far, .. } = self.config;
        if !(near > 0.0 && far > near) {
            return Err(format!("invalid depth range {}..{}", near, far));
        }

        let position = camera.position();
        let direction = camera.direction();
        if camera.right(up).is_none() {
            return Err("view direction parallel to up".to_string());
        }

        let view = Mat4::look_at_rh(position, position + direction, up);
        let projection = Mat4::perspective_rh(fov, aspect, near, far);
        if !view.is_finite() || !projection.is_finite() {
            return Err("non-finite matrix".to_string());
        }
        Ok(ViewProjection { view, projection })
    }

    /// Last successfully built matrices (identity before the first build)
    pub fn previous(&self) -> &ViewProjection {
        &self.previous
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ProjectionConfig) {
        self.config = config;
    }
}

impl Default for ViewProjectionBuilder {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

#[cfg(test)]
#[path = "view_projection_tests.rs"]
mod tests;
