/// Frame loop configuration

use crate::camera::{CameraConfig, MovementConfig, ProjectionConfig};
use crate::input::{Key, MouseButton, DEFAULT_ZOOM};

/// Everything the frame loop needs to set up its camera and input handling
#[derive(Debug, Clone)]
pub struct FrameLoopConfig {
    pub camera: CameraConfig,
    pub movement: MovementConfig,
    pub projection: ProjectionConfig,
    /// Degrees of rotation per pixel of cursor motion
    pub look_sensitivity: f32,
    /// Moving the pointer up looks down
    pub invert_y: bool,
    /// Zoom at startup, clamped to the input zoom range
    pub initial_zoom: f32,
    /// Any of these keys closes the window
    pub quit_keys: Vec<Key>,
    /// Pressing this button logs the current yaw/pitch
    pub report_button: Option<MouseButton>,
    pub clear_color: [f32; 4],
    /// Seconds between FPS log lines, None to disable
    pub fps_log_interval: Option<f64>,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            movement: MovementConfig::default(),
            projection: ProjectionConfig::default(),
            look_sensitivity: 0.1,
            invert_y: false,
            initial_zoom: DEFAULT_ZOOM,
            quit_keys: vec![Key::Q, Key::Escape],
            report_button: Some(MouseButton::Left),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            fps_log_interval: Some(5.0),
        }
    }
}
