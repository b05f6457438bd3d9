//! Camera module - free-look camera, keyboard movement and matrices.
//!
//! The engine does NOT store cameras globally. They are owned and driven
//! by the frame loop (or directly by the caller).

mod camera;
mod movement;
mod view_projection;

pub use camera::{Camera, CameraConfig, PITCH_LIMIT};
pub use movement::{
    MovementController, MovementConfig, MovementMode, MovementBindings, DEFAULT_MOVE_SPEED,
};
pub use view_projection::{
    ViewProjection, ViewProjectionBuilder, ProjectionConfig, FovMode, DEFAULT_NEAR, DEFAULT_FAR,
};
