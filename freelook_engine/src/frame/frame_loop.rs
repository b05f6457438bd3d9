/// FrameLoop - runs one frame of the free-look pipeline per call.
///
/// Order within a frame: timing, input consumption, quit check, camera
/// look, movement, view/projection, then begin/render/end on the renderer.
/// The scene is borrowed per frame so the caller can animate it between
/// frames.

use crate::error::Result;
use crate::camera::{
    Camera, MovementController, ViewProjection, ViewProjectionBuilder,
};
use crate::input::InputState;
use crate::platform::Platform;
use crate::renderer::{ClearValue, Renderer};
use crate::scene::{ForwardRenderer, FrameRenderer, FrameStats, Scene};
use super::config::FrameLoopConfig;
use super::frame_timing::FrameTiming;

/// Result of one `run_frame` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame recorded and presented
    Rendered(FrameStats),
    /// Nothing presented (zero-sized framebuffer or surface not ready)
    Skipped,
    /// Close was requested; the caller should leave its loop
    Exit,
}

pub struct FrameLoop<R: FrameRenderer = ForwardRenderer> {
    config: FrameLoopConfig,
    input: InputState,
    camera: Camera,
    movement: MovementController,
    projection: ViewProjectionBuilder,
    timing: FrameTiming,
    frame_renderer: R,
    view_projection: ViewProjection,
    next_fps_log: Option<f64>,
}

impl FrameLoop<ForwardRenderer> {
    pub fn new(config: FrameLoopConfig) -> Self {
        Self::with_renderer(config, ForwardRenderer::new())
    }
}

impl<R: FrameRenderer> FrameLoop<R> {
    pub fn with_renderer(config: FrameLoopConfig, frame_renderer: R) -> Self {
        Self {
            input: InputState::with_zoom(config.initial_zoom),
            camera: Camera::new(&config.camera),
            movement: MovementController::new(config.movement),
            projection: ViewProjectionBuilder::new(config.projection),
            timing: FrameTiming::new(),
            frame_renderer,
            view_projection: ViewProjection::default(),
            next_fps_log: None,
            config,
        }
    }

    /// Run one frame
    pub fn run_frame(
        &mut self,
        platform: &mut dyn Platform,
        renderer: &mut dyn Renderer,
        scene: &Scene,
    ) -> Result<FrameOutcome> {
        if platform.should_close() {
            return Ok(FrameOutcome::Exit);
        }

        let now = platform.time();
        let delta_time = self.timing.advance(now);
        self.log_fps(now);

        let (dx, dy) = self.input.take_cursor_delta();
        let presses = self.input.take_button_presses();

        if let Some(key) = self.config.quit_keys.iter().find(|k| self.input.is_key_down(**k)) {
            crate::engine_info!("freelook::FrameLoop", "Quit key {:?} pressed, closing", key);
            platform.request_close();
            return Ok(FrameOutcome::Exit);
        }

        let sensitivity = self.config.look_sensitivity;
        let pitch_sign = if self.config.invert_y { 1.0 } else { -1.0 };
        self.camera.apply_look_delta(
            (dx * sensitivity as f64) as f32,
            (dy * sensitivity as f64) as f32 * pitch_sign,
        );

        let up = self.camera.up();
        self.movement.step(&mut self.camera, &self.input, up, delta_time);

        if let Some(button) = self.config.report_button {
            if presses.contains(&button) {
                crate::engine_info!(
                    "freelook::FrameLoop",
                    "yaw: {:.2}, pitch: {:.2}",
                    self.camera.yaw(),
                    self.camera.pitch()
                );
            }
        }

        let size = platform.framebuffer_size();
        self.view_projection = self.projection.build(&self.camera, up, size, self.input.zoom());
        if size.0 == 0 || size.1 == 0 {
            return Ok(FrameOutcome::Skipped);
        }

        let clear_values = [
            ClearValue::Color(self.config.clear_color),
            ClearValue::DepthStencil { depth: 1.0, stencil: 0 },
        ];
        let Some(cmd) = renderer.begin_frame(&clear_values)? else {
            return Ok(FrameOutcome::Skipped);
        };
        let recorded = self.frame_renderer.render_frame(scene, &self.view_projection, size, cmd);
        let presented = renderer.end_frame();
        let stats = recorded?;
        presented?;

        Ok(FrameOutcome::Rendered(stats))
    }

    fn log_fps(&mut self, now: f64) {
        let Some(interval) = self.config.fps_log_interval else {
            return;
        };
        match self.next_fps_log {
            None => self.next_fps_log = Some(now + interval),
            Some(due) if now >= due => {
                crate::engine_debug!(
                    "freelook::FrameLoop",
                    "{:.1} fps ({} frames)",
                    self.timing.fps(),
                    self.timing.frame_count()
                );
                self.next_fps_log = Some(now + interval);
            }
            Some(_) => {}
        }
    }

    /// Return the camera to its configured start state
    pub fn reset_camera(&mut self) {
        self.camera.reset(&self.config.camera);
    }

    // ===== ACCESSORS =====

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Platform event handlers record into this
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Matrices of the last frame
    pub fn view_projection(&self) -> &ViewProjection {
        &self.view_projection
    }

    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }

    pub fn config(&self) -> &FrameLoopConfig {
        &self.config
    }

    pub fn frame_renderer_mut(&mut self) -> &mut R {
        &mut self.frame_renderer
    }
}

#[cfg(test)]
#[path = "frame_loop_tests.rs"]
mod tests;
