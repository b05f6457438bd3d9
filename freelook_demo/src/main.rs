//! Freelook demo: free-look camera over the Vulkan backend
//!
//! Usage: `freelook_demo [triangle|cube|cubes|light] [texture.png]`
//!
//! Mouse looks around, WASD moves, the wheel zooms, left click logs the
//! camera angles, Q or Escape quits.

mod geometry;
mod platform;
mod scenes;
mod shaders;
mod texture;

use std::path::PathBuf;
use std::process::ExitCode;

use freelook_engine::freelook::{Engine, FrameLoop, FrameLoopConfig, FrameOutcome, Renderer, Result};
use freelook_engine::freelook::log::DefaultLogger;
use freelook_engine::freelook::platform::{winit_input, Platform};
use freelook_engine::freelook::render::Config;
use freelook_engine::{engine_debug, engine_error, engine_info, engine_warn};
use freelook_engine_renderer_vulkan::VulkanRenderer;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::platform::WinitPlatform;
use crate::scenes::{DemoScene, SceneKind};

const WINDOW_TITLE: &str = "Freelook";
const WINDOW_WIDTH: u32 = 640;
const WINDOW_HEIGHT: u32 = 480;

/// Everything alive while the window is open
///
/// Fields drop in declaration order: scene resources go before the renderer.
struct Running {
    scene: DemoScene,
    frame_loop: FrameLoop,
    platform: WinitPlatform,
    renderer: VulkanRenderer,
    window: Window,
    /// Cursor captured by the window; look input then comes from raw motion
    cursor_grabbed: bool,
    /// Integrated raw mouse motion, fed to the input as a cursor position
    virtual_cursor: (f64, f64),
}

impl Drop for Running {
    fn drop(&mut self) {
        // The GPU may still read buffers of the last frame
        if let Err(e) = self.renderer.wait_idle() {
            engine_warn!("freelook::demo", "wait_idle before shutdown failed: {}", e);
        }
    }
}

struct App {
    scene_kind: SceneKind,
    texture_path: Option<PathBuf>,
    running: Option<Running>,
    failed: bool,
}

impl App {
    fn new(scene_kind: SceneKind, texture_path: Option<PathBuf>) -> Self {
        Self {
            scene_kind,
            texture_path,
            running: None,
            failed: false,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT)),
            )
            .map_err(|e| {
                freelook_engine::freelook::Error::InitializationFailed(format!("Failed to create window: {}", e))
            })?;

        let size = window.inner_size();
        let config = Config {
            app_name: WINDOW_TITLE.to_string(),
            ..Config::default()
        };
        let mut renderer = VulkanRenderer::new(&window, (size.width, size.height), config)?;

        let scene = DemoScene::build(
            self.scene_kind,
            &mut renderer,
            &shaders::default_shader_dir(),
            self.texture_path.as_deref(),
        )?;

        let frame_loop = FrameLoop::new(FrameLoopConfig {
            camera: self.scene_kind.camera(),
            ..FrameLoopConfig::default()
        });

        let cursor_grabbed = grab_cursor(&window);

        Ok(Running {
            scene,
            frame_loop,
            platform: WinitPlatform::new((size.width, size.height)),
            renderer,
            window,
            cursor_grabbed,
            virtual_cursor: (0.0, 0.0),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, context: &str, error: &dyn std::fmt::Display) {
        engine_error!("freelook::demo", "{}: {}", context, error);
        self.failed = true;
        self.running = None;
        event_loop.exit();
    }
}

/// Capture and hide the cursor, confined first, locked as fallback
fn grab_cursor(window: &Window) -> bool {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));

    match grabbed {
        Ok(()) => {
            window.set_cursor_visible(false);
            true
        }
        Err(e) => {
            engine_warn!("freelook::demo", "Cursor grab unavailable, using window cursor: {}", e);
            false
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => {
                engine_info!("freelook::demo", "Running scene {:?}", running.scene.kind());
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => self.fail(event_loop, "Setup failed", &e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if running.window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                running.platform.request_close();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.platform.set_framebuffer_size(size.width, size.height);
                running.renderer.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                running.scene.animate(running.platform.time() as f32);

                let outcome = running.frame_loop.run_frame(
                    &mut running.platform,
                    &mut running.renderer,
                    running.scene.scene(),
                );
                match outcome {
                    Ok(FrameOutcome::Exit) => event_loop.exit(),
                    Ok(_) => running.window.request_redraw(),
                    Err(e) => self.fail(event_loop, "Frame failed", &e),
                }
            }
            // Raw motion drives the look while the cursor is grabbed
            WindowEvent::CursorMoved { .. } if running.cursor_grabbed => {}
            WindowEvent::Focused(focused) => {
                winit_input::apply_window_event(running.frame_loop.input_mut(), &event);
                if focused && !running.cursor_grabbed {
                    running.cursor_grabbed = grab_cursor(&running.window);
                }
            }
            other => {
                winit_input::apply_window_event(running.frame_loop.input_mut(), &other);
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if running.cursor_grabbed && running.window.has_focus() {
                running.virtual_cursor.0 += dx;
                running.virtual_cursor.1 += dy;
                let (x, y) = running.virtual_cursor;
                running.frame_loop.input_mut().on_cursor_move(x, y);
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.take() {
            let stats = running.renderer.stats();
            engine_info!(
                "freelook::demo",
                "Presented {} frames ({} skipped, {} swapchain rebuilds)",
                stats.frames_presented,
                stats.frames_skipped,
                stats.swapchain_recreations
            );
        }
    }
}

fn main() -> ExitCode {
    Engine::set_logger(DefaultLogger);

    let mut args = std::env::args().skip(1);
    let scene_kind = match args.next().map(|arg| arg.parse::<SceneKind>()) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => {
            engine_error!("freelook::demo", "{}", e);
            return ExitCode::FAILURE;
        }
        None => SceneKind::default(),
    };
    let texture_path = args.next().map(PathBuf::from);
    engine_debug!("freelook::demo", "Scene {:?}, texture {:?}", scene_kind, texture_path);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            engine_error!("freelook::demo", "Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene_kind, texture_path);
    if let Err(e) = event_loop.run_app(&mut app) {
        engine_error!("freelook::demo", "Event loop error: {}", e);
        return ExitCode::FAILURE;
    }

    #[cfg(feature = "vulkan-validation")]
    freelook_engine_renderer_vulkan::print_validation_stats_report();

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_request_reaches_platform() {
        let mut platform = WinitPlatform::new((WINDOW_WIDTH, WINDOW_HEIGHT));
        platform.request_close();

        assert!(platform.should_close());
        assert!(platform.time() >= 0.0);
    }
}
