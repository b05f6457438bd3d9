/*!
# Freelook Engine

Core of a small free-look 3D viewer: a mouse/keyboard controlled camera
flying around a handful of drawables.

The crate is backend-agnostic. A graphics backend (see
`freelook_engine_renderer_vulkan`) implements the renderer traits and a
windowing layer implements `Platform`.

## Architecture

- **InputState**: per-frame accumulation of cursor, key, button and scroll events
- **Camera**: yaw/pitch free-look orientation and position
- **MovementController**: keyboard translation scaled by frame time
- **ViewProjectionBuilder**: view and projection matrices with degenerate-input fallback
- **Scene / Drawable**: ordered, key-addressed set of prepared draws
- **ForwardRenderer**: records one draw per drawable into a command list
- **FrameLoop**: runs the whole pipeline once per frame
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod input;
pub mod camera;
pub mod renderer;
pub mod scene;
pub mod platform;
pub mod frame;

// Main freelook namespace module
pub mod freelook {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine logging facade
    pub use crate::engine::Engine;

    // Renderer factory trait
    pub use crate::renderer::Renderer;

    // Frame loop entry points
    pub use crate::frame::{FrameLoop, FrameLoopConfig, FrameOutcome, FrameTiming};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, FilteredLogger};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }

    pub mod input {
        pub use crate::input::*;
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod scene {
        pub use crate::scene::*;
    }

    pub mod platform {
        pub use crate::platform::*;
    }
}

// Re-export math library at crate root
pub use glam;
