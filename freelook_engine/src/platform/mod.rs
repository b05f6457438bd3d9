//! Platform module: the windowing collaborator trait and winit event mapping.

mod platform;
pub mod winit_input;

pub use platform::Platform;
