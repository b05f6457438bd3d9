//! Frame module: timing, configuration and the per-frame loop.

mod config;
mod frame_timing;
mod frame_loop;

pub use config::FrameLoopConfig;
pub use frame_timing::FrameTiming;
pub use frame_loop::{FrameLoop, FrameOutcome};
