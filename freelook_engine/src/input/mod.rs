//! Input module: per-frame accumulation of pointer, keyboard and scroll events.
//!
//! Platform callbacks only record events here. The frame loop consumes the
//! accumulated state once per frame.

mod key;
mod input_state;

pub use key::{Key, MouseButton};
pub use input_state::{InputState, MAX_ZOOM, MIN_ZOOM, DEFAULT_ZOOM};
