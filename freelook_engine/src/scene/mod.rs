//! Scene module
//!
//! Provides drawables, the ordered scene container and frame rendering
//! strategies.

mod drawable;
mod scene;
mod forward_renderer;

pub use drawable::{Drawable, DrawableKey, Geometry, Material};
pub use scene::Scene;
pub use forward_renderer::{FrameRenderer, ForwardRenderer, FrameStats};
