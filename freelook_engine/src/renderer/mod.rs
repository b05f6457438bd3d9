/// Renderer module - all rendering-related types and traits

mod renderer;
mod buffer;
mod texture;
mod shader;
mod pipeline;
mod command_list;
mod uniforms;

#[cfg(test)]
pub(crate) mod mock_renderer;

pub use renderer::*;
pub use buffer::*;
pub use texture::*;
pub use shader::*;
pub use pipeline::*;
pub use command_list::*;
pub use uniforms::*;
