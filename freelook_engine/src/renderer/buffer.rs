/// Buffer trait and buffer descriptor

use crate::error::Result;

/// Buffer usage flags
///
/// Per-draw uniforms travel as push constants, so vertex data is the only
/// buffer content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex buffer
    Vertex,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
}

impl BufferDesc {
    /// Vertex buffer sized for `data`
    pub fn vertices(data: &[u8]) -> Self {
        Self {
            size: data.len() as u64,
            usage: BufferUsage::Vertex,
        }
    }
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types (e.g., VulkanBuffer).
/// The buffer is automatically destroyed when dropped.
pub trait Buffer: Send + Sync {
    /// Write `data` at `offset` bytes into the buffer
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;

    /// Size in bytes
    fn size(&self) -> u64;
}

/// Check that a write of `len` bytes at `offset` fits in a buffer of `size` bytes
pub fn check_buffer_range(size: u64, offset: u64, len: u64) -> Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(crate::error::Error::InvalidResource(format!(
            "Buffer write out of bounds: offset {} + {} bytes > size {}",
            offset, len, size
        ))),
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
