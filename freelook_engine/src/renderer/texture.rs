/// Texture trait, texture descriptor, and texture info

use crate::error::{Error, Result};

/// Sampled texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
}

impl TextureFormat {
    /// Bytes per pixel
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_SRGB | TextureFormat::R8G8B8A8_UNORM => 4,
        }
    }
}

/// Sampler filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

/// Sampler addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureWrap {
    #[default]
    Repeat,
    ClampToEdge,
}

/// Descriptor for creating a sampled 2D texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Tightly packed pixel rows, top row first
    pub data: Vec<u8>,
    pub filter: TextureFilter,
    pub wrap: TextureWrap,
}

impl TextureDesc {
    /// Verify dimensions and that `data` holds exactly width * height pixels
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidResource(format!(
                "Texture size {}x{} is empty",
                self.width, self.height
            )));
        }
        let expected = self.width as u64 * self.height as u64 * self.format.bytes_per_pixel() as u64;
        if self.data.len() as u64 != expected {
            return Err(Error::InvalidResource(format!(
                "Texture data is {} bytes, expected {} for {}x{} {:?}",
                self.data.len(),
                expected,
                self.width,
                self.height,
                self.format
            )));
        }
        Ok(())
    }
}

/// Read-only properties of a created texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Texture resource trait
///
/// Implemented by backend-specific texture types (e.g., VulkanTexture).
/// The texture is automatically destroyed when dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
