//! Error types for the Freelook engine
//!
//! Errors are raised by the graphics backend (device, swapchain, resources)
//! and by setup code. Per-frame numeric edge cases never produce errors,
//! they are handled in place by the camera and projection code.

use std::fmt;

/// Result type for Freelook engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Freelook engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (Vulkan device, swapchain, command recording)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, pipeline description)
    InvalidResource(String),

    /// Initialization failed (window, renderer, scene setup)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
