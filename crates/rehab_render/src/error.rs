//! Render error types

use std::fmt;
use std::io;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// The frame pump was requested before it was ever constructed
    NotInitialized,
    /// The frame pump thread was already started
    AlreadyStarted,
    /// Frame rate must be at least 1
    InvalidFrameRate(u32),
    /// Layer count must be between 1 and [`crate::MAX_LAYERS`]
    InvalidLayerCount(usize),
    /// Explicit layer index past the last layer
    LayerOutOfRange { index: usize, count: usize },
    /// The OS refused to start the pump thread
    Spawn(io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => {
                write!(f, "Frame pump requested before it was constructed")
            }
            RenderError::AlreadyStarted => write!(f, "Frame pump already started"),
            RenderError::InvalidFrameRate(fps) => {
                write!(f, "Invalid frame rate: {} (must be at least 1)", fps)
            }
            RenderError::InvalidLayerCount(count) => write!(
                f,
                "Invalid layer count: {} (must be 1..={})",
                count,
                crate::MAX_LAYERS
            ),
            RenderError::LayerOutOfRange { index, count } => {
                write!(f, "Layer {} out of range ({} layers)", index, count)
            }
            RenderError::Spawn(e) => write!(f, "Failed to spawn frame pump thread: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RenderError {
    fn from(e: io::Error) -> Self {
        RenderError::Spawn(e)
    }
}
