//! Software compositing for rehab2d
//!
//! This crate provides the paint side of the dual-loop engine: ordered
//! layers, a pair of offscreen surfaces swapped every frame, and a frame
//! pump that paces itself to a target frame rate on its own thread.
//!
//! ## Key Components
//!
//! - [`layers::LayerManager`] - Fixed count of ordered paint buckets
//! - [`buffers::BufferPair`] - Two surfaces, one painted while the other is shown
//! - [`pacing::FramePacer`] - Frame interval and overrun policy
//! - [`pump::FramePump`] - The paint loop itself
//! - [`slot::FramePumpSlot`] - Owned construct-once holder for the pump

pub mod buffers;
pub mod error;
pub mod layers;
pub mod pacing;
pub mod pump;
pub mod slot;

pub use buffers::BufferPair;
pub use error::RenderError;
pub use layers::{BaseLayer, HintedLayer, LayerManager, LayerMask, LayerPolicy, MAX_LAYERS};
pub use pacing::{FramePacer, OverrunPolicy};
pub use pump::{FrameHandle, FramePump, FrameReport, Presenter, PumpConfig};
pub use slot::FramePumpSlot;

// Re-export core types for convenience
pub use rehab_core::{Drawable, InstanceRegistry, Sprite, Surface, CLEAR_GREY};
