//! 2D kinematic physics for rehab2d
//!
//! This crate provides the per-entity physical state driven by the world
//! tick loop:
//! - Impulse application with a one-step velocity history
//! - Repositioning with or without carrying the heading along
//! - One-dimensional impact speed response between two bodies

pub mod body;
pub mod error;
pub mod impact;

// Re-export commonly used types
pub use body::KinematicBody;
pub use error::PhysicsError;
pub use impact::{resolve_impact_pair, speed_after_impact};
