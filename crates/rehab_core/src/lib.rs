//! Core types for the rehab2d engine
//!
//! This crate provides the foundational types shared by the world tick loop
//! and the frame pump:
//!
//! - [`Surface`] - Fixed-size ARGB pixel surface
//! - [`Sprite`] - Anything that can paint itself onto a surface
//! - [`Drawable`] - A position plus a sprite, readable from the paint thread
//! - [`InstanceRegistry`] - Enumerates the currently loaded drawables
//! - [`Entity`] - A kinematic body with a sprite
//! - [`World`] - Registry of live entities
//! - [`EntityKey`] - Generational key to an entity in the world
//! - [`CircularList`] - Sequence indexed with wrap-around
//! - [`Scene`] - Loadable arena description

mod circular;
mod drawable;
mod entity;
mod scene;
mod sprite;
mod surface;
mod world;

pub use circular::CircularList;
pub use drawable::{DrawSnapshot, Drawable, InstanceRegistry};
pub use entity::{Entity, EntityKind, SharedEntity};
pub use scene::{EntityTemplate, Scene, SceneLoadError, SpriteTemplate};
pub use sprite::{AnimatedSprite, Bitmap, SolidSprite, Sprite};
pub use surface::{argb, Surface, CLEAR_GREY};
pub use world::{EntityKey, World};

// Re-export physics types for convenient access through rehab_core
pub use rehab_math::Vector2D;
pub use rehab_physics::{KinematicBody, PhysicsError};
