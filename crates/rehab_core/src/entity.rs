//! Entity types
//!
//! An Entity is a kinematic body with a sprite. Entities live behind a
//! per-entity lock so the tick thread can move them while the paint thread
//! takes snapshots.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rehab_physics::KinematicBody;
use serde::{Deserialize, Serialize};

use crate::drawable::{DrawSnapshot, Drawable};
use crate::sprite::Sprite;

/// An entity shared between the world tick and the frame pump
pub type SharedEntity = Arc<RwLock<Entity>>;

/// Broad category of an entity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Moves under its own power (player, enemies)
    Actor,
    /// Scenery such as floors and platforms
    Prop,
    /// Fired by an actor
    Projectile,
}

/// An object in the 2D world
#[derive(Clone)]
pub struct Entity {
    /// Name for lookup and logging
    pub name: String,
    pub kind: EntityKind,
    /// Physical state; its position is the entity's position
    pub body: KinematicBody,
    pub sprite: Arc<dyn Sprite>,
    /// Explicit compositing layer, if any
    pub layer: Option<usize>,
}

impl Entity {
    pub fn new(
        name: impl Into<String>,
        kind: EntityKind,
        body: KinematicBody,
        sprite: Arc<dyn Sprite>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            body,
            sprite,
            layer: None,
        }
    }

    /// Pin this entity to a compositing layer
    pub fn with_layer(mut self, layer: usize) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Copy of this entity under a new name, sharing the sprite
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.name = name.into();
        copy
    }

    /// Wrap in a lock for sharing across threads
    pub fn into_shared(self) -> SharedEntity {
        Arc::new(RwLock::new(self))
    }

    #[inline]
    pub fn position(&self) -> (f64, f64) {
        self.body.position()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("body", &self.body)
            .field("layer", &self.layer)
            .finish()
    }
}

impl Drawable for RwLock<Entity> {
    fn position(&self) -> (f64, f64) {
        self.read().position()
    }

    fn sprite(&self) -> Arc<dyn Sprite> {
        Arc::clone(&self.read().sprite)
    }

    fn layer_hint(&self) -> Option<usize> {
        self.read().layer
    }

    fn snapshot(&self) -> DrawSnapshot {
        let entity = self.read();
        let (x, y) = entity.position();
        DrawSnapshot {
            x,
            y,
            sprite: Arc::clone(&entity.sprite),
        }
    }
}
