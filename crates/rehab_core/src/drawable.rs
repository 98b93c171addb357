//! The drawable capability consumed by layers and the frame pump

use std::fmt;
use std::sync::Arc;

use crate::sprite::Sprite;

/// A position plus a sprite, shared between the tick and paint threads
///
/// Positions use the physics convention: Y grows upward.
pub trait Drawable: Send + Sync {
    /// Current `(x, y)`, read consistently
    fn position(&self) -> (f64, f64);

    fn sprite(&self) -> Arc<dyn Sprite>;

    /// Preferred compositing layer, if the drawable has an opinion
    fn layer_hint(&self) -> Option<usize> {
        None
    }

    /// Copy out everything the paint step needs
    ///
    /// Implementors holding a lock should override this to read position and
    /// sprite under a single acquisition.
    fn snapshot(&self) -> DrawSnapshot {
        let (x, y) = self.position();
        DrawSnapshot {
            x,
            y,
            sprite: self.sprite(),
        }
    }
}

/// Immutable per-frame view of a drawable
#[derive(Clone)]
pub struct DrawSnapshot {
    pub x: f64,
    pub y: f64,
    pub sprite: Arc<dyn Sprite>,
}

impl fmt::Debug for DrawSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawSnapshot")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("sprite_size", &self.sprite.size())
            .finish()
    }
}

/// Enumerates the drawables currently loaded into the game
pub trait InstanceRegistry {
    fn loaded_drawables(&self) -> Vec<Arc<dyn Drawable>>;
}
