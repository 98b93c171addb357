//! Sprites that paint onto a [`Surface`]

use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;

use crate::circular::CircularList;
use crate::surface::Surface;

/// Something that can paint itself at an integer pixel offset
///
/// `(x, y)` is the sprite's top-left corner in surface coordinates.
pub trait Sprite: Send + Sync {
    fn draw(&self, target: &mut Surface, x: i32, y: i32);

    /// Width and height in pixels
    fn size(&self) -> (u32, u32);
}

/// A rectangle of one color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolidSprite {
    pub width: u32,
    pub height: u32,
    pub color: u32,
}

impl SolidSprite {
    pub fn new(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            color,
        }
    }
}

impl Sprite for SolidSprite {
    fn draw(&self, target: &mut Surface, x: i32, y: i32) {
        target.fill_rect(x, y, self.width, self.height, self.color);
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// ARGB pixel image; pixels with zero alpha are skipped
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Bitmap {
    /// Wrap row-major pixels, `None` if the length does not match the size
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }
}

impl Sprite for Bitmap {
    fn draw(&self, target: &mut Surface, x: i32, y: i32) {
        for (i, &pixel) in self.pixels.iter().enumerate() {
            if pixel >> 24 == 0 {
                continue;
            }
            let px = x.saturating_add((i % self.width as usize) as i32);
            let py = y.saturating_add((i / self.width as usize) as i32);
            target.set_argb(px, py, pixel);
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Cycles through frames, wrapping at either end
pub struct AnimatedSprite {
    frames: CircularList<Arc<dyn Sprite>>,
    cursor: AtomicIsize,
}

impl AnimatedSprite {
    pub fn new(frames: CircularList<Arc<dyn Sprite>>) -> Self {
        Self {
            frames,
            cursor: AtomicIsize::new(0),
        }
    }

    /// Move the current frame by `steps`, negative steps go backwards
    pub fn advance(&self, steps: isize) {
        let len = self.frames.len().max(1) as isize;
        // Keep the cursor small so it can never overflow
        let _ = self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
                Some((c + steps.rem_euclid(len)).rem_euclid(len))
            });
    }

    /// Index into the frame list, already wrapped
    pub fn current_index(&self) -> Option<usize> {
        self.frames.wrap(self.cursor.load(Ordering::Relaxed))
    }

    fn current(&self) -> Option<&Arc<dyn Sprite>> {
        self.frames.get(self.cursor.load(Ordering::Relaxed))
    }
}

impl Sprite for AnimatedSprite {
    fn draw(&self, target: &mut Surface, x: i32, y: i32) {
        if let Some(frame) = self.current() {
            frame.draw(target, x, y);
        }
    }

    fn size(&self) -> (u32, u32) {
        self.current().map(|f| f.size()).unwrap_or((0, 0))
    }
}
