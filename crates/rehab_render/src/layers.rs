//! Ordered compositing layers
//!
//! Paint order is layer index ascending (back to front), then insertion order
//! within a layer. A drawable lives in exactly one layer at a time.

use std::sync::Arc;

use bitflags::bitflags;
use rehab_core::Drawable;

use crate::error::RenderError;

/// Most layers a manager can hold, one per bit of [`LayerMask`]
pub const MAX_LAYERS: usize = 8;

bitflags! {
    /// Which layers the frame pump paints
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LayerMask: u8 {
        const LAYER_0 = 1 << 0;
        const LAYER_1 = 1 << 1;
        const LAYER_2 = 1 << 2;
        const LAYER_3 = 1 << 3;
        const LAYER_4 = 1 << 4;
        const LAYER_5 = 1 << 5;
        const LAYER_6 = 1 << 6;
        const LAYER_7 = 1 << 7;
        /// Background layer only
        const BASE = Self::LAYER_0.bits();
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::BASE
    }
}

impl LayerMask {
    /// Mask covering layers `0..count`
    pub fn first(count: usize) -> Self {
        let count = count.min(MAX_LAYERS) as u32;
        LayerMask::from_bits_truncate(((1u16 << count) - 1) as u8)
    }

    #[inline]
    pub fn has_layer(self, index: usize) -> bool {
        index < MAX_LAYERS && self.bits() & (1 << index) != 0
    }
}

/// Chooses a layer for a newly added drawable
pub trait LayerPolicy: Send {
    /// Returned index is clamped to `layer_count - 1`
    fn assign(&self, drawable: &dyn Drawable, layer_count: usize) -> usize;
}

/// Every drawable goes to layer 0
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseLayer;

impl LayerPolicy for BaseLayer {
    fn assign(&self, _drawable: &dyn Drawable, _layer_count: usize) -> usize {
        0
    }
}

/// Honors [`Drawable::layer_hint`], falling back to layer 0
#[derive(Clone, Copy, Debug, Default)]
pub struct HintedLayer;

impl LayerPolicy for HintedLayer {
    fn assign(&self, drawable: &dyn Drawable, _layer_count: usize) -> usize {
        drawable.layer_hint().unwrap_or(0)
    }
}

fn same_drawable(a: &Arc<dyn Drawable>, b: &Arc<dyn Drawable>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Fixed count of ordered paint buckets
pub struct LayerManager {
    layers: Vec<Vec<Arc<dyn Drawable>>>,
    policy: Box<dyn LayerPolicy>,
}

impl LayerManager {
    /// Create `count` empty layers using [`HintedLayer`]
    pub fn new(count: usize) -> Result<Self, RenderError> {
        Self::with_policy(count, HintedLayer)
    }

    pub fn with_policy<P: LayerPolicy + 'static>(
        count: usize,
        policy: P,
    ) -> Result<Self, RenderError> {
        if count == 0 || count > MAX_LAYERS {
            return Err(RenderError::InvalidLayerCount(count));
        }
        Ok(Self {
            layers: (0..count).map(|_| Vec::new()).collect(),
            policy: Box::new(policy),
        })
    }

    /// Replace the assignment policy for future additions
    pub fn set_policy<P: LayerPolicy + 'static>(&mut self, policy: P) {
        self.policy = Box::new(policy);
    }

    /// Add a drawable to the layer its policy picks
    ///
    /// A drawable already present elsewhere is moved. Returns the layer.
    pub fn add(&mut self, drawable: Arc<dyn Drawable>) -> usize {
        let index = self
            .policy
            .assign(drawable.as_ref(), self.layers.len())
            .min(self.layers.len() - 1);
        self.place(index, drawable);
        index
    }

    /// Add a drawable to a specific layer
    pub fn add_to(&mut self, index: usize, drawable: Arc<dyn Drawable>) -> Result<(), RenderError> {
        if index >= self.layers.len() {
            return Err(RenderError::LayerOutOfRange {
                index,
                count: self.layers.len(),
            });
        }
        self.place(index, drawable);
        Ok(())
    }

    fn place(&mut self, index: usize, drawable: Arc<dyn Drawable>) {
        for layer in &mut self.layers {
            layer.retain(|existing| !same_drawable(existing, &drawable));
        }
        self.layers[index].push(drawable);
    }

    /// Drawables in one layer, in insertion order
    pub fn layer(&self, index: usize) -> Option<&[Arc<dyn Drawable>]> {
        self.layers.get(index).map(Vec::as_slice)
    }

    /// Drawables of the masked layers, back to front
    pub fn painted(&self, mask: LayerMask) -> impl Iterator<Item = &Arc<dyn Drawable>> {
        self.layers
            .iter()
            .enumerate()
            .filter(move |(i, _)| mask.has_layer(*i))
            .flat_map(|(_, layer)| layer.iter())
    }

    /// Index of the layer holding `drawable`
    pub fn layer_of(&self, drawable: &Arc<dyn Drawable>) -> Option<usize> {
        self.layers
            .iter()
            .position(|layer| layer.iter().any(|d| same_drawable(d, drawable)))
    }

    pub fn contains(&self, drawable: &Arc<dyn Drawable>) -> bool {
        self.layer_of(drawable).is_some()
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total drawables across all layers
    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }
}
