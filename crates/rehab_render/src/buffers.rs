//! Double-buffered pixel surfaces

use rehab_core::Surface;

/// Two equally sized surfaces; one is painted while the other is on screen
///
/// The selection flips on every [`BufferPair::swap`], so the surface being
/// written is never the one presented last.
pub struct BufferPair {
    surfaces: [Surface; 2],
    selected: usize,
}

impl BufferPair {
    /// Allocate both surfaces. Surface 0 starts selected, so the first
    /// frame paints into surface 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surfaces: [Surface::new(width, height), Surface::new(width, height)],
            selected: 0,
        }
    }

    /// Select the other surface and return its index
    pub fn swap(&mut self) -> usize {
        self.selected ^= 1;
        self.selected
    }

    #[inline]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The surface being written this frame
    #[inline]
    pub fn selected(&self) -> &Surface {
        &self.surfaces[self.selected]
    }

    #[inline]
    pub fn selected_mut(&mut self) -> &mut Surface {
        &mut self.surfaces[self.selected]
    }

    /// The surface presented in the previous frame
    #[inline]
    pub fn previous(&self) -> &Surface {
        &self.surfaces[self.selected ^ 1]
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.surfaces[0].width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.surfaces[0].height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_alternates() {
        let mut buffers = BufferPair::new(4, 4);
        let mut last = buffers.selected_index();
        for _ in 0..10 {
            let next = buffers.swap();
            assert_ne!(next, last);
            last = next;
        }
    }

    #[test]
    fn test_first_swap_selects_second_surface() {
        let mut buffers = BufferPair::new(4, 4);
        assert_eq!(buffers.swap(), 1);
        assert_eq!(buffers.swap(), 0);
    }

    #[test]
    fn test_selected_and_previous_are_distinct() {
        let mut buffers = BufferPair::new(2, 2);
        buffers.swap();
        buffers.selected_mut().fill(7);
        assert_eq!(buffers.previous().count_not(0), 0);

        buffers.swap();
        assert_eq!(buffers.previous().count_not(7), 0);
        assert_eq!((buffers.width(), buffers.height()), (2, 2));
    }
}
