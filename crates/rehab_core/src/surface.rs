//! ARGB pixel surface

/// Opaque dark grey used to clear frames
pub const CLEAR_GREY: u32 = argb(255, 40, 40, 40);

/// Pack channels into a `0xAARRGGBB` pixel
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Fixed-size pixel surface, row-major, Y down
///
/// Coordinates outside the surface are ignored on write and yield `None` on
/// read, so sprites may be painted partially off-screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Surface {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Write one pixel
    #[inline]
    pub fn set_argb(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Read one pixel
    #[inline]
    pub fn argb_at(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite every pixel with `color`
    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Fill the rectangle at `(x, y)` of `width` x `height`, clipped
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width as i32).min(self.width as i32);
        let y1 = y.saturating_add(height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for row in y0..y1 {
            let start = row as usize * self.width as usize;
            self.pixels[start + x0 as usize..start + x1 as usize].fill(color);
        }
    }

    /// All pixels, row-major
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Number of pixels different from `color`
    pub fn count_not(&self, color: u32) -> usize {
        self.pixels.iter().filter(|&&p| p != color).count()
    }
}
