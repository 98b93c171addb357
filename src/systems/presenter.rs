//! Headless presenter
//!
//! There is no window to blit to, so finished frames are inspected instead:
//! the presenter keeps a copy of the latest frame and logs how much of it
//! was drawn over the clear color.

use rehab_render::{Presenter, Surface};

/// Logs a summary of every `log_every`th frame
pub struct LogPresenter {
    title: String,
    clear_color: u32,
    log_every: u64,
    frames: u64,
    last_frame: Option<Surface>,
}

impl LogPresenter {
    pub fn new(title: impl Into<String>, clear_color: u32, log_every: u64) -> Self {
        Self {
            title: title.into(),
            clear_color,
            log_every: log_every.max(1),
            frames: 0,
            last_frame: None,
        }
    }

    /// Frames received so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&Surface> {
        self.last_frame.as_ref()
    }

    /// Pixels of the latest frame that differ from the clear color
    pub fn drawn_pixels(&self) -> usize {
        self.last_frame
            .as_ref()
            .map_or(0, |frame| frame.count_not(self.clear_color))
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, frame: &Surface) {
        self.last_frame = Some(frame.clone());

        if self.frames % self.log_every == 0 {
            log::debug!(
                "[{}] frame {}: {} of {} pixels drawn",
                self.title,
                self.frames,
                self.drawn_pixels(),
                frame.pixels().len()
            );
        }
        self.frames += 1;
    }
}
