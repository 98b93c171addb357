//! Frame interval pacing

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// What to do when a frame took longer than the interval
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrunPolicy {
    /// Start the next frame immediately
    #[default]
    CatchUp,
    /// Sleep for the overage after a long frame; lateness compounds
    Legacy,
}

/// Computes how long to wait after each frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePacer {
    interval: Duration,
    policy: OverrunPolicy,
}

impl FramePacer {
    /// Interval of `1_000_000_000 / fps` nanoseconds
    pub fn from_fps(fps: u32, policy: OverrunPolicy) -> Result<Self, RenderError> {
        if fps == 0 {
            return Err(RenderError::InvalidFrameRate(fps));
        }
        Ok(Self {
            interval: Duration::from_nanos(1_000_000_000 / fps as u64),
            policy,
        })
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn policy(&self) -> OverrunPolicy {
        self.policy
    }

    /// Time to wait after a frame body that took `elapsed`
    pub fn delay_for(&self, elapsed: Duration) -> Option<Duration> {
        if elapsed < self.interval {
            return Some(self.interval - elapsed);
        }
        match self.policy {
            OverrunPolicy::CatchUp => None,
            OverrunPolicy::Legacy if elapsed > self.interval => Some(elapsed - self.interval),
            OverrunPolicy::Legacy => None,
        }
    }
}
