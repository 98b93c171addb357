//! Owned home for the one frame pump of an application
//!
//! Setup code creates a slot and passes it around explicitly; the first
//! caller of [`FramePumpSlot::get_or_init`] builds the pump and everyone else
//! gets a [`FrameHandle`] to the same pump.

use std::thread::JoinHandle;

use crate::error::RenderError;
use crate::pump::{FrameHandle, FramePump, Presenter};

pub struct FramePumpSlot<P: Presenter> {
    pump: Option<FramePump<P>>,
    handle: Option<FrameHandle>,
}

impl<P: Presenter> Default for FramePumpSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Presenter> FramePumpSlot<P> {
    pub fn new() -> Self {
        Self {
            pump: None,
            handle: None,
        }
    }

    /// Handle to the pump, constructing it on first call
    ///
    /// Once the pump exists `fps` and `presenter` are ignored.
    pub fn get_or_init(&mut self, fps: u32, presenter: P) -> Result<FrameHandle, RenderError> {
        if let Some(handle) = &self.handle {
            log::debug!("Frame pump already constructed; ignoring fps {}", fps);
            return Ok(handle.clone());
        }
        self.install(FramePump::new(fps, presenter)?)
    }

    /// Put an already configured pump in an empty slot
    pub fn install(&mut self, pump: FramePump<P>) -> Result<FrameHandle, RenderError> {
        if self.handle.is_some() {
            return Err(RenderError::AlreadyStarted);
        }
        let handle = pump.handle();
        self.pump = Some(pump);
        self.handle = Some(handle.clone());
        Ok(handle)
    }

    /// Handle to a pump that must already exist
    pub fn get(&self) -> Result<FrameHandle, RenderError> {
        self.handle.clone().ok_or(RenderError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// The pump itself, for setup before it starts
    pub fn pump_mut(&mut self) -> Result<&mut FramePump<P>, RenderError> {
        match (&mut self.pump, &self.handle) {
            (Some(pump), _) => Ok(pump),
            (None, Some(_)) => Err(RenderError::AlreadyStarted),
            (None, None) => Err(RenderError::NotInitialized),
        }
    }
}

impl<P: Presenter + 'static> FramePumpSlot<P> {
    /// Spawn the pump thread; the slot keeps handing out handles
    pub fn start(&mut self) -> Result<JoinHandle<P>, RenderError> {
        match self.pump.take() {
            Some(pump) => pump.spawn(),
            None if self.handle.is_some() => Err(RenderError::AlreadyStarted),
            None => Err(RenderError::NotInitialized),
        }
    }
}
