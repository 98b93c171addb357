//! Application systems
//!
//! The world tick loop and the presenter handed to the frame pump.

mod presenter;
mod simulation;

pub use presenter::LogPresenter;
pub use simulation::{SimulationSystem, TickHandle, TickResult};
