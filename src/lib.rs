//! rehab2d application library
//!
//! Configuration and the systems `main` wires together. The engine itself
//! lives in the `rehab_*` crates.

pub mod config;
pub mod systems;
