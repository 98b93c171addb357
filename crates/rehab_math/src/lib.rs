//! 2D Mathematics Library
//!
//! This crate provides the two-point vector type used by the rehab2d
//! kinematic model.
//!
//! ## Core Types
//!
//! - [`Vector2D`] - Oriented vector defined by a start point and an end point.
//!   The start point doubles as a position, the displacement to the end point
//!   as a heading and speed.

mod vector2d;

pub use vector2d::Vector2D;
