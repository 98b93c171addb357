//! Physics error types

use std::fmt;

/// Error type for physics operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    /// Body mass must be finite and strictly positive
    InvalidMass(f64),
    /// Impact between two bodies whose masses sum to zero (or overflow)
    DegenerateMassSum { mass_a: f64, mass_b: f64 },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass(mass) => {
                write!(f, "Invalid body mass: {} (must be finite and > 0)", mass)
            }
            PhysicsError::DegenerateMassSum { mass_a, mass_b } => write!(
                f,
                "Impact response undefined: masses {} and {} have no usable sum",
                mass_a, mass_b
            ),
        }
    }
}

impl std::error::Error for PhysicsError {}
