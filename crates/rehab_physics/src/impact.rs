//! One-dimensional impact speed response
//!
//! Speeds are treated as scalars along each body's own heading. The new
//! heading after a bounce is not computed here; bodies keep the direction
//! they had before the impact.

use crate::body::KinematicBody;
use crate::error::PhysicsError;

/// Speed of body A after an elastic 1-D impact with body B
///
/// `(speed_a * (mass_a - mass_b) + 2 * mass_b * speed_b) / (mass_a + mass_b)`
pub fn speed_after_impact(
    speed_a: f64,
    mass_a: f64,
    speed_b: f64,
    mass_b: f64,
) -> Result<f64, PhysicsError> {
    let mass_sum = mass_a + mass_b;
    if mass_sum == 0.0 || !mass_sum.is_finite() {
        return Err(PhysicsError::DegenerateMassSum { mass_a, mass_b });
    }
    Ok((speed_a * (mass_a - mass_b) + 2.0 * mass_b * speed_b) / mass_sum)
}

/// Two-body impact response
///
/// Both new speeds are computed from the pre-impact state before either body
/// is touched, then applied to each velocity's magnitude. Returns
/// `(speed_a, speed_b)`.
pub fn resolve_impact_pair(
    a: &mut KinematicBody,
    b: &mut KinematicBody,
) -> Result<(f64, f64), PhysicsError> {
    let speed_a = speed_after_impact(a.speed(), a.mass(), b.speed(), b.mass())?;
    let speed_b = speed_after_impact(b.speed(), b.mass(), a.speed(), a.mass())?;

    log::trace!(
        "impact: {:.3} -> {:.3} (m={}), {:.3} -> {:.3} (m={})",
        a.speed(),
        speed_a,
        a.mass(),
        b.speed(),
        speed_b,
        b.mass()
    );

    a.set_velocity_magnitude(speed_a);
    b.set_velocity_magnitude(speed_b);
    Ok((speed_a, speed_b))
}
