//! Kinematic body type for 2D physics

use crate::error::PhysicsError;
use crate::impact::speed_after_impact;
use rehab_math::Vector2D;
use serde::{Deserialize, Serialize};

/// Per-entity physical state
///
/// Position is not stored separately: it is the start point of the velocity
/// vector, and the displacement to the velocity's end point is the heading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Mass in kilograms, finite and > 0
    mass: f64,
    /// Cached speed in meters per second
    speed: f64,
    /// Current velocity, anchored at the body's position
    velocity: Vector2D,
    /// Velocity as it was before the most recent impulse
    last_velocity: Vector2D,
    /// Whether the world tick should pull this body toward the floor
    gravity_enabled: bool,
}

impl KinematicBody {
    /// Create a body at rest at the origin
    pub fn new(mass: f64) -> Result<Self, PhysicsError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }
        Ok(Self {
            mass,
            speed: 0.0,
            velocity: Vector2D::ZERO,
            last_velocity: Vector2D::ZERO,
            gravity_enabled: true,
        })
    }

    /// Create a body at rest at `(x, y)`
    pub fn at(mass: f64, x: f64, y: f64) -> Result<Self, PhysicsError> {
        let mut body = Self::new(mass)?;
        body.reposition(x, y, false);
        Ok(body)
    }

    /// Set whether gravity affects this body
    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.gravity_enabled = enabled;
        self
    }

    /// Apply an instantaneous velocity contribution and advance one step
    ///
    /// From rest the impulse is added to the velocity endpoint by endpoint.
    /// While moving only the magnitudes add up and the current heading is
    /// kept. Either way the body then moves by the resulting displacement.
    pub fn apply_impulse(&mut self, impulse: &Vector2D) {
        self.last_velocity = self.velocity;

        if self.speed == 0.0 {
            self.velocity.add(impulse);
        } else {
            let magnitude = impulse.magnitude() + self.velocity.magnitude();
            self.velocity.change_magnitude(magnitude);
        }

        let (dx, dy) = self.velocity.displacement();
        self.move_by(dx, dy);
        self.speed = self.velocity.magnitude();
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        self.velocity.start_x += dx;
        self.velocity.start_y += dy;
        self.velocity.end_x += dx;
        self.velocity.end_y += dy;
    }

    /// Move the body to `(x, y)`
    ///
    /// With `conserve_velocity` the displacement is carried along to the new
    /// position. Without it both endpoints collapse onto `(x, y)`, which
    /// zeroes the vector's length but leaves the cached `speed` as it was.
    pub fn reposition(&mut self, x: f64, y: f64, conserve_velocity: bool) {
        if conserve_velocity {
            self.velocity.end_x += x - self.velocity.start_x;
            self.velocity.end_y += y - self.velocity.start_y;
        } else {
            self.velocity.end_x = x;
            self.velocity.end_y = y;
        }
        self.velocity.start_x = x;
        self.velocity.start_y = y;
    }

    /// Single-body impact response against `other`
    ///
    /// Only this body's velocity magnitude changes; `other` is left as it
    /// was. Use [`crate::resolve_impact_pair`] to update both sides.
    /// Returns the new speed.
    pub fn resolve_impact(&mut self, other: &KinematicBody) -> Result<f64, PhysicsError> {
        let speed = speed_after_impact(self.speed, self.mass, other.speed, other.mass)?;
        self.set_velocity_magnitude(speed);
        Ok(speed)
    }

    /// Rescale the velocity along its heading and refresh the cached speed
    pub(crate) fn set_velocity_magnitude(&mut self, speed: f64) {
        self.velocity.change_magnitude(speed);
        self.speed = speed;
    }

    /// Position as `(x, y)`
    #[inline]
    pub fn position(&self) -> (f64, f64) {
        (self.velocity.start_x, self.velocity.start_y)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.velocity.start_x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.velocity.start_y
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Override the cached speed without touching the velocity vector
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    #[inline]
    pub fn velocity(&self) -> &Vector2D {
        &self.velocity
    }

    #[inline]
    pub fn last_velocity(&self) -> &Vector2D {
        &self.last_velocity
    }

    #[inline]
    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }
}
