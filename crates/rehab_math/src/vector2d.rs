//! Two-point 2D vector type

use serde::{Deserialize, Serialize};

/// Oriented 2D vector with a start point and an end point
///
/// The start point is where something is, the displacement from start to end
/// is where it is heading and how fast. Y grows upward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl Vector2D {
    pub const ZERO: Self = Self::heading(0.0, 0.0);

    // Keyboard headings
    pub const UNIT_EAST: Self = Self::heading(1.0, 0.0);
    pub const UNIT_NORTH: Self = Self::heading(0.0, 1.0);
    pub const UNIT_WEST: Self = Self::heading(-1.0, 0.0);
    pub const UNIT_SOUTH: Self = Self::heading(0.0, -1.0);

    // Diagonals (not normalized)
    pub const UNIT_NE: Self = Self::heading(1.0, 1.0);
    pub const UNIT_NW: Self = Self::heading(-1.0, 1.0);
    pub const UNIT_SE: Self = Self::heading(1.0, -1.0);
    pub const UNIT_SW: Self = Self::heading(-1.0, -1.0);

    /// Create a vector from its two points
    #[inline]
    pub const fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    /// Create a vector anchored at the origin pointing at `(x, y)`
    #[inline]
    pub const fn heading(x: f64, y: f64) -> Self {
        Self::new(0.0, 0.0, x, y)
    }

    /// Start point x (the position)
    #[inline]
    pub fn x(&self) -> f64 {
        self.start_x
    }

    /// Start point y (the position)
    #[inline]
    pub fn y(&self) -> f64 {
        self.start_y
    }

    #[inline]
    pub fn end_x(&self) -> f64 {
        self.end_x
    }

    #[inline]
    pub fn end_y(&self) -> f64 {
        self.end_y
    }

    /// Displacement from start to end as `(dx, dy)`
    #[inline]
    pub fn displacement(&self) -> (f64, f64) {
        (self.end_x - self.start_x, self.end_y - self.start_y)
    }

    /// Add the endpoints of `other` to the endpoints of this vector
    #[inline]
    pub fn add(&mut self, other: &Vector2D) {
        self.start_x += other.start_x;
        self.start_y += other.start_y;
        self.end_x += other.end_x;
        self.end_y += other.end_y;
    }

    /// Scale both endpoints by `factor`
    ///
    /// Note this moves the start point too unless it sits at the origin.
    #[inline]
    pub fn multiply(&mut self, factor: f64) {
        self.start_x *= factor;
        self.start_y *= factor;
        self.end_x *= factor;
        self.end_y *= factor;
    }

    /// Negate the end point's coordinates, keeping the start point fixed
    #[inline]
    pub fn reverse(&mut self) {
        self.end_x = -self.end_x;
        self.end_y = -self.end_y;
    }

    /// Euclidean distance between the start and end points
    #[inline]
    pub fn magnitude(&self) -> f64 {
        let (dx, dy) = self.displacement();
        dx.hypot(dy)
    }

    /// Origin-anchored vector with this heading and a length of 1
    ///
    /// A zero-length vector has no heading; its raw displacement is returned
    /// as-is instead of dividing by zero, so callers may get back a "unit"
    /// vector of length 0.
    pub fn unit_vector(&self) -> Self {
        let magnitude = self.magnitude();
        let (dx, dy) = self.displacement();
        if magnitude == 0.0 {
            return Self::heading(dx, dy);
        }
        Self::heading(dx / magnitude, dy / magnitude)
    }

    /// Keep the start point and heading, set the length to `magnitude`
    pub fn change_magnitude(&mut self, magnitude: f64) {
        let mut unit = self.unit_vector();
        unit.multiply(magnitude);
        let (dx, dy) = unit.displacement();
        self.end_x = self.start_x + dx;
        self.end_y = self.start_y + dy;
    }

    /// X component of the displacement rotated 90° counter-clockwise
    #[inline]
    pub fn normal_x(&self) -> f64 {
        -(self.end_y - self.start_y)
    }

    /// Y component of the displacement rotated 90° counter-clockwise
    #[inline]
    pub fn normal_y(&self) -> f64 {
        self.end_x - self.start_x
    }

    /// The normal as an origin-anchored vector
    #[inline]
    pub fn normal(&self) -> Self {
        Self::heading(self.normal_x(), self.normal_y())
    }
}

impl std::ops::AddAssign<&Vector2D> for Vector2D {
    #[inline]
    fn add_assign(&mut self, other: &Vector2D) {
        self.add(other);
    }
}

impl std::ops::AddAssign for Vector2D {
    #[inline]
    fn add_assign(&mut self, other: Vector2D) {
        self.add(&other);
    }
}

impl std::ops::MulAssign<f64> for Vector2D {
    #[inline]
    fn mul_assign(&mut self, factor: f64) {
        self.multiply(factor);
    }
}
