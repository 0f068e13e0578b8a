use num_traits::{Float, Num};
use serde::{Deserialize, Serialize};

/// Point in 2d cartesian coordinate space.
pub trait CartesianPoint2d {
    /// Numeric type used to represent coordinates.
    type Num: Num + Copy + PartialOrd;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Returns true if both coordinates of the points are exactly equal.
    fn equal(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> bool {
        self.x() == other.x() && self.y() == other.y()
    }

    /// Vector from `other` to `self`.
    fn sub(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Vector2<Self::Num> {
        Vector2 {
            dx: self.x() - other.x(),
            dy: self.y() - other.y(),
        }
    }

    /// Squared euclidean distance between two points.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        self.sub(other).length_sq()
    }
}

/// Cartesian point that can be constructed from its coordinates.
pub trait NewCartesianPoint2d<N = f64>: CartesianPoint2d<Num = N> + Sized {
    /// Creates a new point.
    fn new(x: N, y: N) -> Self;
}

/// Float-only helpers of cartesian points. Auto-implemented.
pub trait CartesianPoint2dFloat<N: Float = f64>: CartesianPoint2d<Num = N> {
    /// Euclidean distance between two points.
    fn distance(&self, other: &impl CartesianPoint2d<Num = N>) -> N {
        self.distance_sq(other).sqrt()
    }

    /// Returns true if both coordinates are finite numbers.
    fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }
}

impl<N: Float, T: CartesianPoint2d<Num = N>> CartesianPoint2dFloat<N> for T {}

/// Simple 2d cartesian point.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point2d<N = f64> {
    x: N,
    y: N,
}

impl<N> Point2d<N> {
    /// Creates a new point.
    pub const fn new(x: N, y: N) -> Self {
        Self { x, y }
    }
}

impl<N: Num + Copy + PartialOrd> CartesianPoint2d for Point2d<N> {
    type Num = N;

    fn x(&self) -> N {
        self.x
    }

    fn y(&self) -> N {
        self.y
    }
}

impl<N: Num + Copy + PartialOrd> NewCartesianPoint2d<N> for Point2d<N> {
    fn new(x: N, y: N) -> Self {
        Point2d { x, y }
    }
}

/// Difference between two cartesian points.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector2<N = f64> {
    dx: N,
    dy: N,
}

impl<N: Num + Copy> Vector2<N> {
    /// Creates a new vector.
    pub fn new(dx: N, dy: N) -> Self {
        Self { dx, dy }
    }

    /// X component.
    pub fn dx(&self) -> N {
        self.dx
    }

    /// Y component.
    pub fn dy(&self) -> N {
        self.dy
    }

    /// Squared length of the vector.
    pub fn length_sq(&self) -> N {
        self.dx * self.dx + self.dy * self.dy
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> N {
        self.dx * other.dx + self.dy * other.dy
    }

    /// Z component of the cross product of the two vectors extended into 3d space.
    pub fn cross(&self, other: &Self) -> N {
        self.dx * other.dy - self.dy * other.dx
    }

    /// Multiplies the vector by a scalar.
    pub fn scale(&self, k: N) -> Self {
        Self {
            dx: self.dx * k,
            dy: self.dy * k,
        }
    }
}
