//! Plain 2D geometry used by the gesture core.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point in some 2D coordinate space (window, view-local or engine).
///
/// `#[repr(C)]` so it can be passed by value to remote handlers.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Componentwise average of two points
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Width and height of a view or window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_and_midpoint() {
        let a = Point::new(100.0, 100.0);
        let b = Point::new(200.0, 100.0);

        assert_eq!(a.distance_to(&b), 100.0);
        assert_eq!(a.midpoint(&b), Point::new(150.0, 100.0));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::new(3.0, 0.0);
        let b = Point::new(0.0, 4.0);

        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(1.0, 2.0);

        assert_eq!(a - b, Point::new(9.0, 18.0));
        assert_eq!(a + b, Point::new(11.0, 22.0));
    }
}
