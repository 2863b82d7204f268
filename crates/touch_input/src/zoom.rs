//! Two-finger zoom estimation
//!
//! Two ways of turning the motion of a pinch into a scale change are provided:
//!
//! - [`ZoomEstimator::DistanceRatio`] compares the distance between the fingers
//!   before and after the move. This is the default.
//! - [`ZoomEstimator::LeastSquares`] fits a translation + uniform scale (no
//!   rotation) mapping the new finger positions back onto the old ones. With
//!   uniform motion both agree; once the fingers rotate around each other
//!   they do not.
//!
//! Both report an *additive* change: `0.0` means no zoom, `1.0` doubles.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomEstimator {
    #[default]
    DistanceRatio,
    LeastSquares,
}

/// Result of fitting `prev ≈ scale * curr + shift` over both fingers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftAndScale {
    pub shift: Point,
    pub scale: f64,
}

/// `new_distance / old_distance - 1.0`
///
/// A zero `old_distance` is passed straight through the division.
pub fn distance_ratio_change(old_distance: f64, new_distance: f64) -> f64 {
    new_distance / old_distance - 1.0
}

/// Least-squares similarity fit without rotation.
///
/// Returns `None` when both current points coincide (the fit is undefined).
#[allow(clippy::many_single_char_names)]
pub fn least_squares_fit(prev: (Point, Point), curr: (Point, Point)) -> Option<ShiftAndScale> {
    let n = 2.0;
    let (a1, b1) = (curr.0.x, curr.0.y);
    let (a2, b2) = (curr.1.x, curr.1.y);
    let (c1, d1) = (prev.0.x, prev.0.y);
    let (c2, d2) = (prev.1.x, prev.1.y);

    let u = a1 * a1 + a2 * a2 + b1 * b1 + b2 * b2;
    let v = a1 + a2;
    let w = b1 + b2;
    let x = c1 + c2;
    let y = d1 + d2;
    let ac = a1 * c1 + a2 * c2;
    let bd = b1 * d1 + b2 * d2;

    let denominator = n * n * u - n * v * v - n * w * w;
    if denominator.abs() < f64::EPSILON {
        return None;
    }
    let gr = 1.0 / denominator;

    let scale = gr * (n * n * (ac + bd) - n * (v * x + w * y));
    let dx = gr * (-n * v * ac - n * v * bd + n * u * x - w * w * x + v * w * y);
    let dy = gr * (-n * w * ac - n * w * bd + n * u * y - v * v * y + v * w * x);

    Some(ShiftAndScale {
        shift: Point::new(dx, dy),
        scale,
    })
}

/// Additive zoom change from a least-squares fit.
///
/// The fit maps current points onto previous ones, so the zoom is its inverse.
pub fn least_squares_change(prev: (Point, Point), curr: (Point, Point)) -> Option<f64> {
    least_squares_fit(prev, curr)
        .filter(|fit| fit.scale != 0.0)
        .map(|fit| 1.0 / fit.scale - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_distance_ratio() {
        assert_eq!(distance_ratio_change(100.0, 200.0), 1.0);
        assert_eq!(distance_ratio_change(100.0, 50.0), -0.5);
        assert_eq!(distance_ratio_change(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_distance_ratio_zero_start_is_not_clamped() {
        assert!(distance_ratio_change(0.0, 10.0).is_infinite());
        assert!(distance_ratio_change(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_least_squares_pure_translation() {
        let prev = (Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let curr = (Point::new(5.0, 5.0), Point::new(15.0, 5.0));
        let fit = least_squares_fit(prev, curr).unwrap();

        assert!(approx(fit.scale, 1.0));
        assert!(approx(fit.shift.x, -5.0));
        assert!(approx(fit.shift.y, -5.0));
    }

    #[test]
    fn test_least_squares_matches_ratio_for_uniform_zoom() {
        let prev = (Point::new(100.0, 100.0), Point::new(200.0, 100.0));
        let curr = (Point::new(50.0, 100.0), Point::new(250.0, 100.0));

        let change = least_squares_change(prev, curr).unwrap();
        assert!(approx(change, 1.0));

        let shrink = least_squares_change(curr, prev).unwrap();
        assert!(approx(shrink, -0.5));
    }

    #[test]
    fn test_least_squares_coincident_points() {
        let p = Point::new(3.0, 3.0);
        assert!(least_squares_fit((p, p), (p, p)).is_none());
    }

    #[test]
    fn test_estimators_disagree_on_rotation() {
        // Second finger swings 45 degrees around the first at constant distance
        let r = 100.0 / 2f64.sqrt();
        let prev = (Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let curr = (Point::new(0.0, 0.0), Point::new(r, r));

        let ratio = distance_ratio_change(100.0, 100.0);
        let fitted = least_squares_change(prev, curr).unwrap();

        assert_eq!(ratio, 0.0);
        assert!(!approx(fitted, 0.0));
    }
}
