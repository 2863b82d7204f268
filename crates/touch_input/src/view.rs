//! The receiving end of the gesture stream.

use crate::coords::ViewFrame;
use crate::geometry::{Point, Size};

/// A view that gestures are delivered to.
///
/// The tracker only ever talks to this trait, never to a concrete view.
/// Points are in engine coordinates: `window_point` relative to the window,
/// `local_point` relative to the view. `tap_count` is the platform's tap or
/// click count for the contact, 0 for a synthetic midpoint.
pub trait View {
    /// Where the view currently sits in its window
    fn frame(&self) -> ViewFrame;

    fn drag_start(&self, window_point: Point, local_point: Point, tap_count: u32);

    fn drag_moved(&self, window_point: Point, local_point: Point, tap_count: u32);

    fn drag_ended(&self, window_point: Point, local_point: Point, tap_count: u32);

    /// `scale_change` is additive: `0.0` is no change, `1.0` doubles.
    fn magnify(&self, scale_change: f64, center: Point);

    fn layout(&self, size: Size);
}
