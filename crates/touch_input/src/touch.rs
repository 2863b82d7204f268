//! Tracked touch snapshots.

use crate::coords::ViewFrame;
use crate::geometry::Point;
use crate::platform::PlatformTouch;

/// Snapshot of one contact point as seen by a view.
///
/// Coordinates only change through [`Touch::update`]. A touch built by
/// [`Touch::midpoint`] is synthetic: it has no platform contact behind it and
/// can never be refreshed.
#[derive(Debug, Clone)]
pub struct Touch<T: PlatformTouch> {
    source: Option<T>,
    frame: ViewFrame,
    window_point: Point,
    local_point: Point,
    prev_window_point: Point,
}

impl<T: PlatformTouch> Touch<T> {
    /// Start tracking a platform contact relative to a view.
    pub fn new(source: T, frame: ViewFrame) -> Self {
        let window_point = frame.normalize_window_point(source.location_in_window());
        Self {
            source: Some(source),
            frame,
            window_point,
            local_point: frame.to_local(window_point),
            prev_window_point: window_point,
        }
    }

    fn synthetic(frame: ViewFrame, window_point: Point, local_point: Point) -> Self {
        Self {
            source: None,
            frame,
            window_point,
            local_point,
            prev_window_point: window_point,
        }
    }

    pub fn window_point(&self) -> Point {
        self.window_point
    }

    pub fn local_point(&self) -> Point {
        self.local_point
    }

    /// Window point before the last [`Touch::update`]
    pub fn prev_window_point(&self) -> Point {
        self.prev_window_point
    }

    pub fn is_synthetic(&self) -> bool {
        self.source.is_none()
    }

    pub fn source(&self) -> Option<&T> {
        self.source.as_ref()
    }

    pub fn tap_count(&self) -> u32 {
        self.source.as_ref().map_or(0, PlatformTouch::tap_count)
    }

    pub fn distance_to(&self, other: &Touch<T>) -> f64 {
        self.window_point.distance_to(&other.window_point)
    }

    /// A synthetic touch halfway between this touch and `other`.
    pub fn midpoint(&self, other: &Touch<T>) -> Touch<T> {
        Touch::synthetic(
            self.frame,
            self.window_point.midpoint(&other.window_point),
            self.local_point.midpoint(&other.local_point),
        )
    }

    /// Re-read the position from the live platform contact.
    ///
    /// # Panics
    ///
    /// Panics when called on a synthetic touch.
    pub fn update(&mut self) -> &Self {
        let Some(source) = self.source.as_ref() else {
            panic!("update() called on a synthetic touch with no platform contact");
        };
        let window_point = self.frame.normalize_window_point(source.location_in_window());

        self.prev_window_point = self.window_point;
        self.window_point = window_point;
        self.local_point = self.frame.to_local(window_point);
        self
    }

    /// Whether this touch tracks the given platform contact.
    pub fn is_tracking(&self, raw: &T) -> bool {
        self.source
            .as_ref()
            .is_some_and(|source| source.same_contact(raw))
    }
}

/// Identity equality: two touches are equal when they track the same contact.
/// Synthetic touches are never equal to anything.
impl<T: PlatformTouch> PartialEq for Touch<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.source, &other.source) {
            (Some(a), Some(b)) => a.same_contact(b),
            _ => false,
        }
    }
}
