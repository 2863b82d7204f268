//! Drag / pinch disambiguation
//!
//! [`TouchTracker`] turns batches of raw platform touches into a gesture stream
//! on a [`View`]:
//!
//! ```text
//!              1 began                       1 began
//!   Idle ──────────────────▶ Dragging ─────────────────────▶ PinchAndDrag
//!    ▲ ▲                      │   ▲                              │   │
//!    │ └──── 1 ended ─────────┘   └──────── 1 ended ─────────────┘   │
//!    │                                                               │
//!    └─────────────────────────── 2 ended ───────────────────────────┘
//!
//!   Idle ── 2 began ──▶ PinchAndDrag
//! ```
//!
//! While two fingers are down the pair acts as a single drag anchored at their
//! midpoint, and distance changes are reported through [`View::magnify`].
//!
//! Not thread safe. Feed it from the thread that owns the view.

use crate::geometry::Point;
use crate::platform::PlatformTouch;
use crate::touch::Touch;
use crate::view::View;
use crate::zoom::{self, ZoomEstimator};

/// Gesture state, derived from which touch slots are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
    PinchAndDrag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    First,
    Second,
}

#[derive(Debug)]
pub struct TouchTracker<T: PlatformTouch> {
    touch1: Option<Touch<T>>,
    touch2: Option<Touch<T>>,
    distance_between_touches: Option<f64>,
    midpoint_touch: Option<Touch<T>>,
    /// Finger positions at the last pinch event, for the least-squares fit
    pinch_anchor: Option<(Point, Point)>,
    estimator: ZoomEstimator,
}

impl<T: PlatformTouch> Default for TouchTracker<T> {
    fn default() -> Self {
        Self::with_estimator(ZoomEstimator::default())
    }
}

impl<T: PlatformTouch> TouchTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_estimator(estimator: ZoomEstimator) -> Self {
        Self {
            touch1: None,
            touch2: None,
            distance_between_touches: None,
            midpoint_touch: None,
            pinch_anchor: None,
            estimator,
        }
    }

    pub fn estimator(&self) -> ZoomEstimator {
        self.estimator
    }

    /// Number of tracked touches
    pub fn count(&self) -> usize {
        usize::from(self.touch1.is_some()) + usize::from(self.touch2.is_some())
    }

    pub fn state(&self) -> GestureState {
        match (&self.touch1, &self.touch2) {
            (None, None) => GestureState::Idle,
            (Some(_), None) => GestureState::Dragging,
            (Some(_), Some(_)) => GestureState::PinchAndDrag,
            (None, Some(_)) => panic!("second touch slot filled while the first is empty"),
        }
    }

    pub fn touch1(&self) -> Option<&Touch<T>> {
        self.touch1.as_ref()
    }

    pub fn touch2(&self) -> Option<&Touch<T>> {
        self.touch2.as_ref()
    }

    pub fn midpoint_touch(&self) -> Option<&Touch<T>> {
        self.midpoint_touch.as_ref()
    }

    pub fn distance_between_touches(&self) -> Option<f64> {
        self.distance_between_touches
    }

    pub fn touches_started<V: View + ?Sized>(&mut self, view: &V, raw: &[T]) {
        if raw.is_empty() {
            return;
        }

        match self.state() {
            GestureState::Idle => {
                let frame = view.frame();
                if raw.len() == 1 {
                    let touch = Touch::new(raw[0].clone(), frame);
                    view.drag_start(touch.window_point(), touch.local_point(), touch.tap_count());
                    self.touch1 = Some(touch);
                    return;
                }

                if raw.len() > 2 {
                    tracing::warn!("{} touches started at once, ignoring all but two", raw.len());
                }
                self.touch1 = Some(Touch::new(raw[0].clone(), frame));
                self.begin_pinch(Touch::new(raw[1].clone(), frame));

                let midpoint = self.current_midpoint();
                view.drag_start(
                    midpoint.window_point(),
                    midpoint.local_point(),
                    midpoint.tap_count(),
                );
            }
            GestureState::Dragging => {
                if raw.len() > 1 {
                    tracing::warn!(
                        "{} touches started while dragging, using only the first",
                        raw.len()
                    );
                }
                let touch = Touch::new(raw[0].clone(), view.frame());
                self.begin_pinch(touch);

                let first = self.first();
                view.drag_ended(first.window_point(), first.local_point(), first.tap_count());
                let midpoint = self.current_midpoint();
                view.drag_start(
                    midpoint.window_point(),
                    midpoint.local_point(),
                    midpoint.tap_count(),
                );
            }
            GestureState::PinchAndDrag => {
                tracing::debug!("Already pinching, ignoring {} started touches", raw.len());
            }
        }
    }

    pub fn touches_moved<V: View + ?Sized>(&mut self, view: &V, raw: &[T]) {
        let resolved = self.resolve_and_update(raw);

        if resolved.is_empty() {
            tracing::debug!("No meaningful touches moved");
            return;
        }
        if resolved.len() > 2 {
            panic!("touches_moved resolved {} touches, at most 2 can be tracked", resolved.len());
        }

        match self.state() {
            GestureState::Idle => {
                tracing::debug!("Touches moved while idle");
            }
            GestureState::Dragging => {
                let first = self.first();
                view.drag_moved(first.window_point(), first.local_point(), first.tap_count());
            }
            GestureState::PinchAndDrag => {
                let midpoint = self.current_midpoint();
                let new_distance = self.first().distance_to(self.second());
                let scale_change = self.scale_change(new_distance);

                self.distance_between_touches = Some(new_distance);
                self.pinch_anchor = Some(self.finger_points());
                let center = midpoint.window_point();
                self.midpoint_touch = Some(midpoint);

                view.magnify(scale_change, center);
            }
        }
    }

    pub fn touches_ended<V: View + ?Sized>(&mut self, view: &V, raw: &[T]) {
        let resolved = self.resolve_and_update(raw);

        match (resolved.as_slice(), self.state()) {
            ([], _) => {
                tracing::debug!("No meaningful touches ended");
            }
            ([_], GestureState::Dragging) => {
                if let Some(touch) = self.touch1.take() {
                    view.drag_ended(touch.window_point(), touch.local_point(), touch.tap_count());
                }
            }
            ([ended], GestureState::PinchAndDrag) => {
                let midpoint = self.current_midpoint();
                let (first, second) = (self.touch1.take(), self.touch2.take());
                let survivor = match ended {
                    Slot::First => second,
                    Slot::Second => first,
                };
                self.clear_pinch();
                self.touch1 = survivor;

                view.drag_ended(
                    midpoint.window_point(),
                    midpoint.local_point(),
                    midpoint.tap_count(),
                );
                let survivor = self.first();
                view.drag_start(
                    survivor.window_point(),
                    survivor.local_point(),
                    survivor.tap_count(),
                );
            }
            ([a, b], GestureState::PinchAndDrag) if a != b => {
                let midpoint = self.current_midpoint();
                self.touch1 = None;
                self.touch2 = None;
                self.clear_pinch();

                view.drag_ended(
                    midpoint.window_point(),
                    midpoint.local_point(),
                    midpoint.tap_count(),
                );
            }
            (resolved, state) => {
                panic!(
                    "touches_ended resolved {} touches in state {:?}",
                    resolved.len(),
                    state
                );
            }
        }
    }

    /// Cancellation is handled exactly like an ordinary end.
    pub fn touches_cancelled<V: View + ?Sized>(&mut self, view: &V, raw: &[T]) {
        self.touches_ended(view, raw);
    }

    fn begin_pinch(&mut self, second: Touch<T>) {
        self.touch2 = Some(second);
        let distance = self.first().distance_to(self.second());
        self.distance_between_touches = Some(distance);
        self.midpoint_touch = Some(self.current_midpoint());
        self.pinch_anchor = Some(self.finger_points());
    }

    fn clear_pinch(&mut self) {
        self.distance_between_touches = None;
        self.midpoint_touch = None;
        self.pinch_anchor = None;
    }

    fn scale_change(&self, new_distance: f64) -> f64 {
        let old_distance = self
            .distance_between_touches
            .unwrap_or_else(|| panic!("pinching without a starting distance"));
        let ratio = || zoom::distance_ratio_change(old_distance, new_distance);

        match (self.estimator, self.pinch_anchor) {
            (ZoomEstimator::DistanceRatio, _) | (ZoomEstimator::LeastSquares, None) => ratio(),
            (ZoomEstimator::LeastSquares, Some(anchor)) => {
                zoom::least_squares_change(anchor, self.finger_points()).unwrap_or_else(ratio)
            }
        }
    }

    /// Match raw touches against the tracked slots, refreshing each match.
    /// Unknown touches are dropped here.
    fn resolve_and_update(&mut self, raw: &[T]) -> Vec<Slot> {
        let mut resolved = Vec::new();

        for touch in raw {
            if let Some(first) = self.touch1.as_mut().filter(|t| t.is_tracking(touch)) {
                first.update();
                resolved.push(Slot::First);
            } else if let Some(second) = self.touch2.as_mut().filter(|t| t.is_tracking(touch)) {
                second.update();
                resolved.push(Slot::Second);
            }
        }

        resolved
    }

    fn finger_points(&self) -> (Point, Point) {
        (self.first().window_point(), self.second().window_point())
    }

    fn current_midpoint(&self) -> Touch<T> {
        self.first().midpoint(self.second())
    }

    fn first(&self) -> &Touch<T> {
        self.touch1
            .as_ref()
            .unwrap_or_else(|| panic!("no first touch tracked"))
    }

    fn second(&self) -> &Touch<T> {
        self.touch2
            .as_ref()
            .unwrap_or_else(|| panic!("no second touch tracked"))
    }
}
