//! Base view
//!
//! Every native view wraps a [`BaseView`]. It owns the per-view touch state and
//! turns platform touch callbacks into handler calls, in one of two modes:
//!
//! - [`InputMode::Gestures`] runs contacts through a [`TouchTracker`] and
//!   reports drags (as drag id 0) and pinches (as magnify events)
//! - [`InputMode::MultiDrag`] runs contacts through a [`TouchLookup`] and
//!   reports one or two raw drags with their ids
//!
//! All methods must be called on the main thread.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use touch_input::{
    GestureState, PlatformTouch, Point, Size, TouchLookup, TouchTracker, View, ViewFrame,
    ZoomEstimator,
};

use crate::drag_point::DragPoint;
use crate::view_handlers::ViewHandlers;

/// Drag id reported for tracker drags
pub const GESTURE_DRAG_ID: i64 = 0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Gestures,
    MultiDrag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Move,
    End,
}

pub struct BaseView<T: PlatformTouch> {
    handlers: Arc<ViewHandlers>,
    frame: Cell<ViewFrame>,
    mode: InputMode,
    tracker: RefCell<TouchTracker<T>>,
    lookup: RefCell<TouchLookup<T>>,
}

impl<T: PlatformTouch> BaseView<T> {
    pub fn new(handlers: Arc<ViewHandlers>, frame: ViewFrame, mode: InputMode) -> Self {
        Self::with_estimator(handlers, frame, mode, ZoomEstimator::default())
    }

    pub fn with_estimator(
        handlers: Arc<ViewHandlers>,
        frame: ViewFrame,
        mode: InputMode,
        estimator: ZoomEstimator,
    ) -> Self {
        Self {
            handlers,
            frame: Cell::new(frame),
            mode,
            tracker: RefCell::new(TouchTracker::with_estimator(estimator)),
            lookup: RefCell::new(TouchLookup::new()),
        }
    }

    pub fn handlers(&self) -> &Arc<ViewHandlers> {
        &self.handlers
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn gesture_state(&self) -> GestureState {
        self.tracker.borrow().state()
    }

    /// Contacts currently holding a drag id
    pub fn active_drags(&self) -> usize {
        self.lookup.borrow().active_count()
    }

    /// Resize the view and notify layout handlers.
    pub fn set_size(&self, size: Size) {
        self.frame.set(self.frame.get().resized(size));
        self.layout(size);
    }

    pub fn set_frame(&self, frame: ViewFrame) {
        self.frame.set(frame);
    }

    pub fn touches_began(&self, touches: &[T]) {
        if !self.accepts_touches() {
            return;
        }
        match self.mode {
            InputMode::Gestures => self.tracker.borrow_mut().touches_started(self, touches),
            InputMode::MultiDrag => {
                let started = self.lookup.borrow_mut().filter_new(touches);
                self.dispatch_drags(Phase::Start, &started);
            }
        }
    }

    pub fn touches_moved(&self, touches: &[T]) {
        if !self.accepts_touches() {
            return;
        }
        match self.mode {
            InputMode::Gestures => self.tracker.borrow_mut().touches_moved(self, touches),
            InputMode::MultiDrag => {
                let moved = self.lookup.borrow().filter_moved(touches);
                self.dispatch_drags(Phase::Move, &moved);
            }
        }
    }

    pub fn touches_ended(&self, touches: &[T]) {
        if !self.accepts_touches() {
            return;
        }
        match self.mode {
            InputMode::Gestures => self.tracker.borrow_mut().touches_ended(self, touches),
            InputMode::MultiDrag => {
                let ended = self.lookup.borrow_mut().filter_ended(touches);
                self.dispatch_drags(Phase::End, &ended);
            }
        }
    }

    pub fn touches_cancelled(&self, touches: &[T]) {
        self.touches_ended(touches);
    }

    fn accepts_touches(&self) -> bool {
        let enabled = self.handlers.user_interaction_enabled();
        if !enabled {
            tracing::trace!("User interaction disabled, ignoring touches");
        }
        enabled
    }

    fn dispatch_drags(&self, phase: Phase, touches: &[(i64, T)]) {
        let frame = self.frame.get();
        let points: Vec<DragPoint> = touches
            .iter()
            .map(|(id, touch)| DragPoint::from_touch(*id, touch, &frame))
            .collect();

        match (phase, points.as_slice()) {
            (_, []) => {}
            (Phase::Start, [one]) => self.handlers.dispatch_one_drag_start(*one),
            (Phase::Move, [one]) => self.handlers.dispatch_one_drag_move(*one),
            (Phase::End, [one]) => self.handlers.dispatch_one_drag_end(*one),
            (Phase::Start, [first, second]) => self.handlers.dispatch_two_drags_start(*first, *second),
            (Phase::Move, [first, second]) => self.handlers.dispatch_two_drags_move(*first, *second),
            (Phase::End, [first, second]) => self.handlers.dispatch_two_drags_end(*first, *second),
            (phase, points) => {
                tracing::debug!("Ignoring {:?} of {} drags", phase, points.len());
            }
        }
    }
}

impl<T: PlatformTouch> View for BaseView<T> {
    fn frame(&self) -> ViewFrame {
        self.frame.get()
    }

    fn drag_start(&self, window_point: Point, local_point: Point, tap_count: u32) {
        let point = DragPoint::new(GESTURE_DRAG_ID, window_point, local_point);
        self.handlers
            .dispatch_one_drag_start(point.with_click_count(tap_count));
    }

    fn drag_moved(&self, window_point: Point, local_point: Point, tap_count: u32) {
        let point = DragPoint::new(GESTURE_DRAG_ID, window_point, local_point);
        self.handlers
            .dispatch_one_drag_move(point.with_click_count(tap_count));
    }

    fn drag_ended(&self, window_point: Point, local_point: Point, tap_count: u32) {
        let point = DragPoint::new(GESTURE_DRAG_ID, window_point, local_point);
        self.handlers
            .dispatch_one_drag_end(point.with_click_count(tap_count));
    }

    fn magnify(&self, scale_change: f64, center: Point) {
        self.handlers.dispatch_magnify(scale_change, center);
    }

    fn layout(&self, size: Size) {
        self.handlers
            .dispatch_layout(size.width as i64, size.height as i64);
    }
}

impl<T: PlatformTouch> std::fmt::Debug for BaseView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseView")
            .field("frame", &self.frame.get())
            .field("mode", &self.mode)
            .field("handlers", &self.handlers)
            .finish()
    }
}
