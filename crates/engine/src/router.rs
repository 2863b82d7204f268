//! Touch routing
//!
//! Platform adapters (the winit window, the script replayer) report contacts by
//! numeric id. The router keeps one live contact per id, moves it in place as
//! new positions arrive and hands batches of contacts to the view, so the view
//! only ever sees platform touches with stable identities.
//!
//! The mouse is routed the same way while a button is held, as a single
//! synthetic contact. Contacts that start on the button are captured by it and
//! never reach the view; they click it if they also end on it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use native_view::{BaseView, Button};
use touch_input::{DeviceTouch, LiveTouch, MouseTouch, Point, Size, View, ViewFrame};

/// Longest gap between presses that still counts as a repeated click
pub const MULTI_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Furthest the pointer may travel between presses of a repeated click
pub const MULTI_CLICK_DISTANCE: f64 = 4.0;

/// A contact reported by a platform adapter, in native window coordinates.
pub type Contact = (u64, Point);

/// Counts consecutive mouse presses in the same spot.
#[derive(Debug, Default, Clone)]
pub struct ClickCounter {
    last: Option<(Instant, Point)>,
    count: u32,
}

impl ClickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press and return its click count (1 for a single click).
    pub fn press(&mut self, position: Point, now: Instant) -> u32 {
        let repeated = self.last.is_some_and(|(at, last)| {
            now.saturating_duration_since(at) <= MULTI_CLICK_INTERVAL
                && last.distance_to(&position) <= MULTI_CLICK_DISTANCE
        });
        self.count = if repeated { self.count + 1 } else { 1 };
        self.last = Some((now, position));
        self.count
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

struct ButtonTarget {
    button: Arc<Button>,
    /// Engine window coordinates
    frame: ViewFrame,
}

pub struct TouchRouter {
    view: BaseView<DeviceTouch>,
    button: Option<ButtonTarget>,
    fingers: HashMap<u64, LiveTouch>,
    captured: HashSet<u64>,
    cursor: Point,
    mouse: Option<MouseTouch>,
    mouse_captured: bool,
    clicks: ClickCounter,
}

impl TouchRouter {
    pub fn new(view: BaseView<DeviceTouch>) -> Self {
        Self {
            view,
            button: None,
            fingers: HashMap::new(),
            captured: HashSet::new(),
            cursor: Point::default(),
            mouse: None,
            mouse_captured: false,
            clicks: ClickCounter::new(),
        }
    }

    /// Place `button` over the view at `frame` (engine window coordinates).
    pub fn with_button(mut self, button: Arc<Button>, frame: ViewFrame) -> Self {
        self.button = Some(ButtonTarget { button, frame });
        self
    }

    pub fn view(&self) -> &BaseView<DeviceTouch> {
        &self.view
    }

    /// Finger contacts currently routed to the view
    pub fn active_fingers(&self) -> usize {
        self.fingers.len()
    }

    pub fn is_mouse_down(&self) -> bool {
        self.mouse.is_some()
    }

    pub fn resize(&mut self, size: Size) {
        tracing::debug!("View resized to {}x{}", size.width, size.height);
        self.view.set_size(size);
    }

    pub fn touches_began(&mut self, contacts: &[Contact]) {
        let mut batch = Vec::with_capacity(contacts.len());
        for &(id, point) in contacts {
            if self.fingers.contains_key(&id) || self.captured.contains(&id) {
                tracing::warn!("Contact {} began twice, ignoring", id);
                continue;
            }
            if self.hits_button(point) {
                self.captured.insert(id);
                continue;
            }
            let touch = LiveTouch::new(id, point);
            self.fingers.insert(id, touch.clone());
            batch.push(DeviceTouch::Finger(touch));
        }
        if !batch.is_empty() {
            self.view.touches_began(&batch);
        }
    }

    pub fn touches_moved(&mut self, contacts: &[Contact]) {
        let mut batch = Vec::with_capacity(contacts.len());
        for &(id, point) in contacts {
            if let Some(touch) = self.fingers.get(&id) {
                touch.move_to(point);
                batch.push(DeviceTouch::Finger(touch.clone()));
            } else if !self.captured.contains(&id) {
                tracing::debug!("Move for unknown contact {}", id);
            }
        }
        if !batch.is_empty() {
            self.view.touches_moved(&batch);
        }
    }

    pub fn touches_ended(&mut self, contacts: &[Contact]) {
        let batch = self.finish(contacts, true);
        if !batch.is_empty() {
            self.view.touches_ended(&batch);
        }
    }

    pub fn touches_cancelled(&mut self, contacts: &[Contact]) {
        let batch = self.finish(contacts, false);
        if !batch.is_empty() {
            self.view.touches_cancelled(&batch);
        }
    }

    pub fn cursor_moved(&mut self, point: Point) {
        self.cursor = point;
        let Some(mouse) = &self.mouse else {
            return;
        };
        if !self.mouse_captured {
            mouse.move_to(point);
            self.view.touches_moved(&[DeviceTouch::Mouse(mouse.clone())]);
        }
    }

    pub fn mouse_pressed(&mut self, now: Instant) {
        if self.mouse.is_some() {
            return;
        }
        let click_count = self.clicks.press(self.cursor, now);
        let mouse = MouseTouch::new(self.cursor, click_count);
        self.mouse_captured = self.hits_button(self.cursor);
        if !self.mouse_captured {
            self.view.touches_began(&[DeviceTouch::Mouse(mouse.clone())]);
        }
        self.mouse = Some(mouse);
    }

    pub fn mouse_released(&mut self) {
        let Some(mouse) = self.mouse.take() else {
            return;
        };
        if self.mouse_captured {
            self.mouse_captured = false;
            if self.hits_button(self.cursor) {
                self.click_button();
            }
            return;
        }
        mouse.move_to(self.cursor);
        self.view.touches_ended(&[DeviceTouch::Mouse(mouse)]);
    }

    /// Forget finger contacts, returning the ones the view was tracking.
    fn finish(&mut self, contacts: &[Contact], may_click: bool) -> Vec<DeviceTouch> {
        let mut batch = Vec::with_capacity(contacts.len());
        for &(id, point) in contacts {
            if self.captured.remove(&id) {
                if may_click && self.hits_button(point) {
                    self.click_button();
                }
            } else if let Some(touch) = self.fingers.remove(&id) {
                touch.move_to(point);
                batch.push(DeviceTouch::Finger(touch));
            } else {
                tracing::debug!("End for unknown contact {}", id);
            }
        }
        batch
    }

    fn hits_button(&self, native: Point) -> bool {
        let Some(target) = &self.button else {
            return false;
        };
        let point = self.view.frame().normalize_window_point(native);
        target.frame.contains(point)
    }

    fn click_button(&self) {
        if let Some(target) = &self.button {
            target.button.click();
        }
    }
}

impl std::fmt::Debug for TouchRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TouchRouter")
            .field("view", &self.view)
            .field("fingers", &self.fingers.len())
            .field("captured", &self.captured.len())
            .field("mouse_down", &self.mouse.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handle_bridge::{MainThread, Registration};
    use native_view::{
        ClickHandler, DragPoint, HasClickHandlers, HasMagnifyHandlers, HasMultiDragHandlers,
        InputMode, MagnifyHandler, MultiDragHandler, ViewHandlers,
    };
    use parking_lot::Mutex;
    use touch_input::Origin;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Recorder {
        fn push(&self, event: String) {
            self.0.lock().push(event);
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock())
        }
    }

    fn at(point: DragPoint) -> String {
        format!("{} ({},{})", point.drag_id, point.global.x, point.global.y)
    }

    impl MultiDragHandler for Recorder {
        fn on_one_drag_start(&self, point: DragPoint) {
            self.push(format!("start {}", at(point)));
        }
        fn on_one_drag_move(&self, point: DragPoint) {
            self.push(format!("move {}", at(point)));
        }
        fn on_one_drag_end(&self, point: DragPoint) {
            self.push(format!("end {}", at(point)));
        }
        fn on_two_drags_start(&self, first: DragPoint, second: DragPoint) {
            self.push(format!("two start {} {}", at(first), at(second)));
        }
        fn on_two_drags_move(&self, first: DragPoint, second: DragPoint) {
            self.push(format!("two move {} {}", at(first), at(second)));
        }
        fn on_two_drags_end(&self, first: DragPoint, second: DragPoint) {
            self.push(format!("two end {} {}", at(first), at(second)));
        }
    }

    impl MagnifyHandler for Recorder {
        fn on_magnify(&self, scale_change: f64, center: Point) {
            self.push(format!("magnify {} ({},{})", scale_change, center.x, center.y));
        }
    }

    impl ClickHandler for Recorder {
        fn on_click(&self) {
            self.push(String::from("click"));
        }
    }

    struct Fixture {
        router: TouchRouter,
        recorder: Arc<Recorder>,
        _registrations: Vec<Registration>,
    }

    fn fixture(mode: InputMode, window_origin: Origin) -> Fixture {
        let main = MainThread::current();
        let handlers = Arc::new(ViewHandlers::new(main.clone()));
        let button = Arc::new(Button::new(main, "Tap"));
        let recorder = Arc::new(Recorder::default());
        let registrations = vec![
            handlers.add_multi_drag_handler(recorder.clone()).unwrap(),
            handlers.add_magnify_handler(recorder.clone()).unwrap(),
            button.add_click_handler(recorder.clone()).unwrap(),
        ];
        let frame = ViewFrame::fullscreen(Size::new(800.0, 600.0)).with_window_origin(window_origin);
        let button_frame = ViewFrame::fullscreen(Size::new(100.0, 40.0));
        let router = TouchRouter::new(BaseView::new(handlers, frame, mode)).with_button(button, button_frame);
        Fixture {
            router,
            recorder,
            _registrations: registrations,
        }
    }

    #[test]
    fn test_click_counter_repeats_in_place() {
        let mut counter = ClickCounter::new();
        let start = Instant::now();

        assert_eq!(counter.press(Point::new(10.0, 10.0), start), 1);
        assert_eq!(counter.press(Point::new(11.0, 10.0), start + Duration::from_millis(200)), 2);
        assert_eq!(counter.press(Point::new(11.0, 10.0), start + Duration::from_millis(400)), 3);

        // Too far away
        assert_eq!(counter.press(Point::new(50.0, 50.0), start + Duration::from_millis(500)), 1);
        // Too late
        assert_eq!(counter.press(Point::new(50.0, 50.0), start + Duration::from_secs(2)), 1);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_contacts_move_in_place() {
        let mut f = fixture(InputMode::MultiDrag, Origin::TopLeft);

        f.router.touches_began(&[(7, Point::new(200.0, 200.0))]);
        f.router.touches_moved(&[(7, Point::new(210.0, 220.0))]);
        f.router.touches_ended(&[(7, Point::new(215.0, 225.0))]);

        assert_eq!(
            f.recorder.take(),
            vec!["start 0 (200,200)", "move 0 (210,220)", "end 0 (215,225)"]
        );
        assert_eq!(f.router.active_fingers(), 0);
    }

    #[test]
    fn test_duplicate_and_unknown_contacts_are_ignored() {
        let mut f = fixture(InputMode::MultiDrag, Origin::TopLeft);

        f.router.touches_began(&[(1, Point::new(200.0, 200.0))]);
        f.router.touches_began(&[(1, Point::new(300.0, 300.0))]);
        f.router.touches_moved(&[(9, Point::new(1.0, 1.0))]);
        f.router.touches_ended(&[(9, Point::new(1.0, 1.0))]);

        assert_eq!(f.recorder.take(), vec!["start 0 (200,200)"]);
        assert_eq!(f.router.active_fingers(), 1);
    }

    #[test]
    fn test_button_captures_contacts() {
        let mut f = fixture(InputMode::Gestures, Origin::TopLeft);

        f.router.touches_began(&[(1, Point::new(20.0, 20.0)), (2, Point::new(400.0, 300.0))]);
        f.router.touches_moved(&[(1, Point::new(30.0, 30.0))]);
        f.router.touches_ended(&[(1, Point::new(30.0, 30.0))]);

        assert_eq!(f.recorder.take(), vec!["start 0 (400,300)", "click"]);
        assert_eq!(f.router.active_fingers(), 1);
    }

    #[test]
    fn test_capture_released_off_button_does_not_click() {
        let mut f = fixture(InputMode::Gestures, Origin::TopLeft);

        f.router.touches_began(&[(1, Point::new(20.0, 20.0))]);
        f.router.touches_ended(&[(1, Point::new(500.0, 20.0))]);
        f.router.touches_began(&[(2, Point::new(20.0, 20.0))]);
        f.router.touches_cancelled(&[(2, Point::new(20.0, 20.0))]);

        assert!(f.recorder.take().is_empty());
    }

    #[test]
    fn test_button_hit_uses_normalized_points() {
        let mut f = fixture(InputMode::Gestures, Origin::BottomLeft);

        // Native (20, 580) is engine (20, 20) in a bottom-left window
        f.router.touches_began(&[(1, Point::new(20.0, 580.0))]);
        f.router.touches_ended(&[(1, Point::new(20.0, 580.0))]);

        assert_eq!(f.recorder.take(), vec!["click"]);
    }

    #[test]
    fn test_mouse_drag_is_a_single_contact() {
        let mut f = fixture(InputMode::Gestures, Origin::TopLeft);
        let now = Instant::now();

        f.router.cursor_moved(Point::new(300.0, 300.0));
        assert!(f.recorder.take().is_empty());

        f.router.mouse_pressed(now);
        f.router.mouse_pressed(now);
        f.router.cursor_moved(Point::new(310.0, 305.0));
        f.router.mouse_released();
        f.router.mouse_released();

        assert_eq!(
            f.recorder.take(),
            vec!["start 0 (300,300)", "move 0 (310,305)", "end 0 (310,305)"]
        );
        assert!(!f.router.is_mouse_down());
    }

    #[test]
    fn test_mouse_click_on_button() {
        let mut f = fixture(InputMode::Gestures, Origin::TopLeft);

        f.router.cursor_moved(Point::new(50.0, 10.0));
        f.router.mouse_pressed(Instant::now());
        f.router.cursor_moved(Point::new(60.0, 12.0));
        f.router.mouse_released();

        assert_eq!(f.recorder.take(), vec!["click"]);
    }

    #[derive(Default)]
    struct ClickCounts(Mutex<Vec<i64>>);

    impl MultiDragHandler for ClickCounts {
        fn on_one_drag_start(&self, point: DragPoint) {
            self.0.lock().push(point.click_count);
        }
        fn on_one_drag_move(&self, _point: DragPoint) {}
        fn on_one_drag_end(&self, _point: DragPoint) {}
        fn on_two_drags_start(&self, _first: DragPoint, _second: DragPoint) {}
        fn on_two_drags_move(&self, _first: DragPoint, _second: DragPoint) {}
        fn on_two_drags_end(&self, _first: DragPoint, _second: DragPoint) {}
    }

    #[test]
    fn test_double_click_reaches_drag_handler() {
        let mut f = fixture(InputMode::Gestures, Origin::TopLeft);
        let counts = Arc::new(ClickCounts::default());
        let _registration = f
            .router
            .view()
            .handlers()
            .add_multi_drag_handler(counts.clone())
            .unwrap();
        let now = Instant::now();

        f.router.cursor_moved(Point::new(300.0, 300.0));
        f.router.mouse_pressed(now);
        f.router.mouse_released();
        f.router.mouse_pressed(now + Duration::from_millis(120));
        f.router.mouse_released();
        // Too late to repeat
        f.router.mouse_pressed(now + Duration::from_secs(2));
        f.router.mouse_released();

        assert_eq!(*counts.0.lock(), vec![1, 2, 1]);
    }

    #[test]
    fn test_finger_and_mouse_pinch() {
        let mut f = fixture(InputMode::Gestures, Origin::TopLeft);

        f.router.touches_began(&[(1, Point::new(200.0, 200.0))]);
        f.router.cursor_moved(Point::new(300.0, 200.0));
        f.router.mouse_pressed(Instant::now());

        assert_eq!(f.recorder.take(), vec!["start 0 (200,200)", "end 0 (200,200)", "start 0 (250,200)"]);
    }
}
