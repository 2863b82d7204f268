use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use handle_bridge::{BridgeContext, OpaqueToken};
use native_view::{
    BaseView, Button, ClickHandlerTable, DragPoint, HasText, InputMode, LayoutHandlerTable,
    MagnifyHandlerTable, MultiDragHandlerTable, ViewHandlers, BRIDGE_TABLES,
};
use parking_lot::Mutex;
use touch_input::{LiveTouch, Point, Size, ViewFrame};

/// Stands in for an object living in the remote engine.
#[derive(Default)]
struct RemoteRecorder {
    events: Mutex<Vec<String>>,
    released: AtomicUsize,
}

impl RemoteRecorder {
    /// A new remote reference, released by `release`.
    fn raw(self: &Arc<Self>) -> *mut c_void {
        Arc::into_raw(Arc::clone(self)) as *mut c_void
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock())
    }
}

unsafe fn record(raw: *mut c_void, event: String) {
    let recorder = &*(raw as *const RemoteRecorder);
    recorder.events.lock().push(event);
}

fn describe(point: DragPoint) -> String {
    format!("{} ({},{})", point.drag_id, point.global.x, point.global.y)
}

unsafe extern "C" fn one_start(raw: *mut c_void, point: DragPoint) {
    record(raw, format!("one start {}", describe(point)));
}

unsafe extern "C" fn one_move(raw: *mut c_void, point: DragPoint) {
    record(raw, format!("one move {}", describe(point)));
}

unsafe extern "C" fn one_end(raw: *mut c_void, point: DragPoint) {
    record(raw, format!("one end {}", describe(point)));
}

unsafe extern "C" fn two_start(raw: *mut c_void, first: DragPoint, second: DragPoint) {
    record(raw, format!("two start {} {}", describe(first), describe(second)));
}

unsafe extern "C" fn two_move(raw: *mut c_void, first: DragPoint, second: DragPoint) {
    record(raw, format!("two move {} {}", describe(first), describe(second)));
}

unsafe extern "C" fn two_end(raw: *mut c_void, first: DragPoint, second: DragPoint) {
    record(raw, format!("two end {} {}", describe(first), describe(second)));
}

unsafe extern "C" fn magnify(raw: *mut c_void, scale_change: f64, center: Point) {
    record(raw, format!("magnify {} ({},{})", scale_change, center.x, center.y));
}

unsafe extern "C" fn layout(raw: *mut c_void, width: i64, height: i64) {
    record(raw, format!("layout {}x{}", width, height));
}

unsafe extern "C" fn click(raw: *mut c_void) {
    record(raw, String::from("click"));
}

unsafe extern "C" fn release(raw: *mut c_void) {
    let recorder = Arc::from_raw(raw as *const RemoteRecorder);
    recorder.released.fetch_add(1, Ordering::SeqCst);
}

const DRAG_TABLE: MultiDragHandlerTable = MultiDragHandlerTable {
    on_one_drag_start: one_start,
    on_one_drag_move: one_move,
    on_one_drag_end: one_end,
    on_two_drags_start: two_start,
    on_two_drags_move: two_move,
    on_two_drags_end: two_end,
    drop: release,
};

const MAGNIFY_TABLE: MagnifyHandlerTable = MagnifyHandlerTable {
    on_magnify: magnify,
    drop: release,
};

const LAYOUT_TABLE: LayoutHandlerTable = LayoutHandlerTable {
    on_layout: layout,
    drop: release,
};

const CLICK_TABLE: ClickHandlerTable = ClickHandlerTable {
    on_click: click,
    drop: release,
};

struct Host {
    ctx: Arc<BridgeContext>,
    view: BaseView<LiveTouch>,
    view_token: OpaqueToken,
}

fn host(mode: InputMode) -> Host {
    let ctx = Arc::new(BridgeContext::new("bridge_tables"));
    let handlers = Arc::new(ViewHandlers::new(ctx.main_thread().clone()));
    let view_token = ctx.export(Arc::clone(&handlers));
    let view = BaseView::new(handlers, ViewFrame::fullscreen(Size::new(800.0, 600.0)), mode);
    Host {
        ctx,
        view,
        view_token,
    }
}

#[test]
fn test_gesture_scenario_reaches_remote_handlers() {
    let host = host(InputMode::Gestures);
    let ctx = host.ctx.as_raw();
    let remote = Arc::new(RemoteRecorder::default());
    let tables = BRIDGE_TABLES;

    let drag = unsafe { (tables.view.add_multi_drag_handler)(ctx, host.view_token, remote.raw(), DRAG_TABLE) };
    let zoom = unsafe { (tables.view.add_magnify_handler)(ctx, host.view_token, remote.raw(), MAGNIFY_TABLE) };
    assert!(!drag.is_none() && !zoom.is_none());

    let a = LiveTouch::new(1, Point::new(100.0, 100.0));
    let b = LiveTouch::new(2, Point::new(200.0, 100.0));
    host.view.touches_began(&[a.clone(), b.clone()]);
    a.move_to(Point::new(110.0, 110.0));
    b.move_to(Point::new(210.0, 110.0));
    host.view.touches_moved(&[a.clone(), b.clone()]);
    a.move_to(Point::new(100.0, 100.0));
    host.view.touches_ended(&[a]);

    assert_eq!(
        remote.take(),
        vec![
            "one start 0 (150,100)",
            "magnify 0 (160,110)",
            "one end 0 (155,105)",
            "one start 0 (210,110)",
        ]
    );

    unsafe {
        (tables.registration.deregister)(ctx, drag);
        (tables.registration.deregister)(ctx, zoom);
    }
    assert_eq!(remote.released.load(Ordering::SeqCst), 2);
    assert_eq!(host.view.handlers().handler_count(), 0);

    unsafe {
        (tables.registration.drop)(ctx, drag);
        (tables.registration.drop)(ctx, zoom);
        (tables.view.drop)(ctx, host.view_token);
    }
    assert_eq!(unsafe { (tables.ctx.live_handles)(ctx) }, 0);
    assert_eq!(Arc::strong_count(&remote), 1);
}

#[test]
fn test_multi_drag_ids_through_tables() {
    let host = host(InputMode::MultiDrag);
    let ctx = host.ctx.as_raw();
    let remote = Arc::new(RemoteRecorder::default());

    let registration = unsafe {
        (BRIDGE_TABLES.view.add_multi_drag_handler)(ctx, host.view_token, remote.raw(), DRAG_TABLE)
    };

    let a = LiveTouch::new(1, Point::new(1.0, 2.0));
    let b = LiveTouch::new(2, Point::new(3.0, 4.0));
    host.view.touches_began(&[a.clone(), b.clone()]);
    host.view.touches_ended(&[b]);
    a.move_to(Point::new(5.0, 6.0));
    host.view.touches_moved(&[a]);

    assert_eq!(
        remote.take(),
        vec![
            "two start 0 (1,2) 1 (3,4)",
            "one end 1 (3,4)",
            "one move 0 (5,6)",
        ]
    );

    unsafe { (BRIDGE_TABLES.registration.drop)(ctx, registration) };
}

#[test]
fn test_layout_handler_sees_resize() {
    let host = host(InputMode::Gestures);
    let ctx = host.ctx.as_raw();
    let remote = Arc::new(RemoteRecorder::default());

    let registration = unsafe {
        (BRIDGE_TABLES.view.add_layout_handler)(ctx, host.view_token, remote.raw(), LAYOUT_TABLE)
    };
    host.view.set_size(Size::new(640.0, 480.0));

    assert_eq!(remote.take(), vec!["layout 640x480"]);
    unsafe { (BRIDGE_TABLES.registration.drop)(ctx, registration) };
}

#[test]
fn test_button_text_round_trip() {
    let ctx = Arc::new(BridgeContext::new("button"));
    let button = Arc::new(Button::new(ctx.main_thread().clone(), "Play"));
    let token = ctx.export(Arc::clone(&button));
    let raw_ctx = ctx.as_raw();

    let read = |ctx: *const BridgeContext| unsafe {
        let string = (BRIDGE_TABLES.button.get_text)(ctx, token);
        let ptr = (BRIDGE_TABLES.string.ptr)(ctx, string);
        let len = (BRIDGE_TABLES.string.len)(ctx, string);
        let text = String::from_utf8(std::slice::from_raw_parts(ptr, len).to_vec()).unwrap();
        (BRIDGE_TABLES.string.drop)(ctx, string);
        text
    };

    assert_eq!(read(raw_ctx), "Play");

    let new_text = "Resume";
    unsafe { (BRIDGE_TABLES.button.set_text)(raw_ctx, token, new_text.as_ptr(), new_text.len()) };
    assert_eq!(button.text(), "Play");

    ctx.main_thread().pump();
    assert_eq!(read(raw_ctx), "Resume");

    unsafe { (BRIDGE_TABLES.button.drop)(raw_ctx, token) };
    assert_eq!(ctx.live_handles(), 0);
}

#[test]
fn test_dropping_registration_token_keeps_handler() {
    let ctx = Arc::new(BridgeContext::new("click"));
    let button = Arc::new(Button::new(ctx.main_thread().clone(), "Go"));
    let token = ctx.export(Arc::clone(&button));
    let raw_ctx = ctx.as_raw();
    let remote = Arc::new(RemoteRecorder::default());

    let registration = unsafe { (BRIDGE_TABLES.button.add_click_handler)(raw_ctx, token, remote.raw(), CLICK_TABLE) };
    unsafe { (BRIDGE_TABLES.registration.drop)(raw_ctx, registration) };

    button.click();
    assert_eq!(remote.take(), vec!["click"]);
    assert_eq!(remote.released.load(Ordering::SeqCst), 0);

    // The handler goes away with the button
    unsafe { (BRIDGE_TABLES.button.drop)(raw_ctx, token) };
    drop(button);
    assert_eq!(remote.released.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_registration_releases_remote_handler() {
    let host = host(InputMode::Gestures);
    let ctx = host.ctx.as_raw();
    let remote = Arc::new(RemoteRecorder::default());

    let bogus = OpaqueToken::from_raw(9999);
    let registration = unsafe { (BRIDGE_TABLES.view.add_layout_handler)(ctx, bogus, remote.raw(), LAYOUT_TABLE) };

    assert!(registration.is_none());
    assert_eq!(remote.released.load(Ordering::SeqCst), 1);
    assert_eq!(Arc::strong_count(&remote), 1);
}

#[test]
fn test_wrong_token_type_is_not_dropped() {
    let host = host(InputMode::Gestures);
    let ctx = host.ctx.as_raw();

    // A view token passed to String.drop stays alive
    unsafe { (BRIDGE_TABLES.string.drop)(ctx, host.view_token) };
    assert_eq!(host.ctx.live_handles(), 1);

    unsafe { (BRIDGE_TABLES.view.drop)(ctx, host.view_token) };
    assert_eq!(host.ctx.live_handles(), 0);
}
