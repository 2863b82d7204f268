//! Demo remote engine
//!
//! Plays the part of the engine on the far side of the bridge. It only ever
//! touches the host through [`BRIDGE_TABLES`], the context pointer and opaque
//! tokens, exactly like a foreign runtime would, and logs every callback it
//! receives.
//!
//! Each registered handler is a new reference to one shared [`RemoteEngine`]
//! object; the bridge releases it through the table's `drop` entry.

use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use handle_bridge::{BridgeContext, OpaqueToken};
use native_view::{
    ClickHandlerTable, ContextPtr, DragPoint, LayoutHandlerTable, MagnifyHandlerTable,
    MultiDragHandlerTable, BRIDGE_TABLES,
};
use parking_lot::Mutex;
use touch_input::Point;

const MULTI_DRAG_TABLE: MultiDragHandlerTable = MultiDragHandlerTable {
    on_one_drag_start: one_drag_start,
    on_one_drag_move: one_drag_move,
    on_one_drag_end: one_drag_end,
    on_two_drags_start: two_drags_start,
    on_two_drags_move: two_drags_move,
    on_two_drags_end: two_drags_end,
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

/// Remote-side state shared by every handler the demo registers.
struct RemoteEngine {
    ctx: ContextPtr,
    button: OpaqueToken,
    events: Mutex<Vec<String>>,
    clicks: AtomicUsize,
    released: AtomicUsize,
}

impl RemoteEngine {
    fn record(&self, event: String) {
        tracing::info!(target: "remote", "{}", event);
        self.events.lock().push(event);
    }

    /// A new reference for the bridge to own.
    fn share(self: &Arc<Self>) -> *mut c_void {
        Arc::into_raw(Arc::clone(self)) as *mut c_void
    }
}

/// # Safety
/// `raw` must come from [`RemoteEngine::share`] and not be released yet.
unsafe fn engine<'a>(raw: *mut c_void) -> &'a RemoteEngine {
    &*(raw as *const RemoteEngine)
}

fn describe(point: DragPoint) -> String {
    let mut text = format!(
        "#{} global ({}, {}) local ({}, {})",
        point.drag_id, point.global.x, point.global.y, point.local.x, point.local.y
    );
    if point.click_count > 1 {
        text.push_str(&format!(" x{}", point.click_count));
    }
    text
}

unsafe extern "C" fn one_drag_start(raw: *mut c_void, point: DragPoint) {
    engine(raw).record(format!("drag start {}", describe(point)));
}

unsafe extern "C" fn one_drag_move(raw: *mut c_void, point: DragPoint) {
    engine(raw).record(format!("drag move {}", describe(point)));
}

unsafe extern "C" fn one_drag_end(raw: *mut c_void, point: DragPoint) {
    engine(raw).record(format!("drag end {}", describe(point)));
}

unsafe extern "C" fn two_drags_start(raw: *mut c_void, first: DragPoint, second: DragPoint) {
    engine(raw).record(format!("two drags start {} {}", describe(first), describe(second)));
}

unsafe extern "C" fn two_drags_move(raw: *mut c_void, first: DragPoint, second: DragPoint) {
    engine(raw).record(format!("two drags move {} {}", describe(first), describe(second)));
}

unsafe extern "C" fn two_drags_end(raw: *mut c_void, first: DragPoint, second: DragPoint) {
    engine(raw).record(format!("two drags end {} {}", describe(first), describe(second)));
}

unsafe extern "C" fn magnify(raw: *mut c_void, scale_change: f64, center: Point) {
    engine(raw).record(format!("magnify {:+.4} at ({}, {})", scale_change, center.x, center.y));
}

unsafe extern "C" fn layout(raw: *mut c_void, width: i64, height: i64) {
    engine(raw).record(format!("layout {}x{}", width, height));
}

unsafe extern "C" fn click(raw: *mut c_void) {
    let engine = engine(raw);
    let clicks = engine.clicks.fetch_add(1, Ordering::SeqCst) + 1;
    engine.record(format!("click {}", clicks));

    let text = format!("Tapped {} times", clicks);
    (BRIDGE_TABLES.button.set_text)(engine.ctx, engine.button, text.as_ptr(), text.len());
}

unsafe extern "C" fn release(raw: *mut c_void) {
    let engine = Arc::from_raw(raw as *const RemoteEngine);
    engine.released.fetch_add(1, Ordering::SeqCst);
}

/// The demo engine attached to one view and one button.
pub struct DemoRemote {
    ctx: Arc<BridgeContext>,
    engine: Arc<RemoteEngine>,
    view: OpaqueToken,
    button: OpaqueToken,
    registrations: Vec<OpaqueToken>,
}

impl DemoRemote {
    /// Take ownership of the `view` and `button` tokens and register a handler
    /// of every kind.
    pub fn attach(ctx: &Arc<BridgeContext>, view: OpaqueToken, button: OpaqueToken) -> Self {
        let raw_ctx = ctx.as_raw();
        let engine = Arc::new(RemoteEngine {
            ctx: raw_ctx,
            button,
            events: Mutex::new(Vec::new()),
            clicks: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        });

        let tables = BRIDGE_TABLES;
        // SAFETY: `ctx` outlives the demo, which keeps its own reference
        let registrations = unsafe {
            vec![
                (tables.view.add_multi_drag_handler)(raw_ctx, view, engine.share(), MULTI_DRAG_TABLE),
                (tables.view.add_magnify_handler)(raw_ctx, view, engine.share(), MAGNIFY_TABLE),
                (tables.view.add_layout_handler)(raw_ctx, view, engine.share(), LAYOUT_TABLE),
                (tables.button.add_click_handler)(raw_ctx, button, engine.share(), CLICK_TABLE),
            ]
        };

        let failed = registrations.iter().filter(|token| token.is_none()).count();
        if failed > 0 {
            tracing::error!("{} remote handler registrations failed", failed);
        }
        tracing::debug!("Remote engine attached to view {} and button {}", view, button);

        Self {
            ctx: Arc::clone(ctx),
            engine,
            view,
            button,
            registrations: registrations.into_iter().filter(|token| !token.is_none()).collect(),
        }
    }

    /// Every callback received so far, oldest first.
    pub fn events(&self) -> Vec<String> {
        self.engine.events.lock().clone()
    }

    pub fn take_events(&self) -> Vec<String> {
        std::mem::take(&mut *self.engine.events.lock())
    }

    pub fn clicks(&self) -> usize {
        self.engine.clicks.load(Ordering::SeqCst)
    }

    /// Handler references the bridge has handed back so far
    pub fn released(&self) -> usize {
        self.engine.released.load(Ordering::SeqCst)
    }

    /// Read the button text the way the remote side does: a string token that
    /// is dropped once copied out.
    pub fn button_text(&self) -> Option<String> {
        let raw_ctx = self.ctx.as_raw();
        let tables = BRIDGE_TABLES;
        // SAFETY: the context is alive and the pointer is only read until the
        // string token is dropped
        unsafe {
            let string = (tables.button.get_text)(raw_ctx, self.button);
            if string.is_none() {
                return None;
            }
            let ptr = (tables.string.ptr)(raw_ctx, string);
            let len = (tables.string.len)(raw_ctx, string);
            let text = if ptr.is_null() {
                String::new()
            } else {
                String::from_utf8_lossy(std::slice::from_raw_parts(ptr, len)).into_owned()
            };
            (tables.string.drop)(raw_ctx, string);
            Some(text)
        }
    }

    /// Deregister every handler and drop every token the demo owns.
    ///
    /// Returns the number of handles still alive in the context afterwards.
    pub fn detach(self) -> usize {
        let raw_ctx = self.ctx.as_raw();
        let tables = BRIDGE_TABLES;
        // SAFETY: the context is alive, every token was handed to us and is
        // dropped exactly once
        unsafe {
            for &registration in &self.registrations {
                (tables.registration.deregister)(raw_ctx, registration);
                (tables.registration.drop)(raw_ctx, registration);
            }
            (tables.view.drop)(raw_ctx, self.view);
            (tables.button.drop)(raw_ctx, self.button);

            let live = (tables.ctx.live_handles)(raw_ctx);
            tracing::info!(
                "Remote engine detached, {} handler references released, {} handles alive",
                self.engine.released.load(Ordering::SeqCst),
                live
            );
            live
        }
    }
}

impl std::fmt::Debug for DemoRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoRemote")
            .field("view", &self.view)
            .field("button", &self.button)
            .field("registrations", &self.registrations.len())
            .field("events", &self.engine.events.lock().len())
            .finish()
    }
}
