use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use handle_bridge::{BridgeError, HandlerList, MainThread, Registration};
use touch_input::Point;

use crate::drag_point::DragPoint;
use crate::handlers::{
    HasLayoutHandlers, HasMagnifyHandlers, HasMultiDragHandlers, LayoutHandler, MagnifyHandler,
    MultiDragHandler,
};

/// The handler lists of one view.
///
/// This is the part of a view the remote engine gets a token for. It is
/// `Send + Sync`, the view holding it is not.
pub struct ViewHandlers {
    multi_drag: HandlerList<dyn MultiDragHandler>,
    magnify: HandlerList<dyn MagnifyHandler>,
    layout: HandlerList<dyn LayoutHandler>,
    /// Touches are ignored until someone wants drags
    user_interaction_enabled: AtomicBool,
}

impl ViewHandlers {
    pub fn new(main_thread: MainThread) -> Self {
        Self {
            multi_drag: HandlerList::new(main_thread.clone()),
            magnify: HandlerList::new(main_thread.clone()),
            layout: HandlerList::new(main_thread),
            user_interaction_enabled: AtomicBool::new(false),
        }
    }

    pub fn user_interaction_enabled(&self) -> bool {
        self.user_interaction_enabled.load(Ordering::Acquire)
    }

    pub fn set_user_interaction_enabled(&self, enabled: bool) {
        self.user_interaction_enabled.store(enabled, Ordering::Release);
    }

    pub fn multi_drag(&self) -> &HandlerList<dyn MultiDragHandler> {
        &self.multi_drag
    }

    pub fn magnify(&self) -> &HandlerList<dyn MagnifyHandler> {
        &self.magnify
    }

    pub fn layout(&self) -> &HandlerList<dyn LayoutHandler> {
        &self.layout
    }

    /// Registered handlers of every kind
    pub fn handler_count(&self) -> usize {
        self.multi_drag.len() + self.magnify.len() + self.layout.len()
    }

    pub fn dispatch_one_drag_start(&self, point: DragPoint) {
        self.multi_drag.dispatch(|h| h.on_one_drag_start(point));
    }

    pub fn dispatch_one_drag_move(&self, point: DragPoint) {
        self.multi_drag.dispatch(|h| h.on_one_drag_move(point));
    }

    pub fn dispatch_one_drag_end(&self, point: DragPoint) {
        self.multi_drag.dispatch(|h| h.on_one_drag_end(point));
    }

    pub fn dispatch_two_drags_start(&self, first: DragPoint, second: DragPoint) {
        self.multi_drag.dispatch(|h| h.on_two_drags_start(first, second));
    }

    pub fn dispatch_two_drags_move(&self, first: DragPoint, second: DragPoint) {
        self.multi_drag.dispatch(|h| h.on_two_drags_move(first, second));
    }

    pub fn dispatch_two_drags_end(&self, first: DragPoint, second: DragPoint) {
        self.multi_drag.dispatch(|h| h.on_two_drags_end(first, second));
    }

    pub fn dispatch_magnify(&self, scale_change: f64, center: Point) {
        self.magnify.dispatch(|h| h.on_magnify(scale_change, center));
    }

    pub fn dispatch_layout(&self, width: i64, height: i64) {
        self.layout.dispatch(|h| h.on_layout(width, height));
    }
}

impl HasMultiDragHandlers for ViewHandlers {
    fn add_multi_drag_handler(
        &self,
        handler: Arc<dyn MultiDragHandler>,
    ) -> Result<Registration, BridgeError> {
        let registration = self.multi_drag.add(handler)?;
        self.set_user_interaction_enabled(true);
        Ok(registration)
    }
}

impl HasMagnifyHandlers for ViewHandlers {
    fn add_magnify_handler(&self, handler: Arc<dyn MagnifyHandler>) -> Result<Registration, BridgeError> {
        self.magnify.add(handler)
    }
}

impl HasLayoutHandlers for ViewHandlers {
    fn add_layout_handler(&self, handler: Arc<dyn LayoutHandler>) -> Result<Registration, BridgeError> {
        self.layout.add(handler)
    }
}

impl std::fmt::Debug for ViewHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewHandlers")
            .field("multi_drag", &self.multi_drag.len())
            .field("magnify", &self.magnify.len())
            .field("layout", &self.layout.len())
            .field("user_interaction_enabled", &self.user_interaction_enabled())
            .finish()
    }
}
