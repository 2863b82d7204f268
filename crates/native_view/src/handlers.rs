//! Handler and capability traits
//!
//! Handlers are what the remote engine registers to hear about a view. The
//! `Has*` traits are the capabilities a bridged type can expose.

use std::sync::Arc;

use handle_bridge::{BridgeError, Registration};
use touch_input::Point;

use crate::drag_point::DragPoint;

/// Receives drags with their ids, one or two contacts at a time.
pub trait MultiDragHandler: Send + Sync {
    fn on_one_drag_start(&self, point: DragPoint);
    fn on_one_drag_move(&self, point: DragPoint);
    fn on_one_drag_end(&self, point: DragPoint);

    fn on_two_drags_start(&self, first: DragPoint, second: DragPoint);
    fn on_two_drags_move(&self, first: DragPoint, second: DragPoint);
    fn on_two_drags_end(&self, first: DragPoint, second: DragPoint);
}

pub trait MagnifyHandler: Send + Sync {
    /// `scale_change` is additive: `0.0` is no change
    fn on_magnify(&self, scale_change: f64, center: Point);
}

pub trait LayoutHandler: Send + Sync {
    fn on_layout(&self, width: i64, height: i64);
}

pub trait ClickHandler: Send + Sync {
    fn on_click(&self);
}

pub trait HasText {
    fn text(&self) -> String;
    fn set_text(&self, text: String);
}

pub trait HasClickHandlers {
    fn add_click_handler(&self, handler: Arc<dyn ClickHandler>) -> Result<Registration, BridgeError>;
}

pub trait HasMultiDragHandlers {
    fn add_multi_drag_handler(
        &self,
        handler: Arc<dyn MultiDragHandler>,
    ) -> Result<Registration, BridgeError>;
}

pub trait HasMagnifyHandlers {
    fn add_magnify_handler(&self, handler: Arc<dyn MagnifyHandler>) -> Result<Registration, BridgeError>;
}

pub trait HasLayoutHandlers {
    fn add_layout_handler(&self, handler: Arc<dyn LayoutHandler>) -> Result<Registration, BridgeError>;
}
