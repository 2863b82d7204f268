//! Native views bridged to the remote engine
//!
//! A [`BaseView`] receives platform touches on the main thread and dispatches
//! gestures to the handlers in its [`ViewHandlers`]. The handlers usually live
//! in the remote engine, which registers them through the tables in
//! [`exports`].

pub mod base_view;
pub mod button;
pub mod drag_point;
pub mod exports;
pub mod handlers;
pub mod remote;
pub mod view_handlers;

pub use base_view::{BaseView, InputMode, GESTURE_DRAG_ID};
pub use button::Button;
pub use drag_point::DragPoint;
pub use exports::{describe, BridgeTables, ContextPtr, BRIDGE_TABLES};
pub use handlers::{
    ClickHandler, HasClickHandlers, HasLayoutHandlers, HasMagnifyHandlers, HasMultiDragHandlers,
    HasText, LayoutHandler, MagnifyHandler, MultiDragHandler,
};
pub use remote::{ClickHandlerTable, LayoutHandlerTable, MagnifyHandlerTable, MultiDragHandlerTable};
pub use view_handlers::ViewHandlers;
