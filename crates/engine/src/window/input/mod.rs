//! Input handling module
//!
//! Adapters turning winit touch and mouse events into router contacts.

pub mod conversion;
pub mod mouse;
pub mod touch;

pub use mouse::{handle_cursor_moved, handle_mouse_input};
pub use touch::handle_touch;
