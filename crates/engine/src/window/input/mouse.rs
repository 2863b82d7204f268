//! Mouse input handling
//!
//! The left button drives a synthetic touch; other buttons are ignored.

use std::time::Instant;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton};

use crate::window::input::conversion::to_logical_point;
use crate::window::ShellApp;

pub fn handle_cursor_moved(app: &mut ShellApp, position: PhysicalPosition<f64>) {
    let scale_factor = app.scale_factor;
    if let Some(shell) = app.shell.as_mut() {
        shell.router().cursor_moved(to_logical_point(position, scale_factor));
    }
}

pub fn handle_mouse_input(app: &mut ShellApp, state: ElementState, button: MouseButton) {
    if button != MouseButton::Left {
        tracing::trace!("Ignoring {:?} mouse button", button);
        return;
    }
    let Some(shell) = app.shell.as_mut() else {
        return;
    };

    match state {
        ElementState::Pressed => shell.router().mouse_pressed(Instant::now()),
        ElementState::Released => shell.router().mouse_released(),
    }
}
