//! Window event dispatcher
//!
//! Routes Winit window events to the input adapters.

use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;

use crate::window::input;
use crate::window::input::conversion::to_logical_size;
use crate::window::ShellApp;

pub fn dispatch_window_event(app: &mut ShellApp, event_loop: &ActiveEventLoop, event: WindowEvent) {
    match event {
        WindowEvent::CloseRequested => {
            tracing::info!("Window close requested");
            app.shutdown();
            event_loop.exit();
        }
        WindowEvent::Touch(touch) => {
            input::touch::handle_touch(app, touch);
        }
        WindowEvent::CursorMoved { position, .. } => {
            input::mouse::handle_cursor_moved(app, position);
        }
        WindowEvent::MouseInput { state, button, .. } => {
            input::mouse::handle_mouse_input(app, state, button);
        }
        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
            app.scale_factor = scale_factor;
        }
        WindowEvent::Resized(new_size) => {
            let size = to_logical_size(new_size, app.scale_factor);
            if let Some(shell) = app.shell.as_mut() {
                shell.router().resize(size);
            }
        }
        _ => {}
    }
}
