//! Touch input handling

use winit::event::{Touch, TouchPhase};

use crate::window::input::conversion::to_logical_point;
use crate::window::ShellApp;

/// Forward one winit touch to the router as a single-contact batch.
pub fn handle_touch(app: &mut ShellApp, touch: Touch) {
    let scale_factor = app.scale_factor;
    let Some(shell) = app.shell.as_mut() else {
        return;
    };

    let contact = [(touch.id, to_logical_point(touch.location, scale_factor))];
    let router = shell.router();
    match touch.phase {
        TouchPhase::Started => router.touches_began(&contact),
        TouchPhase::Moved => router.touches_moved(&contact),
        TouchPhase::Ended => router.touches_ended(&contact),
        TouchPhase::Cancelled => router.touches_cancelled(&contact),
    }
}
