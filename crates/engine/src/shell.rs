//! The shell scene: one fullscreen view with a button in its top-left corner,
//! both exported to the demo remote engine.

use std::sync::Arc;
use std::time::Instant;

use handle_bridge::BridgeContext;
use native_view::{BaseView, Button, ViewHandlers};
use touch_input::{Point, Size, ViewFrame};

use crate::remote::DemoRemote;
use crate::replay::{ScriptContact, Step};
use crate::router::{Contact, TouchRouter};
use crate::settings::InputSettings;

pub const BUTTON_ORIGIN: Point = Point::new(16.0, 16.0);
pub const BUTTON_SIZE: Size = Size::new(120.0, 40.0);

pub struct Shell {
    ctx: Arc<BridgeContext>,
    router: TouchRouter,
    remote: DemoRemote,
}

impl Shell {
    /// Build the scene on the current thread, which becomes the main thread.
    pub fn new(input: &InputSettings, size: Size) -> Self {
        let ctx = Arc::new(BridgeContext::new("touch_shell"));
        let main_thread = ctx.main_thread().clone();

        let handlers = Arc::new(ViewHandlers::new(main_thread.clone()));
        let frame = ViewFrame::fullscreen(size).with_window_origin(input.window_origin);
        let view = BaseView::with_estimator(
            Arc::clone(&handlers),
            frame,
            input.mode,
            input.zoom_estimator,
        );
        let button = Arc::new(Button::new(main_thread, "Tap me"));

        let view_token = ctx.export(handlers);
        let button_token = ctx.export(Arc::clone(&button));
        let remote = DemoRemote::attach(&ctx, view_token, button_token);

        let button_frame = ViewFrame::fullscreen(BUTTON_SIZE).with_origin(BUTTON_ORIGIN);
        let mut router = TouchRouter::new(view).with_button(button, button_frame);
        // First layout pass, handlers are in place now
        router.resize(size);

        tracing::info!(
            "Shell ready: {}x{} view in {:?} mode, {:?} zoom, {:?} window origin",
            size.width,
            size.height,
            input.mode,
            input.zoom_estimator,
            input.window_origin
        );

        Self {
            ctx,
            router,
            remote,
        }
    }

    pub fn router(&mut self) -> &mut TouchRouter {
        &mut self.router
    }

    pub fn remote(&self) -> &DemoRemote {
        &self.remote
    }

    pub fn context(&self) -> &Arc<BridgeContext> {
        &self.ctx
    }

    /// Run jobs other threads (and the remote engine) queued for the main thread.
    pub fn pump(&self) -> usize {
        self.ctx.main_thread().pump()
    }

    /// Feed one scripted step through the router.
    pub fn apply(&mut self, step: &Step, now: Instant) {
        match step {
            Step::Began(contacts) => self.router.touches_began(&to_contacts(contacts)),
            Step::Moved(contacts) => self.router.touches_moved(&to_contacts(contacts)),
            Step::Ended(contacts) => self.router.touches_ended(&to_contacts(contacts)),
            Step::Cancelled(contacts) => self.router.touches_cancelled(&to_contacts(contacts)),
            Step::Resize(size) => self.router.resize(*size),
            Step::MouseDown(point) => {
                self.router.cursor_moved(*point);
                self.router.mouse_pressed(now);
            }
            Step::MouseMove(point) => self.router.cursor_moved(*point),
            Step::MouseUp(point) => {
                self.router.cursor_moved(*point);
                self.router.mouse_released();
            }
        }
    }

    /// Detach the remote engine and return the number of handles left alive.
    pub fn shutdown(self) -> usize {
        self.pump();
        let live = self.remote.detach();
        if live != 0 {
            tracing::error!("{} bridge handles leaked at shutdown", live);
        }
        live
    }
}

fn to_contacts(contacts: &[ScriptContact]) -> Vec<Contact> {
    contacts.iter().map(|contact| contact.to_contact()).collect()
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("ctx", &self.ctx)
            .field("router", &self.router)
            .field("remote", &self.remote)
            .finish()
    }
}
