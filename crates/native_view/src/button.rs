use std::sync::Arc;

use handle_bridge::{BridgeError, HandlerList, MainThread, Registration};
use parking_lot::Mutex;

use crate::handlers::{ClickHandler, HasClickHandlers, HasText};

/// A text button.
///
/// Text updates from the remote engine are applied on the main thread at its
/// next pump, never synchronously.
pub struct Button {
    main_thread: MainThread,
    text: Arc<Mutex<String>>,
    click_handlers: HandlerList<dyn ClickHandler>,
}

impl Button {
    pub fn new(main_thread: MainThread, text: impl Into<String>) -> Self {
        Self {
            click_handlers: HandlerList::new(main_thread.clone()),
            main_thread,
            text: Arc::new(Mutex::new(text.into())),
        }
    }

    /// The button was tapped or clicked.
    pub fn click(&self) {
        tracing::debug!("Button '{}' clicked", self.text.lock());
        self.click_handlers.dispatch(|h| h.on_click());
    }

    pub fn click_handler_count(&self) -> usize {
        self.click_handlers.len()
    }
}

impl HasText for Button {
    fn text(&self) -> String {
        self.text.lock().clone()
    }

    fn set_text(&self, text: String) {
        let target = Arc::clone(&self.text);
        self.main_thread.run_async(move || {
            *target.lock() = text;
        });
    }
}

impl HasClickHandlers for Button {
    fn add_click_handler(&self, handler: Arc<dyn ClickHandler>) -> Result<Registration, BridgeError> {
        self.click_handlers.add(handler)
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("text", &*self.text.lock())
            .field("click_handlers", &self.click_handlers.len())
            .finish()
    }
}
