//! Application Handler Module
//!
//! `ShellApp` owns the window and the shell scene. The shell is built when the
//! window is, on the event loop thread, which makes that thread the bridge's
//! main thread. Jobs the remote engine queued for it are pumped whenever the
//! loop is about to wait.

use std::sync::Arc;

use touch_shell::{Shell, ShellSettings};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::window::events;
use crate::window::input::conversion::to_logical_size;

pub struct ShellApp {
    pub(crate) settings: ShellSettings,
    pub(crate) window: Option<Arc<Window>>,
    pub(crate) shell: Option<Shell>,
    pub(crate) scale_factor: f64,
    live_handles: Option<usize>,
}

impl ShellApp {
    pub fn new(settings: ShellSettings) -> Self {
        Self {
            settings,
            window: None,
            shell: None,
            scale_factor: 1.0,
            live_handles: None,
        }
    }

    /// Handles left alive once the shell shut down, `None` while it runs.
    pub fn live_handles(&self) -> Option<usize> {
        self.live_handles
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) {
        let config = &self.settings.window;
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(true);

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.scale_factor = window.scale_factor();
        let size = to_logical_size(window.inner_size(), self.scale_factor);
        tracing::debug!(
            "Window created: {}x{} logical at scale {}",
            size.width,
            size.height,
            self.scale_factor
        );

        self.shell = Some(Shell::new(&self.settings.input, size));
        self.window = Some(window);
    }

    pub(crate) fn shutdown(&mut self) {
        if let Some(shell) = self.shell.take() {
            self.live_handles = Some(shell.shutdown());
        }
        self.window = None;
    }
}

impl ApplicationHandler for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.create_window(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }
        events::dispatch_window_event(self, event_loop, event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(shell) = &self.shell {
            let ran = shell.pump();
            if ran > 0 {
                tracing::trace!("Ran {} main thread jobs", ran);
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
