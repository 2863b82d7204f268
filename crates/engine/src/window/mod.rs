//! Window Module
//!
//! Opens one winit window and routes its input into the shell.
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │           ShellApp               │
//! │ (ApplicationHandler for Winit)   │
//! ├──────────────────────────────────┤
//! │ window: Option<Arc<Window>>      │
//! │ shell: Option<Shell>             │
//! └──────────────────────────────────┘
//!              │
//!              └─── Event Flow:
//!                   Winit → input::conversion → TouchRouter → BaseView → remote handlers
//! ```
//!
//! ## Modules
//!
//! - `app` - Application handler and window lifecycle
//! - `events` - Window event dispatcher
//! - `input` - Touch and mouse adapters

pub mod app;
pub mod events;
pub mod input;

pub use app::ShellApp;

use anyhow::{Context, Result};
use touch_shell::ShellSettings;
use winit::event_loop::{ControlFlow, EventLoop};

/// Run the window event loop until the window closes.
pub fn run(settings: ShellSettings) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    // Redraws are never needed, wake only for input
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ShellApp::new(settings);
    event_loop.run_app(&mut app).context("Failed to run event loop")?;

    match app.live_handles() {
        Some(0) | None => Ok(()),
        Some(live) => anyhow::bail!("{} bridge handles still alive at exit", live),
    }
}
