//! Touch shell
//!
//! Hosts a native view and a button, exports both to a demo remote engine over
//! the handle bridge and feeds them input from a winit window or a recorded
//! touch script.

pub mod appdata;
pub mod args;
pub mod logging;
pub mod remote;
pub mod replay;
pub mod router;
pub mod settings;
pub mod shell;

pub use remote::DemoRemote;
pub use replay::{ReplayReport, Script, ScriptError, Step};
pub use router::{ClickCounter, TouchRouter};
pub use settings::{SettingsError, ShellSettings};
pub use shell::Shell;

pub const SHELL_NAME: &str = env!("CARGO_PKG_NAME");
pub const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SHELL_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
