//! Touch script replay
//!
//! A script is a JSON file describing a view size and an ordered list of input
//! steps, in native window coordinates:
//!
//! ```json
//! {
//!   "view": { "width": 800, "height": 600 },
//!   "steps": [
//!     { "began": [{ "id": 1, "x": 100, "y": 100 }, { "id": 2, "x": 200, "y": 100 }] },
//!     { "moved": [{ "id": 1, "x": 90, "y": 100 }, { "id": 2, "x": 210, "y": 100 }] },
//!     { "ended": [{ "id": 1, "x": 90, "y": 100 }] },
//!     { "resize": { "width": 1024, "height": 768 } },
//!     { "mouse_down": { "x": 40, "y": 30 } },
//!     { "mouse_up": { "x": 40, "y": 30 } }
//!   ]
//! }
//! ```
//!
//! Replays go through the same [`Shell`] the window uses.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use touch_input::{Point, Size};

use crate::router::Contact;
use crate::settings::InputSettings;
use crate::shell::Shell;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse script {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Step {step}: contact {id} began while already down")]
    DuplicateContact { step: usize, id: u64 },

    #[error("Step {step}: contact {id} is not down")]
    UnknownContact { step: usize, id: u64 },

    #[error("Step {step}: mouse is already down")]
    MouseAlreadyDown { step: usize },

    #[error("Step {step}: mouse is not down")]
    MouseNotDown { step: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptContact {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl ScriptContact {
    pub fn to_contact(&self) -> Contact {
        (self.id, Point::new(self.x, self.y))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Began(Vec<ScriptContact>),
    Moved(Vec<ScriptContact>),
    Ended(Vec<ScriptContact>),
    Cancelled(Vec<ScriptContact>),
    Resize(Size),
    MouseDown(Point),
    MouseMove(Point),
    MouseUp(Point),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub view: Size,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(text).map_err(|source| ScriptError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// Check that contacts and the mouse go down before they move or come up.
    pub fn validate(&self) -> Result<(), ScriptError> {
        let mut down = HashSet::new();
        let mut mouse_down = false;

        for (step, entry) in self.steps.iter().enumerate() {
            match entry {
                Step::Began(contacts) => {
                    for contact in contacts {
                        if !down.insert(contact.id) {
                            return Err(ScriptError::DuplicateContact { step, id: contact.id });
                        }
                    }
                }
                Step::Moved(contacts) => {
                    if let Some(contact) = contacts.iter().find(|c| !down.contains(&c.id)) {
                        return Err(ScriptError::UnknownContact { step, id: contact.id });
                    }
                }
                Step::Ended(contacts) | Step::Cancelled(contacts) => {
                    for contact in contacts {
                        if !down.remove(&contact.id) {
                            return Err(ScriptError::UnknownContact { step, id: contact.id });
                        }
                    }
                }
                Step::MouseDown(_) if mouse_down => return Err(ScriptError::MouseAlreadyDown { step }),
                Step::MouseDown(_) => mouse_down = true,
                Step::MouseUp(_) if !mouse_down => return Err(ScriptError::MouseNotDown { step }),
                Step::MouseUp(_) => mouse_down = false,
                Step::MouseMove(_) | Step::Resize(_) => {}
            }
        }
        Ok(())
    }
}

/// What the remote engine saw during a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub events: Vec<String>,
    pub button_text: Option<String>,
    /// Handles alive after the remote engine detached, 0 unless something leaked
    pub live_handles: usize,
}

/// Drive `script` through a fresh shell on the current thread.
pub fn run(script: &Script, input: &InputSettings) -> ReplayReport {
    let mut shell = Shell::new(input, script.view);

    for (index, step) in script.steps.iter().enumerate() {
        tracing::debug!("Replaying step {}: {:?}", index, step);
        shell.apply(step, Instant::now());
        shell.pump();
    }

    let events = shell.remote().events();
    let button_text = shell.remote().button_text();
    let live_handles = shell.shutdown();
    tracing::info!(
        "Replayed {} steps, remote engine saw {} events",
        script.steps.len(),
        events.len()
    );

    ReplayReport {
        events,
        button_text,
        live_handles,
    }
}
