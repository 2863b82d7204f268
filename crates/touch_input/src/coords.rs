//! Coordinate Space Conversion
//!
//! Platforms disagree about where the window origin is: UIKit and winit put it
//! in the top-left corner with y growing downward, AppKit and SpriteKit scenes
//! put it in the bottom-left corner with y growing upward.
//!
//! The engine on the other side of the bridge only understands one convention:
//!
//! ```text
//!  (0,0) ───────────▶ x
//!    │
//!    │     window / view
//!    ▼
//!    y
//! ```
//!
//! Every y-flip in the workspace goes through [`ViewFrame::normalize_window_point`].
//! View-local points are then just the normalized window point minus the
//! view's origin, see [`ViewFrame::to_local`].

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};

/// Where a platform puts the origin of its window coordinate space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// y grows downward (UIKit, winit, the engine)
    #[default]
    TopLeft,
    /// y grows upward (AppKit, SpriteKit scenes)
    BottomLeft,
}

/// Placement of a view inside its window, plus the window's native convention.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ViewFrame {
    /// Top-left corner of the view, in engine (top-left) window coordinates
    pub origin: Point,
    /// Size of the view
    pub size: Size,
    /// Height of the window the view lives in
    pub window_height: f64,
    /// Native origin of the platform window coordinates
    pub window_origin: Origin,
}

impl ViewFrame {
    /// A view filling a top-left-origin window of the given size.
    pub fn fullscreen(size: Size) -> Self {
        Self {
            origin: Point::default(),
            size,
            window_height: size.height,
            window_origin: Origin::TopLeft,
        }
    }

    pub fn with_window_origin(mut self, window_origin: Origin) -> Self {
        self.window_origin = window_origin;
        self
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Convert a point reported by the platform into engine window coordinates.
    pub fn normalize_window_point(&self, native: Point) -> Point {
        match self.window_origin {
            Origin::TopLeft => native,
            Origin::BottomLeft => Point::new(native.x, self.window_height - native.y),
        }
    }

    /// Convert an engine window point into view-local engine coordinates.
    pub fn to_local(&self, window_point: Point) -> Point {
        window_point - self.origin
    }

    /// Whether an engine window point falls inside the view.
    pub fn contains(&self, window_point: Point) -> bool {
        let local = self.to_local(window_point);
        local.x >= 0.0 && local.y >= 0.0 && local.x < self.size.width && local.y < self.size.height
    }

    /// Resize the view; a fullscreen view keeps the window height in sync.
    pub fn resized(mut self, size: Size) -> Self {
        if self.origin == Point::default() && self.window_height == self.size.height {
            self.window_height = size.height;
        }
        self.size = size;
        self
    }
}
