//! Touch input for native views
//!
//! Raw platform contacts go in, a drag / pinch gesture stream comes out:
//!
//! - [`TouchLookup`] hands out drag ids to at most two concurrent contacts
//! - [`TouchTracker`] classifies contacts into drags and pinches on a [`View`]
//! - [`ViewFrame`] owns every conversion between platform and engine coordinates
//!
//! Nothing in here is thread safe; all of it runs on the thread that owns the view.

pub mod coords;
pub mod geometry;
pub mod lookup;
pub mod platform;
pub mod touch;
pub mod tracker;
pub mod view;
pub mod zoom;

pub use coords::{Origin, ViewFrame};
pub use geometry::{Point, Size};
pub use lookup::{TouchLookup, MAX_ACTIVE_TOUCHES};
pub use platform::{DeviceKey, DeviceTouch, LiveTouch, MouseTouch, PlatformTouch};
pub use touch::Touch;
pub use tracker::{GestureState, TouchTracker};
pub use view::View;
pub use zoom::ZoomEstimator;
