//! Platform touch sources
//!
//! A platform touch is the live object the OS hands us for one physical contact.
//! Its position changes underneath us between callbacks, and two values refer to
//! the same contact when their identities match, never when their coordinates do.
//!
//! - [`LiveTouch`] - a finger contact, identity is the pointer of its shared state
//! - [`MouseTouch`] - the mouse pointer, every instance shares one identity
//! - [`DeviceTouch`] - either of the above, for views fed by both

use std::cell::Cell;
use std::hash::Hash;
use std::rc::Rc;

use crate::geometry::Point;

/// A live, platform-owned contact point.
pub trait PlatformTouch: Clone {
    /// Identity of the physical contact
    type Key: Eq + Hash + Clone + std::fmt::Debug;

    fn key(&self) -> Self::Key;

    /// Current location in native platform window coordinates
    fn location_in_window(&self) -> Point;

    /// Number of taps / clicks the platform counted for this contact
    fn tap_count(&self) -> u32;

    fn same_contact(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

/// Snapshot of the mutable part of a contact.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ContactState {
    pub window_point: Point,
    pub tap_count: u32,
}

#[derive(Debug)]
struct LiveTouchInner {
    contact_id: u64,
    state: Cell<ContactState>,
}

/// A finger contact updated in place by the platform adapter.
///
/// Clones share state, so a tracker holding a clone sees every position change
/// the adapter applies. Not `Send`: contacts live on the input thread.
#[derive(Debug, Clone)]
pub struct LiveTouch(Rc<LiveTouchInner>);

impl LiveTouch {
    pub fn new(contact_id: u64, window_point: Point) -> Self {
        Self(Rc::new(LiveTouchInner {
            contact_id,
            state: Cell::new(ContactState {
                window_point,
                tap_count: 1,
            }),
        }))
    }

    /// Platform-assigned id of the contact (informational, not the identity)
    pub fn contact_id(&self) -> u64 {
        self.0.contact_id
    }

    pub fn move_to(&self, window_point: Point) {
        let mut state = self.0.state.get();
        state.window_point = window_point;
        self.0.state.set(state);
    }

    pub fn state(&self) -> ContactState {
        self.0.state.get()
    }
}

impl PlatformTouch for LiveTouch {
    type Key = usize;

    fn key(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    fn location_in_window(&self) -> Point {
        self.0.state.get().window_point
    }

    fn tap_count(&self) -> u32 {
        self.0.state.get().tap_count
    }
}

/// The mouse pointer seen as a touch.
///
/// There is at most one pointer, so all mouse touches are the same contact.
#[derive(Debug, Clone, Default)]
pub struct MouseTouch(Rc<Cell<ContactState>>);

impl MouseTouch {
    pub fn new(window_point: Point, click_count: u32) -> Self {
        Self(Rc::new(Cell::new(ContactState {
            window_point,
            tap_count: click_count,
        })))
    }

    pub fn move_to(&self, window_point: Point) {
        let mut state = self.0.get();
        state.window_point = window_point;
        self.0.set(state);
    }
}

impl PlatformTouch for MouseTouch {
    type Key = ();

    fn key(&self) {}

    fn location_in_window(&self) -> Point {
        self.0.get().window_point
    }

    fn tap_count(&self) -> u32 {
        self.0.get().tap_count
    }
}

/// Identity of a [`DeviceTouch`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceKey {
    Finger(usize),
    Mouse,
}

/// A contact coming from either a touch screen or the mouse.
#[derive(Debug, Clone)]
pub enum DeviceTouch {
    Finger(LiveTouch),
    Mouse(MouseTouch),
}

impl PlatformTouch for DeviceTouch {
    type Key = DeviceKey;

    fn key(&self) -> DeviceKey {
        match self {
            DeviceTouch::Finger(touch) => DeviceKey::Finger(touch.key()),
            DeviceTouch::Mouse(_) => DeviceKey::Mouse,
        }
    }

    fn location_in_window(&self) -> Point {
        match self {
            DeviceTouch::Finger(touch) => touch.location_in_window(),
            DeviceTouch::Mouse(touch) => touch.location_in_window(),
        }
    }

    fn tap_count(&self) -> u32 {
        match self {
            DeviceTouch::Finger(touch) => touch.tap_count(),
            DeviceTouch::Mouse(touch) => touch.tap_count(),
        }
    }
}

impl From<LiveTouch> for DeviceTouch {
    fn from(touch: LiveTouch) -> Self {
        DeviceTouch::Finger(touch)
    }
}

impl From<MouseTouch> for DeviceTouch {
    fn from(touch: MouseTouch) -> Self {
        DeviceTouch::Mouse(touch)
    }
}
