//! Opaque tokens handed across the boundary.

use std::fmt;

/// An integer naming a bridged object without exposing its representation.
///
/// `0` is reserved for "no object", real tokens start at 1.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpaqueToken(u64);

impl OpaqueToken {
    pub const NONE: OpaqueToken = OpaqueToken(0);

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl Default for OpaqueToken {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for OpaqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
