//! Capability descriptors
//!
//! Each bridged type exposes one method table per capability it implements,
//! plus exactly one `drop` entry. The descriptors here are the catalogue the
//! remote side reads to know which tables exist.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Capability {
    /// Readable and writable text
    HasText,
    HasClickHandlers,
    HasMultiDragHandlers,
    HasMagnifyHandlers,
    HasLayoutHandlers,
    /// Can be deregistered
    HandlerRegistration,
    /// Released with a single `drop` call
    Drop,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::HasText => "HasText",
            Capability::HasClickHandlers => "HasClickHandlers",
            Capability::HasMultiDragHandlers => "HasMultiDragHandlers",
            Capability::HasMagnifyHandlers => "HasMagnifyHandlers",
            Capability::HasLayoutHandlers => "HasLayoutHandlers",
            Capability::HandlerRegistration => "HandlerRegistration",
            Capability::Drop => "Drop",
        };
        f.write_str(name)
    }
}

/// Which side owns instances of a bridged type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// Created here, handed out as tokens
    Local,
    /// Created by the remote engine, held here as proxies
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub owner: Owner,
    pub capabilities: &'static [Capability],
}

impl TypeDescriptor {
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Every bridged type must be droppable exactly one way.
    pub fn is_well_formed(&self) -> bool {
        self.capabilities
            .iter()
            .filter(|c| **c == Capability::Drop)
            .count()
            == 1
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capabilities: Vec<String> = self.capabilities.iter().map(ToString::to_string).collect();
        write!(f, "{} ({:?}): {}", self.name, self.owner, capabilities.join(", "))
    }
}
