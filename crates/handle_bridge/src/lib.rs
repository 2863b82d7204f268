//! Opaque handle bridge
//!
//! Objects cross the boundary to the remote engine in two directions:
//!
//! - local objects are exported into a [`BridgeContext`] and handed out as
//!   [`OpaqueToken`]s; the remote side releases them with one `drop` call
//! - remote objects arrive as a pointer plus a method table and are wrapped in
//!   [`RemoteOwned`], which releases them exactly once when it is dropped
//!
//! Handler registration, handler lists and main thread marshaling live here
//! too since every bridged view needs them.

pub mod capability;
pub mod context;
pub mod error;
pub mod handlers;
pub mod main_thread;
pub mod registration;
pub mod remote;
pub mod table;
pub mod token;

pub use capability::{Capability, Owner, TypeDescriptor};
pub use context::BridgeContext;
pub use error::BridgeError;
pub use handlers::HandlerList;
pub use main_thread::MainThread;
pub use registration::{HandlerRegistration, Registration};
pub use remote::{DropFn, RemoteOwned, RemoteTable};
pub use table::HandleTable;
pub use token::OpaqueToken;
