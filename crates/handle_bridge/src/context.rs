//! Bridge context
//!
//! Everything one bridge instance needs is reachable from a [`BridgeContext`].
//! The context is passed explicitly to every exported entry point, so several
//! independent bridges (one per test, one per remote engine) can coexist in a
//! process.

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::error::BridgeError;
use crate::main_thread::MainThread;
use crate::table::HandleTable;
use crate::token::OpaqueToken;

type AnyHandle = dyn Any + Send + Sync;

pub struct BridgeContext {
    name: String,
    handles: HandleTable<AnyHandle>,
    main_thread: MainThread,
}

impl BridgeContext {
    /// Create a context owned by the calling thread.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_main_thread(name, MainThread::current())
    }

    pub fn with_main_thread(name: impl Into<String>, main_thread: MainThread) -> Self {
        Self {
            name: name.into(),
            handles: HandleTable::new(),
            main_thread,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn main_thread(&self) -> &MainThread {
        &self.main_thread
    }

    /// Make a local object visible to the remote side.
    ///
    /// The context keeps a strong reference until the remote side calls
    /// [`BridgeContext::drop_handle`] with the returned token.
    pub fn export<T: Any + Send + Sync>(&self, value: Arc<T>) -> OpaqueToken {
        let token = self.handles.export(value);
        tracing::trace!("[{}] exported {} as {}", self.name, type_name::<T>(), token);
        token
    }

    /// Look up an exported object by token.
    pub fn resolve<T: Any + Send + Sync>(&self, token: OpaqueToken) -> Result<Arc<T>, BridgeError> {
        let handle = self
            .handles
            .get(token)
            .ok_or(BridgeError::UnknownToken(token))?;

        handle.downcast::<T>().map_err(|_| BridgeError::TypeMismatch {
            token,
            expected: type_name::<T>(),
        })
    }

    /// The remote side is done with `token`.
    ///
    /// Using a token after dropping it is a caller error; it is reported, not
    /// trusted.
    pub fn drop_handle(&self, token: OpaqueToken) -> Result<(), BridgeError> {
        match self.handles.release(token) {
            Some(_) => {
                tracing::trace!("[{}] dropped {}", self.name, token);
                Ok(())
            }
            None => {
                tracing::error!("[{}] drop of unknown handle {}", self.name, token);
                Err(BridgeError::UnknownToken(token))
            }
        }
    }

    /// Number of exported handles the remote side still holds.
    pub fn live_handles(&self) -> usize {
        self.handles.len()
    }

    /// Release everything the remote side forgot to drop.
    pub fn release_all(&self) -> usize {
        let leaked = self.handles.clear();
        if leaked > 0 {
            tracing::warn!("[{}] released {} leaked handles", self.name, leaked);
        }
        leaked
    }

    /// Pointer form of the context, as passed to exported entry points.
    pub fn as_raw(self: &Arc<Self>) -> *const BridgeContext {
        Arc::as_ptr(self)
    }

    /// Borrow a context from the pointer an entry point received.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or come from [`BridgeContext::as_raw`] on a context
    /// that outlives `'a`.
    pub unsafe fn from_raw<'a>(ptr: *const BridgeContext) -> Result<&'a BridgeContext, BridgeError> {
        ptr.as_ref().ok_or(BridgeError::NullContext)
    }
}

impl std::fmt::Debug for BridgeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeContext")
            .field("name", &self.name)
            .field("handles", &self.handles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label(&'static str);

    #[test]
    fn test_resolve_exported_object() {
        let ctx = BridgeContext::new("test");
        let token = ctx.export(Arc::new(Label("play")));

        let label = ctx.resolve::<Label>(token).unwrap();
        assert_eq!(label.0, "play");
        assert_eq!(ctx.live_handles(), 1);
    }

    #[test]
    fn test_resolve_wrong_type() {
        let ctx = BridgeContext::new("test");
        let token = ctx.export(Arc::new(Label("play")));

        let err = ctx.resolve::<String>(token).unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_drop_releases_strong_reference() {
        let ctx = BridgeContext::new("test");
        let label = Arc::new(Label("quit"));
        let token = ctx.export(Arc::clone(&label));
        assert_eq!(Arc::strong_count(&label), 2);

        ctx.drop_handle(token).unwrap();
        assert_eq!(Arc::strong_count(&label), 1);
        assert!(matches!(
            ctx.resolve::<Label>(token),
            Err(BridgeError::UnknownToken(_))
        ));
    }

    #[test]
    fn test_double_drop_is_reported() {
        let ctx = BridgeContext::new("test");
        let token = ctx.export(Arc::new(Label("x")));

        assert!(ctx.drop_handle(token).is_ok());
        assert!(ctx.drop_handle(token).is_err());
    }

    #[test]
    fn test_contexts_are_independent() {
        let first = BridgeContext::new("first");
        let second = BridgeContext::new("second");

        let token = first.export(Arc::new(Label("a")));
        assert!(second.resolve::<Label>(token).is_err());
        assert_eq!(second.live_handles(), 0);
    }

    #[test]
    fn test_raw_round_trip() {
        let ctx = Arc::new(BridgeContext::new("raw"));
        let ptr = ctx.as_raw();

        let borrowed = unsafe { BridgeContext::from_raw(ptr) }.unwrap();
        assert_eq!(borrowed.name(), "raw");
        assert!(unsafe { BridgeContext::from_raw(std::ptr::null()) }.is_err());
    }
}
