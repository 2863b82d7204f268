//! Remote-owned objects
//!
//! The remote engine hands us objects as a raw pointer plus a `#[repr(C)]`
//! table of function pointers. [`RemoteOwned`] wraps that pair and calls the
//! table's `drop` entry exactly once, when the wrapper itself is dropped.

use std::ffi::c_void;

/// Release entry point every remote method table carries.
pub type DropFn = unsafe extern "C" fn(raw: *mut c_void);

/// A `#[repr(C)]` method table for a remote-owned type.
///
/// # Safety
///
/// `drop_fn` must return a function that releases objects created alongside
/// this table, and every other entry must be callable with such an object
/// from any thread until it is released.
pub unsafe trait RemoteTable: Copy + Send + Sync + 'static {
    fn drop_fn(&self) -> DropFn;
}

/// Proxy for one remote object.
pub struct RemoteOwned<T: RemoteTable> {
    raw: *mut c_void,
    table: T,
}

// SAFETY: `RemoteTable` requires the remote object to accept calls from any thread
unsafe impl<T: RemoteTable> Send for RemoteOwned<T> {}
unsafe impl<T: RemoteTable> Sync for RemoteOwned<T> {}

impl<T: RemoteTable> RemoteOwned<T> {
    /// Take ownership of a remote object.
    ///
    /// # Safety
    ///
    /// `raw` must be a live object matching `table`, and ownership must not be
    /// claimed by anyone else: the proxy releases it on drop.
    pub unsafe fn from_raw(raw: *mut c_void, table: T) -> Self {
        Self { raw, table }
    }

    /// Pointer to pass back to the table's entries.
    pub fn raw(&self) -> *mut c_void {
        self.raw
    }

    pub fn table(&self) -> &T {
        &self.table
    }
}

impl<T: RemoteTable> Drop for RemoteOwned<T> {
    fn drop(&mut self) {
        tracing::trace!("Releasing remote object {:p}", self.raw);
        // SAFETY: from_raw took sole ownership and this runs once
        unsafe { (self.table.drop_fn())(self.raw) }
    }
}

impl<T: RemoteTable> std::fmt::Debug for RemoteOwned<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteOwned")
            .field("raw", &self.raw)
            .field("table", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[repr(C)]
    #[derive(Clone, Copy)]
    struct CounterTable {
        bump: unsafe extern "C" fn(raw: *mut c_void),
        drop: DropFn,
    }

    unsafe impl RemoteTable for CounterTable {
        fn drop_fn(&self) -> DropFn {
            self.drop
        }
    }

    struct RemoteCounter {
        bumps: Arc<AtomicUsize>,
        drops: Arc<AtomicUsize>,
    }

    unsafe extern "C" fn bump(raw: *mut c_void) {
        let counter = &*(raw as *const RemoteCounter);
        counter.bumps.fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "C" fn release(raw: *mut c_void) {
        let counter = Box::from_raw(raw as *mut RemoteCounter);
        counter.drops.fetch_add(1, Ordering::SeqCst);
    }

    const TABLE: CounterTable = CounterTable { bump, drop: release };

    fn remote_counter() -> (RemoteOwned<CounterTable>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let bumps = Arc::new(AtomicUsize::new(0));
        let drops = Arc::new(AtomicUsize::new(0));
        let raw = Box::into_raw(Box::new(RemoteCounter {
            bumps: Arc::clone(&bumps),
            drops: Arc::clone(&drops),
        }));
        let proxy = unsafe { RemoteOwned::from_raw(raw.cast(), TABLE) };
        (proxy, bumps, drops)
    }

    #[test]
    fn test_calls_forward_to_remote() {
        let (proxy, bumps, _drops) = remote_counter();

        unsafe { (proxy.table().bump)(proxy.raw()) };
        unsafe { (proxy.table().bump)(proxy.raw()) };
        assert_eq!(bumps.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_releases_exactly_once() {
        let (proxy, _bumps, drops) = remote_counter();
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        let shared = Arc::new(proxy);
        let clone = Arc::clone(&shared);
        drop(shared);
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        drop(clone);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }
}
