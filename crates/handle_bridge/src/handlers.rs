//! Handler lists
//!
//! Views keep one [`HandlerList`] per kind of event. Adding and removing is
//! marshaled onto the main thread, so a list is never mutated while the main
//! thread is dispatching from it.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BridgeError;
use crate::main_thread::MainThread;
use crate::registration::Registration;

pub struct HandlerList<H: ?Sized> {
    main_thread: MainThread,
    handlers: Arc<Mutex<Vec<Arc<H>>>>,
}

impl<H: ?Sized + Send + Sync + 'static> HandlerList<H> {
    pub fn new(main_thread: MainThread) -> Self {
        Self {
            main_thread,
            handlers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a handler, blocking until the main thread has applied the change.
    ///
    /// The registration only keeps a weak reference, so once deregistered the
    /// list's reference was the last one and the handler is dropped.
    pub fn add(&self, handler: Arc<H>) -> Result<Registration, BridgeError> {
        let handlers = Arc::clone(&self.handlers);
        let added = Arc::clone(&handler);
        self.main_thread
            .run_sync(move || handlers.lock().push(added))?;

        let handlers = Arc::clone(&self.handlers);
        let main_thread = self.main_thread.clone();
        let handler = Arc::downgrade(&handler);
        Ok(Registration::new(move || {
            let handlers = Arc::clone(&handlers);
            let handler = handler.clone();
            let removed = main_thread.run_sync(move || {
                let Some(handler) = handler.upgrade() else {
                    return false;
                };
                let removed = {
                    let mut handlers = handlers.lock();
                    let index = handlers.iter().position(|h| Arc::ptr_eq(h, &handler));
                    index.map(|index| handlers.remove(index))
                };
                // Released with the lock free, a remote drop may deregister others
                removed.is_some()
            });

            match removed {
                Ok(true) => {}
                Ok(false) => tracing::trace!("Handler already deregistered"),
                Err(err) => tracing::error!("Failed to deregister handler: {}", err),
            }
        }))
    }

    /// Handlers registered right now, in registration order.
    pub fn snapshot(&self) -> Vec<Arc<H>> {
        self.handlers.lock().clone()
    }

    /// Call `f` for every handler.
    ///
    /// Iterates over a snapshot, so a handler may deregister itself or others
    /// while being dispatched.
    pub fn dispatch(&self, mut f: impl FnMut(&H)) {
        for handler in self.snapshot() {
            f(&handler);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.lock().is_empty()
    }

    /// Drop every handler. Outstanding registrations become no-ops.
    pub fn clear(&self) {
        let cleared = std::mem::take(&mut *self.handlers.lock());
        drop(cleared);
    }
}

impl<H: ?Sized> std::fmt::Debug for HandlerList<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerList")
            .field("len", &self.handlers.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::HandlerRegistration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    trait Ping: Send + Sync {
        fn ping(&self);
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Ping for Counter {
        fn ping(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_dispatch_reaches_every_handler() {
        let list: HandlerList<dyn Ping> = HandlerList::new(MainThread::current());
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());

        let _ra = list.add(a.clone()).unwrap();
        let _rb = list.add(b.clone()).unwrap();
        list.dispatch(|h| h.ping());

        assert_eq!(a.0.load(Ordering::SeqCst), 1);
        assert_eq!(b.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deregister_twice_is_noop() {
        let list: HandlerList<dyn Ping> = HandlerList::new(MainThread::current());
        let registration = list.add(Arc::new(Counter::default())).unwrap();
        let _other = list.add(Arc::new(Counter::default())).unwrap();
        assert_eq!(list.len(), 2);

        registration.deregister();
        assert_eq!(list.len(), 1);

        registration.deregister();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_removal_is_by_identity() {
        let list: HandlerList<dyn Ping> = HandlerList::new(MainThread::current());
        let shared = Arc::new(Counter::default());

        let first = list.add(shared.clone()).unwrap();
        let _second = list.add(shared.clone()).unwrap();

        // Same handler added twice: each deregister removes one entry
        first.deregister();
        assert_eq!(list.len(), 1);
        list.dispatch(|h| h.ping());
        assert_eq!(shared.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_can_deregister_during_dispatch() {
        let list: HandlerList<dyn Fn() + Send + Sync> = HandlerList::new(MainThread::current());
        let registration = Arc::new(parking_lot::Mutex::new(None::<Registration>));

        let slot = Arc::clone(&registration);
        let handler: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
            if let Some(registration) = slot.lock().take() {
                registration.deregister();
            }
        });
        *registration.lock() = Some(list.add(handler).unwrap());

        list.dispatch(|h| h());
        assert!(list.is_empty());
    }

    /// Deregisters another handler when it is released.
    struct ReleaseChain {
        next: parking_lot::Mutex<Option<Registration>>,
        released: Arc<AtomicUsize>,
    }

    impl Ping for ReleaseChain {
        fn ping(&self) {}
    }

    impl Drop for ReleaseChain {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
            if let Some(next) = self.next.lock().take() {
                next.deregister();
            }
        }
    }

    /// Registers a counter plus a handler that deregisters it when released.
    fn chained(
        list: &HandlerList<dyn Ping>,
        released: &Arc<AtomicUsize>,
    ) -> (Registration, Arc<Counter>) {
        let counter = Arc::new(Counter::default());
        let next = list.add(counter.clone()).unwrap();
        let registration = list
            .add(Arc::new(ReleaseChain {
                next: parking_lot::Mutex::new(Some(next)),
                released: Arc::clone(released),
            }))
            .unwrap();
        (registration, counter)
    }

    #[test]
    fn test_released_handler_can_deregister_another() {
        let list: HandlerList<dyn Ping> = HandlerList::new(MainThread::current());
        let released = Arc::new(AtomicUsize::new(0));
        let (registration, counter) = chained(&list, &released);
        assert_eq!(list.len(), 2);

        registration.deregister();

        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert!(list.is_empty());
        assert_eq!(Arc::strong_count(&counter), 1);
    }

    #[test]
    fn test_clear_releases_outside_the_lock() {
        let list: HandlerList<dyn Ping> = HandlerList::new(MainThread::current());
        let released = Arc::new(AtomicUsize::new(0));
        let (_registration, counter) = chained(&list, &released);

        list.clear();

        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert!(list.is_empty());
        assert_eq!(Arc::strong_count(&counter), 1);
    }

    #[test]
    fn test_background_add_is_applied_on_main() {
        let main = MainThread::current();
        let list = Arc::new(HandlerList::<dyn Ping>::new(main.clone()));

        let background = {
            let list = Arc::clone(&list);
            std::thread::spawn(move || {
                let registration = list.add(Arc::new(Counter::default()))?;
                Ok::<_, BridgeError>((registration, list.len()))
            })
        };

        while !background.is_finished() {
            main.pump_timeout(Duration::from_millis(10));
        }

        let (registration, len_seen_by_worker) = background.join().unwrap().unwrap();
        assert_eq!(len_seen_by_worker, 1);
        assert_eq!(list.len(), 1);

        registration.deregister();
        assert!(list.is_empty());
    }
}
