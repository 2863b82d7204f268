//! Main thread marshaling
//!
//! Input dispatch and handler list mutation both happen on the thread that owns
//! the views. Other threads hand their work to that thread through a job queue
//! which the owner drains with [`MainThread::pump`] from its event loop.
//!
//! When the owning thread exits the queue is closed: queued jobs are dropped
//! unrun and later [`MainThread::run_sync`] calls fail with
//! [`BridgeError::MainThreadGone`].

use std::cell::RefCell;
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::BridgeError;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Inner {
    thread_id: ThreadId,
    thread_name: Option<String>,
    /// `None` once the owning thread has exited
    sender: Mutex<Option<flume::Sender<Job>>>,
    receiver: flume::Receiver<Job>,
}

impl Inner {
    /// Stop accepting jobs and drop the ones still queued. Returns how many
    /// were dropped.
    fn close(&self) -> usize {
        // Taken under the lock, so no send can land after the drain below
        if self.sender.lock().take().is_none() {
            return 0;
        }
        self.receiver.drain().count()
    }
}

/// Closes every queue bound to a thread when that thread exits.
#[derive(Default)]
struct OwnedQueues(Vec<Weak<Inner>>);

impl Drop for OwnedQueues {
    fn drop(&mut self) {
        for inner in self.0.drain(..).filter_map(|inner| inner.upgrade()) {
            let dropped = inner.close();
            if dropped > 0 {
                tracing::warn!("Main thread exited with {} jobs still queued", dropped);
            }
        }
    }
}

thread_local! {
    static OWNED_QUEUES: RefCell<OwnedQueues> = RefCell::new(OwnedQueues::default());
}

/// Handle to the thread that owns the views. Cheap to clone.
#[derive(Clone)]
pub struct MainThread {
    inner: Arc<Inner>,
}

impl MainThread {
    /// Bind to the calling thread.
    pub fn current() -> Self {
        let (sender, receiver) = flume::unbounded();
        let current = thread::current();
        let inner = Arc::new(Inner {
            thread_id: current.id(),
            thread_name: current.name().map(str::to_owned),
            sender: Mutex::new(Some(sender)),
            receiver,
        });

        let registered = OWNED_QUEUES.try_with(|owned| {
            let mut owned = owned.borrow_mut();
            owned.0.retain(|inner| inner.strong_count() > 0);
            owned.0.push(Arc::downgrade(&inner));
        });
        if registered.is_err() {
            // Bound while the thread is shutting down, nobody will pump it
            inner.close();
        }

        Self { inner }
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.inner.thread_id
    }

    /// Run `job` on the main thread and wait for its result.
    ///
    /// On the main thread the job runs inline, anywhere else it is queued and
    /// the caller blocks until the main thread pumps it. Fails with
    /// [`BridgeError::MainThreadGone`] if the main thread exits first.
    pub fn run_sync<R, F>(&self, job: F) -> Result<R, BridgeError>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.is_current() {
            return Ok(job());
        }

        let (reply, result) = flume::bounded(1);
        self.enqueue(Box::new(move || {
            let _ = reply.send(job());
        }))?;
        result.recv().map_err(|_| BridgeError::MainThreadGone)
    }

    /// Queue `job` for the main thread without waiting, even when called from
    /// the main thread itself.
    pub fn run_async<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(err) = self.enqueue(Box::new(job)) {
            tracing::error!("Failed to queue main thread job: {}", err);
        }
    }

    /// Run every queued job. Returns how many ran.
    ///
    /// Only the main thread may pump; calls from elsewhere run nothing.
    pub fn pump(&self) -> usize {
        if !self.is_current() {
            tracing::warn!("pump() called off the main thread, ignoring");
            return 0;
        }

        let mut ran = 0;
        while let Ok(job) = self.inner.receiver.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait up to `timeout` for a job, then run everything queued.
    pub fn pump_timeout(&self, timeout: Duration) -> usize {
        if !self.is_current() {
            tracing::warn!("pump_timeout() called off the main thread, ignoring");
            return 0;
        }

        match self.inner.receiver.recv_timeout(timeout) {
            Ok(job) => {
                job();
                1 + self.pump()
            }
            Err(_) => 0,
        }
    }

    /// Jobs waiting to be pumped
    pub fn pending(&self) -> usize {
        self.inner.receiver.len()
    }

    /// Whether the owning thread has exited
    pub fn is_closed(&self) -> bool {
        self.inner.sender.lock().is_none()
    }

    fn enqueue(&self, job: Job) -> Result<(), BridgeError> {
        let sender = self.inner.sender.lock();
        match sender.as_ref() {
            Some(sender) => sender.send(job).map_err(|_| BridgeError::MainThreadGone),
            None => Err(BridgeError::MainThreadGone),
        }
    }
}

impl std::fmt::Debug for MainThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainThread")
            .field("thread_id", &self.inner.thread_id)
            .field("thread_name", &self.inner.thread_name)
            .field("pending", &self.pending())
            .field("closed", &self.is_closed())
            .finish()
    }
}
