//! Handler registrations

/// Capability returned when a handler is added. Its only operation is to
/// remove that handler again.
pub trait HandlerRegistration: Send + Sync {
    /// Remove the handler. Removing one that is already gone does nothing.
    fn deregister(&self);
}

/// Registration backed by a removal closure.
pub struct Registration {
    deregister: Box<dyn Fn() + Send + Sync>,
}

impl Registration {
    pub fn new(deregister: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            deregister: Box::new(deregister),
        }
    }

    /// A registration with nothing to remove.
    pub fn noop() -> Self {
        Self::new(|| {})
    }
}

impl HandlerRegistration for Registration {
    fn deregister(&self) {
        (self.deregister)();
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").finish_non_exhaustive()
    }
}
