//! Single-slot subject/observer
//!
//! A [`Subject`] lets a producer (usually an interrupt handler or a driver's
//! poll routine) publish an event of a fixed shape `A` to at most one
//! consumer. Registration replaces whatever was there; notification with an
//! empty slot does nothing. There is no queueing and no locking: `notify`
//! calls the observer synchronously in whatever context the producer runs.
//!
//! Events with several arguments use a tuple, e.g. `Subject<'_, (u8, bool)>`.

/// Receiver of a subject's events.
///
/// Observers are invoked through a shared reference because the producer
/// may be an ISR. A registered observer must be `Sync`, so state it updates
/// goes behind atomics or a [`Shared`](crate::atomic::Shared); a subject
/// can then live in a `static` reachable from an interrupt vector.
pub trait Observer<A> {
    fn notify(&self, args: A);
}

impl<A, F> Observer<A> for F
where
    F: Fn(A),
{
    #[inline]
    fn notify(&self, args: A) {
        self(args)
    }
}

enum Slot<'a, A> {
    Empty,
    Function(fn(A)),
    Callable(&'a (dyn Observer<A> + Sync)),
}

impl<'a, A> Clone for Slot<'a, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, A> Copy for Slot<'a, A> {}

/// Zero-or-one observer slot for events of type `A`.
pub struct Subject<'a, A> {
    slot: Slot<'a, A>,
}

impl<'a, A> Subject<'a, A> {
    pub const fn new() -> Self {
        Self { slot: Slot::Empty }
    }

    /// Install a stateful observer, dropping any previous one.
    ///
    /// The subject only borrows the observer; the caller keeps it alive.
    pub fn register(&mut self, observer: &'a (dyn Observer<A> + Sync)) {
        self.slot = Slot::Callable(observer);
    }

    /// Install a plain function as the observer.
    pub fn register_fn(&mut self, observer: fn(A)) {
        self.slot = Slot::Function(observer);
    }

    pub fn unregister(&mut self) {
        self.slot = Slot::Empty;
    }

    pub fn is_registered(&self) -> bool {
        !matches!(self.slot, Slot::Empty)
    }

    /// Deliver `args` to the observer, if any.
    #[inline]
    pub fn notify(&self, args: A) {
        match self.slot {
            Slot::Empty => {}
            Slot::Function(f) => f(args),
            Slot::Callable(observer) => observer.notify(args),
        }
    }
}

impl<'a, A> Default for Subject<'a, A> {
    fn default() -> Self {
        Self::new()
    }
}
