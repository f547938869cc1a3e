//! Interrupt-masking critical sections
//!
//! An [`AtomicGuard`] clears the global interrupt-enable flag (the `I` bit
//! of `SREG`) when it is created and puts it back when it is dropped, on
//! every exit path. What "puts back" means is chosen at compile time by the
//! guard's [`ExitPolicy`]:
//!
//! - [`Restore`] writes back the value seen on entry, so guards nest.
//! - [`ForceOn`] / [`ForceOff`] write a fixed value regardless of entry state.
//!
//! Both edges carry a compiler fence so memory accesses inside the region
//! cannot be hoisted out of it.
//!
//! Off-target there is no `SREG`. The flag is kept per thread and the
//! guard additionally holds the `critical-section` lock, so other threads
//! (which stand in for ISRs) are excluded for the guard's lifetime.

use core::cell::{RefCell, RefMut};
use core::marker::PhantomData;
use core::sync::atomic::{compiler_fence, Ordering};

use critical_section::Mutex;

pub use critical_section::CriticalSection;

#[cfg(target_arch = "avr")]
mod host {
    use avr_device::atmega128a::CPU;

    const SREG_I: u8 = 0x80;

    /// Clearing `I` is all the exclusion a single core needs.
    pub type Held = ();

    #[inline(always)]
    pub fn enter() -> (bool, Held) {
        let sreg = unsafe { (*CPU::ptr()).sreg.read().bits() };
        avr_device::interrupt::disable();
        (sreg & SREG_I != 0, ())
    }

    #[inline(always)]
    pub fn exit(enabled: bool, _held: Held) {
        if enabled {
            unsafe { avr_device::interrupt::enable() };
        } else {
            avr_device::interrupt::disable();
        }
    }

    #[inline(always)]
    pub fn is_enabled() -> bool {
        unsafe { (*CPU::ptr()).sreg.read().bits() & SREG_I != 0 }
    }
}

#[cfg(not(target_arch = "avr"))]
mod host {
    use core::cell::Cell;

    use critical_section::RestoreState;

    std::thread_local! {
        static ENABLED: Cell<bool> = Cell::new(true);
    }

    pub type Held = RestoreState;

    pub fn enter() -> (bool, Held) {
        let held = unsafe { critical_section::acquire() };
        (ENABLED.with(|flag| flag.replace(false)), held)
    }

    pub fn exit(enabled: bool, held: Held) {
        ENABLED.with(|flag| flag.set(enabled));
        unsafe { critical_section::release(held) };
    }

    pub fn is_enabled() -> bool {
        ENABLED.with(|flag| flag.get())
    }

    #[cfg(test)]
    pub fn write(enabled: bool) {
        ENABLED.with(|flag| flag.set(enabled));
    }
}

/// Current state of the global interrupt-enable flag.
#[inline]
pub fn interrupts_enabled() -> bool {
    host::is_enabled()
}

/// What an [`AtomicGuard`] writes to the interrupt flag when it ends.
pub trait ExitPolicy {
    /// Flag value to write, given the value captured on entry.
    fn exit_state(saved: bool) -> bool;
}

/// Write back the flag captured on entry.
pub struct Restore;

/// Enable interrupts unconditionally on exit.
pub struct ForceOn;

/// Leave interrupts disabled on exit.
pub struct ForceOff;

impl ExitPolicy for Restore {
    #[inline(always)]
    fn exit_state(saved: bool) -> bool {
        saved
    }
}

impl ExitPolicy for ForceOn {
    #[inline(always)]
    fn exit_state(_saved: bool) -> bool {
        true
    }
}

impl ExitPolicy for ForceOff {
    #[inline(always)]
    fn exit_state(_saved: bool) -> bool {
        false
    }
}

/// Scoped interrupt suspension.
pub struct AtomicGuard<P: ExitPolicy = Restore> {
    saved: bool,
    held: host::Held,
    _policy: PhantomData<P>,
    // the flag belongs to the core that cleared it
    _not_send: PhantomData<*const ()>,
}

impl<P: ExitPolicy> AtomicGuard<P> {
    #[inline(always)]
    pub fn enter() -> Self {
        let (saved, held) = host::enter();
        compiler_fence(Ordering::SeqCst);
        Self {
            saved,
            held,
            _policy: PhantomData,
            _not_send: PhantomData,
        }
    }

    /// Whether interrupts were enabled when this guard was taken.
    #[inline]
    pub fn was_enabled(&self) -> bool {
        self.saved
    }

    /// Token for [`Shared`] and other `critical-section` users, valid
    /// while the guard lives.
    #[inline(always)]
    pub fn token(&self) -> CriticalSection<'_> {
        unsafe { CriticalSection::new() }
    }
}

impl<P: ExitPolicy> Drop for AtomicGuard<P> {
    #[inline(always)]
    fn drop(&mut self) {
        compiler_fence(Ordering::SeqCst);
        host::exit(P::exit_state(self.saved), self.held);
    }
}

/// Run `f` with interrupts disabled, restoring the previous flag after.
#[inline(always)]
pub fn atomic<R>(f: impl FnOnce(CriticalSection<'_>) -> R) -> R {
    atomic_with::<Restore, R>(f)
}

/// Run `f` with interrupts disabled under an explicit exit policy.
#[inline(always)]
pub fn atomic_with<P: ExitPolicy, R>(f: impl FnOnce(CriticalSection<'_>) -> R) -> R {
    let guard = AtomicGuard::<P>::enter();
    f(guard.token())
}

/// Data shared between interrupt handlers and the main line.
///
/// A `critical_section::Mutex<RefCell<T>>`: access is only granted against
/// a [`CriticalSection`], which makes the borrow atomic with respect to
/// every ISR on a single-core MCU.
pub struct Shared<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> Shared<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Mutable access for the lifetime of the critical section.
    ///
    /// Panics if the value is already borrowed, which only happens when a
    /// caller re-enters through the same token.
    pub fn borrow_mut<'cs>(&'cs self, cs: CriticalSection<'cs>) -> RefMut<'cs, T> {
        self.inner.borrow(cs).borrow_mut()
    }

    /// Take a critical section and run `f` on the shared value.
    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        atomic(|cs| f(&mut self.borrow_mut(cs)))
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner().into_inner()
    }
}
