//! Units of work stored by the scheduler
//!
//! The scheduler is generic over anything implementing [`Task`]. Two forms
//! come with the crate: bare `fn()` pointers for stateless work, and
//! [`InlineTask`], which keeps a closure's captured state inline in a
//! fixed number of machine words so no heap is needed.

use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ptr;

use crate::config::TASK_WORDS;

/// Invoked once with no arguments; consumed by the call.
pub trait Task {
    fn run(self);
}

impl Task for fn() {
    #[inline]
    fn run(self) {
        self()
    }
}

/// A `FnOnce()` closure stored by value in `N` machine words.
///
/// Closures larger than `N` words, or with stricter alignment than a
/// word, are rejected at compile time.
pub struct InlineTask<const N: usize = TASK_WORDS> {
    storage: MaybeUninit<[usize; N]>,
    call: unsafe fn(*mut u8),
    drop: unsafe fn(*mut u8),
    // closures need not be `Sync`
    _marker: PhantomData<*mut ()>,
}

// Only built from `F: Send` closures.
unsafe impl<const N: usize> Send for InlineTask<N> {}

struct Fits<F, const N: usize>(PhantomData<F>);

impl<F, const N: usize> Fits<F, N> {
    const OK: () = assert!(
        mem::size_of::<F>() <= mem::size_of::<[usize; N]>()
            && mem::align_of::<F>() <= mem::align_of::<usize>(),
        "closure does not fit in InlineTask storage"
    );
}

unsafe fn call_closure<F: FnOnce()>(raw: *mut u8) {
    let f = ptr::read(raw as *mut F);
    f()
}

unsafe fn drop_closure<F>(raw: *mut u8) {
    ptr::drop_in_place(raw as *mut F)
}

impl<const N: usize> InlineTask<N> {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        #[allow(clippy::let_unit_value)]
        let () = Fits::<F, N>::OK;

        let mut storage = MaybeUninit::<[usize; N]>::uninit();
        // size and alignment checked above
        unsafe { ptr::write(storage.as_mut_ptr() as *mut F, f) };

        Self {
            storage,
            call: call_closure::<F>,
            drop: drop_closure::<F>,
            _marker: PhantomData,
        }
    }

    /// Wrap a stateless function.
    pub fn from_fn(f: fn()) -> Self {
        Self::new(f)
    }
}

impl<const N: usize> Task for InlineTask<N> {
    fn run(self) {
        let mut this = ManuallyDrop::new(self);
        // the closure is moved out by `call`, so `drop` must not run
        unsafe { (this.call)(this.storage.as_mut_ptr() as *mut u8) }
    }
}

impl<const N: usize> Drop for InlineTask<N> {
    fn drop(&mut self) {
        unsafe { (self.drop)(self.storage.as_mut_ptr() as *mut u8) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn function_pointer_runs() {
        static HITS: AtomicUsize = AtomicUsize::new(0);
        fn bump() {
            HITS.fetch_add(1, Ordering::SeqCst);
        }

        let task: fn() = bump;
        task.run();
        InlineTask::<1>::from_fn(bump).run();
        assert_eq!(HITS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn captured_state_is_moved_into_the_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let step = 5;
        let task: InlineTask = {
            let counter = counter.clone();
            InlineTask::new(move || {
                counter.fetch_add(step, Ordering::SeqCst);
            })
        };

        assert_eq!(Arc::strong_count(&counter), 2);
        task.run();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
        // closure (and its Arc) consumed by the call
        assert_eq!(Arc::strong_count(&counter), 1);
    }

    #[test]
    fn unrun_task_drops_its_captures() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task: InlineTask = {
            let counter = counter.clone();
            InlineTask::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        };
        drop(task);
        assert_eq!(Arc::strong_count(&counter), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
