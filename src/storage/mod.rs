//! Backing storage for the scheduler queues
//!
//! Both queues sit on a [`Storage`]: an ordered sequence that can append
//! at the tail, remove at the head, and walk from the head inserting before
//! any position. Two implementations are provided:
//!
//! - [`Arena`]: `N` slots fixed at compile time, no allocator.
//! - [`Heap`]: the same links on slots that grow through the global
//!   allocator (feature `alloc` on target, always built off-target).
//!
//! A full arena or a refused allocation surfaces as an [`Error`]; the
//! scheduler turns that into a fatal stop.

mod arena;
mod links;
#[cfg(any(feature = "alloc", not(target_arch = "avr")))]
mod heap;

pub use arena::Arena;
#[cfg(any(feature = "alloc", not(target_arch = "avr")))]
pub use heap::Heap;

use crate::error::Error;

/// Ordered sequence with cursor-based insertion.
///
/// Cursors are positions handed out by [`head`](Storage::head),
/// [`next`](Storage::next) and [`insert_before`](Storage::insert_before).
/// A cursor stays valid while its element is stored; once the element is
/// removed, `insert_before` on it fails with [`Error::StaleCursor`].
pub trait Storage<T> {
    type Cursor: Copy;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed slot count, or `None` when bounded only by the allocator.
    fn capacity(&self) -> Option<usize>;

    /// Make sure the next insertion cannot fail. Returns `false` if it
    /// would.
    fn ensure_room(&mut self) -> bool {
        self.capacity().map_or(true, |capacity| self.len() < capacity)
    }

    fn push_back(&mut self, value: T) -> Result<(), Error>;

    fn pop_front(&mut self) -> Option<T>;

    fn head(&self) -> Option<Self::Cursor>;

    fn next(&self, at: Self::Cursor) -> Option<Self::Cursor>;

    fn get(&self, at: Self::Cursor) -> Option<&T>;

    fn get_mut(&mut self, at: Self::Cursor) -> Option<&mut T>;

    /// Insert `value` ahead of `at`; returns the new element's cursor.
    fn insert_before(&mut self, at: Self::Cursor, value: T) -> Result<Self::Cursor, Error>;

    fn front(&self) -> Option<&T> {
        self.head().and_then(|at| self.get(at))
    }

    fn front_mut(&mut self) -> Option<&mut T> {
        match self.head() {
            Some(at) => self.get_mut(at),
            None => None,
        }
    }

    fn iter(&self) -> Iter<'_, T, Self>
    where
        Self: Sized,
    {
        Iter {
            storage: self,
            cursor: self.head(),
            _item: core::marker::PhantomData,
        }
    }
}

/// Head-to-tail iterator over any [`Storage`].
pub struct Iter<'a, T, S: Storage<T>> {
    storage: &'a S,
    cursor: Option<S::Cursor>,
    _item: core::marker::PhantomData<&'a T>,
}

impl<'a, T, S: Storage<T>> Iterator for Iter<'a, T, S> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let at = self.cursor?;
        self.cursor = self.storage.next(at);
        self.storage.get(at)
    }
}
