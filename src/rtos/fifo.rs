//! Ready queue: tasks whose delay has run out, in arrival order

use core::marker::PhantomData;

use crate::error::Error;
use crate::storage::{Iter, Storage};

pub struct Fifo<T, S: Storage<T>> {
    storage: S,
    _item: PhantomData<T>,
}

impl<T, S: Storage<T>> Fifo<T, S> {
    pub const fn with_storage(storage: S) -> Self {
        Self {
            storage,
            _item: PhantomData,
        }
    }

    /// Append at the tail.
    #[inline]
    pub fn push(&mut self, task: T) -> Result<(), Error> {
        self.storage.push_back(task)
    }

    /// Whether one more `push` is guaranteed to succeed.
    #[inline]
    pub fn ensure_room(&mut self) -> bool {
        self.storage.ensure_room()
    }

    /// Detach the head, if any.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.storage.pop_front()
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.storage.front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn iter(&self) -> Iter<'_, T, S> {
        self.storage.iter()
    }
}

impl<T, S: Storage<T> + Default> Default for Fifo<T, S> {
    fn default() -> Self {
        Self::with_storage(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Arena;

    #[test]
    fn head_to_tail_order() {
        let mut fifo: Fifo<char, Arena<char, 4>> = Fifo::default();
        assert!(fifo.is_empty());
        assert_eq!(fifo.front(), None);
        assert_eq!(fifo.pop(), None);

        for c in ['a', 'b', 'c'] {
            fifo.push(c).unwrap();
        }
        assert_eq!(fifo.front(), Some(&'a'));
        assert_eq!(fifo.pop(), Some('a'));
        fifo.push('d').unwrap();
        assert!(fifo.iter().copied().eq(['b', 'c', 'd']));
        assert_eq!(fifo.len(), 3);
    }

    #[test]
    fn full_queue_reports_capacity() {
        let mut fifo: Fifo<u8, Arena<u8, 1>> = Fifo::default();
        fifo.push(1).unwrap();
        assert!(!fifo.ensure_room());
        assert_eq!(fifo.push(2), Err(Error::CapacityExhausted));
        assert_eq!(fifo.pop(), Some(1));
        assert!(fifo.ensure_room());
    }
}
