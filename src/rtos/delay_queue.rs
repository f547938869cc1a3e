//! Delay queue keyed by relative delay
//!
//! Each entry stores its delay relative to the entry in front of it, so
//! the head's delay is its own time-to-fire and only the head is touched
//! when time advances. The running sum of delays from the head up to an
//! entry is that entry's absolute time-to-fire.
//!
//! ```text
//!   insert(10, X); insert(3, Y); insert(7, Z)
//!
//!   head -> (3, Y) -> (4, Z) -> (3, X)
//!            t=3       t=7       t=10
//! ```

use core::marker::PhantomData;

use crate::config::Ticks;
use crate::error::Error;
use crate::storage::{Iter, Storage};

/// A task together with its delay relative to the previous entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub delay: Ticks,
    pub task: T,
}

pub struct DelayQueue<T, S: Storage<Entry<T>>> {
    storage: S,
    _item: PhantomData<T>,
}

impl<T, S: Storage<Entry<T>>> DelayQueue<T, S> {
    pub const fn with_storage(storage: S) -> Self {
        Self {
            storage,
            _item: PhantomData,
        }
    }

    /// Queue `task` to fire `delay` ticks from now.
    ///
    /// Ties keep insertion order: the new entry goes behind every entry
    /// firing at the same tick. Nothing is modified if storage is full.
    pub fn insert(&mut self, delay: Ticks, task: T) -> Result<(), Error> {
        // absolute fire time of the entry before the cursor
        let mut elapsed: Ticks = 0;
        let mut cursor = self.storage.head();

        while let Some(at) = cursor {
            let Some(entry) = self.storage.get(at) else {
                break;
            };
            let fires = elapsed + entry.delay;
            if fires > delay {
                let relative = delay - elapsed;
                let new = self.storage.insert_before(
                    at,
                    Entry {
                        delay: relative,
                        task,
                    },
                )?;
                // the displaced entry keeps its absolute fire time
                if let Some(next) = self.storage.next(new) {
                    if let Some(entry) = self.storage.get_mut(next) {
                        entry.delay -= relative;
                    }
                }
                return Ok(());
            }
            elapsed = fires;
            cursor = self.storage.next(at);
        }

        self.storage.push_back(Entry {
            delay: delay - elapsed,
            task,
        })
    }

    /// The soonest-due entry.
    #[inline]
    pub fn top(&self) -> Option<&Entry<T>> {
        self.storage.front()
    }

    /// Remove the head; the next entry's delay is already absolute.
    #[inline]
    pub fn pop(&mut self) -> Option<Entry<T>> {
        self.storage.pop_front()
    }

    /// Remove and return the head's task if it is due now.
    pub fn pop_due(&mut self) -> Option<T> {
        match self.top() {
            Some(entry) if entry.delay == 0 => self.pop().map(|entry| entry.task),
            _ => None,
        }
    }

    /// Move time forward by one tick. Saturates at zero.
    #[inline]
    pub fn advance_one_tick(&mut self) {
        if let Some(head) = self.storage.front_mut() {
            head.delay = head.delay.saturating_sub(1);
        }
    }

    /// Ticks until the head fires.
    #[inline]
    pub fn next_due(&self) -> Option<Ticks> {
        self.top().map(|entry| entry.delay)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Entries from head to tail, with their relative delays.
    pub fn iter(&self) -> Iter<'_, Entry<T>, S> {
        self.storage.iter()
    }
}

impl<T, S: Storage<Entry<T>> + Default> Default for DelayQueue<T, S> {
    fn default() -> Self {
        Self::with_storage(S::default())
    }
}
