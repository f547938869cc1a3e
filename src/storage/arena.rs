use crate::error::Error;

use super::links::{Links, Node};
use super::Storage;

/// Doubly-linked list threaded through `N` fixed slots.
///
/// Slots never used yet are handed out from `watermark`, released ones
/// are recycled first. Every operation except insertion-by-walking is O(1)
/// and nothing is allocated after construction, which is `const` so an
/// arena can sit in a `static`.
pub struct Arena<T, const N: usize> {
    nodes: [Node<T>; N],
    links: Links,
    watermark: usize,
}

impl<T, const N: usize> Arena<T, N> {
    pub const fn new() -> Self {
        Self {
            nodes: [Node::VACANT; N],
            links: Links::new(),
            watermark: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.links.len() == N
    }

    fn alloc(&mut self, value: T) -> Result<usize, Error> {
        let idx = match self.links.reuse(&self.nodes) {
            Some(idx) => idx,
            None if self.watermark < N => {
                self.watermark += 1;
                self.watermark - 1
            }
            None => {
                warn!("arena full ({} slots)", N);
                return Err(Error::CapacityExhausted);
            }
        };
        self.links.occupy(&mut self.nodes, idx, value);
        Ok(idx)
    }
}

impl<T, const N: usize> Default for Arena<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Storage<T> for Arena<T, N> {
    type Cursor = usize;

    fn len(&self) -> usize {
        self.links.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(N)
    }

    fn push_back(&mut self, value: T) -> Result<(), Error> {
        let idx = self.alloc(value)?;
        self.links.link_back(&mut self.nodes, idx);
        Ok(())
    }

    fn pop_front(&mut self) -> Option<T> {
        self.links.unlink_front(&mut self.nodes)
    }

    fn head(&self) -> Option<usize> {
        self.links.head()
    }

    fn next(&self, at: usize) -> Option<usize> {
        Links::next(&self.nodes, at)
    }

    fn get(&self, at: usize) -> Option<&T> {
        Links::get(&self.nodes, at)
    }

    fn get_mut(&mut self, at: usize) -> Option<&mut T> {
        Links::get_mut(&mut self.nodes, at)
    }

    fn insert_before(&mut self, at: usize, value: T) -> Result<usize, Error> {
        if !Links::occupied(&self.nodes, at) {
            return Err(Error::StaleCursor);
        }
        let idx = self.alloc(value)?;
        self.links.link_before(&mut self.nodes, at, idx);
        Ok(idx)
    }
}
