use alloc::vec::Vec;

use crate::error::Error;

use super::links::{Links, Node};
use super::Storage;

/// Linked list whose slots grow on the global allocator.
///
/// Same index links as [`Arena`](super::Arena), but a full slot table is
/// extended instead of refused. Growth goes through `try_reserve`, so an
/// exhausted heap is reported as [`Error::OutOfMemory`] instead of
/// aborting inside the allocator. Slots are never moved once handed out.
pub struct Heap<T> {
    nodes: Vec<Node<T>>,
    links: Links,
}

impl<T> Heap<T> {
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: Links::new(),
        }
    }

    fn reserve(&mut self) -> Result<(), Error> {
        if self.links.has_free() {
            return Ok(());
        }
        self.nodes.try_reserve(1).map_err(|_| {
            warn!("heap reservation failed at {} entries", self.nodes.len());
            Error::OutOfMemory
        })
    }

    fn alloc(&mut self, value: T) -> Result<usize, Error> {
        self.reserve()?;
        let idx = match self.links.reuse(&self.nodes) {
            Some(idx) => idx,
            None => {
                self.nodes.push(Node::VACANT);
                self.nodes.len() - 1
            }
        };
        self.links.occupy(&mut self.nodes, idx, value);
        Ok(idx)
    }
}

impl<T> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Storage<T> for Heap<T> {
    type Cursor = usize;

    fn len(&self) -> usize {
        self.links.len()
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn ensure_room(&mut self) -> bool {
        self.reserve().is_ok()
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[test]
    fn cursor_walk_and_insert() {
        let mut heap = Heap::new();
        for v in [1u8, 3, 4] {
            heap.push_back(v).unwrap();
        }
        let three = heap.next(heap.head().unwrap()).unwrap();
        let two = heap.insert_before(three, 2).unwrap();
        assert_eq!(heap.next(two).and_then(|c| heap.get(c)), Some(&3));
        assert_eq!(heap.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
        assert_eq!(heap.pop_front(), Some(1));
        assert_eq!(heap.capacity(), None);
    }

    #[test]
    fn cursors_survive_insertions_ahead_of_them() {
        let mut heap = Heap::new();
        heap.push_back('c').unwrap();
        let c = heap.head().unwrap();
        heap.insert_before(c, 'a').unwrap();
        let b = heap.insert_before(c, 'b').unwrap();

        assert_eq!(heap.get(c), Some(&'c'));
        assert_eq!(heap.next(b), Some(c));
        assert_eq!(heap.iter().copied().collect::<Vec<_>>(), ['a', 'b', 'c']);
    }

    #[test]
    fn released_slots_are_recycled() {
        let mut heap = Heap::new();
        for v in 0..4u8 {
            heap.push_back(v).unwrap();
        }
        heap.pop_front();
        heap.pop_front();
        heap.push_back(4).unwrap();
        heap.push_back(5).unwrap();

        assert_eq!(heap.nodes.len(), 4);
        assert_eq!(heap.iter().copied().collect::<Vec<_>>(), [2, 3, 4, 5]);
        assert!(heap.ensure_room());
    }
}
