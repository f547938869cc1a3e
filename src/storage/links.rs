//! Index links shared by the arena and heap lists

pub(super) const NIL: usize = usize::MAX;

pub(super) struct Node<T> {
    value: Option<T>,
    prev: usize,
    next: usize,
}

impl<T> Node<T> {
    pub(super) const VACANT: Self = Node {
        value: None,
        prev: NIL,
        next: NIL,
    };
}

/// Doubly-linked list threaded through a slice of nodes by index.
///
/// Released slots form a singly-linked free list through `next`. The owner
/// decides where fresh slots come from; an index stays put while its
/// element is live, which keeps cursors stable across insertions.
pub(super) struct Links {
    head: usize,
    tail: usize,
    free: usize,
    len: usize,
}

impl Links {
    pub(super) const fn new() -> Self {
        Self {
            head: NIL,
            tail: NIL,
            free: NIL,
            len: 0,
        }
    }

    pub(super) fn len(&self) -> usize {
        self.len
    }

    pub(super) fn has_free(&self) -> bool {
        self.free != NIL
    }

    /// Take a released slot, if there is one.
    pub(super) fn reuse<T>(&mut self, nodes: &[Node<T>]) -> Option<usize> {
        if self.free == NIL {
            return None;
        }
        let idx = self.free;
        self.free = nodes[idx].next;
        Some(idx)
    }

    pub(super) fn occupy<T>(&mut self, nodes: &mut [Node<T>], idx: usize, value: T) {
        let node = &mut nodes[idx];
        node.value = Some(value);
        node.prev = NIL;
        node.next = NIL;
        self.len += 1;
    }

    pub(super) fn link_back<T>(&mut self, nodes: &mut [Node<T>], idx: usize) {
        nodes[idx].prev = self.tail;
        if self.tail == NIL {
            self.head = idx;
        } else {
            nodes[self.tail].next = idx;
        }
        self.tail = idx;
    }

    /// Link `idx` in front of the live node `at`.
    pub(super) fn link_before<T>(&mut self, nodes: &mut [Node<T>], at: usize, idx: usize) {
        let prev = nodes[at].prev;
        nodes[idx].prev = prev;
        nodes[idx].next = at;
        nodes[at].prev = idx;
        if prev == NIL {
            self.head = idx;
        } else {
            nodes[prev].next = idx;
        }
    }

    pub(super) fn unlink_front<T>(&mut self, nodes: &mut [Node<T>]) -> Option<T> {
        let idx = self.head;
        if idx == NIL {
            return None;
        }
        let next = nodes[idx].next;
        self.head = next;
        if next == NIL {
            self.tail = NIL;
        } else {
            nodes[next].prev = NIL;
        }

        let node = &mut nodes[idx];
        let value = node.value.take();
        node.prev = NIL;
        node.next = self.free;
        self.free = idx;
        self.len -= 1;
        value
    }

    pub(super) fn head(&self) -> Option<usize> {
        (self.head != NIL).then_some(self.head)
    }

    pub(super) fn next<T>(nodes: &[Node<T>], at: usize) -> Option<usize> {
        let next = nodes.get(at)?.next;
        (next != NIL && Self::occupied(nodes, at)).then_some(next)
    }

    pub(super) fn occupied<T>(nodes: &[Node<T>], at: usize) -> bool {
        nodes.get(at).map_or(false, |n| n.value.is_some())
    }

    pub(super) fn get<T>(nodes: &[Node<T>], at: usize) -> Option<&T> {
        nodes.get(at)?.value.as_ref()
    }

    pub(super) fn get_mut<T>(nodes: &mut [Node<T>], at: usize) -> Option<&mut T> {
        nodes.get_mut(at)?.value.as_mut()
    }
}
