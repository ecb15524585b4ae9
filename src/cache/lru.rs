//! Eviction List Module
//!
//! Recency-ordered doubly linked list used for LRU eviction.
//!
//! Nodes live in a `Vec` arena and link to each other by slot index, so every
//! operation is O(1) without unsafe pointers. Freed slots are recycled through
//! a free list threaded through the `next` links.

/// Null link marker.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node<T> {
    /// None while the slot sits on the free list
    item: Option<T>,
    prev: usize,
    next: usize,
}

// == Eviction List ==
/// Tracks recency order for LRU eviction.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Slot handles returned by [`push_front`](Self::push_front) stay valid until the
/// item is removed; after that the slot may be reused.
#[derive(Debug)]
pub struct EvictionList<T> {
    nodes: Vec<Node<T>>,
    head: usize,
    tail: usize,
    free_head: usize,
    len: usize,
}

impl<T> EvictionList<T> {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: NIL,
            tail: NIL,
            free_head: NIL,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item as the most recently used and returns its slot.
    pub fn push_front(&mut self, item: T) -> usize {
        let slot = self.alloc(item);
        self.link_front(slot);
        self.len += 1;
        slot
    }

    // == Move To Front ==
    /// Marks the item in `slot` as most recently used.
    pub fn move_to_front(&mut self, slot: usize) {
        if slot == self.head || !self.is_occupied(slot) {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    // == Remove ==
    /// Unlinks the item in `slot` and returns it, freeing the slot.
    pub fn remove(&mut self, slot: usize) -> Option<T> {
        if !self.is_occupied(slot) {
            return None;
        }
        self.unlink(slot);
        let node = &mut self.nodes[slot];
        let item = node.item.take();
        node.next = self.free_head;
        self.free_head = slot;
        self.len -= 1;
        item
    }

    // == Back ==
    /// Returns the slot of the least recently used item.
    pub fn back(&self) -> Option<usize> {
        (self.tail != NIL).then_some(self.tail)
    }

    // == Get ==
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.nodes.get(slot).and_then(|node| node.item.as_ref())
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.nodes.get_mut(slot).and_then(|node| node.item.as_mut())
    }

    // == Length ==
    /// Returns the number of linked items.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iterate ==
    /// Iterates items from least to most recently used.
    pub fn iter_oldest_first(&self) -> OldestFirst<'_, T> {
        OldestFirst {
            nodes: &self.nodes,
            current: self.tail,
        }
    }

    fn is_occupied(&self, slot: usize) -> bool {
        self.nodes.get(slot).is_some_and(|node| node.item.is_some())
    }

    fn alloc(&mut self, item: T) -> usize {
        if self.free_head != NIL {
            let slot = self.free_head;
            let node = &mut self.nodes[slot];
            self.free_head = node.next;
            node.item = Some(item);
            node.prev = NIL;
            node.next = NIL;
            slot
        } else {
            self.nodes.push(Node {
                item: Some(item),
                prev: NIL,
                next: NIL,
            });
            self.nodes.len() - 1
        }
    }

    fn link_front(&mut self, slot: usize) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);

        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = NIL;
    }
}

impl<T> Default for EvictionList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator from back (oldest) to front (newest).
pub struct OldestFirst<'a, T> {
    nodes: &'a [Node<T>],
    current: usize,
}

impl<'a, T> Iterator for OldestFirst<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.current)?;
        self.current = node.prev;
        node.item.as_ref()
    }
}
