//! Recency List Module
//!
//! Arena-backed doubly-linked list ordering entries by recency of use.

// == Slot ==
#[derive(Debug)]
struct Slot<T> {
    item: Option<T>,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Orders items from most recently used (front) to least recently used (back).
///
/// Nodes live in a `Vec` of slots and link to each other by slot index.
/// Handles returned by [`push_front`](Self::push_front) stay valid until the
/// item is removed; freed slots are reused by later inserts.
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    /// Indices of vacant slots
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Length ==
    /// Returns the number of linked items.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Front / Back ==
    /// Handle of the most recently used item.
    pub fn front(&self) -> Option<usize> {
        self.head
    }

    /// Handle of the least recently used item.
    pub fn back(&self) -> Option<usize> {
        self.tail
    }

    pub fn get(&self, handle: usize) -> Option<&T> {
        self.slots.get(handle).and_then(|slot| slot.item.as_ref())
    }

    pub fn get_mut(&mut self, handle: usize) -> Option<&mut T> {
        self.slots.get_mut(handle).and_then(|slot| slot.item.as_mut())
    }

    // == Push Front ==
    /// Links `item` at the front and returns its handle.
    pub fn push_front(&mut self, item: T) -> usize {
        let slot = Slot {
            item: Some(item),
            prev: None,
            next: None,
        };
        let handle = match self.free.pop() {
            Some(handle) => {
                self.slots[handle] = slot;
                handle
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.link_front(handle);
        self.len += 1;
        handle
    }

    // == Move To Front ==
    /// Marks the item at `handle` as most recently used.
    ///
    /// Does nothing if the handle is vacant or already at the front.
    pub fn move_to_front(&mut self, handle: usize) {
        if self.get(handle).is_none() || self.head == Some(handle) {
            return;
        }
        self.unlink(handle);
        self.link_front(handle);
    }

    // == Remove ==
    /// Unlinks the item at `handle` and frees its slot.
    pub fn remove(&mut self, handle: usize) -> Option<T> {
        self.get(handle)?;
        self.unlink(handle);
        let item = self.slots[handle].item.take();
        self.free.push(handle);
        self.len -= 1;
        item
    }

    // == Pop Back ==
    /// Removes and returns the least recently used item.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Clear ==
    /// Drops every item and releases all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates items from front (most recent) to back (least recent).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Number of allocated slots, vacant ones included.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn link_front(&mut self, handle: usize) {
        let old_head = self.head;
        {
            let slot = &mut self.slots[handle];
            slot.prev = None;
            slot.next = old_head;
        }
        match old_head {
            Some(old) => self.slots[old].prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
    }

    fn unlink(&mut self, handle: usize) {
        let (prev, next) = {
            let slot = &mut self.slots[handle];
            (slot.prev.take(), slot.next.take())
        };
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let list = self.list;
        let slot = &list.slots[handle];
        self.cursor = slot.next;
        slot.item.as_ref()
    }
}
