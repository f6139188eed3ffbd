//! Recency List Module
//!
//! Arena-backed doubly-linked list that orders cache keys by recency.
//!
//! Nodes live in a slot vector and link to each other by [`SlotId`] instead of
//! by pointer. Freed slots are recycled, so ids stay stable for as long as the
//! node they name is live. Every splice is O(1).

// == Slot Id ==
/// Stable handle to a node in a [`RecencyList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node<T> {
    key: String,
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// - Front (head) = most recently used
/// - Back (tail) = least recently used
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a list with room for `capacity` nodes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a new node at the most recently used end.
    pub fn push_front(&mut self, key: String, value: T) -> SlotId {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                SlotId(idx)
            }
            None => {
                self.slots.push(Some(node));
                SlotId(self.slots.len() - 1)
            }
        };
        self.len += 1;
        self.link_front(id);
        id
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    ///
    /// Returns false if `id` does not name a live node.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.unlink(id);
        self.link_front(id);
        true
    }

    // == Remove ==
    /// Unlinks a node and frees its slot, returning its key and value.
    pub fn remove(&mut self, id: SlotId) -> Option<(String, T)> {
        self.node(id)?;
        self.unlink(id);
        let node = self.slots[id.0].take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some((node.key, node.value))
    }

    // == Pop Back ==
    /// Removes and returns the least recently used node.
    pub fn pop_back(&mut self) -> Option<(String, T)> {
        let tail = self.tail?;
        self.remove(tail)
    }

    /// Least recently used node, without removing it.
    pub fn back(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn front(&self) -> Option<SlotId> {
        self.head
    }

    // == Accessors ==
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .map(|node| &mut node.value)
    }

    pub fn key(&self, id: SlotId) -> Option<&str> {
        self.node(id).map(|node| node.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Linking ==
    fn node(&self, id: SlotId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, id: SlotId) -> &mut Node<T> {
        match self.slots.get_mut(id.0).and_then(|slot| slot.as_mut()) {
            Some(node) => node,
            None => unreachable!("slot {} is linked but empty", id.0),
        }
    }

    fn link_front(&mut self, id: SlotId) {
        let old_head = self.head;
        {
            let node = self.node_mut(id);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => self.node_mut(head).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn unlink(&mut self, id: SlotId) {
        let (prev, next) = {
            let node = self.node_mut(id);
            (node.prev.take(), node.next.take())
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    /// Walks the chain and panics if the links are inconsistent.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self.node(id).expect("linked slot must be live");
            assert_eq!(node.prev, prev, "broken back link at slot {}", id.0);
            prev = Some(id);
            cursor = node.next;
            seen += 1;
            assert!(seen <= self.len, "cycle in recency list");
        }
        assert_eq!(prev, self.tail, "walk must end at tail");
        assert_eq!(seen, self.len, "walk must visit every node");
        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(live, self.len);
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterator ==
/// Iterator over `(key, value)` from most to least recently used.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a str, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some((node.key.as_str(), &node.value))
    }
}
