use std::ops::{Index, IndexMut};

use crate::cache::policy::entry::Entry;
use crate::cache::types::EntryId;

struct Node<Key> {
    prev: EntryId,
    next: EntryId,
    entry: Option<Entry<Key>>,
}

/// SegmentArena owns every entry of the segmented cache along with the sentinel of every [`SegmentList`].
/// Entries are addressed by a stable [`EntryId`] which stays valid until the entry is released.
/// Links between the entries are ids, a list is a ring of ids which starts and ends at its sentinel.
pub(crate) struct SegmentArena<Key> {
    nodes: Vec<Node<Key>>,
    vacant: Vec<EntryId>,
}

impl<Key> SegmentArena<Key> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        SegmentArena {
            nodes: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    /// Stores the entry, the entry is not linked into any list yet.
    pub(crate) fn allocate(&mut self, entry: Entry<Key>) -> EntryId {
        self.allocate_node(Some(entry))
    }

    /// Removes the entry from the arena and returns it, the entry must be unlinked from its list.
    pub(crate) fn release(&mut self, id: EntryId) -> Option<Entry<Key>> {
        let node = &mut self.nodes[id];
        debug_assert!(node.prev == id && node.next == id, "released entry must be unlinked");

        let entry = node.entry.take();
        if entry.is_some() {
            self.vacant.push(id);
        }
        entry
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: EntryId) -> Option<&Entry<Key>> {
        self.nodes.get(id).and_then(|node| node.entry.as_ref())
    }

    fn allocate_node(&mut self, entry: Option<Entry<Key>>) -> EntryId {
        if let Some(id) = self.vacant.pop() {
            self.nodes[id] = Node { prev: id, next: id, entry };
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node { prev: id, next: id, entry });
        id
    }
}

impl<Key> Index<EntryId> for SegmentArena<Key> {
    type Output = Entry<Key>;

    /// Panics if `id` refers to a sentinel or a released entry.
    fn index(&self, id: EntryId) -> &Self::Output {
        match self.nodes[id].entry.as_ref() {
            Some(entry) => entry,
            None => panic!("entry id {} does not refer to a live entry", id),
        }
    }
}

impl<Key> IndexMut<EntryId> for SegmentArena<Key> {
    fn index_mut(&mut self, id: EntryId) -> &mut Self::Output {
        match self.nodes[id].entry.as_mut() {
            Some(entry) => entry,
            None => panic!("entry id {} does not refer to a live entry", id),
        }
    }
}

/// SegmentList is a circular doubly linked list of entry ids guarded by a sentinel.
/// The entry right after the sentinel (`head`) is the oldest and the entry right before the sentinel (`tail`) is the newest.
/// An empty list is a sentinel linked to itself.
pub(crate) struct SegmentList {
    sentinel: EntryId,
}

impl SegmentList {
    pub(crate) fn new<Key>(arena: &mut SegmentArena<Key>) -> Self {
        SegmentList { sentinel: arena.allocate_node(None) }
    }

    #[cfg(test)]
    pub(crate) fn is_empty<Key>(&self, arena: &SegmentArena<Key>) -> bool {
        arena.nodes[self.sentinel].next == self.sentinel
    }

    /// Oldest entry of the list.
    pub(crate) fn head<Key>(&self, arena: &SegmentArena<Key>) -> Option<EntryId> {
        self.real(arena.nodes[self.sentinel].next)
    }

    /// Newest entry of the list.
    #[cfg(test)]
    pub(crate) fn tail<Key>(&self, arena: &SegmentArena<Key>) -> Option<EntryId> {
        self.real(arena.nodes[self.sentinel].prev)
    }

    /// Entry following `id` towards the tail, `None` once the sentinel is reached.
    pub(crate) fn next<Key>(&self, arena: &SegmentArena<Key>, id: EntryId) -> Option<EntryId> {
        self.real(arena.nodes[id].next)
    }

    /// Detaches the entry from whichever list holds it.
    pub(crate) fn remove<Key>(arena: &mut SegmentArena<Key>, id: EntryId) {
        debug_assert!(arena.nodes[id].entry.is_some(), "sentinel can not be removed");

        let (prev, next) = (arena.nodes[id].prev, arena.nodes[id].next);
        arena.nodes[prev].next = next;
        arena.nodes[next].prev = prev;

        let node = &mut arena.nodes[id];
        node.prev = id;
        node.next = id;
    }

    /// Inserts the entry as the newest member of the list.
    pub(crate) fn append_to_tail<Key>(&self, arena: &mut SegmentArena<Key>, id: EntryId) {
        let prev = arena.nodes[self.sentinel].prev;
        self.link(arena, id, prev, self.sentinel);
    }

    /// Inserts the entry as the oldest member of the list, it becomes the next one to leave.
    pub(crate) fn append_to_head<Key>(&self, arena: &mut SegmentArena<Key>, id: EntryId) {
        let next = arena.nodes[self.sentinel].next;
        self.link(arena, id, self.sentinel, next);
    }

    /// Entry ids from the oldest to the newest.
    pub(crate) fn ids<Key>(&self, arena: &SegmentArena<Key>) -> Vec<EntryId> {
        let mut ids = Vec::new();
        let mut current = self.head(arena);
        while let Some(id) = current {
            ids.push(id);
            current = self.next(arena, id);
        }
        ids
    }

    fn link<Key>(&self, arena: &mut SegmentArena<Key>, id: EntryId, prev: EntryId, next: EntryId) {
        debug_assert!(arena.nodes[id].prev == id && arena.nodes[id].next == id, "entry must be unlinked before it is appended");

        let node = &mut arena.nodes[id];
        node.prev = prev;
        node.next = next;
        arena.nodes[prev].next = id;
        arena.nodes[next].prev = id;
    }

    fn real(&self, id: EntryId) -> Option<EntryId> {
        if id == self.sentinel {
            return None;
        }
        Some(id)
    }
}
