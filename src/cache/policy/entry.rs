use crate::cache::types::{EntrySize, KeyHash};

/// Region of the segmented cache an entry currently belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Status {
    Window,
    Probation,
    Protected,
}

/// Events that move an entry between regions.
/// `Hit`: the key of the entry was accessed again.
/// `Overflow`: the region of the entry is over its capacity and the entry is its oldest member.
/// `Rebalance`: the window is being resized and the entry is moved to make room on the other side.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Event {
    Hit,
    Overflow,
    Rebalance,
}

impl Status {
    /// Status of an entry after the event.
    /// An entry in probation which overflows stays in probation, its fate is decided by the admission contest.
    pub(crate) fn next(self, event: Event) -> Status {
        match (self, event) {
            (Status::Window, Event::Hit) => Status::Window,
            (Status::Window, Event::Overflow) => Status::Probation,
            (Status::Window, Event::Rebalance) => Status::Probation,
            (Status::Probation, Event::Hit) => Status::Protected,
            (Status::Probation, Event::Overflow) => Status::Probation,
            (Status::Probation, Event::Rebalance) => Status::Window,
            (Status::Protected, Event::Hit) => Status::Protected,
            (Status::Protected, Event::Overflow) => Status::Probation,
            (Status::Protected, Event::Rebalance) => Status::Probation,
        }
    }
}

pub(crate) struct Entry<Key> {
    pub(crate) key: Key,
    pub(crate) key_hash: KeyHash,
    pub(crate) status: Status,
    pub(crate) size: EntrySize,
}

impl<Key> Entry<Key> {
    pub(crate) fn new(key: Key, key_hash: KeyHash, status: Status, size: EntrySize) -> Self {
        Entry { key, key_hash, status, size }
    }
}
