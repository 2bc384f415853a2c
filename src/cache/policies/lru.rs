use std::hash::Hash;
use std::sync::Arc;

use hashbrown::HashMap;
use log::info;

use crate::cache::config::Config;
use crate::cache::errors::Errors;
use crate::cache::policies::Policy;
use crate::cache::policy::entry::{Entry, Status};
use crate::cache::policy::segment_list::{SegmentArena, SegmentList};
use crate::cache::stats::{StatsCounter, StatsSummary};
use crate::cache::types::{EntryId, EntrySize, TotalCapacity};

/// Plain LRU over a single [`SegmentList`], used as the baseline for the W-TinyLFU policies.
pub struct Lru<Key>
    where Key: Hash + Eq + Clone {
    entries: HashMap<Key, EntryId>,
    arena: SegmentArena<Key>,
    list: SegmentList,
    maximum_size: TotalCapacity,
    occupied: TotalCapacity,
    stats_counter: Arc<StatsCounter>,
}

impl<Key> Lru<Key>
    where Key: Hash + Eq + Clone {
    pub fn new(config: Config<Key>) -> Result<Self, Errors> {
        if config.maximum_size < 1 {
            return Err(Errors::MaximumSizeGtZero);
        }
        let mut arena = SegmentArena::with_capacity(0);
        let list = SegmentList::new(&mut arena);
        info!("Initialized LRU with maximum size {}", config.maximum_size);

        Ok(Lru {
            entries: HashMap::new(),
            arena,
            list,
            maximum_size: config.maximum_size,
            occupied: 0,
            stats_counter: Arc::new(StatsCounter::new()),
        })
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn access(&mut self, key: Key, size: EntrySize) -> bool {
        if let Some(id) = self.entries.get(&key).copied() {
            SegmentList::remove(&mut self.arena, id);
            self.list.append_to_tail(&mut self.arena, id);
            return true;
        }
        if size > self.maximum_size {
            self.stats_counter.reject_key();
            return false;
        }
        while self.occupied + size > self.maximum_size {
            let Some(id) = self.list.head(&self.arena) else { break; };
            SegmentList::remove(&mut self.arena, id);
            if let Some(entry) = self.arena.release(id) {
                self.occupied -= entry.size;
                self.entries.remove(&entry.key);
                self.stats_counter.evict_key();
            }
        }
        let id = self.arena.allocate(Entry::new(key.clone(), 0, Status::Window, size));
        self.list.append_to_tail(&mut self.arena, id);
        self.entries.insert(key, id);
        self.occupied += size;
        self.stats_counter.add_key();
        false
    }
}

impl<Key> Policy<Key> for Lru<Key>
    where Key: Hash + Eq + Clone + Send {
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn record_with_size(&mut self, key: Key, size: EntrySize) -> Result<bool, Errors> {
        if size == 0 {
            return Err(Errors::EntrySizeGtZero("record"));
        }
        let hit = self.access(key, size);
        if hit {
            self.stats_counter.found_a_hit();
        } else {
            self.stats_counter.found_a_miss();
        }
        Ok(hit)
    }

    fn stats(&self) -> Result<StatsSummary, Errors> {
        self.stats_counter.summary(self.name())
    }
}
