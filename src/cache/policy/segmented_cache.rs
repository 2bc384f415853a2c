use std::hash::Hash;
use std::sync::Arc;

use hashbrown::HashMap;
use log::{debug, info};

use crate::cache::errors::Errors;
use crate::cache::lfu::frequency_sketch::FrequencySketch;
use crate::cache::policy::entry::{Entry, Event, Status};
use crate::cache::policy::segment_list::{SegmentArena, SegmentList};
use crate::cache::stats::StatsCounter;
use crate::cache::types::{EntryId, EntrySize, FrequencyEstimate, FrequencyScore, KeyHash, TotalCapacity};

const PERCENTAGE: u64 = 100;
const PROTECTED_NUMERATOR: u64 = 4;
const PROTECTED_DENOMINATOR: u64 = 5;
const INITIAL_ARENA_CAPACITY: u64 = 1 << 16;

/// Capacity split of a segmented cache: window, protected and the implicit probation capacity.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Capacity {
    pub maximum_size: TotalCapacity,
    pub max_window: TotalCapacity,
    pub max_protected: TotalCapacity,
}

impl Capacity {
    /// `max_window = floor(maximum_size * window_percentage / 100)` and
    /// `max_protected = floor((maximum_size - max_window) * 4 / 5)`.
    pub fn new(maximum_size: TotalCapacity, window_percentage: u64) -> Result<Self, Errors> {
        if maximum_size < 1 {
            return Err(Errors::MaximumSizeGtZero);
        }
        if window_percentage > PERCENTAGE {
            return Err(Errors::WindowPercentageInRange);
        }
        let max_window = Self::floor_share(maximum_size, window_percentage, PERCENTAGE);
        let max_main = maximum_size - max_window;
        Ok(Capacity {
            maximum_size,
            max_window,
            max_protected: Self::floor_share(max_main, PROTECTED_NUMERATOR, PROTECTED_DENOMINATOR),
        })
    }

    /// `floor(value * numerator / denominator)` for `numerator <= denominator`, without overflowing on large values.
    fn floor_share(value: TotalCapacity, numerator: u64, denominator: u64) -> TotalCapacity {
        value / denominator * numerator + value % denominator * numerator / denominator
    }

    pub fn max_probation(&self) -> TotalCapacity {
        self.maximum_size - self.max_window - self.max_protected
    }
}

/// Occupied size of every region.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Occupancy {
    pub window: TotalCapacity,
    pub probation: TotalCapacity,
    pub protected: TotalCapacity,
}

impl Occupancy {
    pub fn total(&self) -> TotalCapacity {
        self.window + self.probation + self.protected
    }

    fn region_mut(&mut self, status: Status) -> &mut TotalCapacity {
        match status {
            Status::Window => &mut self.window,
            Status::Probation => &mut self.probation,
            Status::Protected => &mut self.protected,
        }
    }
}

/// Outcome of recording an access.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Access {
    Hit,
    Miss,
    /// Miss for an entry larger than every region, the entry is never created.
    Rejected,
}

impl Access {
    pub fn is_hit(&self) -> bool {
        matches!(self, Access::Hit)
    }
}

struct Batch {
    ids: Vec<EntryId>,
    size: TotalCapacity,
    score: FrequencyScore,
}

impl Batch {
    fn new() -> Self {
        Batch { ids: Vec::new(), size: 0, score: 0 }
    }
}

/// SegmentedCache implements window TinyLFU over three LRU regions.
///
/// A new key enters the window. The oldest window entry that no longer fits moves to probation and
/// competes against the oldest probation entry when the cache is over its maximum size: the
/// one with the lower frequency estimate (as per [`FrequencySketch`]) is evicted, ties evict the candidate.
/// A hit in probation promotes the entry to protected, protected overflow demotes its oldest entries back to probation.
///
/// The window can be resized at runtime with `increase_window`, `decrease_window` and `adjust`, which move
/// capacity between the window and the protected region. Probation capacity never changes.
pub struct SegmentedCache<Key>
    where Key: Hash + Eq + Clone {
    entries: HashMap<Key, EntryId>,
    arena: SegmentArena<Key>,
    window: SegmentList,
    probation: SegmentList,
    protected: SegmentList,
    sketch: FrequencySketch,
    capacity: Capacity,
    occupancy: Occupancy,
    filled: bool,
    debug: bool,
    stats_counter: Arc<StatsCounter>,
}

impl<Key> SegmentedCache<Key>
    where Key: Hash + Eq + Clone {
    pub(crate) fn new(capacity: Capacity, debug: bool, stats_counter: Arc<StatsCounter>) -> Self {
        let mut arena = SegmentArena::with_capacity(capacity.maximum_size.min(INITIAL_ARENA_CAPACITY) as usize);
        let window = SegmentList::new(&mut arena);
        let probation = SegmentList::new(&mut arena);
        let protected = SegmentList::new(&mut arena);

        info!(
            "Initialized SegmentedCache with maximum size {}, window {}, protected {} and probation {}",
            capacity.maximum_size, capacity.max_window, capacity.max_protected, capacity.max_probation()
        );
        SegmentedCache {
            entries: HashMap::new(),
            arena,
            window,
            probation,
            protected,
            sketch: FrequencySketch::new(capacity.maximum_size),
            capacity,
            occupancy: Occupancy::default(),
            filled: false,
            debug,
            stats_counter,
        }
    }

    /// Records an access of the key, size of the entry is only used when the key is absent.
    pub(crate) fn record(&mut self, key: Key, key_hash: KeyHash, size: EntrySize) -> Access {
        self.sketch.increment(key_hash);
        if let Some(id) = self.entries.get(&key).copied() {
            self.on_hit(id);
            return Access::Hit;
        }
        self.on_miss(key, key_hash, size)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn status_of(&self, key: &Key) -> Option<Status> {
        self.entries.get(key).map(|id| self.arena[*id].status)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// Becomes true once the occupied size reaches the maximum size and stays true, the cache never shrinks afterwards.
    pub fn is_full(&self) -> bool {
        self.filled
    }

    /// Keys of a region from the oldest to the newest.
    pub fn keys_in(&self, status: Status) -> Vec<Key> {
        self.list(status).ids(&self.arena).into_iter().map(|id| self.arena[id].key.clone()).collect()
    }

    pub(crate) fn frequency(&self, key_hash: KeyHash) -> FrequencyEstimate {
        self.sketch.frequency(key_hash)
    }

    /// Moves up to `min(amount, max_protected)` units of capacity from the protected region to the window.
    /// No-op until the cache is full.
    pub(crate) fn increase_window(&mut self, amount: TotalCapacity) {
        if !self.filled {
            return;
        }
        let steps = amount.min(self.capacity.max_protected);
        for _ in 0..steps {
            self.capacity.max_window += 1;
            self.capacity.max_protected -= 1;
            self.demote_protected();

            while let Some(id) = self.probation.head(&self.arena) {
                if self.occupancy.window + self.arena[id].size > self.capacity.max_window {
                    break;
                }
                self.transition(id, Event::Rebalance);
                self.window.append_to_tail(&mut self.arena, id);
            }
        }
        self.stats_counter.increase_window(steps);
        if self.debug {
            debug!("Increased window by {}, window {}, protected {}", steps, self.capacity.max_window, self.capacity.max_protected);
        }
    }

    /// Moves up to `min(amount, max_window)` units of capacity from the window to the protected region.
    /// Entries leaving the window are placed at the head of probation, they are the next victims.
    /// No-op until the cache is full.
    pub(crate) fn decrease_window(&mut self, amount: TotalCapacity) {
        if !self.filled {
            return;
        }
        let steps = amount.min(self.capacity.max_window);
        for _ in 0..steps {
            self.capacity.max_window -= 1;
            self.capacity.max_protected += 1;

            while self.occupancy.window > self.capacity.max_window {
                let Some(id) = self.window.head(&self.arena) else { break; };
                self.transition(id, Event::Rebalance);
                self.probation.append_to_head(&mut self.arena, id);
            }
        }
        self.stats_counter.decrease_window(steps);
        if self.debug {
            debug!("Decreased window by {}, window {}, protected {}", steps, self.capacity.max_window, self.capacity.max_protected);
        }
    }

    /// Resizes the window towards `wanted_window`. No-op until the cache is full.
    pub(crate) fn adjust(&mut self, wanted_window: TotalCapacity) {
        if !self.filled {
            return;
        }
        let current = self.capacity.max_window;
        if wanted_window > current {
            self.increase_window(wanted_window - current);
        } else if wanted_window < current {
            self.decrease_window(current - wanted_window);
        }
    }

    fn on_hit(&mut self, id: EntryId) {
        let status = self.transition(id, Event::Hit);
        match status {
            Status::Window => self.window.append_to_tail(&mut self.arena, id),
            Status::Probation | Status::Protected => {
                self.protected.append_to_tail(&mut self.arena, id);
                self.demote_protected();
            }
        }
    }

    fn on_miss(&mut self, key: Key, key_hash: KeyHash, size: EntrySize) -> Access {
        if self.is_oversize(size) {
            self.stats_counter.reject_key();
            return Access::Rejected;
        }
        let id = self.arena.allocate(Entry::new(key.clone(), key_hash, Status::Window, size));
        self.entries.insert(key, id);
        self.window.append_to_tail(&mut self.arena, id);
        self.occupancy.window += size;
        self.stats_counter.add_key();

        // a window that grew without pulling probation entries in leaves the main region over its share
        if self.occupancy.window > self.capacity.max_window || self.occupancy.total() > self.capacity.maximum_size {
            self.evict();
        }
        if self.occupancy.total() >= self.capacity.maximum_size {
            self.filled = true;
        }
        Access::Miss
    }

    /// An entry is oversize when it does not fit in any region on its own.
    fn is_oversize(&self, size: EntrySize) -> bool {
        size > self.capacity.max_window
            && size > self.capacity.max_protected
            && size > self.capacity.max_probation()
    }

    /// Demotes the oldest protected entries to probation until protected is within its capacity.
    fn demote_protected(&mut self) {
        while self.occupancy.protected > self.capacity.max_protected {
            let Some(id) = self.protected.head(&self.arena) else { break; };
            self.transition(id, Event::Overflow);
            self.probation.append_to_tail(&mut self.arena, id);
        }
    }

    /// Moves the window overflow to probation and evicts until the cache is within its maximum size.
    fn evict(&mut self) {
        let mut candidates = Vec::new();
        while self.occupancy.window > self.capacity.max_window {
            let Some(id) = self.window.head(&self.arena) else { break; };
            self.transition(id, Event::Overflow);
            self.probation.append_to_tail(&mut self.arena, id);
            candidates.push(id);
        }
        while self.occupancy.total() > self.capacity.maximum_size {
            self.filled = true;
            if !self.contest(&mut candidates) {
                break;
            }
        }
    }

    /// Runs one admission contest between the oldest candidates and the oldest victims.
    /// Both batches grow until they cover the excess size, the batch with the lower summed frequency is evicted.
    /// Ties evict the candidates. Returns false if there was nothing to evict.
    fn contest(&mut self, candidates: &mut Vec<EntryId>) -> bool {
        let excess = self.occupancy.total() - self.capacity.maximum_size;

        let mut candidate_batch = Batch::new();
        for id in candidates.iter().copied() {
            if candidate_batch.size >= excess {
                break;
            }
            self.add_to_batch(&mut candidate_batch, id);
        }
        let victim_batch = self.victims(excess, candidates);

        if candidate_batch.ids.is_empty() {
            if victim_batch.ids.is_empty() {
                return false;
            }
            self.evict_all(&victim_batch.ids);
            return true;
        }
        if victim_batch.size >= excess && candidate_batch.score > victim_batch.score {
            self.evict_all(&victim_batch.ids);
        } else {
            candidates.retain(|id| !candidate_batch.ids.contains(id));
            self.evict_all(&candidate_batch.ids);
        }
        true
    }

    /// Oldest entries of the main region covering `excess`, starting at the probation head and continuing
    /// into protected once probation has no other entries. The scan ends at the protected sentinel.
    fn victims(&self, excess: TotalCapacity, candidates: &[EntryId]) -> Batch {
        let mut batch = Batch::new();
        for list in [&self.probation, &self.protected] {
            let mut current = list.head(&self.arena);
            while let Some(id) = current {
                if batch.size >= excess {
                    return batch;
                }
                if !candidates.contains(&id) {
                    self.add_to_batch(&mut batch, id);
                }
                current = list.next(&self.arena, id);
            }
        }
        batch
    }

    fn add_to_batch(&self, batch: &mut Batch, id: EntryId) {
        let entry = &self.arena[id];
        batch.ids.push(id);
        batch.size += entry.size;
        batch.score += self.sketch.frequency(entry.key_hash) as FrequencyScore;
    }

    fn evict_all(&mut self, ids: &[EntryId]) {
        for id in ids.iter().copied() {
            SegmentList::remove(&mut self.arena, id);
            if let Some(entry) = self.arena.release(id) {
                *self.occupancy.region_mut(entry.status) -= entry.size;
                self.entries.remove(&entry.key);
                self.stats_counter.evict_key();
            }
        }
    }

    /// Detaches the entry from its list and applies the event to its status and the region occupancy.
    /// Returns the status before the event, the caller appends the entry to the list of its new status.
    fn transition(&mut self, id: EntryId, event: Event) -> Status {
        SegmentList::remove(&mut self.arena, id);

        let entry = &mut self.arena[id];
        let previous = entry.status;
        let size = entry.size;
        entry.status = previous.next(event);
        let next = entry.status;

        *self.occupancy.region_mut(previous) -= size;
        *self.occupancy.region_mut(next) += size;
        previous
    }

    fn list(&self, status: Status) -> &SegmentList {
        match status {
            Status::Window => &self.window,
            Status::Probation => &self.probation,
            Status::Protected => &self.protected,
        }
    }
}
