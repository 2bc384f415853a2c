use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use crate::cache::errors::Errors;

const TOTAL_STATS: usize = 7;

/// Defines various stats that are measured while replaying a trace through a policy.
#[repr(usize)]
#[non_exhaustive]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StatsType {
    /// Defines the number of hits for the keys
    CacheHits = 0,
    /// Defines the number of misses for the keys
    CacheMisses = 1,
    /// Defines the number of keys added to the window
    KeysAdded = 2,
    /// Defines the number of keys evicted by the admission contest or by plain LRU order
    KeysEvicted = 3,
    /// Defines the number of keys that were never added because their size exceeds every region
    KeysRejected = 4,
    /// Defines the number of capacity units moved from the protected region to the window
    WindowIncreased = 5,
    /// Defines the number of capacity units moved from the window to the protected region
    WindowDecreased = 6,
}

impl StatsType {
    const VALUES: [Self; TOTAL_STATS] = [
        Self::CacheHits,
        Self::CacheMisses,
        Self::KeysAdded,
        Self::KeysEvicted,
        Self::KeysRejected,
        Self::WindowIncreased,
        Self::WindowDecreased,
    ];
}

/// StatsSummary is view representation of the stats of a single policy.
#[derive(Debug, PartialEq, Clone)]
pub struct StatsSummary {
    pub name: String,
    pub hits: u64,
    pub misses: u64,
    pub hit_ratio: f64,
    pub stats_by_type: HashMap<StatsType, u64>,
}

impl StatsSummary {
    pub(crate) fn new(name: String, stats_by_type: HashMap<StatsType, u64>, hit_ratio: f64) -> Self {
        StatsSummary {
            name,
            hits: stats_by_type.get(&StatsType::CacheHits).copied().unwrap_or(0),
            misses: stats_by_type.get(&StatsType::CacheMisses).copied().unwrap_or(0),
            hit_ratio,
            stats_by_type,
        }
    }

    /// Returns an Option&lt;u64&gt; counter corresponding to the [`StatsType`].
    pub fn get(&self, stats_type: &StatsType) -> Option<u64> {
        self.stats_by_type.get(stats_type).copied()
    }
}

#[repr(transparent)]
#[derive(Debug)]
struct Counter(CachePadded<AtomicU64>);

/// StatsCounter measures various stats defined by [`StatsType`].
/// StatsCounter is represented as an array of entries where each entry is an instance of type [`Counter`].
/// A policy and its segmented cache share one StatsCounter, the policy counts hits and misses and
/// the cache counts admissions, evictions and window resizes.
/// Counters are atomics so that a policy (along with its StatsCounter) can be moved to a simulation thread.
pub(crate) struct StatsCounter {
    entries: [Counter; TOTAL_STATS],
}

impl StatsCounter {
    pub(crate) fn new() -> Self {
        StatsCounter {
            entries: std::array::from_fn(|_index| Counter(CachePadded::new(AtomicU64::new(0)))),
        }
    }

    pub(crate) fn found_a_hit(&self) { self.add(StatsType::CacheHits, 1); }

    pub(crate) fn found_a_miss(&self) { self.add(StatsType::CacheMisses, 1); }

    pub(crate) fn add_key(&self) { self.add(StatsType::KeysAdded, 1); }

    pub(crate) fn evict_key(&self) { self.add(StatsType::KeysEvicted, 1); }

    pub(crate) fn reject_key(&self) { self.add(StatsType::KeysRejected, 1); }

    pub(crate) fn increase_window(&self, units: u64) { self.add(StatsType::WindowIncreased, units); }

    pub(crate) fn decrease_window(&self, units: u64) { self.add(StatsType::WindowDecreased, units); }

    pub(crate) fn hits(&self) -> u64 {
        self.get(&StatsType::CacheHits)
    }

    pub(crate) fn misses(&self) -> u64 {
        self.get(&StatsType::CacheMisses)
    }

    #[cfg(test)]
    pub(crate) fn keys_added(&self) -> u64 { self.get(&StatsType::KeysAdded) }

    #[cfg(test)]
    pub(crate) fn keys_evicted(&self) -> u64 { self.get(&StatsType::KeysEvicted) }

    #[cfg(test)]
    pub(crate) fn keys_rejected(&self) -> u64 { self.get(&StatsType::KeysRejected) }

    /// Returns the ratio of hits to the total accesses.
    /// Hit ratio is undefined before the first access and results in [`Errors::DegenerateStats`].
    pub(crate) fn hit_ratio(&self) -> Result<f64, Errors> {
        let hits = self.hits();
        let misses = self.misses();
        if hits + misses == 0 {
            return Err(Errors::DegenerateStats);
        }
        Ok((hits as f64) / (hits + misses) as f64)
    }

    pub(crate) fn summary(&self, name: &str) -> Result<StatsSummary, Errors> {
        let hit_ratio = self.hit_ratio()?;
        let mut stats_by_type = HashMap::new();
        for stats_type in StatsType::VALUES.iter().copied() {
            stats_by_type.insert(stats_type, self.get(&stats_type));
        }
        Ok(StatsSummary::new(name.to_string(), stats_by_type, hit_ratio))
    }

    fn add(&self, stats_type: StatsType, count: u64) {
        self.entries[stats_type as usize].0.fetch_add(count, Ordering::AcqRel);
    }

    fn get(&self, stats_type: &StatsType) -> u64 {
        self.entries[*stats_type as usize].0.load(Ordering::Acquire)
    }
}
