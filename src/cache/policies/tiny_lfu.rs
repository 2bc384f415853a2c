use std::hash::Hash;
use std::sync::Arc;

use log::info;

use crate::cache::config::{Config, HashFn};
use crate::cache::errors::Errors;
use crate::cache::policies::Policy;
use crate::cache::policy::segmented_cache::{Capacity, SegmentedCache};
use crate::cache::stats::{StatsCounter, StatsSummary};
use crate::cache::types::{EntrySize, TotalCapacity};
use crate::cache::window::hill_climb::HillClimb;
use crate::cache::window::indicator::Indicator;
use crate::cache::window::WindowController;

const PERCENTAGE: u64 = 100;

/// WTinyLfu drives a [`SegmentedCache`] and, optionally, a controller that resizes its window.
///
/// The fixed flavour keeps the window at `window_percentage` of the maximum size.
/// The adaptive flavours hand every access to a [`WindowController`] once the cache is full;
/// their window can also be moved from outside with `increase_window`, `decrease_window` and `adjust`.
pub struct WTinyLfu<Key>
    where Key: Hash + Eq + Clone + 'static {
    name: &'static str,
    cache: SegmentedCache<Key>,
    controller: Option<WindowController>,
    key_hash_fn: Box<HashFn<Key>>,
    stats_counter: Arc<StatsCounter>,
}

impl<Key> WTinyLfu<Key>
    where Key: Hash + Eq + Clone + 'static {
    /// Creates a W-TinyLFU with a fixed window.
    pub fn new(config: Config<Key>) -> Result<Self, Errors> {
        Self::with_controller("WTinyLFU", config, None)
    }

    /// Creates a W-TinyLFU whose window is only moved from outside.
    pub fn adaptive(config: Config<Key>) -> Result<Self, Errors> {
        Self::ensure_main_region(&config)?;
        Self::with_controller("AdaptiveWTinyLFU", config, None)
    }

    /// Creates a W-TinyLFU whose window is moved by hill climbing on the hit rate.
    pub fn hill_climb(config: Config<Key>) -> Result<Self, Errors> {
        Self::ensure_main_region(&config)?;
        let hill_climb = HillClimb::new(config.maximum_size, config.sample_multiplier, config.pivot)?;
        info!("Hill climbing every {} accesses with a pivot of {}", hill_climb.sample_size(), hill_climb.pivot());
        Self::with_controller("WC-WTinyLFU", config, Some(WindowController::HillClimb(hill_climb)))
    }

    /// Creates a W-TinyLFU whose window follows the skew indicator.
    pub fn indicator(config: Config<Key>) -> Result<Self, Errors> {
        Self::ensure_main_region(&config)?;
        let indicator = Indicator::new(config.maximum_size, config.indicator_sample_size, config.indicator_counters)?;
        Self::with_controller("WI-WTinyLFU", config, Some(WindowController::Indicator(indicator)))
    }

    fn with_controller(name: &'static str, config: Config<Key>, controller: Option<WindowController>) -> Result<Self, Errors> {
        let capacity = Capacity::new(config.maximum_size, config.window_percentage)?;
        let stats_counter = Arc::new(StatsCounter::new());

        info!("Initialized {} with maximum size {}", name, config.maximum_size);
        Ok(WTinyLfu {
            name,
            cache: SegmentedCache::new(capacity, config.debug, stats_counter.clone()),
            controller,
            key_hash_fn: config.key_hash_fn,
            stats_counter,
        })
    }

    fn ensure_main_region(config: &Config<Key>) -> Result<(), Errors> {
        if config.window_percentage >= PERCENTAGE {
            return Err(Errors::AdaptiveWindowNeedsMainRegion);
        }
        Ok(())
    }

    pub fn increase_window(&mut self, amount: TotalCapacity) {
        self.cache.increase_window(amount);
    }

    pub fn decrease_window(&mut self, amount: TotalCapacity) {
        self.cache.decrease_window(amount);
    }

    pub fn adjust(&mut self, wanted_window: TotalCapacity) {
        self.cache.adjust(wanted_window);
    }

    pub fn cache(&self) -> &SegmentedCache<Key> {
        &self.cache
    }
}

impl<Key> Policy<Key> for WTinyLfu<Key>
    where Key: Hash + Eq + Clone + Send + 'static {
    fn name(&self) -> &'static str {
        self.name
    }

    fn record_with_size(&mut self, key: Key, size: EntrySize) -> Result<bool, Errors> {
        if size == 0 {
            return Err(Errors::EntrySizeGtZero("record"));
        }
        let key_hash = (self.key_hash_fn)(&key);
        let hit = self.cache.record(key, key_hash, size).is_hit();
        if hit {
            self.stats_counter.found_a_hit();
        } else {
            self.stats_counter.found_a_miss();
        }
        if let Some(controller) = self.controller.as_mut() {
            controller.observe(&mut self.cache, key_hash, hit);
        }
        Ok(hit)
    }

    fn stats(&self) -> Result<StatsSummary, Errors> {
        self.stats_counter.summary(self.name)
    }
}
