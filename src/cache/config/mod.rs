use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::cache::types::{KeyHash, TotalCapacity, TotalCounters};

pub type HashFn<Key> = dyn Fn(&Key) -> KeyHash + Send;

const MAXIMUM_SIZE: TotalCapacity = 1000;
const WINDOW_PERCENTAGE: u64 = 1;
const SAMPLE_MULTIPLIER: u64 = 10;
const PIVOT: f64 = 0.05;
const INDICATOR_SAMPLE_SIZE: u64 = 50_000;
const INDICATOR_COUNTERS: TotalCounters = 5_000;

/// Config of a policy.
/// `maximum_size`: total capacity of the cache, in units of entry size
/// `window_percentage`: share of `maximum_size` given to the window at construction
/// `sample_multiplier`: hill climbing decides every `sample_multiplier * maximum_size` accesses
/// `pivot`: hill climbing moves `round(pivot * maximum_size)` units of capacity per decision
/// `indicator_sample_size`: indicator decides every `indicator_sample_size` accesses
/// `indicator_counters`: size of the auxiliary sketch used by the indicator
/// `debug`: logs every window resize
pub struct Config<Key>
    where Key: Hash + 'static {
    pub key_hash_fn: Box<HashFn<Key>>,
    pub maximum_size: TotalCapacity,
    pub window_percentage: u64,
    pub sample_multiplier: u64,
    pub pivot: f64,
    pub indicator_sample_size: u64,
    pub indicator_counters: TotalCounters,
    pub debug: bool,
}

pub struct ConfigBuilder<Key>
    where Key: Hash + 'static {
    key_hash_fn: Box<HashFn<Key>>,
    maximum_size: TotalCapacity,
    window_percentage: u64,
    sample_multiplier: u64,
    pivot: f64,
    indicator_sample_size: u64,
    indicator_counters: TotalCounters,
    debug: bool,
}

impl<Key> Default for ConfigBuilder<Key>
    where Key: Hash + 'static {
    fn default() -> Self {
        Self::new()
    }
}

impl<Key> ConfigBuilder<Key>
    where Key: Hash + 'static {
    pub fn new() -> Self {
        let key_hash_fn = |key: &Key| -> KeyHash {
            let mut hasher = DefaultHasher::new();
            key.hash(&mut hasher);
            hasher.finish()
        };

        ConfigBuilder {
            key_hash_fn: Box::new(key_hash_fn),
            maximum_size: MAXIMUM_SIZE,
            window_percentage: WINDOW_PERCENTAGE,
            sample_multiplier: SAMPLE_MULTIPLIER,
            pivot: PIVOT,
            indicator_sample_size: INDICATOR_SAMPLE_SIZE,
            indicator_counters: INDICATOR_COUNTERS,
            debug: false,
        }
    }

    pub fn key_hash_fn(mut self, key_hash: Box<HashFn<Key>>) -> ConfigBuilder<Key> {
        self.key_hash_fn = key_hash;
        self
    }

    pub fn maximum_size(mut self, maximum_size: TotalCapacity) -> ConfigBuilder<Key> {
        self.maximum_size = maximum_size;
        self
    }

    pub fn window_percentage(mut self, window_percentage: u64) -> ConfigBuilder<Key> {
        self.window_percentage = window_percentage;
        self
    }

    pub fn sample_multiplier(mut self, sample_multiplier: u64) -> ConfigBuilder<Key> {
        self.sample_multiplier = sample_multiplier;
        self
    }

    pub fn pivot(mut self, pivot: f64) -> ConfigBuilder<Key> {
        self.pivot = pivot;
        self
    }

    pub fn indicator_sample_size(mut self, sample_size: u64) -> ConfigBuilder<Key> {
        self.indicator_sample_size = sample_size;
        self
    }

    pub fn indicator_counters(mut self, counters: TotalCounters) -> ConfigBuilder<Key> {
        self.indicator_counters = counters;
        self
    }

    pub fn debug(mut self, debug: bool) -> ConfigBuilder<Key> {
        self.debug = debug;
        self
    }

    pub fn build(self) -> Config<Key> {
        Config {
            key_hash_fn: self.key_hash_fn,
            maximum_size: self.maximum_size,
            window_percentage: self.window_percentage,
            sample_multiplier: self.sample_multiplier,
            pivot: self.pivot,
            indicator_sample_size: self.indicator_sample_size,
            indicator_counters: self.indicator_counters,
            debug: self.debug,
        }
    }
}
