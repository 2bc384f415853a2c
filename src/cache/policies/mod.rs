use std::hash::Hash;

use crate::cache::config::Config;
use crate::cache::errors::Errors;
use crate::cache::policies::lru::Lru;
use crate::cache::policies::tiny_lfu::WTinyLfu;
use crate::cache::stats::StatsSummary;
use crate::cache::types::EntrySize;

pub mod lru;
pub mod tiny_lfu;

const DEFAULT_ENTRY_SIZE: EntrySize = 1;

/// Policy is the contract between a trace driver and a cache policy.
/// The driver records every key of the trace in order and reads the stats at the end of the run.
pub trait Policy<Key>: Send {
    fn name(&self) -> &'static str;

    /// Records an access of the key with the given size, returns true on a hit.
    /// Results in [`Errors::EntrySizeGtZero`] if the size is zero.
    fn record_with_size(&mut self, key: Key, size: EntrySize) -> Result<bool, Errors>;

    /// Records an access of the key with size 1, returns true on a hit.
    fn record(&mut self, key: Key) -> bool {
        self.record_with_size(key, DEFAULT_ENTRY_SIZE).unwrap_or(false)
    }

    /// Returns the stats of the run, results in [`Errors::DegenerateStats`] before the first access.
    fn stats(&self) -> Result<StatsSummary, Errors>;
}

/// PolicyKind names the policies a driver can build from a [`Config`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum PolicyKind {
    /// Plain LRU, baseline
    Lru,
    /// W-TinyLFU with a fixed window
    WTinyLfu,
    /// W-TinyLFU with a hill climbing window
    HillClimb,
    /// W-TinyLFU with a window driven by the skew indicator
    Indicator,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [PolicyKind::Lru, PolicyKind::WTinyLfu, PolicyKind::Indicator, PolicyKind::HillClimb];

    pub fn build<Key>(self, config: Config<Key>) -> Result<Box<dyn Policy<Key>>, Errors>
        where Key: Hash + Eq + Clone + Send + 'static {
        let policy: Box<dyn Policy<Key>> = match self {
            PolicyKind::Lru => Box::new(Lru::new(config)?),
            PolicyKind::WTinyLfu => Box::new(WTinyLfu::new(config)?),
            PolicyKind::HillClimb => Box::new(WTinyLfu::hill_climb(config)?),
            PolicyKind::Indicator => Box::new(WTinyLfu::indicator(config)?),
        };
        Ok(policy)
    }
}
