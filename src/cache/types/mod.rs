/// Defines the type for the hash of a key
pub type KeyHash = u64;

/// Defines the type for total counters used in `crate::cache::lfu::frequency_sketch::FrequencySketch`,
/// for counting the access frequencies of keys
pub type TotalCounters = u64;

/// Defines the type for the capacity of a cache, in units of entry size
pub type TotalCapacity = u64;

/// Defines the type for the size of an entry, `1` when the trace does not carry sizes
pub type EntrySize = u64;

/// Defines the type for the access frequency of keys in the cache
pub type FrequencyEstimate = u8;

/// Defines the type for the sum of frequency estimates across a batch of entries
pub(crate) type FrequencyScore = u64;

/// Defines the type for the slot of an entry inside the entry arena of `crate::cache::policy::segment_list::SegmentArena`
pub(crate) type EntryId = usize;
