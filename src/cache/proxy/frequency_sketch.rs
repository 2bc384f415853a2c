#[cfg(feature = "bench_testable")]
use crate::cache::lfu::frequency_sketch::FrequencySketch;
#[cfg(feature = "bench_testable")]
use crate::cache::types::{FrequencyEstimate, KeyHash, TotalCounters};

/// Proxy representation of the `crate::cache::lfu::frequency_sketch::FrequencySketch`.
/// ProxyFrequencySketch delegates `increment` and `frequency` to the FrequencySketch and
/// is used in `benches/benchmarks/frequency_sketch.rs`
#[cfg(feature = "bench_testable")]
pub struct ProxyFrequencySketch {
    sketch: FrequencySketch,
}

#[cfg(feature = "bench_testable")]
impl ProxyFrequencySketch {
    #[cfg(not(tarpaulin_include))]
    pub fn new(counters: TotalCounters) -> Self {
        ProxyFrequencySketch {
            sketch: FrequencySketch::new(counters)
        }
    }

    #[cfg(not(tarpaulin_include))]
    pub fn increment(&mut self, key_hash: KeyHash) {
        self.sketch.increment(key_hash);
    }

    #[cfg(not(tarpaulin_include))]
    pub fn frequency(&self, key_hash: KeyHash) -> FrequencyEstimate {
        self.sketch.frequency(key_hash)
    }

    #[cfg(not(tarpaulin_include))]
    pub fn resets(&self) -> u64 {
        self.sketch.resets()
    }
}
