use criterion::{Bencher, Criterion, criterion_group};

#[cfg(feature = "bench_testable")]
use adaptive_tinylfu::cache::proxy::frequency_sketch::ProxyFrequencySketch;
#[cfg(feature = "bench_testable")]
use adaptive_tinylfu::cache::types::TotalCounters;

#[cfg(feature = "bench_testable")]
use crate::benchmarks::common::distribution;

/// Defines the total size of the distribution that will be used in increment and frequency methods of `FrequencySketch`.
const CAPACITY: usize = 2 << 20;

/// Defines the total sample size that is used for generating Zipf distribution.
const ITEMS: usize = CAPACITY / 3;

const MASK: usize = CAPACITY - 1;

/// Measures `FrequencySketch.increment` and `FrequencySketch.frequency`, treating each element of a
/// Zipf distribution as a KeyHash. The `frequency` benchmark loads the distribution into the sketch first.
/// Both vary the counters between CAPACITY, CAPACITY*2 and CAPACITY*10.
#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn increase_frequency(criterion: &mut Criterion) {
    let distribution = distribution(ITEMS as u64, CAPACITY);
    let mut group = criterion.benchmark_group("increase frequency");

    for multiplier in [1, 2, 10] {
        let counters = (CAPACITY * multiplier) as TotalCounters;
        group.bench_function(format!("counters = {} * {}", CAPACITY, multiplier), |bencher| {
            increment(&distribution, bencher, counters);
        });
    }
    group.finish();
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
pub fn estimate_frequency(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("estimate frequency");

    for multiplier in [1, 2, 10] {
        let mut sketch = ProxyFrequencySketch::new((CAPACITY * multiplier) as TotalCounters);
        let distribution = setup(&mut sketch);
        group.bench_function(format!("counters = {} * {}", CAPACITY, multiplier), |bencher| {
            frequency(&sketch, &distribution, bencher);
        });
    }
    group.finish();
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
fn increment(distribution: &[u64], bencher: &mut Bencher, total_counters: TotalCounters) {
    let mut index = 0;
    let mut sketch = ProxyFrequencySketch::new(total_counters);

    bencher.iter(|| {
        let key_hash = distribution[index & MASK];
        sketch.increment(key_hash);
        index += 1;
    })
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
fn setup(sketch: &mut ProxyFrequencySketch) -> Vec<u64> {
    let distribution = distribution(ITEMS as u64, CAPACITY);
    for item in &distribution {
        sketch.increment(*item);
    }
    distribution
}

#[cfg(feature = "bench_testable")]
#[cfg(not(tarpaulin_include))]
fn frequency(sketch: &ProxyFrequencySketch, distribution: &[u64], bencher: &mut Bencher) {
    let mut index = 0;

    bencher.iter(|| {
        let key_hash = distribution[index & MASK];
        sketch.frequency(key_hash);
        index += 1;
    });
}

criterion_group!(benches, increase_frequency, estimate_frequency);
