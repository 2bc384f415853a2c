use criterion::{BatchSize, Criterion, criterion_group};

use adaptive_tinylfu::cache::config::ConfigBuilder;
use adaptive_tinylfu::cache::policies::{Policy, PolicyKind};

use crate::benchmarks::common::distribution;

/// Defines the total number of accesses replayed per iteration.
const ACCESSES: usize = 100_000;

/// Defines the distinct keys of the Zipf distribution.
const ITEMS: u64 = 10_000;

/// Defines the capacity of every policy.
const MAXIMUM_SIZE: u64 = 1_000;

/// Measures a full replay of a Zipf trace through every policy, a fresh policy is built per iteration.
#[cfg(not(tarpaulin_include))]
pub fn replay(criterion: &mut Criterion) {
    let trace = distribution(ITEMS, ACCESSES);
    let mut group = criterion.benchmark_group("replay zipf trace");
    group.sample_size(10);

    for kind in PolicyKind::ALL {
        let name = kind.build(ConfigBuilder::<u64>::new().maximum_size(MAXIMUM_SIZE).build()).unwrap().name();
        group.bench_function(name, |bencher| {
            bencher.iter_batched(
                || kind.build(ConfigBuilder::<u64>::new().maximum_size(MAXIMUM_SIZE).build()).unwrap(),
                |mut policy| {
                    for key in &trace {
                        policy.record(*key);
                    }
                    policy
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, replay);
