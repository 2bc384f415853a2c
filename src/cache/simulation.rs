use std::time::{Duration, Instant};

use crossbeam_utils::thread;
use log::info;

use crate::cache::errors::Errors;
use crate::cache::policies::Policy;
use crate::cache::stats::StatsSummary;

/// Outcome of replaying one trace through one policy.
#[derive(Clone, PartialEq, Debug)]
pub struct SimulationResult {
    pub summary: StatsSummary,
    pub elapsed: Duration,
}

/// Simulation replays traces through policies.
pub struct Simulation;

impl Simulation {
    /// Records every key of the trace in order and returns the stats of the policy with the time it took.
    pub fn run<Key, Trace>(policy: &mut dyn Policy<Key>, trace: Trace) -> Result<SimulationResult, Errors>
        where Trace: IntoIterator<Item=Key> {
        let start = Instant::now();
        for key in trace {
            policy.record(key);
        }
        let elapsed = start.elapsed();
        let summary = policy.stats()?;

        info!("{} replayed {} accesses in {:?}", summary.name, summary.hits + summary.misses, elapsed);
        Ok(SimulationResult { summary, elapsed })
    }

    /// Runs every policy on its own thread over the same trace.
    /// Policies share no state, results are returned in the order of `policies`.
    pub fn run_all<Key>(policies: Vec<Box<dyn Policy<Key>>>, trace: &[Key]) -> Result<Vec<SimulationResult>, Errors>
        where Key: Clone + Send + Sync {
        thread::scope(|scope| {
            let handles = policies
                .into_iter()
                .map(|mut policy| {
                    let name = policy.name();
                    let handle = scope.spawn(move |_| Simulation::run(policy.as_mut(), trace.iter().cloned()));
                    (name, handle)
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|(name, handle)| handle.join().map_err(|_| Errors::SimulationPanicked(name))?)
                .collect::<Result<Vec<SimulationResult>, Errors>>()
        }).map_err(|_| Errors::SimulationPanicked("scope"))?
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::config::ConfigBuilder;
    use crate::cache::errors::Errors;
    use crate::cache::policies::{Policy, PolicyKind};
    use crate::cache::simulation::Simulation;

    fn policy(kind: PolicyKind) -> Box<dyn Policy<u64>> {
        kind.build(ConfigBuilder::new().maximum_size(10).build()).unwrap()
    }

    #[test]
    fn run_counts_every_access() {
        let mut lru = policy(PolicyKind::Lru);
        let result = Simulation::run(lru.as_mut(), vec![1, 2, 1, 3, 1]).unwrap();

        assert_eq!("LRU", result.summary.name);
        assert_eq!(2, result.summary.hits);
        assert_eq!(3, result.summary.misses);
    }

    #[test]
    fn run_over_an_empty_trace() {
        let mut lru = policy(PolicyKind::Lru);
        let result = Simulation::run(lru.as_mut(), Vec::new());

        assert!(matches!(result, Err(Errors::DegenerateStats)));
    }

    #[test]
    fn run_all_keeps_the_order_of_policies() {
        let trace = (0..1000u64).map(|index| index % 17).collect::<Vec<u64>>();
        let policies = PolicyKind::ALL.iter().map(|kind| policy(*kind)).collect();

        let names = Simulation::run_all(policies, &trace)
            .unwrap()
            .into_iter()
            .map(|result| result.summary.name)
            .collect::<Vec<String>>();

        assert_eq!(vec!["LRU", "WTinyLFU", "WI-WTinyLFU", "WC-WTinyLFU"], names);
    }

    #[test]
    fn run_all_matches_sequential_runs() {
        let trace = (0..2000u64).map(|index| (index * 7919) % 53).collect::<Vec<u64>>();

        let concurrent = Simulation::run_all(
            PolicyKind::ALL.iter().map(|kind| policy(*kind)).collect(),
            &trace,
        ).unwrap();

        for (kind, result) in PolicyKind::ALL.iter().zip(concurrent) {
            let mut sequential = policy(*kind);
            let expected = Simulation::run(sequential.as_mut(), trace.iter().copied()).unwrap();
            assert_eq!(expected.summary, result.summary);
        }
    }
}
