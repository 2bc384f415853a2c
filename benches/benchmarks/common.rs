use rand::{Rng, thread_rng};
use rand_distr::Zipf;

pub fn distribution(items: u64, capacity: usize) -> Vec<u64> {
    thread_rng().sample_iter(Zipf::new(items, 1.01).unwrap()).take(capacity).map(|value| value as u64).collect::<Vec<_>>()
}
