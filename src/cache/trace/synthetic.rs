use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Zipf;

use crate::cache::errors::Errors;

/// Generates `length` keys in `1..=items` following a Zipf distribution with the given exponent.
/// The same seed always produces the same trace.
pub fn zipf(items: u64, exponent: f64, length: usize, seed: u64) -> Result<Vec<u64>, Errors> {
    let distribution = Zipf::new(items, exponent)
        .map_err(|err| Errors::TraceUnavailable(format!("invalid zipf distribution: {}", err)))?;

    Ok(StdRng::seed_from_u64(seed)
        .sample_iter(distribution)
        .take(length)
        .map(|key: f64| key as u64)
        .collect())
}
