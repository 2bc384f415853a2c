use hashbrown::HashMap;
use log::debug;

use crate::cache::errors::Errors;
use crate::cache::lfu::frequency_sketch::FrequencySketch;
use crate::cache::types::{KeyHash, TotalCapacity, TotalCounters};
use crate::cache::window::Resize;

const TOP_KEYS: usize = 70;
const MAX_FREQUENCY: f64 = 15.0;
const WINDOW_SHARE: f64 = 0.8;

/// Indicator converts the skew and the popularity of the recent accesses into a target window size.
///
/// Every access feeds a small auxiliary sketch, the frequency estimate before the increment (the hint)
/// is accumulated, and the key is counted in a histogram.
/// Every `sample_size` accesses the skew is estimated from the histogram (see [`Indicator::skew`]) and the
/// window is resized to `round(0.8 * indicator * maximum_size)` where
/// `indicator = (mean_hint * (1 - skew^3) if skew < 1 else 0) / 15`.
/// Highly skewed traces get a small window, near uniform ones with popular keys get a large window.
/// The histogram counts key hashes, keys with colliding 64 bit hashes share one rank.
pub(crate) struct Indicator {
    sketch: FrequencySketch,
    frequencies: HashMap<KeyHash, u64>,
    hint_sum: u64,
    hint_count: u64,
    sample: u64,
    sample_size: u64,
    maximum_size: TotalCapacity,
}

impl Indicator {
    pub(crate) fn new(maximum_size: TotalCapacity, sample_size: u64, counters: TotalCounters) -> Result<Self, Errors> {
        if sample_size == 0 {
            return Err(Errors::SampleSizeGtZero);
        }
        if counters == 0 {
            return Err(Errors::TotalCountersGtZero);
        }
        debug!("Initialized Indicator with sample size {} and counters {}", sample_size, counters);
        Ok(Indicator {
            sketch: FrequencySketch::new(counters),
            frequencies: HashMap::new(),
            hint_sum: 0,
            hint_count: 0,
            sample: 0,
            sample_size,
            maximum_size,
        })
    }

    pub(crate) fn observe(&mut self, key_hash: KeyHash) -> Option<Resize> {
        self.record(key_hash);
        self.sample += 1;
        if self.sample < self.sample_size {
            return None;
        }

        let indicator = self.indicator() * WINDOW_SHARE;
        let wanted_window = (indicator * self.maximum_size as f64).round() as TotalCapacity;
        debug!("Indicator {:.4}, wanted window {}", indicator, wanted_window);

        self.reset();
        Some(Resize::Target(wanted_window))
    }

    fn record(&mut self, key_hash: KeyHash) {
        self.hint_sum += self.sketch.frequency(key_hash) as u64;
        self.hint_count += 1;
        self.sketch.increment(key_hash);
        *self.frequencies.entry(key_hash).or_insert(0) += 1;
    }

    fn hint(&self) -> f64 {
        if self.hint_count == 0 {
            return 0.0;
        }
        self.hint_sum as f64 / self.hint_count as f64
    }

    /// Skew is the negated slope of the least squares line through `(rank, ln(frequency))` of the 70 most
    /// frequent keys. Fewer than 2 distinct keys is treated as fully skewed (1.0).
    fn skew(&self) -> f64 {
        let mut counts = self.frequencies.values().copied().collect::<Vec<u64>>();
        counts.sort_unstable_by(|left, right| right.cmp(left));
        counts.truncate(TOP_KEYS);
        if counts.len() < 2 {
            return 1.0;
        }

        let points = counts
            .iter()
            .enumerate()
            .map(|(index, count)| ((index + 1) as f64, (*count as f64).ln()))
            .collect::<Vec<(f64, f64)>>();

        let total = points.len() as f64;
        let mean_rank = points.iter().map(|(rank, _)| rank).sum::<f64>() / total;
        let mean_log = points.iter().map(|(_, log)| log).sum::<f64>() / total;

        let (covariance, variance) = points.iter().fold((0.0, 0.0), |(covariance, variance), (rank, log)| {
            (covariance + (rank - mean_rank) * (log - mean_log), variance + (rank - mean_rank).powi(2))
        });
        -(covariance / variance)
    }

    fn indicator(&self) -> f64 {
        let skew = self.skew();
        let popularity = if skew < 1.0 { self.hint() * (1.0 - skew.powi(3)) } else { 0.0 };
        popularity / MAX_FREQUENCY
    }

    fn reset(&mut self) {
        self.sketch.clear();
        self.frequencies.clear();
        self.hint_sum = 0;
        self.hint_count = 0;
        self.sample = 0;
    }
}
