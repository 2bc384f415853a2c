use log::{debug, info};

use crate::cache::types::{FrequencyEstimate, KeyHash, TotalCounters};

const ROWS: usize = 4;
const SEEDS: [u64; ROWS] = [0xc3a5c85c97cb3127, 0xb492b66fbe98f273, 0x9ae16a3b2f90404f, 0xcbf29ce484222325];

const SPREAD_MULTIPLIER: u32 = 0x45d9f3b;
const SPREAD_SEED: u32 = 1033096058;

const MAX_COUNTER_VALUE: u64 = 0x0f;
const LOWER_BIT_OF_EACH_COUNTER: u64 = 0x1111_1111_1111_1111;
const HALF_COUNTERS_BITS: u64 = 0x7777_7777_7777_7777;
const RESET_PERIOD_MULTIPLIER: u64 = 10;
const MIN_TABLE_LENGTH: TotalCounters = 2;
const MAX_TABLE_LENGTH: TotalCounters = 1 << 30;

/// Implementation of a count-min sketch with 4 bit counters and periodic aging.
///
/// The table is a power-of-two sized vector of 64 bit words, every word packs 16 counters of 4 bits each.
/// A key touches one word per row (4 rows), and inside the word it touches one 4 bit counter.
/// The counter positions for a key are derived from `(spread(key_hash) & 3) << 2` plus the row number, so
/// the four counters of a key always land on distinct counter positions.
///
/// Every increment that changes at least one counter adds `step` to `additions`.
/// Once `additions` reaches `period` (10 times the table length), all the counters are halved
/// and `additions` is reduced accordingly. This keeps recent accesses more important than older ones.
pub(crate) struct FrequencySketch {
    table: Vec<u64>,
    table_mask: u64,
    step: u64,
    additions: u64,
    period: u64,
    resets: u64,
}

impl FrequencySketch {
    pub(crate) fn new(counters: TotalCounters) -> FrequencySketch {
        Self::with_step(counters, 1)
    }

    pub(crate) fn with_step(counters: TotalCounters, step: u64) -> FrequencySketch {
        let table_length = Self::table_length_for(counters);
        let sketch = FrequencySketch {
            table: vec![0; table_length as usize],
            table_mask: table_length - 1,
            step,
            additions: 0,
            period: RESET_PERIOD_MULTIPLIER * table_length,
            resets: 0,
        };
        info!(
            "Initialized FrequencySketch with table length {}, step {} and reset period {}",
            table_length, sketch.step, sketch.period
        );
        sketch
    }

    /// Records one access of the key_hash.
    /// Returns true if at least one of the 4 counters of the key_hash was incremented,
    /// all the counters being saturated at 15 results in false.
    pub(crate) fn increment(&mut self, key_hash: KeyHash) -> bool {
        let hash = Self::spread(Self::fold(key_hash));
        let start = (hash & 3) << 2;

        let mut added = false;
        for row in 0..ROWS {
            let index = self.index_of(hash, row);
            added |= self.increment_at(index, start + row as u32);
        }
        if added {
            self.additions += self.step;
            if self.additions >= self.period {
                let odd_counters = self.reset();
                self.additions = (self.additions >> 1).saturating_sub(odd_counters >> 2);
            }
        }
        added
    }

    /// Returns the estimated access frequency of the key_hash, which is the minimum of its 4 counters.
    pub(crate) fn frequency(&self, key_hash: KeyHash) -> FrequencyEstimate {
        let hash = Self::spread(Self::fold(key_hash));
        let start = (hash & 3) << 2;

        (0..ROWS)
            .map(|row| {
                let offset = (start + row as u32) << 2;
                (self.table[self.index_of(hash, row)] >> offset) & MAX_COUNTER_VALUE
            })
            .min()
            .unwrap_or(0) as FrequencyEstimate
    }

    pub(crate) fn clear(&mut self) {
        debug!("Clearing FrequencySketch");
        self.table.iter_mut().for_each(|word| *word = 0);
        self.additions = 0;
    }

    #[cfg(test)]
    pub(crate) fn table_length(&self) -> u64 {
        self.table.len() as u64
    }

    #[cfg(test)]
    pub(crate) fn period(&self) -> u64 {
        self.period
    }

    #[cfg(test)]
    pub(crate) fn additions(&self) -> u64 {
        self.additions
    }

    #[cfg(any(test, feature = "bench_testable"))]
    pub(crate) fn resets(&self) -> u64 {
        self.resets
    }

    /// Halves every counter, returns the number of counters that were odd before halving.
    fn reset(&mut self) -> u64 {
        let mut odd_counters = 0;
        self.table.iter_mut().for_each(|word| {
            odd_counters += (*word & LOWER_BIT_OF_EACH_COUNTER).count_ones() as u64;
            *word = (*word >> 1) & HALF_COUNTERS_BITS;
        });
        self.resets += 1;
        debug!(
            "Reset FrequencySketch after {} additions, odd counters {}, total resets {}",
            self.additions, odd_counters, self.resets
        );
        odd_counters
    }

    fn increment_at(&mut self, index: usize, counter: u32) -> bool {
        let offset = counter << 2;
        let mask = MAX_COUNTER_VALUE << offset;
        let word = self.table[index];

        if word & mask != mask {
            let current = (word & mask) >> offset;
            let updated = (current + self.step).min(MAX_COUNTER_VALUE);
            self.table[index] = (word & !mask) | (updated << offset);
            return true;
        }
        false
    }

    fn index_of(&self, hash: u32, row: usize) -> usize {
        let mut index = SEEDS[row].wrapping_mul(hash as i32 as i64 as u64);
        index = index.wrapping_add(index >> 32);
        ((index & 0xffff_ffff) & self.table_mask) as usize
    }

    /// Folds the 64 bit key_hash into 32 bits, the upper half is mixed into the lower half.
    fn fold(key_hash: KeyHash) -> u32 {
        (key_hash ^ (key_hash >> 32)) as u32
    }

    fn spread(value: u32) -> u32 {
        let mut spread = ((value >> 16) ^ value).wrapping_mul(SPREAD_MULTIPLIER);
        spread = ((spread >> 16) ^ spread).wrapping_mul(SPREAD_SEED);
        (spread >> 16) ^ spread
    }

    /// Table length is the next power of 2 of the counters, bounded by `[2, 2^30]`.
    /// Row indexes never exceed 32 bits, so a longer table would only waste memory.
    fn table_length_for(counters: TotalCounters) -> u64 {
        Self::next_power_2(counters.clamp(MIN_TABLE_LENGTH, MAX_TABLE_LENGTH))
    }

    fn next_power_2(counters: TotalCounters) -> u64 {
        let mut updated_counters = counters;
        updated_counters -= 1;

        updated_counters |= updated_counters >> 1;
        updated_counters |= updated_counters >> 2;
        updated_counters |= updated_counters >> 4;
        updated_counters |= updated_counters >> 8;
        updated_counters |= updated_counters >> 16;
        updated_counters |= updated_counters >> 32;

        updated_counters += 1;
        updated_counters
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::lfu::frequency_sketch::{FrequencySketch, HALF_COUNTERS_BITS};

    #[test]
    fn table_length() {
        let sketch = FrequencySketch::new(18);
        assert_eq!(32, sketch.table_length());
    }

    #[test]
    fn table_length_for_power_of_2() {
        let sketch = FrequencySketch::new(16);
        assert_eq!(16, sketch.table_length());
        assert_eq!(160, sketch.period());
    }

    #[test]
    fn table_length_for_a_single_counter() {
        let sketch = FrequencySketch::new(1);
        assert_eq!(2, sketch.table_length());
    }

    #[test]
    fn table_length_is_bounded_for_huge_counters() {
        assert_eq!(1 << 30, FrequencySketch::table_length_for(u64::MAX));
        assert_eq!(1 << 30, FrequencySketch::table_length_for((1 << 30) + 1));
        assert_eq!(1 << 30, FrequencySketch::table_length_for(1 << 30));
        assert_eq!(1 << 10, FrequencySketch::table_length_for(1000));
    }

    #[test]
    fn increment_one_key_single_time() {
        let mut sketch = FrequencySketch::new(10);
        sketch.increment(10);

        assert_eq!(1, sketch.frequency(10));
    }

    #[test]
    fn increment_one_key_multiple_times() {
        let mut sketch = FrequencySketch::new(64);
        sketch.increment(10);
        sketch.increment(10);
        sketch.increment(10);

        assert_eq!(3, sketch.frequency(10));
    }

    #[test]
    fn frequency_of_an_unseen_key_in_an_empty_sketch() {
        let sketch = FrequencySketch::new(64);
        assert_eq!(0, sketch.frequency(200));
    }

    #[test]
    fn increment_with_a_step() {
        let mut sketch = FrequencySketch::with_step(64, 2);
        sketch.increment(10);
        sketch.increment(10);

        assert_eq!(4, sketch.frequency(10));
        assert_eq!(4, sketch.additions());
    }

    #[test]
    fn counters_saturate_at_15() {
        let mut sketch = FrequencySketch::new(1024);
        for _ in 0..15 {
            assert!(sketch.increment(42));
        }
        assert!(!sketch.increment(42));
        assert_eq!(15, sketch.frequency(42));
        assert_eq!(15, sketch.additions());
    }

    #[test]
    fn frequency_is_non_decreasing_until_reset() {
        let mut sketch = FrequencySketch::new(1024);
        let mut previous = sketch.frequency(7);
        for _ in 0..40 {
            sketch.increment(7);
            let current = sketch.frequency(7);
            assert!(current >= previous);
            assert!(current <= 15);
            previous = current;
        }
        assert_eq!(0, sketch.resets());
    }

    #[test]
    fn keys_wider_than_32_bits_are_folded() {
        let mut sketch = FrequencySketch::new(64);
        sketch.increment(u64::MAX);
        sketch.increment(u64::MAX);

        assert_eq!(2, sketch.frequency(u64::MAX));
        assert_eq!(sketch.frequency(u64::MAX), sketch.frequency(0));
    }

    #[test]
    fn reset_after_period_additions() {
        let mut sketch = FrequencySketch::new(16);
        for _ in 0..15 {
            sketch.increment(1);
        }
        assert_eq!(15, sketch.frequency(1));

        let mut key = 1000;
        while sketch.resets() == 0 {
            let before = sketch.additions();
            if sketch.increment(key) && sketch.resets() == 0 {
                assert_eq!(before + 1, sketch.additions());
            }
            key += 1;
        }

        assert_eq!(1, sketch.resets());
        assert_eq!(7, sketch.frequency(1));
        assert!(sketch.additions() <= 80);
        assert!(sketch.table.iter().all(|word| word & !HALF_COUNTERS_BITS == 0));
    }

    #[test]
    fn reset_halves_every_counter() {
        let mut sketch = FrequencySketch::new(2);
        sketch.table[0] = 0xffff_ffff_ffff_ffff;
        sketch.table[1] = 0x0123_4567_89ab_cdef;

        let odd_counters = sketch.reset();

        assert_eq!(0x7777_7777_7777_7777, sketch.table[0]);
        assert_eq!(0x0011_2233_4455_6677, sketch.table[1]);
        assert_eq!(16 + 8, odd_counters);
    }

    #[test]
    fn reset_never_increases_a_counter() {
        let mut sketch = FrequencySketch::new(64);
        (0..500u64).for_each(|key| { sketch.increment(key % 37); });
        let before = sketch.table.clone();

        sketch.reset();

        for (before, after) in before.iter().zip(sketch.table.iter()) {
            for counter in 0..16 {
                let offset = counter << 2;
                assert!((after >> offset) & 0x0f <= (before >> offset) & 0x0f);
            }
        }
    }

    #[test]
    fn clear() {
        let mut sketch = FrequencySketch::new(64);
        sketch.increment(10);
        sketch.increment(10);

        sketch.clear();
        assert_eq!(0, sketch.frequency(10));
        assert_eq!(0, sketch.additions());
    }
}
