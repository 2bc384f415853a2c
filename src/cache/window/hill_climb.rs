use log::debug;

use crate::cache::errors::Errors;
use crate::cache::types::TotalCapacity;
use crate::cache::window::Resize;

const NOISE_MARGIN: f64 = 0.01;

/// HillClimb searches the window size that maximizes the hit rate.
///
/// Every `sample_size` observations the hits of the sample are compared against the hits of the previous sample.
/// Unless the current sample is better than the previous one by at least 1% of the sample size, the direction flips.
/// The window then moves by `pivot` units in the current direction.
/// The first sample (no previous hits) only establishes the baseline.
pub(crate) struct HillClimb {
    sample_size: u64,
    pivot: TotalCapacity,
    sample: u64,
    hits_in_sample: u64,
    hits_in_previous: u64,
    increase_direction: bool,
}

impl HillClimb {
    pub(crate) fn new(maximum_size: TotalCapacity, sample_multiplier: u64, pivot: f64) -> Result<Self, Errors> {
        if sample_multiplier == 0 {
            return Err(Errors::SampleMultiplierGtZero);
        }
        let pivot = (pivot * maximum_size as f64).round();
        if !(pivot >= 1.0) {
            return Err(Errors::PivotGtZero);
        }
        let hill_climb = HillClimb {
            sample_size: sample_multiplier.saturating_mul(maximum_size),
            pivot: pivot as TotalCapacity,
            sample: 0,
            hits_in_sample: 0,
            hits_in_previous: 0,
            increase_direction: false,
        };
        debug!("Initialized HillClimb with sample size {} and pivot {}", hill_climb.sample_size, hill_climb.pivot);
        Ok(hill_climb)
    }

    pub(crate) fn observe(&mut self, hit: bool) -> Option<Resize> {
        if hit {
            self.hits_in_sample += 1;
        }
        self.sample += 1;
        if self.sample < self.sample_size {
            return None;
        }

        let resize = if self.hits_in_previous > 0 {
            let previous = self.hits_in_previous as f64 + self.sample as f64 * NOISE_MARGIN;
            if previous > self.hits_in_sample as f64 {
                self.increase_direction = !self.increase_direction;
            }
            debug!(
                "HillClimb sample hits {}, previous hits {}, increasing {}",
                self.hits_in_sample, self.hits_in_previous, self.increase_direction
            );
            if self.increase_direction {
                Some(Resize::Increase(self.pivot))
            } else {
                Some(Resize::Decrease(self.pivot))
            }
        } else {
            None
        };

        self.hits_in_previous = self.hits_in_sample;
        self.hits_in_sample = 0;
        self.sample = 0;
        resize
    }

    pub(crate) fn sample_size(&self) -> u64 {
        self.sample_size
    }

    pub(crate) fn pivot(&self) -> TotalCapacity {
        self.pivot
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::errors::Errors;
    use crate::cache::window::hill_climb::HillClimb;
    use crate::cache::window::Resize;

    fn run_sample(hill_climb: &mut HillClimb, hits: u64) -> Option<Resize> {
        let mut resize = None;
        for index in 0..hill_climb.sample_size() {
            resize = hill_climb.observe(index < hits);
        }
        resize
    }

    #[test]
    fn sample_size_and_pivot() {
        let hill_climb = HillClimb::new(1000, 10, 0.05).unwrap();

        assert_eq!(10_000, hill_climb.sample_size());
        assert_eq!(50, hill_climb.pivot());
    }

    #[test]
    fn sample_size_saturates_for_the_largest_maximum_size() {
        let hill_climb = HillClimb::new(u64::MAX, 10, 0.05).unwrap();
        assert_eq!(u64::MAX, hill_climb.sample_size());
    }

    #[test]
    fn pivot_is_rounded() {
        let hill_climb = HillClimb::new(30, 10, 0.05).unwrap();
        assert_eq!(2, hill_climb.pivot());
    }

    #[test]
    fn pivot_rounding_to_zero_is_rejected() {
        assert!(matches!(HillClimb::new(10, 10, 0.01), Err(Errors::PivotGtZero)));
    }

    #[test]
    fn sample_multiplier_of_zero_is_rejected() {
        assert!(matches!(HillClimb::new(100, 0, 0.05), Err(Errors::SampleMultiplierGtZero)));
    }

    #[test]
    fn no_decision_within_a_sample() {
        let mut hill_climb = HillClimb::new(10, 2, 0.1).unwrap();
        for _ in 0..19 {
            assert_eq!(None, hill_climb.observe(true));
        }
    }

    #[test]
    fn first_sample_only_sets_the_baseline() {
        let mut hill_climb = HillClimb::new(100, 1, 0.05).unwrap();
        assert_eq!(None, run_sample(&mut hill_climb, 50));
    }

    #[test]
    fn sample_without_hits_never_decides() {
        let mut hill_climb = HillClimb::new(100, 1, 0.05).unwrap();
        assert_eq!(None, run_sample(&mut hill_climb, 0));
        assert_eq!(None, run_sample(&mut hill_climb, 0));
    }

    #[test]
    fn clearly_better_sample_keeps_the_direction() {
        let mut hill_climb = HillClimb::new(100, 1, 0.05).unwrap();
        run_sample(&mut hill_climb, 10);

        assert_eq!(Some(Resize::Increase(5)), run_sample(&mut hill_climb, 5));
        assert_eq!(Some(Resize::Increase(5)), run_sample(&mut hill_climb, 20));
    }

    #[test]
    fn worse_sample_flips_the_direction() {
        let mut hill_climb = HillClimb::new(100, 1, 0.05).unwrap();
        run_sample(&mut hill_climb, 50);

        assert_eq!(Some(Resize::Increase(5)), run_sample(&mut hill_climb, 40));
        assert_eq!(Some(Resize::Decrease(5)), run_sample(&mut hill_climb, 30));
        assert_eq!(Some(Resize::Increase(5)), run_sample(&mut hill_climb, 20));
    }

    #[test]
    fn improvement_within_the_noise_margin_flips_the_direction() {
        let mut hill_climb = HillClimb::new(1000, 1, 0.05).unwrap();
        run_sample(&mut hill_climb, 100);

        assert_eq!(Some(Resize::Increase(50)), run_sample(&mut hill_climb, 105));
        assert_eq!(Some(Resize::Increase(50)), run_sample(&mut hill_climb, 200));
    }
}
