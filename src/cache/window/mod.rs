use std::hash::Hash;

use crate::cache::policy::segmented_cache::SegmentedCache;
use crate::cache::types::{KeyHash, TotalCapacity};
use crate::cache::window::hill_climb::HillClimb;
use crate::cache::window::indicator::Indicator;

pub(crate) mod hill_climb;
pub(crate) mod indicator;

/// Resize requested by a window controller at the end of a sample.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Resize {
    Increase(TotalCapacity),
    Decrease(TotalCapacity),
    /// Resize the window to the given size.
    Target(TotalCapacity),
}

impl Resize {
    pub(crate) fn apply<Key>(self, cache: &mut SegmentedCache<Key>)
        where Key: Hash + Eq + Clone {
        match self {
            Resize::Increase(amount) => cache.increase_window(amount),
            Resize::Decrease(amount) => cache.decrease_window(amount),
            Resize::Target(wanted_window) => cache.adjust(wanted_window),
        }
    }
}

/// WindowController observes every access once the cache is full and, on its own sampling cadence,
/// asks the cache to move capacity between the window and the protected region.
pub(crate) enum WindowController {
    HillClimb(HillClimb),
    Indicator(Indicator),
}

impl WindowController {
    pub(crate) fn observe<Key>(&mut self, cache: &mut SegmentedCache<Key>, key_hash: KeyHash, hit: bool)
        where Key: Hash + Eq + Clone {
        if !cache.is_full() {
            return;
        }
        let resize = match self {
            WindowController::HillClimb(hill_climb) => hill_climb.observe(hit),
            WindowController::Indicator(indicator) => indicator.observe(key_hash),
        };
        if let Some(resize) = resize {
            resize.apply(cache);
        }
    }
}
