//! Weighted discrete sampling.
//!
//! [`WeightedSampler`] selects one of a finite set of items with probability
//! proportional to a configured percentage. Construction precomputes the
//! cumulative percentages so each draw is a single uniform variate plus a
//! binary search.

use rand::Rng;

use crate::error::SamplerError;

/// Weighted choice over a fixed item set.
///
/// Percentages must lie in [0, 100] and add up to exactly `100.0`; there is
/// no tolerance, so callers building weights from arithmetic should use
/// whole percentages.
///
/// # Examples
///
/// ```
/// use mockfin_core::sampler::WeightedSampler;
/// use mockfin_core::rng::MockRng;
///
/// let sampler = WeightedSampler::new(vec![('a', 25.0), ('b', 30.0), ('c', 45.0)]).unwrap();
/// assert_eq!(sampler.cumulative(), &[25.0, 55.0, 100.0]);
///
/// let mut rng = MockRng::from_seed(1);
/// let item = sampler.draw(&mut rng);
/// assert!(['a', 'b', 'c'].contains(item));
/// ```
#[derive(Clone, Debug)]
pub struct WeightedSampler<T> {
    items: Vec<T>,
    cumulative: Vec<f64>,
}

impl<T> WeightedSampler<T> {
    /// Total all percentages must add up to.
    pub const TOTAL: f64 = 100.0;

    /// Builds a sampler from `(item, percent)` pairs.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::Empty`] when `weighted` is empty
    /// - [`SamplerError::PercentOutOfRange`] when a percentage is outside [0, 100]
    /// - [`SamplerError::InvalidTotal`] when percentages do not sum to exactly 100
    pub fn new(weighted: Vec<(T, f64)>) -> Result<Self, SamplerError> {
        if weighted.is_empty() {
            return Err(SamplerError::Empty);
        }

        let mut items = Vec::with_capacity(weighted.len());
        let mut cumulative = Vec::with_capacity(weighted.len());
        let mut running = 0.0;

        for (index, (item, percent)) in weighted.into_iter().enumerate() {
            if !(0.0..=Self::TOTAL).contains(&percent) {
                return Err(SamplerError::PercentOutOfRange { index, percent });
            }
            running += percent;
            items.push(item);
            cumulative.push(running);
        }

        if running != Self::TOTAL {
            return Err(SamplerError::InvalidTotal(running));
        }

        Ok(Self { items, cumulative })
    }

    /// Draws one item.
    ///
    /// Samples `r` uniformly in [0, 100) and returns the first item whose
    /// cumulative percentage exceeds `r`. Zero-weight items are never
    /// returned. On an exact tie (`r` equal to a cumulative boundary) the
    /// draw goes to the following item, not the one ending at `r`.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> &T {
        let r = rng.gen::<f64>() * Self::TOTAL;
        let index = self.cumulative.partition_point(|&c| c <= r);
        &self.items[index.min(self.items.len() - 1)]
    }

    /// Items in configuration order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Monotonically increasing cumulative percentages.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; construction rejects empty item sets.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::MockRng;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_rejects_empty() {
        let err = WeightedSampler::<u8>::new(vec![]).unwrap_err();
        assert_eq!(err, SamplerError::Empty);
    }

    #[test]
    fn test_rejects_out_of_range_percent() {
        let err = WeightedSampler::new(vec![("a", 120.0), ("b", -20.0)]).unwrap_err();
        assert_eq!(
            err,
            SamplerError::PercentOutOfRange {
                index: 0,
                percent: 120.0
            }
        );
    }

    #[test]
    fn test_rejects_total_not_exactly_100() {
        let err = WeightedSampler::new(vec![("a", 50.0), ("b", 49.9)]).unwrap_err();
        assert!(matches!(err, SamplerError::InvalidTotal(_)));
    }

    #[test]
    fn test_single_item_always_drawn() {
        let sampler = WeightedSampler::new(vec![("only", 100.0)]).unwrap();
        let mut rng = MockRng::from_seed(3);
        for _ in 0..1_000 {
            assert_eq!(*sampler.draw(&mut rng), "only");
        }
    }

    #[test]
    fn test_zero_weight_item_never_drawn() {
        let sampler = WeightedSampler::new(vec![("never", 0.0), ("always", 100.0)]).unwrap();
        let mut rng = MockRng::from_seed(4);
        for _ in 0..1_000 {
            assert_eq!(*sampler.draw(&mut rng), "always");
        }
    }

    #[test]
    fn test_distribution_matches_percentages() {
        let sampler = WeightedSampler::new(vec![("a", 25.0), ("b", 30.0), ("c", 45.0)]).unwrap();
        let mut rng = MockRng::from_seed(42);
        let draws = 10_000;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..draws {
            *counts.entry(*sampler.draw(&mut rng)).or_default() += 1;
        }
        for (item, expected) in [("a", 25.0), ("b", 30.0), ("c", 45.0)] {
            let observed = counts[item] as f64 / draws as f64 * 100.0;
            assert!(
                (observed - expected).abs() < 2.0,
                "{} drawn {:.2}% of the time, expected {}%",
                item,
                observed,
                expected
            );
        }
    }

    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn test_boundary_tie_goes_to_next_item() {
        // An all-zero source yields r == 0.0, tying the zero-weight boundary.
        let sampler = WeightedSampler::new(vec![("never", 0.0), ("first", 50.0), ("second", 50.0)]).unwrap();
        assert_eq!(*sampler.draw(&mut ZeroRng), "first");
    }

    proptest! {
        #[test]
        fn prop_whole_percentages_construct_and_draw(split in 0u32..=100, seed in any::<u64>()) {
            let first = split as f64;
            let second = (100 - split) as f64;
            let sampler = WeightedSampler::new(vec![(0u8, first), (1u8, second)]).unwrap();
            let mut rng = MockRng::from_seed(seed);
            let drawn = *sampler.draw(&mut rng);
            if split == 0 {
                prop_assert_eq!(drawn, 1);
            }
            if split == 100 {
                prop_assert_eq!(drawn, 0);
            }
        }
    }
}
