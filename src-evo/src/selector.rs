use rand::Rng;

use crate::EvoError;

/// Roulette-wheel (weighted random) sampling primitive.
///
/// Items are drawn with probability proportional to their weight. Ties are
/// broken by insertion order: the first item whose cumulative weight reaches
/// the drawn threshold wins.
#[derive(Debug, Clone)]
pub struct WeightedSelector<T> {
    items: Vec<(T, f64)>,
    total_weight: f64,
}

impl<T> WeightedSelector<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            total_weight: 0.0,
        }
    }

    /// Append an item with a non-negative weight
    pub fn add(&mut self, item: T, weight: f64) -> Result<(), EvoError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(EvoError::InvalidWeight(weight));
        }
        self.items.push((item, weight));
        self.total_weight += weight;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Draw one item with probability proportional to its weight.
    ///
    /// Fails on an empty or zero-total-weight pool rather than returning a
    /// meaningless pick.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&T, EvoError> {
        if self.items.is_empty() || self.total_weight <= 0.0 {
            return Err(EvoError::SelectionExhausted);
        }

        let threshold = rng.random::<f64>() * self.total_weight;
        let mut accumulated = 0.0;

        for (item, weight) in &self.items {
            accumulated += weight;
            if accumulated >= threshold {
                return Ok(item);
            }
        }

        // floating-point shortfall in the accumulation; the last item wins
        Ok(&self.items[self.items.len() - 1].0)
    }

    /// Draw `count` distinct items without replacement.
    ///
    /// Draws operate on a scratch copy of the pool, so the selector itself is
    /// left untouched. Returns fewer than `count` items only when the pool is
    /// exhausted first; a non-empty remainder with zero total weight fails.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<T>, EvoError>
    where
        T: Clone,
    {
        let mut pool: Vec<(usize, f64)> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, (_, weight))| (index, *weight))
            .collect();

        let mut chosen = Vec::with_capacity(count.min(pool.len()));

        while chosen.len() < count && !pool.is_empty() {
            let total: f64 = pool.iter().map(|(_, weight)| weight).sum();
            if total <= 0.0 {
                return Err(EvoError::SelectionExhausted);
            }

            let threshold = rng.random::<f64>() * total;
            let mut accumulated = 0.0;
            let mut picked = pool.len() - 1;

            for (position, (_, weight)) in pool.iter().enumerate() {
                accumulated += weight;
                if accumulated >= threshold {
                    picked = position;
                    break;
                }
            }

            let (index, _) = pool.remove(picked);
            chosen.push(self.items[index].0.clone());
        }

        Ok(chosen)
    }
}

impl<T> Default for WeightedSelector<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        let mut selector = WeightedSelector::new();
        assert!(selector.add("a", -1.0).is_err());
        assert!(selector.add("a", f64::NAN).is_err());
        assert!(selector.add("a", 0.0).is_ok());
        assert!(selector.add("b", 2.5).is_ok());
        assert_eq!(selector.len(), 2);
        assert_eq!(selector.total_weight(), 2.5);
    }

    #[test]
    fn choose_fails_on_empty_or_zero_weight_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: WeightedSelector<u32> = WeightedSelector::new();
        assert!(matches!(
            empty.choose(&mut rng),
            Err(EvoError::SelectionExhausted)
        ));

        let mut zeroed = WeightedSelector::new();
        zeroed.add(1u32, 0.0).unwrap();
        assert!(matches!(
            zeroed.choose(&mut rng),
            Err(EvoError::SelectionExhausted)
        ));
    }

    #[test]
    fn choose_never_picks_zero_weight_items() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut selector = WeightedSelector::new();
        selector.add("never", 0.0).unwrap();
        selector.add("always", 1.0).unwrap();
        for _ in 0..500 {
            assert_eq!(*selector.choose(&mut rng).unwrap(), "always");
        }
    }

    #[test]
    fn sample_returns_distinct_items() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut selector = WeightedSelector::new();
        for i in 0..10u32 {
            selector.add(i, 1.0 + i as f64).unwrap();
        }

        for _ in 0..100 {
            let picked = selector.sample(4, &mut rng).unwrap();
            assert_eq!(picked.len(), 4);
            let mut sorted = picked.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 4, "duplicates in {:?}", picked);
        }
        // the pool itself is untouched by sampling
        assert_eq!(selector.len(), 10);
    }

    #[test]
    fn sample_stops_at_pool_exhaustion() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut selector = WeightedSelector::new();
        selector.add("x", 1.0).unwrap();
        selector.add("y", 1.0).unwrap();
        let picked = selector.sample(5, &mut rng).unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn equal_weights_approximate_uniform_selection() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut selector = WeightedSelector::new();
        for i in 0..4u32 {
            selector.add(i, 1.0).unwrap();
        }

        let mut counts = [0usize; 4];
        let draws = 40_000;
        for _ in 0..draws {
            counts[*selector.choose(&mut rng).unwrap() as usize] += 1;
        }

        let expected = draws / 4;
        for (i, &count) in counts.iter().enumerate() {
            let deviation = (count as f64 - expected as f64).abs() / expected as f64;
            assert!(deviation < 0.05, "item {} drawn {} times", i, count);
        }
    }
}
