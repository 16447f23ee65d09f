//! Sampling primitives shared by every attribute sampler
//!
//! Each attribute of a passenger is drawn from a fixed discrete table. Rather
//! than repeating the draw logic per attribute, tables are expressed as a
//! [`Categorical`] over typed values or a [`Flag`] for yes/no draws. Both
//! implement [`Distribution`], so callers inject whatever `Rng` they like
//! (thread-local in production, seeded `ChaCha8Rng` in tests).

use rand::distributions::{Bernoulli, Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{FareError, Result};

/// Weighted draw over a fixed set of values.
///
/// Weights are relative and need not sum to one.
#[derive(Clone, Debug)]
pub struct Categorical<T> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Clone> Categorical<T> {
    pub fn new(table: impl IntoIterator<Item = (T, f64)>) -> Result<Self> {
        let (values, weights): (Vec<T>, Vec<f64>) = table.into_iter().unzip();

        if let Some(w) = weights.iter().find(|w| !w.is_finite()) {
            return Err(FareError::config(format!("non-finite weight {w}")));
        }

        let index = WeightedIndex::new(&weights)
            .map_err(|e| FareError::config(format!("bad probability table: {e}")))?;

        Ok(Self { values, index })
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: Clone> Distribution<T> for Categorical<T> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)].clone()
    }
}

/// Independent yes/no draw with a fixed probability.
#[derive(Clone, Copy, Debug)]
pub struct Flag {
    probability: f64,
    inner: Bernoulli,
}

impl Flag {
    pub fn new(probability: f64) -> Result<Self> {
        let inner = Bernoulli::new(probability).map_err(|_| {
            FareError::config(format!("probability {probability} outside [0, 1]"))
        })?;
        Ok(Self { probability, inner })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Distribution<bool> for Flag {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.inner.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_categorical_frequencies() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let dist = Categorical::new([('a', 0.2), ('b', 0.8)]).unwrap();

        let draws = 20_000;
        let a_count = (0..draws).filter(|_| dist.sample(&mut rng) == 'a').count();
        let freq = a_count as f64 / draws as f64;

        assert!((freq - 0.2).abs() < 0.02, "freq {freq}");
    }

    #[test]
    fn test_categorical_zero_weight_never_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let dist = Categorical::new([(1u8, 0.0), (2u8, 1.0)]).unwrap();

        assert!((0..1_000).all(|_| dist.sample(&mut rng) == 2));
    }

    #[test]
    fn test_categorical_rejects_bad_tables() {
        assert!(Categorical::<u8>::new([]).is_err());
        assert!(Categorical::new([(1u8, 0.0), (2u8, 0.0)]).is_err());
        assert!(Categorical::new([(1u8, -0.5), (2u8, 1.0)]).is_err());
        assert!(Categorical::new([(1u8, f64::NAN)]).is_err());
        assert!(Categorical::new([(1u8, f64::INFINITY)]).is_err());
    }

    #[test]
    fn test_flag_bounds() {
        assert!(Flag::new(-0.1).is_err());
        assert!(Flag::new(1.1).is_err());

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let always = Flag::new(1.0).unwrap();
        let never = Flag::new(0.0).unwrap();
        assert!((0..100).all(|_| always.sample(&mut rng)));
        assert!((0..100).all(|_| !never.sample(&mut rng)));
    }
}
