//! Single-slot Gaussian noise memo.

use super::SignalError;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;

#[derive(Debug, Clone)]
struct NoiseEntry {
    mean: f64,
    variance: f64,
    samples: Vec<f64>,
}

/// Remembers the last noise draw, keyed by (mean, variance).
///
/// Holds at most one entry. A request with a different key replaces it, so
/// updates that leave the noise parameters alone reuse the same draw.
pub struct NoiseCache {
    len: usize,
    rng: StdRng,
    entry: Option<NoiseEntry>,
}

impl NoiseCache {
    /// Cache producing sequences of `len` samples from an entropy-seeded generator.
    pub fn new(len: usize) -> Self {
        Self::with_rng(len, StdRng::from_entropy())
    }

    /// Deterministic cache for reproducible runs.
    pub fn seeded(len: usize, seed: u64) -> Self {
        Self::with_rng(len, StdRng::seed_from_u64(seed))
    }

    fn with_rng(len: usize, rng: StdRng) -> Self {
        Self {
            len,
            rng,
            entry: None,
        }
    }

    /// Noise with the given mean and variance; a fresh draw only when the
    /// key differs from the cached one.
    pub fn get(&mut self, mean: f64, variance: f64) -> Result<&[f64], SignalError> {
        if !self.is_cached(mean, variance) {
            let samples = self.draw(mean, variance)?;
            log::debug!("New noise draw (mean={}, variance={})", mean, variance);
            self.entry = Some(NoiseEntry {
                mean,
                variance,
                samples,
            });
        }

        Ok(self
            .entry
            .as_ref()
            .map_or(&[][..], |entry| entry.samples.as_slice()))
    }

    pub fn is_cached(&self, mean: f64, variance: f64) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| entry.mean == mean && entry.variance == variance)
    }

    /// Drop the cached draw.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn draw(&mut self, mean: f64, variance: f64) -> Result<Vec<f64>, SignalError> {
        if !mean.is_finite() || !variance.is_finite() || variance < 0.0 {
            return Err(SignalError::InvalidNoise { mean, variance });
        }
        if variance == 0.0 {
            return Ok(vec![mean; self.len]);
        }

        let normal = Normal::new(mean, variance.sqrt())
            .map_err(|e| SignalError::Distribution(e.to_string()))?;
        Ok(normal.sample_iter(&mut self.rng).take(self.len).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::statistics::Statistics;

    #[test]
    fn same_key_returns_identical_draw() {
        let mut cache = NoiseCache::seeded(1_000, 7);
        let first = cache.get(0.0, 0.1).unwrap().to_vec();
        let second = cache.get(0.0, 0.1).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1_000);
    }

    #[test]
    fn changed_key_draws_again() {
        let mut cache = NoiseCache::seeded(1_000, 7);
        let base = cache.get(0.0, 0.1).unwrap().to_vec();

        let new_mean = cache.get(0.05, 0.1).unwrap().to_vec();
        assert_ne!(base, new_mean);
        assert!(!cache.is_cached(0.0, 0.1));

        let new_variance = cache.get(0.05, 0.2).unwrap().to_vec();
        assert_ne!(new_mean, new_variance);

        // Returning to an earlier key is a new draw: the cache has one slot
        let again = cache.get(0.0, 0.1).unwrap().to_vec();
        assert_ne!(base, again);
    }

    #[test]
    fn clear_forces_new_draw() {
        let mut cache = NoiseCache::seeded(500, 3);
        let before = cache.get(0.0, 0.1).unwrap().to_vec();
        cache.clear();
        assert!(!cache.is_cached(0.0, 0.1));
        let after = cache.get(0.0, 0.1).unwrap().to_vec();
        assert_ne!(before, after);
    }

    #[test]
    fn draw_has_requested_moments() {
        let mut cache = NoiseCache::seeded(20_000, 11);
        let noise = cache.get(0.5, 0.25).unwrap();
        assert_relative_eq!(noise.mean(), 0.5, epsilon = 0.02);
        assert_relative_eq!(noise.std_dev(), 0.5, epsilon = 0.02);
    }

    #[test]
    fn zero_variance_is_constant() {
        let mut cache = NoiseCache::seeded(10, 1);
        assert!(cache.get(0.3, 0.0).unwrap().iter().all(|&v| v == 0.3));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let mut cache = NoiseCache::seeded(10, 1);
        assert!(matches!(
            cache.get(0.0, -0.1),
            Err(SignalError::InvalidNoise { .. })
        ));
        assert!(cache.get(f64::NAN, 0.1).is_err());
        assert!(!cache.is_cached(0.0, -0.1));
    }
}
