//! Distance dependent dropout and additive Gaussian range noise.
//!
//! Dropout probability is `base · (d / d_max)^exp`, clamped to `[0, 1]`.
//! Noise is zero-mean Gaussian and is not clamped, so ranges close to zero
//! may come out negative.

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use hippo_core::config::RangeSensorConfig;
use hippo_core::error::{HippoError, Result};

#[derive(Debug, Clone)]
pub struct DropoutNoiseModel {
    base_probability: f64,
    exponent: f64,
    max_distance: f64,
    noise: Normal<f64>,
    uniform: Uniform<f64>,
}

impl DropoutNoiseModel {
    pub fn new(
        base_probability: f64,
        exponent: f64,
        max_distance: f64,
        noise_stddev: f64,
    ) -> Result<Self> {
        let noise = Normal::new(0.0, noise_stddev)
            .map_err(|e| HippoError::invalid("range_noise_stddev", e.to_string()))?;
        Ok(Self {
            base_probability,
            exponent,
            max_distance,
            noise,
            uniform: Uniform::new(0.0, 1.0),
        })
    }

    pub fn from_config(config: &RangeSensorConfig) -> Result<Self> {
        Self::new(
            config.drop_probability,
            config.drop_probability_exp,
            config.max_detection_distance,
            config.range_noise_stddev,
        )
    }

    /// Probability that a measurement at `distance` is dropped.
    pub fn dropout_probability(&self, distance: f64) -> f64 {
        let ratio = distance / self.max_distance;
        (self.base_probability * ratio.powf(self.exponent)).clamp(0.0, 1.0)
    }

    /// Draw whether the measurement at `distance` is dropped.
    pub fn should_drop<R: Rng + ?Sized>(&self, distance: f64, rng: &mut R) -> bool {
        self.uniform.sample(rng) < self.dropout_probability(distance)
    }

    /// Add one Gaussian noise sample to `distance`.
    pub fn apply_noise<R: Rng + ?Sized>(&self, distance: f64, rng: &mut R) -> f64 {
        distance + self.noise.sample(rng)
    }

    /// Drop or perturb one raw distance.
    pub fn measure<R: Rng + ?Sized>(&self, distance: f64, rng: &mut R) -> Option<f64> {
        if self.should_drop(distance, rng) {
            None
        } else {
            Some(self.apply_noise(distance, rng))
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_probability_at_zero_distance() {
        let model = DropoutNoiseModel::new(0.2, 0.0, 5.0, 0.0).unwrap();
        assert_eq!(model.dropout_probability(0.0), 0.2);
    }

    #[test]
    fn test_probability_at_zero_distance_positive_exponent() {
        let model = DropoutNoiseModel::new(0.2, 2.0, 5.0, 0.0).unwrap();
        assert_eq!(model.dropout_probability(0.0), 0.0);
    }

    #[test]
    fn test_probability_at_max_distance_is_base() {
        let model = DropoutNoiseModel::new(0.05, 2.0, 5.0, 0.0).unwrap();
        assert!((model.dropout_probability(5.0) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_probability_grows_with_distance() {
        let model = DropoutNoiseModel::new(0.5, 2.0, 5.0, 0.0).unwrap();
        let near = model.dropout_probability(1.0);
        let mid = model.dropout_probability(3.0);
        let far = model.dropout_probability(4.5);
        assert!(near < mid && mid < far);
    }

    #[test]
    fn test_probability_clamped_beyond_range() {
        let model = DropoutNoiseModel::new(0.5, 2.0, 5.0, 0.0).unwrap();
        for d in [5.0, 10.0, 50.0, 1e6] {
            let p = model.dropout_probability(d);
            assert!((0.0..=1.0).contains(&p), "p={p} at d={d}");
        }
        assert_eq!(model.dropout_probability(1e6), 1.0);
    }

    #[test]
    fn test_never_drops_with_zero_probability() {
        let model = DropoutNoiseModel::new(0.0, 2.0, 5.0, 0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!((0..1000).all(|_| !model.should_drop(4.0, &mut rng)));
    }

    #[test]
    fn test_always_drops_with_certain_probability() {
        let model = DropoutNoiseModel::new(1.0, 0.0, 5.0, 0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!((0..1000).all(|_| model.should_drop(1.0, &mut rng)));
    }

    #[test]
    fn test_drop_rate_matches_probability() {
        let model = DropoutNoiseModel::new(0.3, 0.0, 5.0, 0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let n = 20_000;
        let dropped = (0..n).filter(|_| model.should_drop(2.0, &mut rng)).count();
        let rate = dropped as f64 / n as f64;
        assert!((rate - 0.3).abs() < 0.02, "rate={rate}");
    }

    #[test]
    fn test_zero_stddev_is_noise_free() {
        let model = DropoutNoiseModel::new(0.0, 2.0, 5.0, 0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(model.apply_noise(2.5, &mut rng), 2.5);
    }

    #[test]
    fn test_noise_statistics() {
        let model = DropoutNoiseModel::new(0.0, 2.0, 5.0, 0.1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| model.apply_noise(3.0, &mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 3.0).abs() < 0.005, "mean={mean}");
        assert!((var.sqrt() - 0.1).abs() < 0.005, "std={}", var.sqrt());
    }

    #[test]
    fn test_noise_not_clamped() {
        let model = DropoutNoiseModel::new(0.0, 2.0, 5.0, 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let negatives = (0..1000)
            .filter(|_| model.apply_noise(0.0, &mut rng) < 0.0)
            .count();
        assert!(negatives > 0);
    }

    #[test]
    fn test_invalid_stddev() {
        assert!(DropoutNoiseModel::new(0.0, 2.0, 5.0, -1.0).is_err());
    }
}
