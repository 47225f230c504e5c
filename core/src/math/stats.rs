pub struct StatsHelper;

impl StatsHelper {
    /// Mean of the squared samples. Empty input yields NaN, matching a mean
    /// over zero elements.
    pub fn mean_square(samples: &[f64]) -> f64 {
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        sum_sq / samples.len() as f64
    }

    pub fn rms(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        Self::mean_square(samples).sqrt()
    }

    /// Mean squared error between two windows of equal length.
    pub fn mse(lhs: &[f64], rhs: &[f64]) -> f64 {
        debug_assert_eq!(lhs.len(), rhs.len());
        let sum_sq: f64 = lhs
            .iter()
            .zip(rhs)
            .map(|(&l, &r)| {
                let diff = l - r;
                diff * diff
            })
            .sum();
        sum_sq / lhs.len() as f64
    }
}
