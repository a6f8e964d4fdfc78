//! Per-generation fitness statistics.

use u_numflow::stats;

/// Moments of one generation's fitness vector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Biased sample skewness, `m3 / m2^1.5`.
    pub skewness: f64,
    /// Fisher excess kurtosis, `m4 / m2² − 3`.
    pub kurtosis: f64,
}

impl FitnessSummary {
    const ALL_INFINITE: Self = Self {
        min: f64::INFINITY,
        max: f64::INFINITY,
        mean: f64::INFINITY,
        std: 0.0,
        skewness: 0.0,
        kurtosis: 0.0,
    };

    /// Summarizes `fitness`. Returns `None` for an empty slice.
    ///
    /// Moments are taken over the finite values only; when there are none,
    /// min, max and mean are `+∞`. Skewness and kurtosis are reported as 0
    /// when the variance is 0.
    pub fn from_fitness(fitness: &[f64]) -> Option<Self> {
        if fitness.is_empty() {
            return None;
        }
        let finite: Vec<f64> = fitness.iter().copied().filter(|f| f.is_finite()).collect();
        let (Some(min), Some(max), Some(mean), Some(std), Some(m2)) = (
            stats::min(&finite),
            stats::max(&finite),
            stats::mean(&finite),
            stats::population_std_dev(&finite),
            stats::population_variance(&finite),
        ) else {
            return Some(Self::ALL_INFINITE);
        };

        // Biased moments; u_numflow's skewness and kurtosis are bias-corrected.
        let n = finite.len() as f64;
        let moment = |k: i32| finite.iter().map(|f| (f - mean).powi(k)).sum::<f64>() / n;
        let (skewness, kurtosis) = if m2 > 0.0 {
            (moment(3) / m2.powf(1.5), moment(4) / (m2 * m2) - 3.0)
        } else {
            (0.0, 0.0)
        };

        Some(Self {
            min,
            max,
            mean,
            std,
            skewness,
            kurtosis,
        })
    }
}
