//! Fitness matrix construction and reduction.
//!
//! The matrix has one row per sample and one column per individual. Each
//! column is reduced to a single error with a [`FitnessFunction`]; lower is
//! better.

use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::normalize_name;
use super::types::{Genome, Sample};
use crate::error::{Result, SymregError};
use crate::genotype::Evaluator;

/// Error reduction over the samples of one individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FitnessFunction {
    /// Mean of squared residuals.
    #[default]
    Mse,
    /// Square root of [`FitnessFunction::Mse`].
    Rmse,
}

impl FitnessFunction {
    /// Reduces predictions against expected outputs.
    ///
    /// Non-finite results map to `+∞` so that ranking stays total.
    pub fn reduce(self, predictions: &[f64], outputs: &[f64]) -> f64 {
        self.reduce_pairs(predictions.iter().copied().zip(outputs.iter().copied()))
    }

    /// Reduces one prediction column against the outputs its samples carry.
    pub fn score(self, predictions: &[f64], samples: &[Sample<'_>]) -> f64 {
        self.reduce_pairs(predictions.iter().copied().zip(samples.iter().map(|s| s.output)))
    }

    fn reduce_pairs(self, pairs: impl Iterator<Item = (f64, f64)>) -> f64 {
        let (n, sum) = pairs.fold((0usize, 0.0), |(n, sum), (p, o)| {
            (n + 1, sum + (o - p) * (o - p))
        });
        if n == 0 {
            return f64::INFINITY;
        }
        let mse = sum / n as f64;
        let value = match self {
            FitnessFunction::Mse => mse,
            FitnessFunction::Rmse => mse.sqrt(),
        };
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    }
}

impl FromStr for FitnessFunction {
    type Err = SymregError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_name(s).as_str() {
            "MSE"
            | "MSD"
            | "MEAN_SQUARE_ERROR"
            | "MEAN_SQUARED_ERROR"
            | "MEAN_SQUARE_DEVIATION"
            | "MEAN_SQUARED_DEVIATION" => Ok(FitnessFunction::Mse),
            "RMSE"
            | "RMSD"
            | "ROOT_MEAN_SQUARE_ERROR"
            | "ROOT_MEAN_SQUARED_ERROR"
            | "ROOT_MEAN_SQUARE_DEVIATION"
            | "ROOT_MEAN_SQUARED_DEVIATION" => Ok(FitnessFunction::Rmse),
            other => Err(SymregError::UnknownFitnessFunction(other.to_string())),
        }
    }
}

/// Builds explicit samples from parallel input rows and outputs.
pub fn samples<'a, I>(rows: &'a [I], outputs: &[f64]) -> Result<Vec<Sample<'a>>>
where
    I: AsRef<[f64]>,
{
    if rows.len() != outputs.len() {
        return Err(SymregError::LengthMismatch {
            inputs: rows.len(),
            outputs: outputs.len(),
        });
    }
    if rows.is_empty() {
        return Err(SymregError::NoSamples);
    }
    Ok(rows
        .iter()
        .zip(outputs)
        .map(|(row, &output)| Sample::new(row.as_ref(), output))
        .collect())
}

/// Predictions of one individual over every sample.
pub fn column<G: Genome>(
    genome: &G,
    samples: &[Sample<'_>],
    evaluator: &mut Evaluator,
) -> Result<Vec<f64>> {
    samples
        .iter()
        .map(|sample| genome.evaluate(sample, evaluator))
        .collect()
}

/// Predictions of every individual, one column each, on the calling thread.
pub fn columns<G: Genome>(
    population: &[G],
    samples: &[Sample<'_>],
    evaluator: &mut Evaluator,
) -> Result<Vec<Vec<f64>>> {
    population
        .iter()
        .map(|genome| column(genome, samples, evaluator))
        .collect()
}

/// Like [`columns`], on the rayon pool with one evaluator per worker.
#[cfg(feature = "parallel")]
pub fn columns_parallel<G: Genome>(
    population: &[G],
    samples: &[Sample<'_>],
    cache_capacity: usize,
) -> Result<Vec<Vec<f64>>> {
    population
        .par_iter()
        .map_init(
            || Evaluator::new(cache_capacity),
            |evaluator, genome| column(genome, samples, evaluator),
        )
        .collect()
}

/// Transposes per-individual columns into per-sample rows.
pub fn to_rows(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let samples = columns.first().map_or(0, Vec::len);
    (0..samples)
        .map(|s| columns.iter().map(|col| col[s]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "parallel")]
    use crate::genotype::Genotype;

    #[test]
    fn test_mse_and_rmse() {
        let predictions = [1.0, 2.0, 5.0];
        let outputs = [1.0, 4.0, 1.0];
        // Residuals 0, 2, -4 → squares 0, 4, 16.
        let mse = FitnessFunction::Mse.reduce(&predictions, &outputs);
        assert!((mse - 20.0 / 3.0).abs() < 1e-12);
        let rmse = FitnessFunction::Rmse.reduce(&predictions, &outputs);
        assert!((rmse - (20.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_fit_is_zero() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(FitnessFunction::Mse.reduce(&v, &v), 0.0);
        assert_eq!(FitnessFunction::Rmse.reduce(&v, &v), 0.0);
    }

    #[test]
    fn test_non_finite_maps_to_infinity() {
        assert_eq!(
            FitnessFunction::Mse.reduce(&[f64::NAN, 1.0], &[0.0, 1.0]),
            f64::INFINITY
        );
        assert_eq!(
            FitnessFunction::Rmse.reduce(&[f64::NEG_INFINITY], &[0.0]),
            f64::INFINITY
        );
    }

    #[test]
    fn test_aliases() {
        for name in ["mse", "MSD", "mean squared error", "Mean_Square_Deviation"] {
            assert_eq!(name.parse::<FitnessFunction>().unwrap(), FitnessFunction::Mse);
        }
        for name in ["RMSE", "rmsd", "root mean square error", "ROOT_MEAN_SQUARED_DEVIATION"] {
            assert_eq!(name.parse::<FitnessFunction>().unwrap(), FitnessFunction::Rmse);
        }
        assert_eq!(
            "mae".parse::<FitnessFunction>(),
            Err(SymregError::UnknownFitnessFunction("MAE".into()))
        );
    }

    #[test]
    fn test_samples_validation() {
        let rows = vec![vec![1.0], vec![2.0]];
        assert_eq!(
            samples(&rows, &[1.0]).unwrap_err(),
            SymregError::LengthMismatch {
                inputs: 2,
                outputs: 1
            }
        );
        let empty: Vec<Vec<f64>> = Vec::new();
        assert_eq!(samples(&empty, &[]).unwrap_err(), SymregError::NoSamples);
        let built = samples(&rows, &[3.0, 4.0]).unwrap();
        assert_eq!(built[1].inputs, &[2.0]);
        assert_eq!(built[1].output, 4.0);
    }

    #[test]
    fn test_score_reads_sample_outputs() {
        let rows = vec![vec![0.0], vec![0.0], vec![0.0]];
        let built = samples(&rows, &[1.0, 4.0, 1.0]).unwrap();
        let predictions = [1.0, 2.0, 5.0];
        assert_eq!(
            FitnessFunction::Mse.score(&predictions, &built),
            FitnessFunction::Mse.reduce(&predictions, &[1.0, 4.0, 1.0])
        );
        assert_eq!(FitnessFunction::Rmse.score(&[], &built), f64::INFINITY);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let population: Vec<Genotype> = ["SQUARE;INPUT_0", "INVERSE;INPUT_0", "ADD;INPUT_0;<1>"]
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        let rows: Vec<[f64; 1]> = (0..10).map(|i| [i as f64 * 0.5]).collect();
        let outputs = vec![0.0; rows.len()];
        let samples = samples(&rows, &outputs).unwrap();

        let mut evaluator = Evaluator::new(32);
        let sequential = columns(&population, &samples, &mut evaluator).unwrap();
        let parallel = columns_parallel(&population, &samples, 32).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[0][4], 4.0);
        assert_eq!(sequential[2][2], 2.0);
    }

    #[test]
    fn test_to_rows() {
        let cols = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        assert_eq!(to_rows(&cols), vec![vec![1.0, 3.0, 5.0], vec![2.0, 4.0, 6.0]]);
        assert!(to_rows(&[]).is_empty());
    }
}
