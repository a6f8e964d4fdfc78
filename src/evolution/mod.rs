//! Population-level evolution.
//!
//! The generic [`Environment`] drives any [`Genome`] through the
//! generational loop: fitness, selection, crossover, mutation and elitism.
//! [`Individual`] lets the genome implementation be chosen at runtime from
//! [`EnvironmentConfig::genome_kind`].
//!
//! # Key Types
//!
//! - [`EnvironmentConfig`]: loop parameters, builders and the key/value reader
//! - [`Environment`]: owns the population and runs epochs
//! - [`FitnessSummary`]: per-generation fitness moments
//!
//! # References
//!
//! - Koza (1992), *Genetic Programming*
//! - O'Neill & Ryan (2001), "Grammatical Evolution"

mod config;
mod crossover;
mod environment;
pub mod fitness;
mod selection;
mod statistics;
mod types;

pub use config::EnvironmentConfig;
pub use crossover::CrossoverFunction;
pub use environment::Environment;
pub use fitness::FitnessFunction;
pub use selection::SelectionFunction;
pub use statistics::FitnessSummary;
pub use types::{fingerprint, Genome, GenomeKind, Individual, Sample};
