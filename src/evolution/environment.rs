//! The generational loop.
//!
//! An [`Environment`] owns the population and everything needed to breed
//! it: the configuration, a seeded RNG, the operator memo and the history of
//! per-generation fitness summaries.
//!
//! # Examples
//!
//! ```
//! use u_symreg::evolution::{Environment, EnvironmentConfig, GenomeKind};
//!
//! let config = EnvironmentConfig::default()
//!     .with_genome_kind(GenomeKind::Grammar)
//!     .with_population_size(20)
//!     .with_elitism_size(2)
//!     .with_individual_size(6)
//!     .with_seed(42);
//! let mut env: Environment = Environment::new(config).unwrap();
//!
//! let rows: Vec<[f64; 1]> = (0..8).map(|i| [i as f64]).collect();
//! let outputs: Vec<f64> = rows.iter().map(|r| r[0] * r[0]).collect();
//! env.run(5, &rows, &outputs).unwrap();
//! assert_eq!(env.population().len(), 20);
//! assert_eq!(env.history().len(), 5);
//! ```

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::Rng;

use super::config::EnvironmentConfig;
use super::fitness::{self, FitnessFunction};
use super::statistics::FitnessSummary;
use super::types::{Genome, Individual, Sample};
use crate::error::{Result, SymregError};
use crate::genotype::Evaluator;
use crate::random::rng_from;

/// Population plus the machinery to evolve it.
pub struct Environment<G: Genome = Individual> {
    config: EnvironmentConfig,
    population: Vec<G>,
    rng: SmallRng,
    evaluator: Evaluator,
    history: Vec<FitnessSummary>,
}

impl<G: Genome> Environment<G> {
    /// Validates `config` and creates `population_size` random genomes.
    pub fn new(config: EnvironmentConfig) -> Result<Self> {
        config.validate_for(G::genome_kind(&config))?;
        let mut rng = rng_from(config.seed);
        let population = (0..config.population_size)
            .map(|_| G::create(&config, &mut rng))
            .collect::<Result<Vec<_>>>()?;
        info!(
            "environment created: {} {:?} genomes of size {}, {:?} fitness, {:?} selection",
            config.population_size,
            G::genome_kind(&config),
            config.individual_size,
            config.fitness_function,
            config.selection_function
        );
        Ok(Self::assemble(config, population, rng))
    }

    /// Starts from an explicit population, which must hold exactly
    /// `population_size` genomes.
    pub fn with_population(config: EnvironmentConfig, population: Vec<G>) -> Result<Self> {
        config.validate_for(G::genome_kind(&config))?;
        if population.len() != config.population_size {
            return Err(SymregError::config(
                "population_size",
                format!(
                    "expected {} genomes, got {}",
                    config.population_size,
                    population.len()
                ),
            ));
        }
        let rng = rng_from(config.seed);
        Ok(Self::assemble(config, population, rng))
    }

    fn assemble(config: EnvironmentConfig, population: Vec<G>, rng: SmallRng) -> Self {
        let evaluator = Evaluator::new(config.cache_capacity);
        Self {
            config,
            population,
            rng,
            evaluator,
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn population(&self) -> &[G] {
        &self.population
    }

    /// One summary per completed [`advance`](Self::advance).
    pub fn history(&self) -> &[FitnessSummary] {
        &self.history
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    // ---- fitness ----

    /// Fitness of every individual on single-input samples.
    pub fn fit(&mut self, inputs: &[f64], outputs: &[f64]) -> Result<Vec<f64>> {
        let rows: Vec<&[f64]> = inputs.iter().map(std::slice::from_ref).collect();
        self.fit_rows(&rows, outputs)
    }

    /// Fitness of every individual on multi-input samples.
    ///
    /// Non-finite errors are reported as `+∞`.
    pub fn fit_rows<I: AsRef<[f64]>>(&mut self, rows: &[I], outputs: &[f64]) -> Result<Vec<f64>> {
        let samples = fitness::samples(rows, outputs)?;
        let columns = self.columns(&samples)?;
        let function: FitnessFunction = self.config.fitness_function;
        Ok(columns
            .iter()
            .map(|column| function.score(column, &samples))
            .collect())
    }

    /// Raw predictions: one row per sample, one column per individual.
    pub fn fitness_matrix<I: AsRef<[f64]>>(
        &mut self,
        rows: &[I],
        outputs: &[f64],
    ) -> Result<Vec<Vec<f64>>> {
        let samples = fitness::samples(rows, outputs)?;
        let columns = self.columns(&samples)?;
        Ok(fitness::to_rows(&columns))
    }

    /// The `parallel` switch only takes effect with the `parallel` feature.
    fn columns(&mut self, samples: &[Sample<'_>]) -> Result<Vec<Vec<f64>>> {
        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return fitness::columns_parallel(&self.population, samples, self.config.cache_capacity);
        }
        fitness::columns(&self.population, samples, &mut self.evaluator)
    }

    // ---- breeding ----

    /// `selection_population_size` parent indices.
    pub fn select(&mut self, fitness: &[f64]) -> Vec<usize> {
        self.config.selection_function.select(
            fitness,
            self.config.selection_group_size,
            self.config.selection_population_size,
            &mut self.rng,
        )
    }

    /// Offspring filling every non-elite slot.
    pub fn crossover(&mut self, selected: &[usize]) -> Result<Vec<G>> {
        let slots = self.config.population_size - self.config.elitism_size;
        self.config
            .crossover_function
            .apply(&self.population, selected, slots, &mut self.rng)
    }

    /// Applies at most one mutation to each offspring.
    ///
    /// A type mutation is tried first; only when it is not rolled does the
    /// target mutation get its own roll.
    pub fn mutate(&mut self, offspring: &mut [G]) -> Result<()> {
        let config = &self.config;
        for genome in offspring.iter_mut() {
            if self.rng.random_bool(config.mutation_type_probability) {
                genome.mutate_type(config, &mut self.rng)?;
            } else if self.rng.random_bool(config.mutation_target_probability) {
                genome.mutate_target(config, &mut self.rng)?;
            }
        }
        Ok(())
    }

    /// Clones of the `elitism_size` fittest individuals, best first.
    pub fn elitism(&self, fitness: &[f64]) -> Vec<G> {
        ranked(fitness)
            .into_iter()
            .take(self.config.elitism_size)
            .map(|idx| self.population[idx].clone())
            .collect()
    }

    fn breed(&mut self, fitness: &[f64]) -> Result<Vec<G>> {
        let selected = self.select(fitness);
        let mut next = self.crossover(&selected)?;
        self.mutate(&mut next)?;
        next.extend(self.elitism(fitness));
        Ok(next)
    }

    // ---- generations ----

    /// Evaluates the population and breeds the next generation without
    /// replacing the current one.
    pub fn epoch<I: AsRef<[f64]>>(&mut self, rows: &[I], outputs: &[f64]) -> Result<Vec<G>> {
        let fitness = self.fit_rows(rows, outputs)?;
        self.breed(&fitness)
    }

    /// Runs one epoch in place and records its fitness summary.
    ///
    /// Returns the summary of the generation that was just evaluated.
    pub fn advance<I: AsRef<[f64]>>(
        &mut self,
        rows: &[I],
        outputs: &[f64],
    ) -> Result<FitnessSummary> {
        let fitness = self.fit_rows(rows, outputs)?;
        let summary = FitnessSummary::from_fitness(&fitness).ok_or(SymregError::NoSamples)?;
        let next = self.breed(&fitness)?;

        let cache = self.evaluator.cache();
        debug!(
            "generation {}: min={:.6} mean={:.6} max={:.6} std={:.6} cache={}/{} hits={} misses={}",
            self.history.len(),
            summary.min,
            summary.mean,
            summary.max,
            summary.std,
            cache.len(),
            cache.capacity(),
            cache.hits(),
            cache.misses()
        );

        self.population = next;
        self.history.push(summary);
        Ok(summary)
    }

    /// Advances `generations` times.
    pub fn run<I: AsRef<[f64]>>(
        &mut self,
        generations: usize,
        rows: &[I],
        outputs: &[f64],
    ) -> Result<()> {
        for _ in 0..generations {
            self.advance(rows, outputs)?;
        }
        Ok(())
    }

    /// The lowest-fitness individual of the current population and its
    /// fitness.
    pub fn best<I: AsRef<[f64]>>(&mut self, rows: &[I], outputs: &[f64]) -> Result<(&G, f64)> {
        let fitness = self.fit_rows(rows, outputs)?;
        let idx = ranked(&fitness)
            .first()
            .copied()
            .ok_or_else(|| SymregError::config("population_size", "population is empty"))?;
        Ok((&self.population[idx], fitness[idx]))
    }
}

/// Indices sorted by ascending fitness; ties keep the lower index first.
fn ranked(fitness: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]).then(a.cmp(&b)));
    order
}
