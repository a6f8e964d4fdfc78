//! Flat grammar genome.
//!
//! A [`Genotype`] is a fixed-length sequence of [`Gene`]s whose position `p`
//! is constrained by `rules(len)[p]`. Its text form is the `;`-separated
//! gene tokens, e.g. `ADD;SIN;INPUT_0;<0.5>`.

mod cache;
mod evaluator;

pub use cache::{OperatorCache, OperatorKey};
pub use evaluator::{expression_len, Evaluator};

use std::fmt;
use std::str::FromStr;

use log::trace;
use rand::Rng;

use crate::error::{Result, SymregError};
use crate::evolution::{EnvironmentConfig, Genome, GenomeKind, Sample};
use crate::grammar::{round_to, rule_admits, rules, sample_rule, Gene};

/// Ordered gene sequence evaluated head-first.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genotype {
    genes: Vec<Gene>,
}

impl Genotype {
    /// Wraps genes without checking them against the grammar.
    pub fn from_genes(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Grammar conformance plus structural evaluability.
    ///
    /// Every gene must be admitted by the rule at its position, every input
    /// reference must be below `input_size`, and the root expression must not
    /// run out of genes.
    pub fn conforms(&self, input_size: usize) -> bool {
        if self.genes.is_empty() {
            return false;
        }
        let rules = rules(self.genes.len());
        rules.len() == self.genes.len()
            && self.genes.iter().zip(&rules).all(|(gene, rule)| {
                rule_admits(rule, gene) && !matches!(gene, Gene::Input(i) if *i >= input_size)
            })
            && expression_len(&self.genes).is_some()
    }

    /// Positions a target mutation may touch.
    fn target_positions(&self, input_size: usize) -> Vec<usize> {
        self.genes
            .iter()
            .enumerate()
            .filter(|(_, gene)| gene.is_constant() || (input_size > 1 && gene.is_input()))
            .map(|(p, _)| p)
            .collect()
    }
}

impl Genome for Genotype {
    fn create<R: Rng>(config: &EnvironmentConfig, rng: &mut R) -> Result<Self> {
        let rules = rules(config.individual_size);
        let sampler = config.gene_sampler();
        for attempt in 1..=config.validity_attempts {
            let genotype = Genotype {
                genes: rules
                    .iter()
                    .map(|rule| sample_rule(rule, &sampler, rng))
                    .collect(),
            };
            if genotype.conforms(config.input_size) {
                return Ok(genotype);
            }
            trace!("grammar genotype rejected at attempt {attempt}: {genotype}");
        }
        Err(SymregError::ValidityExhausted {
            operation: "create",
            attempts: config.validity_attempts,
        })
    }

    fn evaluate(&self, sample: &Sample<'_>, evaluator: &mut Evaluator) -> Result<f64> {
        evaluator.evaluate(&self.genes, sample.inputs)
    }

    /// Resamples one random position from its grammar rule.
    fn mutate_type<R: Rng>(&mut self, config: &EnvironmentConfig, rng: &mut R) -> Result<()> {
        if self.genes.is_empty() {
            return Ok(());
        }
        let rules = rules(self.genes.len());
        let position = rng.random_range(0..self.genes.len());
        let rule = rules[position.min(rules.len() - 1)];
        let sampler = config.gene_sampler();

        let mut candidate = self.clone();
        for attempt in 1..=config.validity_attempts {
            candidate.genes[position] = sample_rule(rule, &sampler, rng);
            if candidate.conforms(config.input_size) {
                *self = candidate;
                return Ok(());
            }
            trace!("type mutation at {position} rejected at attempt {attempt}");
        }
        Err(SymregError::ValidityExhausted {
            operation: "mutate type of",
            attempts: config.validity_attempts,
        })
    }

    /// Scales a random constant or redraws a random input reference.
    ///
    /// Input references are only eligible with more than one input. A
    /// genotype with no eligible gene is left untouched.
    fn mutate_target<R: Rng>(&mut self, config: &EnvironmentConfig, rng: &mut R) -> Result<()> {
        let positions = self.target_positions(config.input_size);
        if positions.is_empty() {
            return Ok(());
        }
        let position = positions[rng.random_range(0..positions.len())];
        let sampler = config.gene_sampler();
        let max = config.numerical_value_max;

        let mut candidate = self.clone();
        for attempt in 1..=config.validity_attempts {
            candidate.genes[position] = match self.genes[position] {
                Gene::Constant(c) => {
                    let factor = rng.random::<f64>() * config.mutation_constants_factor_max;
                    // Rounding can step past a max with more decimals.
                    Gene::Constant(round_to(c * factor, config.precision).clamp(-max, max))
                }
                _ => sampler.input(rng),
            };
            if candidate.conforms(config.input_size) {
                *self = candidate;
                return Ok(());
            }
            trace!("target mutation at {position} rejected at attempt {attempt}");
        }
        Err(SymregError::ValidityExhausted {
            operation: "mutate target of",
            attempts: config.validity_attempts,
        })
    }

    fn is_valid(&self, config: &EnvironmentConfig) -> bool {
        self.genes.len() == config.individual_size && self.conforms(config.input_size)
    }

    fn genome_kind(_config: &EnvironmentConfig) -> GenomeKind {
        GenomeKind::Grammar
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{gene}")?;
        }
        Ok(())
    }
}

impl FromStr for Genotype {
    type Err = SymregError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let genes = s.split(';').map(str::parse).collect::<Result<Vec<_>>>()?;
        Ok(Self { genes })
    }
}

impl From<Vec<Gene>> for Genotype {
    fn from(genes: Vec<Gene>) -> Self {
        Self::from_genes(genes)
    }
}
