//! Core trait and type definitions for the evolution loop.
//!
//! [`Genome`] is the contract between the generic environment and the two
//! genome representations. [`Individual`] dispatches between them at runtime
//! according to [`GenomeKind`].

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::config::{normalize_name, EnvironmentConfig};
use crate::error::{Result, SymregError};
use crate::genotype::{Evaluator, Genotype};
use crate::tree::TreeGenome;

/// One evaluation context: the inputs of a sample and its expected output.
///
/// Passed explicitly into every evaluation so that samples can be evaluated
/// concurrently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<'a> {
    pub inputs: &'a [f64],
    pub output: f64,
}

impl<'a> Sample<'a> {
    pub fn new(inputs: &'a [f64], output: f64) -> Self {
        Self { inputs, output }
    }
}

/// A candidate expression.
///
/// Implementations must keep every operation bounded by
/// `validity_attempts` and leave `self` untouched when a mutation fails.
pub trait Genome: Clone + fmt::Display + Send + Sync {
    /// Creates a random valid genome.
    fn create<R: Rng>(config: &EnvironmentConfig, rng: &mut R) -> Result<Self>;

    /// Evaluates the genome on one sample.
    ///
    /// `evaluator` carries the operator memo; genomes that do not use it
    /// ignore it.
    fn evaluate(&self, sample: &Sample<'_>, evaluator: &mut Evaluator) -> Result<f64>;

    /// Structural mutation.
    fn mutate_type<R: Rng>(&mut self, config: &EnvironmentConfig, rng: &mut R) -> Result<()>;

    /// Target or value mutation.
    fn mutate_target<R: Rng>(&mut self, config: &EnvironmentConfig, rng: &mut R) -> Result<()>;

    fn is_valid(&self, config: &EnvironmentConfig) -> bool;

    /// Kind whose constraints a configuration is validated against.
    ///
    /// Defaults to the configured kind, which suits runtime dispatch.
    fn genome_kind(config: &EnvironmentConfig) -> GenomeKind {
        config.genome_kind
    }

    /// Fingerprint of the text rendering. Identical genomes share an id.
    fn id(&self) -> u64 {
        fingerprint(&self.to_string())
    }
}

/// Which genome implementation an environment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum GenomeKind {
    /// Arena of `Empty`/`Input`/`Constant`/`Sum` nodes.
    #[default]
    Tree,
    /// Flat grammar-constrained gene sequence.
    Grammar,
}

impl FromStr for GenomeKind {
    type Err = SymregError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_name(s).as_str() {
            "TREE" | "TREE_GENOME" => Ok(GenomeKind::Tree),
            "GRAMMAR" | "GRAMMAR_GENOME" | "GENOTYPE" | "FLAT" => Ok(GenomeKind::Grammar),
            other => Err(SymregError::UnknownGenomeKind(other.to_string())),
        }
    }
}

/// A population member of either genome kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Individual {
    Tree(TreeGenome),
    Grammar(Genotype),
}

impl Individual {
    pub fn kind(&self) -> GenomeKind {
        match self {
            Individual::Tree(_) => GenomeKind::Tree,
            Individual::Grammar(_) => GenomeKind::Grammar,
        }
    }
}

impl Genome for Individual {
    /// Creates a genome of `config.genome_kind`.
    fn create<R: Rng>(config: &EnvironmentConfig, rng: &mut R) -> Result<Self> {
        match config.genome_kind {
            GenomeKind::Tree => TreeGenome::create(config, rng).map(Individual::Tree),
            GenomeKind::Grammar => Genotype::create(config, rng).map(Individual::Grammar),
        }
    }

    fn evaluate(&self, sample: &Sample<'_>, evaluator: &mut Evaluator) -> Result<f64> {
        match self {
            Individual::Tree(g) => g.evaluate(sample, evaluator),
            Individual::Grammar(g) => g.evaluate(sample, evaluator),
        }
    }

    fn mutate_type<R: Rng>(&mut self, config: &EnvironmentConfig, rng: &mut R) -> Result<()> {
        match self {
            Individual::Tree(g) => g.mutate_type(config, rng),
            Individual::Grammar(g) => g.mutate_type(config, rng),
        }
    }

    fn mutate_target<R: Rng>(&mut self, config: &EnvironmentConfig, rng: &mut R) -> Result<()> {
        match self {
            Individual::Tree(g) => g.mutate_target(config, rng),
            Individual::Grammar(g) => g.mutate_target(config, rng),
        }
    }

    fn is_valid(&self, config: &EnvironmentConfig) -> bool {
        match self {
            Individual::Tree(g) => g.is_valid(config),
            Individual::Grammar(g) => g.is_valid(config),
        }
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Individual::Tree(g) => fmt::Display::fmt(g, f),
            Individual::Grammar(g) => fmt::Display::fmt(g, f),
        }
    }
}

impl From<TreeGenome> for Individual {
    fn from(g: TreeGenome) -> Self {
        Individual::Tree(g)
    }
}

impl From<Genotype> for Individual {
    fn from(g: Genotype) -> Self {
        Individual::Grammar(g)
    }
}

/// 64-bit FNV-1a hash.
pub fn fingerprint(text: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    text.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_fingerprint_known_values() {
        assert_eq!(fingerprint(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fingerprint("a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_genome_kind_aliases() {
        assert_eq!("tree".parse::<GenomeKind>().unwrap(), GenomeKind::Tree);
        assert_eq!(" Grammar ".parse::<GenomeKind>().unwrap(), GenomeKind::Grammar);
        assert_eq!(
            "forest".parse::<GenomeKind>(),
            Err(SymregError::UnknownGenomeKind("FOREST".into()))
        );
    }

    #[test]
    fn test_individual_follows_genome_kind() {
        let mut rng = create_rng(42);
        for kind in [GenomeKind::Tree, GenomeKind::Grammar] {
            let config = EnvironmentConfig::default()
                .with_genome_kind(kind)
                .with_individual_size(6)
                .with_validity_attempts(500);
            let individual = Individual::create(&config, &mut rng).unwrap();
            assert_eq!(individual.kind(), kind);
            assert!(individual.is_valid(&config));
        }
    }

    #[test]
    fn test_individual_id_matches_inner_rendering() {
        let genotype: Genotype = "SIN;INPUT_0".parse().unwrap();
        let individual = Individual::from(genotype.clone());
        assert_eq!(individual.to_string(), "SIN;INPUT_0");
        assert_eq!(individual.id(), genotype.id());
    }

    #[test]
    fn test_evaluate_dispatch() {
        let mut evaluator = Evaluator::new(8);
        let individual = Individual::from("SQUARE;INPUT_0".parse::<Genotype>().unwrap());
        let sample = Sample::new(&[3.0], 9.0);
        assert_eq!(individual.evaluate(&sample, &mut evaluator).unwrap(), 9.0);
    }
}
