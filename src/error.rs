//! Error type shared by every module of the crate.

use thiserror::Error;

/// Everything that can abort a genome, codec, or evolution operation.
///
/// None of these are retried by the crate: the only bounded retry is the
/// validity-repair loop, and it reports [`SymregError::ValidityExhausted`]
/// when it runs out of attempts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymregError {
    /// A configuration key is missing or carries an invalid value.
    #[error("configuration error for `{key}`: {reason}")]
    Configuration {
        /// Offending key.
        key: String,
        /// Human readable reason.
        reason: String,
    },

    #[error("unknown fitness function: {0}")]
    UnknownFitnessFunction(String),

    #[error("unknown selection function: {0}")]
    UnknownSelectionFunction(String),

    #[error("unknown crossover function: {0}")]
    UnknownCrossoverFunction(String),

    #[error("unknown genome kind: {0}")]
    UnknownGenomeKind(String),

    /// Construction or mutation could not reach a valid genome.
    #[error("unable to {operation} a valid individual in {attempts} attempts")]
    ValidityExhausted {
        /// `"create"`, `"mutate target of"` or `"mutate type of"`.
        operation: &'static str,
        /// Attempts spent.
        attempts: usize,
    },

    #[error("unknown gene: {0:?}")]
    UnknownGene(String),

    /// An `Empty` placeholder node was evaluated.
    #[error("empty node at position {position} cannot be evaluated")]
    EmptyOperation {
        /// Position of the placeholder in its genome.
        position: usize,
    },

    #[error("tree genome has no operation node to evaluate")]
    NoOperationNode,

    #[error("genotype ended while an operator still expected an operand")]
    TruncatedGenotype,

    #[error("input index {index} out of range for {available} inputs")]
    InputOutOfRange {
        /// Requested input index.
        index: usize,
        /// Inputs available in the sample.
        available: usize,
    },

    #[error("binary genotype length {0} is not a multiple of 64")]
    InvalidBitLength(usize),

    #[error("binary genotype contains a non-binary character {0:?}")]
    InvalidBit(char),

    #[error("inputs and outputs differ in length ({inputs} vs {outputs})")]
    LengthMismatch {
        /// Number of input samples.
        inputs: usize,
        /// Number of output samples.
        outputs: usize,
    },

    #[error("fitness requires at least one sample")]
    NoSamples,

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl SymregError {
    pub(crate) fn config(key: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SymregError>;
