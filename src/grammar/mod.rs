//! Position-indexed grammar for flat genomes.
//!
//! [`rules`] maps a genome length to one [`Rule`] per position. A rule lists
//! the token families admissible at that position; repeated entries weight
//! the uniform draw, so `[Binary, BinaryLight, BinaryLight, ...]` favours the
//! arithmetic operators.
//!
//! The last position is always terminal, which guarantees every sampled
//! genome ends on a value.
//!
//! # Examples
//!
//! ```
//! use u_symreg::grammar::{rules, Family};
//!
//! let r = rules(2);
//! assert_eq!(r.len(), 2);
//! assert_eq!(r[1], &[Family::Terminal][..]);
//! ```

mod gene;
mod operators;

pub use gene::{Gene, INPUT_PREFIX};
pub use operators::Operator;

use std::f64::consts::TAU;

use rand::Rng;

/// Token family admissible at a grammar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Family {
    /// A constant or an input, chosen uniformly.
    Terminal,
    Input,
    Constant,
    /// Any single-argument operator.
    Unary,
    /// Any two-argument operator.
    Binary,
    /// Arithmetic two-argument operators only.
    BinaryLight,
}

/// Admissible families at one position.
pub type Rule = &'static [Family];

const TERMINAL: Rule = &[Family::Terminal];
const UNARY_OR_TERMINAL: Rule = &[Family::Unary, Family::Terminal];
const SHORT_INTERIOR: Rule = &[Family::Binary, Family::Unary, Family::Terminal];
const LONG_INTERIOR: Rule = &[
    Family::Binary,
    Family::BinaryLight,
    Family::BinaryLight,
    Family::Unary,
    Family::Unary,
    Family::Terminal,
];
const LONG_PENULTIMATE: Rule = &[Family::Unary, Family::Terminal, Family::Input];
const LONG_LAST: Rule = &[Family::Terminal, Family::Input];

/// Returns one rule per position for a genome of `length` genes.
///
/// Lengths 0 and 1 both yield a single terminal rule.
pub fn rules(length: usize) -> Vec<Rule> {
    match length {
        0 | 1 => vec![TERMINAL],
        2 => vec![UNARY_OR_TERMINAL, TERMINAL],
        3..=5 => {
            let mut r = vec![SHORT_INTERIOR; length - 2];
            r.push(UNARY_OR_TERMINAL);
            r.push(TERMINAL);
            r
        }
        _ => {
            let mut r = vec![LONG_INTERIOR; length - 2];
            r.push(LONG_PENULTIMATE);
            r.push(LONG_LAST);
            r
        }
    }
}

/// Whether any family of `rule` admits `gene`.
pub fn rule_admits(rule: &[Family], gene: &Gene) -> bool {
    rule.iter().any(|family| family.admits(gene))
}

/// Draws a family uniformly from `rule`, then a gene from that family.
pub fn sample_rule<R: Rng>(rule: &[Family], sampler: &GeneSampler, rng: &mut R) -> Gene {
    let family = rule[rng.random_range(0..rule.len())];
    family.sample(sampler, rng)
}

impl Family {
    /// Draws one gene of this family.
    pub fn sample<R: Rng>(self, sampler: &GeneSampler, rng: &mut R) -> Gene {
        match self {
            Family::Terminal => {
                if rng.random_bool(0.5) {
                    Family::Constant.sample(sampler, rng)
                } else {
                    Family::Input.sample(sampler, rng)
                }
            }
            Family::Input => sampler.input(rng),
            Family::Constant => sampler.constant(rng),
            Family::Unary => pick(&Operator::UNARY, rng),
            Family::Binary => pick(&Operator::BINARY, rng),
            Family::BinaryLight => pick(&Operator::BINARY_LIGHT, rng),
        }
    }

    /// Grammar conformance of a single gene.
    pub fn admits(self, gene: &Gene) -> bool {
        match (self, gene) {
            (Family::Terminal, Gene::Input(_) | Gene::Constant(_)) => true,
            (Family::Input, Gene::Input(_)) => true,
            (Family::Constant, Gene::Constant(_)) => true,
            (Family::Unary, Gene::Operator(op)) => op.is_unary(),
            (Family::Binary, Gene::Operator(op)) => op.is_binary(),
            (Family::BinaryLight, Gene::Operator(op)) => op.is_light(),
            _ => false,
        }
    }
}

fn pick<R: Rng>(ops: &[Operator], rng: &mut R) -> Gene {
    Gene::Operator(ops[rng.random_range(0..ops.len())])
}

/// Parameters for drawing terminal genes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneSampler {
    /// Number of inputs per sample; `INPUT_i` is drawn from `0..input_size`.
    pub input_size: usize,
    /// Magnitude bound for generated constants.
    pub numerical_value_max: f64,
    /// Decimals kept on generated constants.
    pub precision: u32,
}

impl GeneSampler {
    pub fn new(input_size: usize, numerical_value_max: f64, precision: u32) -> Self {
        Self {
            input_size: input_size.max(1),
            numerical_value_max,
            precision,
        }
    }

    /// `INPUT_i` with `i` uniform over the configured inputs.
    pub fn input<R: Rng>(&self, rng: &mut R) -> Gene {
        Gene::Input(rng.random_range(0..self.input_size.max(1)))
    }

    /// `cos(u·2π)·max` rounded to `precision` decimals, then clamped to
    /// `±max`.
    pub fn constant<R: Rng>(&self, rng: &mut R) -> Gene {
        let u: f64 = rng.random();
        let max = self.numerical_value_max;
        let x = (u * TAU).cos() * max;
        Gene::Constant(round_to(x, self.precision).clamp(-max, max))
    }
}

impl Default for GeneSampler {
    fn default() -> Self {
        Self::new(1, 1.0, 6)
    }
}

/// Rounds half away from zero to `precision` decimals.
pub fn round_to(x: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (x * factor).round() / factor
}
