//! Recursive evaluator for flat genotypes.
//!
//! A flat genotype carries no delimiters between operands, so the extent of
//! an operand is whatever its own evaluation consumed. [`Evaluator::consume`]
//! therefore returns the value together with the unconsumed remainder, and a
//! binary operator starts its second operand exactly there.
//!
//! # Exhaustion
//!
//! Running out of genes where an operand must start is an error, with one
//! exception: a binary operator whose first operand consumed the rest of the
//! genotype yields that first operand, the same way a zero divisor does.

use super::cache::{OperatorCache, OperatorKey};
use super::Genotype;
use crate::error::{Result, SymregError};
use crate::grammar::Gene;

/// Executes flat genotypes against an input vector.
///
/// Owns an [`OperatorCache`]; use one evaluator per thread.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    cache: OperatorCache,
}

impl Evaluator {
    /// Creates an evaluator whose memo holds `cache_capacity` results.
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            cache: OperatorCache::new(cache_capacity),
        }
    }

    pub fn cache(&self) -> &OperatorCache {
        &self.cache
    }

    /// Evaluates the expression rooted at the first gene.
    ///
    /// Genes left over after the root expression are ignored.
    pub fn evaluate(&mut self, genes: &[Gene], inputs: &[f64]) -> Result<f64> {
        self.consume(genes, inputs).map(|(value, _)| value)
    }

    /// Parses the `;`-separated text form and evaluates it.
    pub fn evaluate_text(&mut self, text: &str, inputs: &[f64]) -> Result<f64> {
        let genotype: Genotype = text.parse()?;
        self.evaluate(genotype.genes(), inputs)
    }

    /// Evaluates one expression and returns it with the unconsumed remainder.
    pub fn consume<'g>(
        &mut self,
        genes: &'g [Gene],
        inputs: &[f64],
    ) -> Result<(f64, &'g [Gene])> {
        let (gene, rest) = genes.split_first().ok_or(SymregError::TruncatedGenotype)?;
        match *gene {
            Gene::Input(index) => {
                let value = inputs
                    .get(index)
                    .copied()
                    .ok_or(SymregError::InputOutOfRange {
                        index,
                        available: inputs.len(),
                    })?;
                Ok((value, rest))
            }
            Gene::Constant(value) => Ok((value, rest)),
            Gene::Operator(op) if op.is_unary() => {
                let (x, rest) = self.consume(rest, inputs)?;
                let value = self
                    .cache
                    .get_or_insert_with(OperatorKey::unary(op, x), || op.apply_unary(x));
                Ok((value, rest))
            }
            Gene::Operator(op) => {
                let (a, rest) = self.consume(rest, inputs)?;
                if rest.is_empty() {
                    return Ok((a, rest));
                }
                let (b, rest) = self.consume(rest, inputs)?;
                let value = self
                    .cache
                    .get_or_insert_with(OperatorKey::binary(op, a, b), || op.apply_binary(a, b));
                Ok((value, rest))
            }
        }
    }
}

/// Number of genes the root expression spans, or `None` if it is truncated.
///
/// Mirrors the consumption rules of [`Evaluator::consume`] without
/// evaluating anything.
pub fn expression_len(genes: &[Gene]) -> Option<usize> {
    skip(genes).map(|rest| genes.len() - rest.len())
}

fn skip(genes: &[Gene]) -> Option<&[Gene]> {
    let (gene, rest) = genes.split_first()?;
    match gene {
        Gene::Input(_) | Gene::Constant(_) => Some(rest),
        Gene::Operator(op) if op.is_unary() => skip(rest),
        Gene::Operator(_) => {
            let rest = skip(rest)?;
            if rest.is_empty() {
                Some(rest)
            } else {
                skip(rest)
            }
        }
    }
}
