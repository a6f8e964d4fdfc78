//! Tree genome: an arena of [`Node`]s with forward-only targets.
//!
//! The expression is rooted at the first `Sum` node. Because targets always
//! point at higher positions, the reachable graph is a DAG and evaluation
//! terminates without cycle detection. Shared sub-expressions are evaluated
//! once per call through a per-call value cache.

mod node;

pub use node::{Node, NodeKind, Symbol};

use std::fmt;

use log::trace;
use rand::Rng;

use crate::error::{Result, SymregError};
use crate::evolution::{EnvironmentConfig, Genome, GenomeKind, Sample};
use crate::genotype::Evaluator;

/// Fixed-length arena of nodes indexed by position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeGenome {
    nodes: Vec<Node>,
}

impl TreeGenome {
    /// Wraps nodes as-is. Targets must point forward and stay in bounds.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of the first `Sum` node.
    pub fn root(&self) -> Option<usize> {
        self.nodes.iter().position(|n| n.symbol() == Symbol::Sum)
    }

    /// Preorder view of the nodes reachable from the root, each listed once.
    pub fn tree(&self) -> Vec<&Node> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(position) = stack.pop() {
            match visited.get_mut(position) {
                Some(seen) if !*seen => *seen = true,
                _ => continue,
            }
            let node = &self.nodes[position];
            order.push(node);
            // Reverse so the first target is visited first.
            stack.extend(node.targets().iter().rev().copied());
        }
        order
    }

    /// Structural validity, independent of the configured length.
    ///
    /// Every reachable node must have no `Empty` target, and an `Input` must
    /// be reachable below the root.
    pub fn is_structurally_valid(&self) -> bool {
        let reachable = self.tree();
        if reachable.is_empty() {
            return false;
        }
        let targets_ok = reachable.iter().all(|node| {
            node.targets().iter().all(|&t| {
                t > node.position()
                    && self
                        .nodes
                        .get(t)
                        .is_some_and(|n| n.symbol() != Symbol::Empty)
            })
        });
        let input_reached = reachable
            .iter()
            .skip(1)
            .any(|node| node.symbol() == Symbol::Input);
        targets_ok && input_reached
    }

    /// Evaluates the root against one sample.
    ///
    /// Values are memoised per call, so nothing carries over between samples.
    pub fn operate(&self, sample: &Sample<'_>) -> Result<f64> {
        let root = self.root().ok_or(SymregError::NoOperationNode)?;
        let mut values = vec![None; self.nodes.len()];
        self.value_at(root, sample, &mut values)
    }

    fn value_at(
        &self,
        position: usize,
        sample: &Sample<'_>,
        values: &mut [Option<f64>],
    ) -> Result<f64> {
        if let Some(Some(value)) = values.get(position) {
            return Ok(*value);
        }
        // Out-of-range targets only exist in hand-built genomes.
        let node = self
            .nodes
            .get(position)
            .ok_or(SymregError::EmptyOperation { position })?;
        let value = match node.kind() {
            NodeKind::Empty => return Err(SymregError::EmptyOperation { position }),
            NodeKind::Input => sample
                .inputs
                .first()
                .copied()
                .ok_or(SymregError::InputOutOfRange {
                    index: 0,
                    available: 0,
                })?,
            NodeKind::Constant(value) => value,
            NodeKind::Sum => {
                let mut total = 0.0;
                for &target in node.targets() {
                    total += self.value_at(target, sample, values)?;
                }
                total
            }
        };
        values[position] = Some(value);
        Ok(value)
    }
}

impl Genome for TreeGenome {
    /// Draws node families uniformly per position, forcing one `Input` when
    /// none was drawn, until the genome is valid.
    fn create<R: Rng>(config: &EnvironmentConfig, rng: &mut R) -> Result<Self> {
        let len = config.individual_size;
        for attempt in 1..=config.validity_attempts {
            let mut nodes: Vec<Node> = (0..len)
                .map(|position| Node::random(position, len, config, rng))
                .collect();
            if len > 0 && !nodes.iter().any(|n| n.symbol() == Symbol::Input) {
                let position = rng.random_range(0..len);
                nodes[position] = Node::input(position);
            }
            let genome = TreeGenome { nodes };
            if genome.is_structurally_valid() {
                return Ok(genome);
            }
            trace!("tree genome rejected at attempt {attempt}");
        }
        Err(SymregError::ValidityExhausted {
            operation: "create",
            attempts: config.validity_attempts,
        })
    }

    fn evaluate(&self, sample: &Sample<'_>, _evaluator: &mut Evaluator) -> Result<f64> {
        self.operate(sample)
    }

    /// Replaces one random position with a fresh node that fits there.
    fn mutate_type<R: Rng>(&mut self, config: &EnvironmentConfig, rng: &mut R) -> Result<()> {
        let len = self.nodes.len();
        if len == 0 {
            return Ok(());
        }
        let position = rng.random_range(0..len);
        let mut candidate = self.clone();
        for attempt in 1..=config.validity_attempts {
            candidate.nodes[position] = Node::random(position, len, config, rng);
            if candidate.is_structurally_valid() {
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

    /// Runs [`Node::mutate_targets`] over every node of a candidate copy.
    fn mutate_target<R: Rng>(&mut self, config: &EnvironmentConfig, rng: &mut R) -> Result<()> {
        let len = self.nodes.len();
        for attempt in 1..=config.validity_attempts {
            let mut candidate = self.clone();
            for node in &mut candidate.nodes {
                node.mutate_targets(len, config, rng);
            }
            if candidate.is_structurally_valid() {
                *self = candidate;
                return Ok(());
            }
            trace!("target mutation rejected at attempt {attempt}");
        }
        Err(SymregError::ValidityExhausted {
            operation: "mutate target of",
            attempts: config.validity_attempts,
        })
    }

    fn is_valid(&self, config: &EnvironmentConfig) -> bool {
        self.nodes.len() == config.individual_size && self.is_structurally_valid()
    }

    fn genome_kind(_config: &EnvironmentConfig) -> GenomeKind {
        GenomeKind::Tree
    }
}

impl fmt::Display for TreeGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
