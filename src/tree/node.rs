//! Tree genome nodes.

use std::fmt;

use rand::Rng;

use crate::evolution::EnvironmentConfig;
use crate::random::random_sign;

/// Node family, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    Empty,
    Input,
    Constant,
    Sum,
}

impl Symbol {
    pub const ALL: [Symbol; 4] = [Symbol::Empty, Symbol::Input, Symbol::Constant, Symbol::Sum];

    /// Fewest forward targets a node of this family needs.
    pub const fn min_targets(self) -> usize {
        match self {
            Symbol::Sum => 2,
            _ => 0,
        }
    }

    /// Families that fit at `position` in a genome of `len` nodes.
    pub fn available(position: usize, len: usize) -> impl Iterator<Item = Symbol> {
        Self::ALL
            .into_iter()
            .filter(move |s| position + s.min_targets() < len)
    }
}

/// Node payload.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Placeholder that must never be reachable in a valid genome.
    Empty,
    /// First input of the sample.
    Input,
    Constant(f64),
    /// Sum of all target values.
    Sum,
}

impl NodeKind {
    pub fn symbol(&self) -> Symbol {
        match self {
            NodeKind::Empty => Symbol::Empty,
            NodeKind::Input => Symbol::Input,
            NodeKind::Constant(_) => Symbol::Constant,
            NodeKind::Sum => Symbol::Sum,
        }
    }
}

/// One arena slot: a kind, its own position, and forward targets.
///
/// Every target is strictly greater than `position`, so the graph is acyclic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    kind: NodeKind,
    position: usize,
    targets: Vec<usize>,
}

impl Node {
    /// Assembles a node from its parts.
    ///
    /// Targets are not checked; [`TreeGenome`](super::TreeGenome) validity
    /// rejects backward or out-of-range references.
    pub fn new(kind: NodeKind, position: usize, targets: Vec<usize>) -> Self {
        Self {
            kind,
            position,
            targets,
        }
    }

    /// Builds a fresh node of `symbol` at `position` in a genome of `len`.
    pub fn create<R: Rng>(
        symbol: Symbol,
        position: usize,
        len: usize,
        config: &EnvironmentConfig,
        rng: &mut R,
    ) -> Self {
        let (kind, targets) = match symbol {
            Symbol::Empty => (NodeKind::Empty, Vec::new()),
            Symbol::Input => (NodeKind::Input, Vec::new()),
            Symbol::Constant => {
                let value = random_sign(rng) * rng.random::<f64>() * config.numerical_value_max;
                (NodeKind::Constant(value), Vec::new())
            }
            Symbol::Sum => (NodeKind::Sum, sum_targets(position, len, config.targets_max, rng)),
        };
        Self {
            kind,
            position,
            targets,
        }
    }

    /// A node of a family drawn uniformly among those that fit.
    pub fn random<R: Rng>(
        position: usize,
        len: usize,
        config: &EnvironmentConfig,
        rng: &mut R,
    ) -> Self {
        let symbols: Vec<Symbol> = Symbol::available(position, len).collect();
        let symbol = symbols[rng.random_range(0..symbols.len())];
        Self::create(symbol, position, len, config, rng)
    }

    pub fn input(position: usize) -> Self {
        Self {
            kind: NodeKind::Input,
            position,
            targets: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn symbol(&self) -> Symbol {
        self.kind.symbol()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Resamples each target with probability `mutation_target_probability`.
    ///
    /// Constants are scaled by `±u · mutation_constants_factor_max` with the
    /// same probability and kept within `numerical_value_max`.
    pub fn mutate_targets<R: Rng>(
        &mut self,
        len: usize,
        config: &EnvironmentConfig,
        rng: &mut R,
    ) {
        let p = config.mutation_target_probability;
        match &mut self.kind {
            NodeKind::Constant(value) => {
                if rng.random_bool(p) {
                    let max = config.numerical_value_max;
                    let factor = random_sign(rng)
                        * rng.random::<f64>()
                        * config.mutation_constants_factor_max;
                    *value = (*value * factor).clamp(-max, max);
                }
            }
            NodeKind::Sum => {
                for target in &mut self.targets {
                    if rng.random_bool(p) {
                        *target = rng.random_range(self.position + 1..len);
                    }
                }
            }
            NodeKind::Empty | NodeKind::Input => {}
        }
    }
}

/// `min(randint(2, targets_max), len - position - 1)` targets, each uniform
/// in `position + 1 ..= len - 1`.
fn sum_targets<R: Rng>(
    position: usize,
    len: usize,
    targets_max: usize,
    rng: &mut R,
) -> Vec<usize> {
    let start = position + 1;
    if start >= len {
        return Vec::new();
    }
    let quantity = rng.random_range(2..=targets_max.max(2)).min(len - start);
    (0..quantity).map(|_| rng.random_range(start..len)).collect()
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position;
        match self.kind {
            NodeKind::Empty => write!(f, "<[{p}] EMPTY>"),
            NodeKind::Input => write!(f, "<[{p}] INPUT>"),
            NodeKind::Constant(v) => write!(f, "<[{p}] CONST (${v})>"),
            NodeKind::Sum => {
                let targets: Vec<String> = self.targets.iter().map(|t| t.to_string()).collect();
                write!(f, "<[{p}] SUM ({})>", targets.join(","))
            }
        }
    }
}
