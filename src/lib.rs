//! Grammar-constrained symbolic regression by genetic programming.
//!
//! Searches for an expression that maps sample inputs to outputs with the
//! lowest error. Two genome representations share one evolutionary loop:
//!
//! - **Grammar genotype** ([`genotype`]): a flat, fixed-length sequence of
//!   operator, input and constant genes. Each position is constrained by a
//!   position-indexed [`grammar`], and the sequence is evaluated head-first
//!   with an LRU memo of operator applications.
//! - **Tree genome** ([`tree`]): an arena of `Sum`, `Input`, `Constant` and
//!   `Empty` nodes with forward-only targets, evaluated from the first `Sum`.
//!
//! Grammar genotypes have a bijective fixed-width binary form in [`codec`]
//! (64-bit Gray-coded, bit-interleaved blocks).
//!
//! # Architecture
//!
//! [`evolution::Environment`] is generic over [`evolution::Genome`]; both
//! representations implement it and [`evolution::Individual`] selects one at
//! runtime. All randomness flows through caller-owned RNGs (see [`random`]),
//! so runs are reproducible from a seed.
//!
//! # Features
//!
//! - `parallel`: evaluates fitness columns on the rayon pool when
//!   [`EnvironmentConfig::parallel`] is set.
//! - `serde`: serde derives on configuration and genome types, plus
//!   `EnvironmentConfig::from_value` for key/value configuration objects.

pub mod codec;
pub mod error;
pub mod evolution;
pub mod genotype;
pub mod grammar;
pub mod random;
pub mod tree;

pub use error::{Result, SymregError};
pub use evolution::{Environment, EnvironmentConfig, Genome, GenomeKind, Individual};
