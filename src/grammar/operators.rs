//! Operator table for the flat genome.
//!
//! Trigonometric operators scale their argument by `2π`, so one unit of input
//! is one full period. `DIVIDE` and `MOD` are protected: a zero divisor
//! returns the left operand unchanged.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;


use crate::error::SymregError;

/// Every operator a [`Gene`](super::Gene) can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Operator {
    // Single argument
    Inverse,
    Sin,
    Cosin,
    Tangent,
    Square,
    Cube,
    Sqrt,
    Modulo,
    Pass,
    // Two arguments
    Mod,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Single-argument operators, in canonical order.
    pub const UNARY: [Operator; 9] = [
        Operator::Inverse,
        Operator::Sin,
        Operator::Cosin,
        Operator::Tangent,
        Operator::Square,
        Operator::Cube,
        Operator::Sqrt,
        Operator::Modulo,
        Operator::Pass,
    ];

    /// Two-argument operators, in canonical order.
    pub const BINARY: [Operator; 5] = [
        Operator::Mod,
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// The arithmetic subset of [`Operator::BINARY`].
    pub const BINARY_LIGHT: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// All operators in canonical order: unary first, then binary.
    pub const ALL: [Operator; 14] = [
        Operator::Inverse,
        Operator::Sin,
        Operator::Cosin,
        Operator::Tangent,
        Operator::Square,
        Operator::Cube,
        Operator::Sqrt,
        Operator::Modulo,
        Operator::Pass,
        Operator::Mod,
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn all() -> impl Iterator<Item = Operator> {
        Self::ALL.into_iter()
    }

    /// Position in [`Operator::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of operands consumed.
    pub fn arity(self) -> usize {
        if self.is_unary() {
            1
        } else {
            2
        }
    }

    pub fn is_unary(self) -> bool {
        Self::UNARY.contains(&self)
    }

    pub fn is_binary(self) -> bool {
        Self::BINARY.contains(&self)
    }

    pub fn is_light(self) -> bool {
        Self::BINARY_LIGHT.contains(&self)
    }

    /// Canonical upper-case name used by the text genotype format.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Inverse => "INVERSE",
            Operator::Sin => "SIN",
            Operator::Cosin => "COSIN",
            Operator::Tangent => "TANGENT",
            Operator::Square => "SQUARE",
            Operator::Cube => "CUBE",
            Operator::Sqrt => "SQRT",
            Operator::Modulo => "MODULO",
            Operator::Pass => "PASS",
            Operator::Mod => "MOD",
            Operator::Add => "ADD",
            Operator::Subtract => "SUBTRACT",
            Operator::Multiply => "MULTIPLY",
            Operator::Divide => "DIVIDE",
        }
    }

    /// Applies a single-argument operator.
    ///
    /// Binary operators passed here act as [`Operator::Pass`].
    pub fn apply_unary(self, x: f64) -> f64 {
        match self {
            Operator::Inverse => -x,
            Operator::Sin => (x * TAU).sin(),
            Operator::Cosin => (x * TAU).cos(),
            Operator::Tangent => (x * TAU).tan(),
            Operator::Square => x * x,
            Operator::Cube => x * x * x,
            Operator::Sqrt => x.sqrt(),
            Operator::Modulo => x.abs(),
            _ => x,
        }
    }

    /// Applies a two-argument operator.
    ///
    /// Unary operators passed here are applied to `a` alone.
    pub fn apply_binary(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
            Operator::Divide => {
                if b == 0.0 {
                    a
                } else {
                    a / b
                }
            }
            Operator::Mod => {
                if b == 0.0 {
                    a
                } else {
                    floored_rem(a, b)
                }
            }
            unary => unary.apply_unary(a),
        }
    }
}

/// Remainder whose sign follows the divisor.
fn floored_rem(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = SymregError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Operator::all()
            .find(|op| op.name() == name)
            .ok_or_else(|| SymregError::UnknownGene(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_partition_operators() {
        assert_eq!(Operator::all().count(), 14);
        for op in Operator::all() {
            assert_ne!(op.is_unary(), op.is_binary(), "{op}");
        }
        for op in Operator::BINARY_LIGHT {
            assert!(op.is_binary());
        }
        assert!(!Operator::Mod.is_light());
        for (k, op) in Operator::ALL.into_iter().enumerate() {
            assert_eq!(op.index(), k);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for op in Operator::all() {
            assert_eq!(op.name().parse::<Operator>().unwrap(), op);
        }
        assert!(matches!(
            "POWER".parse::<Operator>(),
            Err(SymregError::UnknownGene(_))
        ));
    }

    #[test]
    fn test_protected_division() {
        assert_eq!(Operator::Divide.apply_binary(3.0, 0.0), 3.0);
        assert_eq!(Operator::Mod.apply_binary(-2.5, 0.0), -2.5);
        assert_eq!(Operator::Divide.apply_binary(3.0, 2.0), 1.5);
    }

    #[test]
    fn test_mod_takes_divisor_sign() {
        assert_eq!(Operator::Mod.apply_binary(7.0, 3.0), 1.0);
        assert_eq!(Operator::Mod.apply_binary(-7.0, 3.0), 2.0);
        assert_eq!(Operator::Mod.apply_binary(7.0, -3.0), -2.0);
    }

    #[test]
    fn test_unary_values() {
        assert_eq!(Operator::Inverse.apply_unary(2.0), -2.0);
        assert_eq!(Operator::Cube.apply_unary(-2.0), -8.0);
        assert_eq!(Operator::Modulo.apply_unary(-4.0), 4.0);
        assert!((Operator::Sin.apply_unary(0.25) - 1.0).abs() < 1e-12);
        assert!((Operator::Cosin.apply_unary(0.5) + 1.0).abs() < 1e-12);
        assert!(Operator::Sqrt.apply_unary(-1.0).is_nan());
    }
}
