//! Gene tokens and their text form.

use std::fmt;
use std::str::FromStr;


use super::operators::Operator;
use crate::error::SymregError;

/// Prefix of an input reference token.
pub const INPUT_PREFIX: &str = "INPUT_";

/// One token of a flat genotype.
///
/// Text form: `INPUT_<i>`, `<x>` for a literal, or a bare operator name.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gene {
    /// Reference to the `i`-th input of a sample.
    Input(usize),
    /// Numeric literal.
    Constant(f64),
    Operator(Operator),
}

impl Gene {
    pub fn is_input(&self) -> bool {
        matches!(self, Gene::Input(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Gene::Constant(_))
    }

    /// Returns the operator, if this gene names one.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Gene::Operator(op) => Some(*op),
            _ => None,
        }
    }
}

impl From<Operator> for Gene {
    fn from(op: Operator) -> Self {
        Gene::Operator(op)
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gene::Input(i) => write!(f, "{INPUT_PREFIX}{i}"),
            Gene::Constant(x) => write!(f, "<{x}>"),
            Gene::Operator(op) => write!(f, "{op}"),
        }
    }
}

impl FromStr for Gene {
    type Err = SymregError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let unknown = || SymregError::UnknownGene(token.to_string());

        if let Some(index) = token.strip_prefix(INPUT_PREFIX) {
            return index.parse().map(Gene::Input).map_err(|_| unknown());
        }
        if let Some(literal) = token.strip_prefix('<') {
            let literal = literal.strip_suffix('>').ok_or_else(unknown)?;
            return literal.trim().parse().map(Gene::Constant).map_err(|_| unknown());
        }
        token.parse().map(Gene::Operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Gene::Input(3).to_string(), "INPUT_3");
        assert_eq!(Gene::Constant(-1.25).to_string(), "<-1.25>");
        assert_eq!(Gene::Constant(2.0).to_string(), "<2>");
        assert_eq!(Gene::Operator(Operator::Add).to_string(), "ADD");
    }

    #[test]
    fn test_parse() {
        assert_eq!("INPUT_0".parse::<Gene>().unwrap(), Gene::Input(0));
        assert_eq!(" <0.5> ".parse::<Gene>().unwrap(), Gene::Constant(0.5));
        assert_eq!("<-3>".parse::<Gene>().unwrap(), Gene::Constant(-3.0));
        assert_eq!(
            "SQRT".parse::<Gene>().unwrap(),
            Gene::Operator(Operator::Sqrt)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for token in ["INPUT_", "INPUT_x", "<1.0", "<abc>", "", "add"] {
            assert!(
                matches!(token.parse::<Gene>(), Err(SymregError::UnknownGene(_))),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_parse_round_trip() {
        let genes = [
            Gene::Input(9),
            Gene::Constant(123.456789),
            Gene::Constant(-0.000001),
            Gene::Operator(Operator::Mod),
        ];
        for gene in genes {
            assert_eq!(gene.to_string().parse::<Gene>().unwrap(), gene);
        }
    }
}
