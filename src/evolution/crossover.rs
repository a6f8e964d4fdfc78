//! Breeding of the next generation from the selected parents.

use std::str::FromStr;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::normalize_name;
use crate::error::{Result, SymregError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CrossoverFunction {
    /// Each slot receives a copy of a uniformly chosen selected parent.
    #[default]
    RandomReproduction,
    SinglePoint,
    Uniform,
}

impl CrossoverFunction {
    /// Fills `slots` offspring from `population[selected[..]]`.
    ///
    /// An empty `selected` yields no offspring.
    pub fn apply<G: Clone, R: Rng>(
        self,
        population: &[G],
        selected: &[usize],
        slots: usize,
        rng: &mut R,
    ) -> Result<Vec<G>> {
        match self {
            CrossoverFunction::RandomReproduction => {
                let mut offspring = Vec::with_capacity(slots);
                for _ in 0..slots {
                    match selected.choose(rng) {
                        Some(&idx) => offspring.push(population[idx].clone()),
                        None => break,
                    }
                }
                Ok(offspring)
            }
            CrossoverFunction::SinglePoint => {
                Err(SymregError::NotImplemented("single-point crossover"))
            }
            CrossoverFunction::Uniform => Err(SymregError::NotImplemented("uniform crossover")),
        }
    }
}

impl FromStr for CrossoverFunction {
    type Err = SymregError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_name(s).as_str() {
            "RANDOM_REPRODUCTION" | "REPRODUCTION" | "RANDOM" => {
                Ok(CrossoverFunction::RandomReproduction)
            }
            "SINGLE_POINT" | "SINGLE_POINT_CROSSOVER" | "ONE_POINT" => {
                Ok(CrossoverFunction::SinglePoint)
            }
            "UNIFORM" | "UNIFORM_CROSSOVER" => Ok(CrossoverFunction::Uniform),
            other => Err(SymregError::UnknownCrossoverFunction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_random_reproduction_clones_selected() {
        let mut rng = create_rng(42);
        let population = vec!["a", "b", "c", "d"];
        let offspring = CrossoverFunction::RandomReproduction
            .apply(&population, &[1, 3], 20, &mut rng)
            .unwrap();
        assert_eq!(offspring.len(), 20);
        assert!(offspring.iter().all(|&o| o == "b" || o == "d"));
        assert!(offspring.contains(&"b") && offspring.contains(&"d"));
    }

    #[test]
    fn test_random_reproduction_empty_selection() {
        let mut rng = create_rng(42);
        let offspring = CrossoverFunction::RandomReproduction
            .apply(&[1, 2, 3], &[], 5, &mut rng)
            .unwrap();
        assert!(offspring.is_empty());
    }

    #[test]
    fn test_unimplemented_strategies() {
        let mut rng = create_rng(42);
        for function in [CrossoverFunction::SinglePoint, CrossoverFunction::Uniform] {
            let result = function.apply(&[1, 2], &[0, 1], 2, &mut rng);
            assert!(matches!(result, Err(SymregError::NotImplemented(_))));
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(
            "reproduction".parse::<CrossoverFunction>().unwrap(),
            CrossoverFunction::RandomReproduction
        );
        assert_eq!(
            "single point".parse::<CrossoverFunction>().unwrap(),
            CrossoverFunction::SinglePoint
        );
        assert!(matches!(
            "blend".parse::<CrossoverFunction>(),
            Err(SymregError::UnknownCrossoverFunction(_))
        ));
    }
}
