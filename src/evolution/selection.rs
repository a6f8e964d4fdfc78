//! Block-based parent selection.
//!
//! The population indices are repeated until they cover
//! `group_size × count` slots, shuffled, and cut into `count` blocks of
//! `group_size`. Each block yields one selected index. All strategies
//! assume **minimization** (lower fitness = better).

use std::str::FromStr;

use rand::Rng;
use u_numflow::random::shuffle;

use super::config::normalize_name;
use crate::error::{Result, SymregError};

/// Selection strategy applied to every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SelectionFunction {
    /// Fitness-proportionate pick on the complemented block fitness.
    ///
    /// The complement of `f` is `max + min − f`, so the best member of the
    /// block gets the largest weight.
    Roulette,
    /// Block minimum; ties go to the lowest population index.
    #[default]
    Tournament,
}

impl SelectionFunction {
    /// Picks one population index from `block`.
    ///
    /// # Panics
    /// Panics if `block` is empty.
    pub fn pick<R: Rng>(self, fitness: &[f64], block: &[usize], rng: &mut R) -> usize {
        assert!(!block.is_empty(), "cannot select from an empty block");
        match self {
            SelectionFunction::Roulette => roulette(fitness, block, rng),
            SelectionFunction::Tournament => tournament(fitness, block),
        }
    }

    /// Selects `count` population indices using blocks of `group_size`.
    ///
    /// Returns an empty vector when `fitness` is empty.
    pub fn select<R: Rng>(
        self,
        fitness: &[f64],
        group_size: usize,
        count: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        if fitness.is_empty() {
            return Vec::new();
        }
        let group_size = group_size.max(1);
        let sequence = selection_sequence(fitness.len(), group_size * count, rng);
        sequence
            .chunks(group_size)
            .take(count)
            .map(|block| self.pick(fitness, block, rng))
            .collect()
    }
}

impl FromStr for SelectionFunction {
    type Err = SymregError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_name(s).as_str() {
            "ROULETTE" | "ROULETTE_SELECTION" | "ROULETTE_WHEEL" => Ok(SelectionFunction::Roulette),
            "TOURNAMENT" | "TOURNAMENT_SELECTION" => Ok(SelectionFunction::Tournament),
            other => Err(SymregError::UnknownSelectionFunction(other.to_string())),
        }
    }
}

/// `0..n` doubled until it holds at least `required` entries, then shuffled.
fn selection_sequence<R: Rng>(n: usize, required: usize, rng: &mut R) -> Vec<usize> {
    let mut sequence: Vec<usize> = (0..n).collect();
    while sequence.len() < required {
        sequence.extend_from_within(..);
    }
    shuffle(&mut sequence, rng);
    sequence
}

fn tournament(fitness: &[f64], block: &[usize]) -> usize {
    let mut best = block[0];
    for &idx in &block[1..] {
        match fitness[idx].total_cmp(&fitness[best]) {
            std::cmp::Ordering::Less => best = idx,
            std::cmp::Ordering::Equal if idx < best => best = idx,
            _ => {}
        }
    }
    best
}

fn roulette<R: Rng>(fitness: &[f64], block: &[usize], rng: &mut R) -> usize {
    let finite = block.iter().map(|&i| fitness[i]).filter(|f| f.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), f| {
        (lo.min(f), hi.max(f))
    });
    let over = max + min;

    // Non-finite members never win a spin.
    let weights: Vec<f64> = block
        .iter()
        .map(|&i| {
            let f = fitness[i];
            if f.is_finite() {
                (over - f).max(0.0)
            } else {
                0.0
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return block[rng.random_range(0..block.len())];
    }

    let stop = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (&idx, &w) in block.iter().zip(&weights) {
        cumulative += w;
        if cumulative >= stop && w > 0.0 {
            return idx;
        }
    }
    block[block.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_sequence_covers_population() {
        let mut rng = create_rng(42);
        let seq = selection_sequence(5, 12, &mut rng);
        // 5 → 10 → 20 entries.
        assert_eq!(seq.len(), 20);
        for i in 0..5 {
            assert_eq!(seq.iter().filter(|&&x| x == i).count(), 4);
        }
    }

    #[test]
    fn test_sequence_is_shuffled_reproducibly() {
        let a = selection_sequence(50, 50, &mut create_rng(9));
        let b = selection_sequence(50, 50, &mut create_rng(9));
        assert_eq!(a, b);
        assert_ne!(a, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_select_count() {
        let mut rng = create_rng(42);
        let fitness = vec![3.0, 1.0, 4.0, 1.5, 9.0, 2.6];
        for function in [SelectionFunction::Roulette, SelectionFunction::Tournament] {
            for count in [0, 1, 6, 50] {
                let selected = function.select(&fitness, 3, count, &mut rng);
                assert_eq!(selected.len(), count);
                assert!(selected.iter().all(|&i| i < fitness.len()));
            }
        }
    }

    #[test]
    fn test_select_empty_population() {
        let mut rng = create_rng(42);
        assert!(SelectionFunction::Tournament
            .select(&[], 3, 5, &mut rng)
            .is_empty());
    }

    // ---- tournament ----

    #[test]
    fn test_tournament_returns_block_minimum() {
        let fitness = vec![5.0, 2.0, 7.0, 1.0, 3.0];
        assert_eq!(tournament(&fitness, &[0, 1, 2]), 1);
        assert_eq!(tournament(&fitness, &[4, 3, 0]), 3);
    }

    #[test]
    fn test_tournament_ties_go_to_lowest_index() {
        let fitness = vec![1.0, 0.5, 0.5, 2.0];
        assert_eq!(tournament(&fitness, &[2, 3, 1]), 1);
        assert_eq!(tournament(&fitness, &[2, 2]), 2);
    }

    #[test]
    fn test_tournament_prefers_finite() {
        let fitness = vec![f64::INFINITY, 10.0];
        assert_eq!(tournament(&fitness, &[0, 1]), 1);
    }

    #[test]
    fn test_full_group_tournament_picks_global_best() {
        let mut rng = create_rng(3);
        let fitness = vec![4.0, 0.1, 8.0, 2.0];
        let selected = SelectionFunction::Tournament.select(&fitness, 4, 10, &mut rng);
        assert!(selected.contains(&1));
        // Index 2 only wins a block made entirely of itself.
        let twos = selected.iter().filter(|&&i| i == 2).count();
        assert!(twos <= 1);
    }

    // ---- roulette ----

    #[test]
    fn test_roulette_returns_block_member() {
        let mut rng = create_rng(42);
        let fitness = vec![0.5, 3.0, 1.0, 8.0, 2.0];
        let block = [4, 1, 3];
        for _ in 0..200 {
            assert!(block.contains(&roulette(&fitness, &block, &mut rng)));
        }
    }

    #[test]
    fn test_roulette_favours_lower_fitness() {
        let mut rng = create_rng(42);
        let fitness = vec![1.0, 9.0];
        // Complements: 10 - 1 = 9, 10 - 9 = 1.
        let hits = (0..2000)
            .filter(|_| roulette(&fitness, &[0, 1], &mut rng) == 0)
            .count();
        assert!(hits > 1600, "best picked only {hits} times");
    }

    #[test]
    fn test_roulette_all_zero_is_uniform() {
        let mut rng = create_rng(42);
        let fitness = vec![0.0, 0.0, 0.0];
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[roulette(&fitness, &[0, 1, 2], &mut rng)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_roulette_skips_non_finite() {
        let mut rng = create_rng(42);
        let fitness = vec![f64::INFINITY, 2.0, f64::NAN, 4.0];
        for _ in 0..200 {
            let picked = roulette(&fitness, &[0, 1, 2, 3], &mut rng);
            assert!(picked == 1 || picked == 3);
        }
    }

    #[test]
    fn test_roulette_all_non_finite_falls_back_to_uniform() {
        let mut rng = create_rng(42);
        let fitness = vec![f64::INFINITY, f64::INFINITY];
        let picked = roulette(&fitness, &[0, 1], &mut rng);
        assert!(picked < 2);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(
            "roulette selection".parse::<SelectionFunction>().unwrap(),
            SelectionFunction::Roulette
        );
        assert_eq!(
            "Tournament Selection".parse::<SelectionFunction>().unwrap(),
            SelectionFunction::Tournament
        );
        assert_eq!(
            "rank".parse::<SelectionFunction>(),
            Err(SymregError::UnknownSelectionFunction("RANK".into()))
        );
    }
}
