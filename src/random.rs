//! Seeded random number generation.
//!
//! Generators come from `u_numflow::random`, so a seed reproduces the same
//! run everywhere the crate is built.

use rand::rngs::SmallRng;
use rand::Rng;

pub use u_numflow::random::create_rng;

/// Creates an RNG from an optional seed, drawing one from the thread RNG
/// when absent.
pub fn rng_from(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Uniform `+1.0` / `-1.0`.
pub(crate) fn random_sign<R: Rng>(rng: &mut R) -> f64 {
    if rng.random_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}
