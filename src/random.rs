//! Seedable RNG construction.
//!
//! Every randomized component in this crate takes `&mut R where R: Rng`;
//! the engine owns a single RNG built here and threads it through tree
//! synthesis, selection, and the genetic operators. A fixed seed makes a
//! whole sequential run reproducible, which the statistical tests rely on.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
