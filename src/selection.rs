//! Parent selection strategies.
//!
//! Selection picks one parent index from the current generation given
//! per-individual fitness. Strategies differ in selection pressure:
//! tournament is local and cheap, roulette is fitness-proportionate,
//! ranked is roulette over rank positions (immune to fitness scaling).
//!
//! All strategies honor the engine's fitness direction via
//! `lower_is_better`.

use rand::Rng;

/// Strategy for choosing parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Draw `k` individuals uniformly at random (with replacement) and
    /// keep the one with the best fitness.
    ///
    /// Higher `k` means stronger selection pressure.
    Tournament(usize),

    /// Fitness-proportionate selection: each individual owns a roulette
    /// segment sized by its fitness (inverted when lower is better, so
    /// better individuals always get larger segments).
    Roulette,

    /// Roulette over rank positions instead of raw fitness: after sorting
    /// by true fitness, each individual's working fitness becomes its rank
    /// (0 = worst, N-1 = best). Rank reassignment affects parent-selection
    /// probability only; recorded fitness is untouched.
    Ranked,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(4)
    }
}

impl Selection {
    /// Selects a parent index given the generation's fitness values.
    ///
    /// # Panics
    /// Panics if `fitness` is empty.
    pub fn select<R: Rng>(&self, fitness: &[f64], lower_is_better: bool, rng: &mut R) -> usize {
        assert!(!fitness.is_empty(), "cannot select from empty population");

        match self {
            Selection::Tournament(k) => tournament(fitness, *k, lower_is_better, rng),
            Selection::Roulette => roulette(fitness, lower_is_better, rng),
            Selection::Ranked => ranked(fitness, lower_is_better, rng),
        }
    }
}

fn is_better(a: f64, b: f64, lower_is_better: bool) -> bool {
    if lower_is_better {
        a < b
    } else {
        a > b
    }
}

/// Tournament selection: `k` draws with replacement, best wins.
fn tournament<R: Rng>(fitness: &[f64], k: usize, lower_is_better: bool, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = fitness.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if is_better(fitness[idx], fitness[best_idx], lower_is_better) {
            best_idx = idx;
        }
    }
    best_idx
}

/// Deterministic roulette walk: subtract each weight from `r`; the first
/// individual that drives `r` non-positive is selected.
pub(crate) fn roulette_pick(weights: &[f64], mut r: f64) -> usize {
    for (i, &w) in weights.iter().enumerate() {
        r -= w;
        if r <= 0.0 {
            return i;
        }
    }
    weights.len() - 1 // floating-point fallback
}

/// Segment weights for roulette: raw fitness when higher is better,
/// `max - fitness` when lower is better.
fn roulette_weights(fitness: &[f64], lower_is_better: bool) -> Vec<f64> {
    if lower_is_better {
        let max = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        fitness.iter().map(|&f| max - f).collect()
    } else {
        fitness.to_vec()
    }
}

fn roulette<R: Rng>(fitness: &[f64], lower_is_better: bool, rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    let weights = roulette_weights(fitness, lower_is_better);
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        // degenerate fitness landscape: fall back to a uniform pick
        return rng.random_range(0..n);
    }

    roulette_pick(&weights, rng.random_range(0.0..total))
}

/// Ranked selection: working fitness becomes the rank position, then the
/// roulette walk runs over those ranks.
fn ranked<R: Rng>(fitness: &[f64], lower_is_better: bool, rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    let mut weights = vec![0.0; n];
    for (rank, &idx) in rank_order(fitness, lower_is_better).iter().enumerate() {
        weights[idx] = rank as f64;
    }

    let total: f64 = (n * (n - 1)) as f64 / 2.0;
    roulette_pick(&weights, rng.random_range(0.0..total))
}

/// Indices sorted worst-first, so position in the result is the rank
/// (0 = worst, N-1 = best).
pub(crate) fn rank_order(fitness: &[f64], lower_is_better: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| {
        let cmp = fitness[a]
            .partial_cmp(&fitness[b])
            .unwrap_or(std::cmp::Ordering::Equal);
        if lower_is_better {
            cmp.reverse() // worst = highest fitness first
        } else {
            cmp // worst = lowest fitness first
        }
    });
    order
}
