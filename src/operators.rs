//! Subtree crossover.
//!
//! Mutation lives on [`Candidate`](crate::Candidate) (it rewrites the
//! candidate in place); crossover lives here because it pairs two parents
//! and produces two children.

use rand::Rng;

use crate::candidate::Candidate;

/// Crosses two parents into two children.
///
/// The children start as exact copies of the parents. With probability
/// `crossover_rate`, one non-root subtree is selected uniformly at random
/// in each child and the two subtrees are swapped (as deep clones, so the
/// children share no nodes). When the draw fails, or when either child is
/// a single-node tree with no non-root subtree to offer, the children are
/// returned unmodified.
///
/// The root is never selected: replacing a whole tree would be a
/// re-initialization, not crossover.
pub fn crossover<T, S, R>(
    parent1: &Candidate<T, S>,
    parent2: &Candidate<T, S>,
    crossover_rate: f64,
    rng: &mut R,
) -> (Candidate<T, S>, Candidate<T, S>)
where
    T: Clone,
    S: Default,
    R: Rng,
{
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    if rng.random_range(0.0..1.0) < crossover_rate {
        if let (Some(path1), Some(path2)) = (
            child1.select_random_non_root(rng),
            child2.select_random_non_root(rng),
        ) {
            let sub1 = child1
                .root
                .get(&path1)
                .expect("selected path addresses a node")
                .clone();
            let sub2 = child2
                .root
                .get(&path2)
                .expect("selected path addresses a node")
                .clone();
            child1.root.replace_at(&path1, sub2);
            child2.root.replace_at(&path2, sub1);
        }
    }

    (child1, child2)
}
