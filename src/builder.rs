//! Random tree synthesis (ramped half-and-half).
//!
//! [`build_tree`] flips a fair coin between *full* trees (function nodes
//! at every level above the target depth) and *grow* trees (function vs.
//! terminal chosen in proportion to the registered primitive counts), and
//! picks the target depth uniformly from `[min_depth, max_depth]`. The
//! resulting mix of bushy and sparse shapes across the initial population
//! is what lets the search escape premature convergence.

use std::sync::Arc;

use rand::Rng;

use crate::primitives::PrimitiveSet;
use crate::tree::{FunctionNode, Node};

/// Builds one random tree with ramped half-and-half.
pub fn build_tree<T, S, R>(
    prims: &PrimitiveSet<T, S>,
    min_depth: usize,
    max_depth: usize,
    rng: &mut R,
) -> Node<T, S>
where
    T: Clone,
    R: Rng,
{
    let full_mode = rng.random_range(0.0..1.0) < 0.5;
    let depth = rng.random_range(min_depth..=max_depth);
    add_random_node(prims, depth, min_depth, full_mode, rng)
}

/// Recursively builds a random node with `levels_remaining` levels left
/// below it.
///
/// - `levels_remaining == 0`: always a terminal.
/// - `levels_remaining >= min_depth`: always a function, guaranteeing the
///   upper levels of the tree are internal.
/// - otherwise: a function in full mode, else function vs. terminal
///   weighted by the registered counts of each.
pub(crate) fn add_random_node<T, S, R>(
    prims: &PrimitiveSet<T, S>,
    levels_remaining: usize,
    min_depth: usize,
    full_mode: bool,
    rng: &mut R,
) -> Node<T, S>
where
    T: Clone,
    R: Rng,
{
    let num_funcs = prims.function_count();

    let make_terminal = if num_funcs == 0 || levels_remaining == 0 {
        true
    } else if levels_remaining >= min_depth {
        false
    } else if full_mode {
        false
    } else {
        // grow zone: weight by how many of each primitive kind exist
        let pick = rng.random_range(0..num_funcs + prims.terminal_count());
        pick >= num_funcs
    };

    if make_terminal {
        random_terminal(prims, rng)
    } else {
        let def = Arc::clone(&prims.functions[rng.random_range(0..num_funcs)]);
        Node::Function(FunctionNode::from_fn(def, || {
            add_random_node(prims, levels_remaining - 1, min_depth, full_mode, rng)
        }))
    }
}

/// Picks a terminal uniformly among all registered terminal kinds,
/// weighted by count: constants, then variables, then terminal functions.
fn random_terminal<T, S, R>(prims: &PrimitiveSet<T, S>, rng: &mut R) -> Node<T, S>
where
    T: Clone,
    R: Rng,
{
    let num_consts = prims.constants.len();
    let num_vars = prims.variable_names.len();
    let pick = rng.random_range(0..prims.terminal_count());

    if pick < num_consts {
        Node::Constant(prims.constants[pick].clone())
    } else if pick - num_consts < num_vars {
        Node::Variable(prims.variable_names[pick - num_consts].clone())
    } else {
        Node::Terminal(Arc::clone(
            &prims.terminal_functions[pick - num_consts - num_vars],
        ))
    }
}
