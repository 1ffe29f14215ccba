//! Candidate solutions.
//!
//! A [`Candidate`] is the unit of selection, crossover, mutation, and
//! evaluation: one expression tree plus its fitness score, a private
//! problem-state value, and the variable map the tree's `Variable` leaves
//! resolve against. The fitness function writes variables and problem
//! state on the candidate it is handed, then calls
//! [`evaluate`](Candidate::evaluate) — candidates share no mutable state,
//! which is what makes the evaluation phase safe to parallelize.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;

use crate::builder::build_tree;
use crate::error::GpError;
use crate::primitives::PrimitiveSet;
use crate::tree::{Node, NodePath};

/// One candidate solution: an expression tree plus evaluation state.
pub struct Candidate<T, S> {
    pub(crate) root: Node<T, S>,
    /// Fitness assigned by the caller's fitness function each generation.
    pub fitness: f64,
    state: S,
    variables: HashMap<String, T>,
    pub(crate) min_depth: usize,
    pub(crate) max_depth: usize,
}

impl<T, S> Candidate<T, S>
where
    T: Clone,
    S: Default,
{
    /// Creates a candidate with a fresh random tree (ramped half-and-half).
    pub fn random<R: Rng>(
        prims: &PrimitiveSet<T, S>,
        min_depth: usize,
        max_depth: usize,
        rng: &mut R,
    ) -> Self {
        Self::from_root(build_tree(prims, min_depth, max_depth, rng), min_depth, max_depth)
    }

    pub(crate) fn from_root(root: Node<T, S>, min_depth: usize, max_depth: usize) -> Self {
        Self {
            root,
            fitness: 0.0,
            state: S::default(),
            variables: HashMap::new(),
            min_depth,
            max_depth,
        }
    }

    /// The root of this candidate's expression tree.
    pub fn root(&self) -> &Node<T, S> {
        &self.root
    }

    /// Sets a variable for the next evaluation.
    pub fn set_variable(&mut self, name: &str, value: T) {
        self.variables.insert(name.to_string(), value);
    }

    /// Read access to the problem state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access to the problem state.
    ///
    /// The fitness function typically resets or seeds the state here
    /// before evaluating.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Evaluates the expression tree against the current variables and
    /// problem state.
    ///
    /// Every variable the tree references must have been set via
    /// [`set_variable`](Candidate::set_variable) first; a missing name is
    /// a caller contract violation and returns
    /// [`GpError::UnknownVariable`].
    pub fn evaluate(&mut self) -> Result<T, GpError> {
        self.root.evaluate(&mut self.state, &self.variables)
    }

    /// Selects one non-root node uniformly at random.
    ///
    /// Retries until the reservoir pick lands below the root. Returns
    /// `None` for a single-node tree, where no non-root node exists — the
    /// guard that keeps mutation and crossover from looping forever.
    pub(crate) fn select_random_non_root<R: Rng>(&self, rng: &mut R) -> Option<NodePath> {
        if !matches!(self.root, Node::Function(_)) {
            return None;
        }
        loop {
            let path = self.root.select_random(rng);
            if !path.is_empty() {
                return Some(path);
            }
        }
    }

    /// Mutates this candidate in place: one random non-root subtree is
    /// replaced by a fresh random tree built with this candidate's depth
    /// bounds.
    ///
    /// A single-node tree is left unchanged.
    pub fn mutate<R: Rng>(&mut self, prims: &PrimitiveSet<T, S>, rng: &mut R) {
        let Some(path) = self.select_random_non_root(rng) else {
            return;
        };
        let subtree = build_tree(prims, self.min_depth, self.max_depth, rng);
        self.root.replace_at(&path, subtree);
    }
}

// Clones carry the tree and recorded fitness but get a fresh problem
// state, the same contract as a newly created candidate.
impl<T, S> Clone for Candidate<T, S>
where
    T: Clone,
    S: Default,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            fitness: self.fitness,
            state: S::default(),
            variables: self.variables.clone(),
            min_depth: self.min_depth,
            max_depth: self.max_depth,
        }
    }
}

impl<T, S> fmt::Debug for Candidate<T, S>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("fitness", &self.fitness)
            .field("tree", &self.root)
            .finish()
    }
}

impl<T, S> fmt::Display for Candidate<T, S>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::tree::FunctionNode;
    use std::sync::Arc;

    fn sample_prims() -> PrimitiveSet<f64, u32> {
        let mut prims = PrimitiveSet::new();
        prims.add_constant(1.0);
        prims.add_constant(2.0);
        prims.add_variable("x");
        prims.add_binary("add", |a, b| a + b);
        prims.add_unary("neg", |a| -a);
        prims
    }

    fn assert_arity_invariant(node: &Node<f64, u32>) {
        if let Node::Function(func) = node {
            assert_eq!(func.children().len(), func.def().arity());
            for child in func.children() {
                assert_arity_invariant(child);
            }
        }
    }

    #[test]
    fn test_evaluate_with_variables() {
        let prims = sample_prims();
        let add = Arc::clone(&prims.functions[0]);
        let root = Node::Function(
            FunctionNode::new(
                add,
                vec![Node::Variable("x".into()), Node::Constant(1.0)],
            )
            .unwrap(),
        );
        let mut cand = Candidate::from_root(root, 1, 3);
        cand.set_variable("x", 41.0);
        assert!((cand.evaluate().unwrap() - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_stateful_terminal_mutates_own_state() {
        let mut prims: PrimitiveSet<f64, u32> = PrimitiveSet::new();
        prims.add_terminal_function("tick", |count| {
            *count += 1;
            *count as f64
        });
        let root = Node::Terminal(Arc::clone(&prims.terminal_functions[0]));
        let mut cand = Candidate::from_root(root, 0, 0);
        assert!((cand.evaluate().unwrap() - 1.0).abs() < 1e-12);
        assert!((cand.evaluate().unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(*cand.state(), 2);
    }

    #[test]
    fn test_clone_gets_fresh_state() {
        let mut prims: PrimitiveSet<f64, u32> = PrimitiveSet::new();
        prims.add_terminal_function("tick", |count| {
            *count += 1;
            *count as f64
        });
        let root = Node::Terminal(Arc::clone(&prims.terminal_functions[0]));
        let mut cand = Candidate::from_root(root, 0, 0);
        cand.evaluate().unwrap();
        cand.fitness = 7.5;

        let copy = cand.clone();
        assert_eq!(*copy.state(), 0, "clone must start from default state");
        assert!((copy.fitness - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_mutation_preserves_arity_invariant() {
        let prims = sample_prims();
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let mut cand = Candidate::random(&prims, 2, 4, &mut rng);
            cand.mutate(&prims, &mut rng);
            assert_arity_invariant(&cand.root);
        }
    }

    #[test]
    fn test_mutation_changes_some_trees() {
        let prims = sample_prims();
        let mut rng = create_rng(9);
        let mut changed = 0;
        for _ in 0..50 {
            let cand = Candidate::random(&prims, 2, 4, &mut rng);
            let before = format!("{cand}");
            let mut mutated = cand.clone();
            mutated.mutate(&prims, &mut rng);
            if format!("{mutated}") != before {
                changed += 1;
            }
        }
        assert!(changed > 25, "mutation changed only {changed}/50 trees");
    }

    #[test]
    fn test_single_node_mutation_is_noop() {
        let prims = sample_prims();
        let mut rng = create_rng(1);
        let mut cand: Candidate<f64, u32> = Candidate::from_root(Node::Constant(5.0), 2, 4);
        // must not loop forever, must not replace the root
        cand.mutate(&prims, &mut rng);
        assert_eq!(cand.root.size(), 1);
        assert!(matches!(cand.root, Node::Constant(_)));
    }

    #[test]
    fn test_non_root_selection_excludes_root() {
        let prims = sample_prims();
        let mut rng = create_rng(17);
        let cand = Candidate::random(&prims, 2, 4, &mut rng);
        for _ in 0..200 {
            let path = cand.select_random_non_root(&mut rng).unwrap();
            assert!(!path.is_empty());
            assert!(cand.root.get(&path).is_some());
        }
    }
}
