//! Expression tree nodes.
//!
//! A [`Node`] is one element of a candidate's expression tree. Children
//! are owned by their parent, and nodes are addressed by **path**: the
//! sequence of child indices from the root ([`NodePath`]). Path addressing
//! replaces parent pointers entirely — a subtree swap is a
//! [`replace_at`](Node::replace_at) rewrite, and the parent/child
//! invariant is enforced by ownership.
//!
//! The four variants mirror the four leaf/internal kinds of the data
//! model. The `Function` payload is a [`FunctionNode`] whose children are
//! private and arity-checked at construction, so a node holding the wrong
//! number of children cannot be built through the public API.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::error::GpError;
use crate::primitives::{FuncDef, FuncKind, TerminalFuncDef};

/// Path from the root to a node: child indices, outermost first.
///
/// The empty path addresses the root.
pub type NodePath = Vec<usize>;

/// An internal function node: a callable plus exactly `arity` children.
///
/// The fields are private; [`new`](FunctionNode::new) rejects a children
/// list whose length does not match the callable's arity, and
/// [`from_fn`](FunctionNode::from_fn) synthesizes the right count itself.
pub struct FunctionNode<T, S> {
    def: Arc<FuncDef<T, S>>,
    children: Vec<Node<T, S>>,
}

impl<T, S> FunctionNode<T, S> {
    /// Wires `children` under `def`, checking the count against the
    /// callable's arity.
    pub fn new(
        def: Arc<FuncDef<T, S>>,
        children: Vec<Node<T, S>>,
    ) -> Result<Self, GpError> {
        if children.len() != def.arity() {
            return Err(GpError::ArityMismatch {
                name: def.name.clone(),
                expected: def.arity(),
                found: children.len(),
            });
        }
        Ok(Self { def, children })
    }

    /// Builds the node by calling `child` once per operand slot, so the
    /// child count always matches the arity.
    pub fn from_fn(
        def: Arc<FuncDef<T, S>>,
        mut child: impl FnMut() -> Node<T, S>,
    ) -> Self {
        let children = (0..def.arity()).map(|_| child()).collect();
        Self { def, children }
    }

    /// The function this node applies.
    pub fn def(&self) -> &FuncDef<T, S> {
        &self.def
    }

    /// The operand subtrees, in evaluation order.
    pub fn children(&self) -> &[Node<T, S>] {
        &self.children
    }
}

/// One node of an expression tree.
pub enum Node<T, S> {
    /// A literal leaf value.
    Constant(T),
    /// A named leaf resolved against the candidate's variable map at
    /// evaluation time.
    Variable(String),
    /// A zero-arity function leaf computed from problem state.
    Terminal(Arc<TerminalFuncDef<T, S>>),
    /// An internal function node with exactly `arity` children.
    Function(FunctionNode<T, S>),
}

impl<T, S> Node<T, S> {
    /// Evaluates the subtree rooted at this node.
    ///
    /// Children are evaluated left to right. Stateful callables receive
    /// `state` after their operands. A [`Variable`](Node::Variable) whose
    /// name is absent from `variables` is a caller contract violation and
    /// returns [`GpError::UnknownVariable`].
    pub fn evaluate(&self, state: &mut S, variables: &HashMap<String, T>) -> Result<T, GpError>
    where
        T: Clone,
    {
        match self {
            Node::Constant(value) => Ok(value.clone()),
            Node::Variable(name) => variables
                .get(name)
                .cloned()
                .ok_or_else(|| GpError::UnknownVariable(name.clone())),
            Node::Terminal(def) => Ok((def.func)(state)),
            Node::Function(func) => match (&func.def.kind, func.children.as_slice()) {
                (FuncKind::Unary(f), [a]) => {
                    let a = a.evaluate(state, variables)?;
                    Ok(f(a))
                }
                (FuncKind::Binary(f), [a, b]) => {
                    let a = a.evaluate(state, variables)?;
                    let b = b.evaluate(state, variables)?;
                    Ok(f(a, b))
                }
                (FuncKind::Ternary(f), [a, b, c]) => {
                    let a = a.evaluate(state, variables)?;
                    let b = b.evaluate(state, variables)?;
                    let c = c.evaluate(state, variables)?;
                    Ok(f(a, b, c))
                }
                (FuncKind::UnaryState(f), [a]) => {
                    let a = a.evaluate(state, variables)?;
                    Ok(f(a, state))
                }
                (FuncKind::BinaryState(f), [a, b]) => {
                    let a = a.evaluate(state, variables)?;
                    let b = b.evaluate(state, variables)?;
                    Ok(f(a, b, state))
                }
                (FuncKind::TernaryState(f), [a, b, c]) => {
                    let a = a.evaluate(state, variables)?;
                    let b = b.evaluate(state, variables)?;
                    let c = c.evaluate(state, variables)?;
                    Ok(f(a, b, c, state))
                }
                // unreachable when built through `new` or `from_fn`
                (kind, children) => Err(GpError::ArityMismatch {
                    name: func.def.name.clone(),
                    expected: kind.arity(),
                    found: children.len(),
                }),
            },
        }
    }

    /// Depth of the subtree in edges: a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Node::Function(func) => {
                1 + func.children.iter().map(Node::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Number of nodes in the subtree, including this one.
    pub fn size(&self) -> usize {
        match self {
            Node::Function(func) => {
                1 + func.children.iter().map(Node::size).sum::<usize>()
            }
            _ => 1,
        }
    }

    /// Selects one node uniformly at random in a single traversal and
    /// returns its path.
    ///
    /// Reservoir selection: the k-th node visited replaces the current
    /// pick with probability 1/k, with one visit counter threaded through
    /// the whole traversal. After the full pass every node has been
    /// selected with probability 1/N, without a pre-pass to count nodes.
    pub fn select_random<R: Rng>(&self, rng: &mut R) -> NodePath {
        let mut nodes_seen = 0usize;
        let mut path = NodePath::new();
        let mut selected = NodePath::new();
        self.reservoir_select(rng, &mut nodes_seen, &mut path, &mut selected);
        selected
    }

    fn reservoir_select<R: Rng>(
        &self,
        rng: &mut R,
        nodes_seen: &mut usize,
        path: &mut NodePath,
        selected: &mut NodePath,
    ) {
        *nodes_seen += 1;
        if rng.random_range(0.0..1.0) < 1.0 / *nodes_seen as f64 {
            selected.clone_from(path);
        }
        if let Node::Function(func) = self {
            for (i, child) in func.children.iter().enumerate() {
                path.push(i);
                child.reservoir_select(rng, nodes_seen, path, selected);
                path.pop();
            }
        }
    }

    /// Returns the node at `path`, or `None` if the path walks off the
    /// tree.
    pub fn get(&self, path: &[usize]) -> Option<&Node<T, S>> {
        match path.split_first() {
            None => Some(self),
            Some((&idx, rest)) => match self {
                Node::Function(func) => func.children.get(idx)?.get(rest),
                _ => None,
            },
        }
    }

    /// Mutable access to the node at `path`.
    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Node<T, S>> {
        match path.split_first() {
            None => Some(self),
            Some((&idx, rest)) => match self {
                Node::Function(func) => func.children.get_mut(idx)?.get_mut(rest),
                _ => None,
            },
        }
    }

    /// Replaces the subtree at `path` with `replacement`.
    ///
    /// Returns `false` (leaving the tree unchanged) if the path does not
    /// address a node.
    pub fn replace_at(&mut self, path: &[usize], replacement: Node<T, S>) -> bool {
        match self.get_mut(path) {
            Some(slot) => {
                *slot = replacement;
                true
            }
            None => false,
        }
    }
}

// Manual impls: `S` only appears behind `Arc`, so no `S: Clone` bound.
impl<T: Clone, S> Clone for FunctionNode<T, S> {
    fn clone(&self) -> Self {
        Self {
            def: Arc::clone(&self.def),
            children: self.children.clone(),
        }
    }
}

impl<T: Clone, S> Clone for Node<T, S> {
    fn clone(&self) -> Self {
        match self {
            Node::Constant(value) => Node::Constant(value.clone()),
            Node::Variable(name) => Node::Variable(name.clone()),
            Node::Terminal(def) => Node::Terminal(Arc::clone(def)),
            Node::Function(func) => Node::Function(func.clone()),
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for FunctionNode<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionNode")
            .field("def", &self.def.name)
            .field("children", &self.children)
            .finish()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for Node<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Node::Variable(name) => f.debug_tuple("Variable").field(name).finish(),
            Node::Terminal(def) => f.debug_tuple("Terminal").field(&def.name).finish(),
            Node::Function(func) => f
                .debug_tuple("Function")
                .field(&func.def.name)
                .field(&func.children)
                .finish(),
        }
    }
}

impl<T: fmt::Display, S> fmt::Display for Node<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant(value) => write!(f, "{value}"),
            Node::Variable(name) => write!(f, "{name}"),
            Node::Terminal(def) => write!(f, "{}()", def.name),
            Node::Function(func) => {
                write!(f, "{}(", func.def.name)?;
                for (i, child) in func.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}
