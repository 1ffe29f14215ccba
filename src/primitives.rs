//! Primitive set: the vocabulary available for tree construction.
//!
//! A [`PrimitiveSet`] is built once by the caller before the run starts and
//! shared by reference for the whole search. It holds four kinds of
//! primitives:
//!
//! - **Functions**: internal nodes with arity 1–3, optionally receiving
//!   the candidate's mutable problem state.
//! - **Terminal functions**: zero-arity leaves that compute their value
//!   from the problem state alone.
//! - **Constants**: literal leaf values.
//! - **Variables**: named leaves resolved against the candidate's variable
//!   map at evaluation time.
//!
//! Arity and statefulness are encoded in the [`FuncKind`] tag: each
//! variant carries a concretely-typed callable, and the arity check in
//! the [`FunctionNode`](crate::FunctionNode) constructor means a function
//! node can never be wired with the wrong number of children.

use std::fmt;
use std::sync::Arc;

use crate::error::GpError;

/// A typed callable for an internal function node.
///
/// The six variants cover arity 1–3, with and without access to the
/// candidate's problem state `S`. Stateful variants receive `&mut S` after
/// their evaluated operands.
pub enum FuncKind<T, S> {
    /// One operand.
    Unary(Arc<dyn Fn(T) -> T + Send + Sync>),
    /// Two operands.
    Binary(Arc<dyn Fn(T, T) -> T + Send + Sync>),
    /// Three operands.
    Ternary(Arc<dyn Fn(T, T, T) -> T + Send + Sync>),
    /// One operand plus problem state.
    UnaryState(Arc<dyn Fn(T, &mut S) -> T + Send + Sync>),
    /// Two operands plus problem state.
    BinaryState(Arc<dyn Fn(T, T, &mut S) -> T + Send + Sync>),
    /// Three operands plus problem state.
    TernaryState(Arc<dyn Fn(T, T, T, &mut S) -> T + Send + Sync>),
}

impl<T, S> FuncKind<T, S> {
    /// Number of operand children a node bound to this callable requires.
    pub fn arity(&self) -> usize {
        match self {
            FuncKind::Unary(_) | FuncKind::UnaryState(_) => 1,
            FuncKind::Binary(_) | FuncKind::BinaryState(_) => 2,
            FuncKind::Ternary(_) | FuncKind::TernaryState(_) => 3,
        }
    }

    /// Whether the callable receives the candidate's problem state.
    pub fn uses_state(&self) -> bool {
        matches!(
            self,
            FuncKind::UnaryState(_) | FuncKind::BinaryState(_) | FuncKind::TernaryState(_)
        )
    }
}

/// A named internal function.
pub struct FuncDef<T, S> {
    /// Display name, used when rendering trees.
    pub name: String,
    /// The typed callable.
    pub kind: FuncKind<T, S>,
}

impl<T, S> FuncDef<T, S> {
    /// Number of operand children this function requires.
    pub fn arity(&self) -> usize {
        self.kind.arity()
    }
}

impl<T, S> fmt::Debug for FuncDef<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncDef")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .field("uses_state", &self.kind.uses_state())
            .finish()
    }
}

/// A named zero-arity function computed from problem state alone.
pub struct TerminalFuncDef<T, S> {
    /// Display name, used when rendering trees.
    pub name: String,
    /// The callable. Always stateful.
    pub func: Arc<dyn Fn(&mut S) -> T + Send + Sync>,
}

impl<T, S> fmt::Debug for TerminalFuncDef<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalFuncDef")
            .field("name", &self.name)
            .finish()
    }
}

/// The registered vocabulary for tree construction.
///
/// Immutable after setup: the engine only reads it during the run, so it
/// can be shared across the parallel evaluation phase without locking.
pub struct PrimitiveSet<T, S> {
    pub(crate) functions: Vec<Arc<FuncDef<T, S>>>,
    pub(crate) terminal_functions: Vec<Arc<TerminalFuncDef<T, S>>>,
    pub(crate) constants: Vec<T>,
    pub(crate) variable_names: Vec<String>,
}

impl<T, S> Default for PrimitiveSet<T, S> {
    fn default() -> Self {
        Self {
            functions: Vec::new(),
            terminal_functions: Vec::new(),
            constants: Vec::new(),
            variable_names: Vec::new(),
        }
    }
}

impl<T, S> PrimitiveSet<T, S> {
    /// Creates an empty primitive set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constant leaf value.
    pub fn add_constant(&mut self, value: T) {
        self.constants.push(value);
    }

    /// Registers a named variable.
    ///
    /// Duplicate names are ignored.
    pub fn add_variable(&mut self, name: &str) {
        if !self.variable_names.iter().any(|n| n == name) {
            self.variable_names.push(name.to_string());
        }
    }

    /// Registers a one-operand function.
    pub fn add_unary(&mut self, name: &str, f: impl Fn(T) -> T + Send + Sync + 'static) {
        self.functions.push(Arc::new(FuncDef {
            name: name.to_string(),
            kind: FuncKind::Unary(Arc::new(f)),
        }));
    }

    /// Registers a two-operand function.
    pub fn add_binary(&mut self, name: &str, f: impl Fn(T, T) -> T + Send + Sync + 'static) {
        self.functions.push(Arc::new(FuncDef {
            name: name.to_string(),
            kind: FuncKind::Binary(Arc::new(f)),
        }));
    }

    /// Registers a three-operand function.
    pub fn add_ternary(&mut self, name: &str, f: impl Fn(T, T, T) -> T + Send + Sync + 'static) {
        self.functions.push(Arc::new(FuncDef {
            name: name.to_string(),
            kind: FuncKind::Ternary(Arc::new(f)),
        }));
    }

    /// Registers a one-operand function that also receives problem state.
    pub fn add_unary_stateful(
        &mut self,
        name: &str,
        f: impl Fn(T, &mut S) -> T + Send + Sync + 'static,
    ) {
        self.functions.push(Arc::new(FuncDef {
            name: name.to_string(),
            kind: FuncKind::UnaryState(Arc::new(f)),
        }));
    }

    /// Registers a two-operand function that also receives problem state.
    pub fn add_binary_stateful(
        &mut self,
        name: &str,
        f: impl Fn(T, T, &mut S) -> T + Send + Sync + 'static,
    ) {
        self.functions.push(Arc::new(FuncDef {
            name: name.to_string(),
            kind: FuncKind::BinaryState(Arc::new(f)),
        }));
    }

    /// Registers a three-operand function that also receives problem state.
    pub fn add_ternary_stateful(
        &mut self,
        name: &str,
        f: impl Fn(T, T, T, &mut S) -> T + Send + Sync + 'static,
    ) {
        self.functions.push(Arc::new(FuncDef {
            name: name.to_string(),
            kind: FuncKind::TernaryState(Arc::new(f)),
        }));
    }

    /// Registers a zero-arity terminal function over problem state.
    pub fn add_terminal_function(
        &mut self,
        name: &str,
        f: impl Fn(&mut S) -> T + Send + Sync + 'static,
    ) {
        self.terminal_functions.push(Arc::new(TerminalFuncDef {
            name: name.to_string(),
            func: Arc::new(f),
        }));
    }

    /// Total count of terminal kinds (constants + variables + terminal
    /// functions), the weighting used by the tree builder.
    pub fn terminal_count(&self) -> usize {
        self.constants.len() + self.variable_names.len() + self.terminal_functions.len()
    }

    /// Count of registered internal functions.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Checks that the set can synthesize a tree within the given depth
    /// bounds: at least one terminal, and at least one function when
    /// internal nodes are required.
    pub fn validate(&self, max_depth: usize) -> Result<(), GpError> {
        if self.terminal_count() == 0 {
            return Err(GpError::EmptyTerminalSet);
        }
        if max_depth > 0 && self.functions.is_empty() {
            return Err(GpError::EmptyFunctionSet);
        }
        Ok(())
    }
}

impl<T, S> fmt::Debug for PrimitiveSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveSet")
            .field("functions", &self.functions.len())
            .field("terminal_functions", &self.terminal_functions.len())
            .field("constants", &self.constants.len())
            .field("variables", &self.variable_names)
            .finish()
    }
}
