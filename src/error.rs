//! Error taxonomy for the GP engine.
//!
//! Three classes of failure surface through [`GpError`]:
//!
//! - **Configuration errors**, detected at run start: invalid parameters,
//!   a primitive set that cannot synthesize a tree, missing callbacks.
//! - **Lookup errors**, surfaced at evaluation time: a tree referenced a
//!   variable the fitness function never set on the candidate.
//!
//! [`ArityMismatch`](GpError::ArityMismatch) is a construction-time check:
//! the `FunctionNode` constructor rejects a children list whose length
//! does not match the callable's arity, so a malformed tree is refused
//! before it exists rather than failing during evaluation.

use thiserror::Error;

/// Errors produced by the GP engine.
///
/// Configuration errors abort [`find_best_solution`] before the first
/// generation. [`UnknownVariable`](GpError::UnknownVariable) is returned
/// from [`Candidate::evaluate`] inside the caller's fitness function; the
/// caller owns the recovery policy for its own callback.
///
/// [`find_best_solution`]: crate::Engine::find_best_solution
/// [`Candidate::evaluate`]: crate::Candidate::evaluate
#[derive(Debug, Error)]
pub enum GpError {
    /// An engine parameter failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The primitive set has no constants, variables, or terminal
    /// functions, so no leaf node can ever be built.
    #[error("primitive set cannot build a terminal node: register at least one constant, variable, or terminal function")]
    EmptyTerminalSet,

    /// The depth bounds require internal nodes but no functions are
    /// registered.
    #[error("primitive set has no internal functions registered")]
    EmptyFunctionSet,

    /// No fitness function was registered before the run started.
    #[error("no fitness function registered")]
    MissingFitnessFunction,

    /// No progress function was registered before the run started.
    #[error("no progress function registered")]
    MissingProgressFunction,

    /// A function node was given a children list whose length does not
    /// match the callable's arity.
    #[error("function `{name}` takes {expected} operand(s) but was given {found}")]
    ArityMismatch {
        /// Display name of the function.
        name: String,
        /// The callable's arity.
        expected: usize,
        /// The number of children supplied.
        found: usize,
    },

    /// A tree referenced a variable that was never set on its candidate.
    ///
    /// This is a caller contract violation: the fitness function must set
    /// every variable the tree can reference before calling `evaluate`.
    #[error("variable `{0}` was not set on the candidate before evaluation")]
    UnknownVariable(String),
}
