//! Generic tree-based genetic programming engine.
//!
//! Evolves a population of symbolic expression trees under a
//! user-supplied fitness function, using stochastic selection, crossover,
//! and mutation, and returns the best individual observed across all
//! generations. The engine is domain-agnostic: callers define their
//! problem entirely through the registered primitive set and the fitness
//! callback.
//!
//! # Core Types
//!
//! - [`Engine`]: registration API and the generation loop
//! - [`EngineConfig`]: algorithm parameters (population, rates, depths,
//!   termination)
//! - [`PrimitiveSet`]: functions, terminal functions, constants, variables
//! - [`Candidate`]: one expression tree plus fitness, problem state, and
//!   variable map
//! - [`Selection`]: tournament, roulette-wheel, or ranked parent selection
//! - [`EngineProgress`]: per-generation record passed to the progress
//!   callback (whose `false` return cancels the run)
//!
//! # Model
//!
//! Initial trees are built ramped half-and-half. Each generation, every
//! candidate's fitness is computed (in parallel across a rayon pool when
//! enabled), elites are carried over unchanged, and the rest of the next
//! generation is produced by selection, subtree crossover, and subtree
//! mutation. The run ends on stagnation of the best average fitness, on
//! reaching `max_generations`, or when the progress callback cancels.
//!
//! The engine is a stochastic local-search metaheuristic: its only
//! contract is returning the best-scoring individual it observed, not a
//! global optimum.
//!
//! # References
//!
//! - Koza (1992), *Genetic Programming: On the Programming of Computers
//!   by Means of Natural Selection*
//! - Poli, Langdon & McPhee (2008), *A Field Guide to Genetic
//!   Programming*

mod builder;
mod candidate;
mod config;
mod engine;
mod error;
mod operators;
mod primitives;
mod random;
mod selection;
mod tree;

pub use builder::build_tree;
pub use candidate::Candidate;
pub use config::EngineConfig;
pub use engine::{Engine, EngineProgress, FitnessFn, ProgressFn};
pub use error::GpError;
pub use operators::crossover;
pub use primitives::{FuncDef, FuncKind, PrimitiveSet, TerminalFuncDef};
pub use random::create_rng;
pub use selection::Selection;
pub use tree::{FunctionNode, Node, NodePath};
