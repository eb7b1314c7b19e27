#![doc = include_str!("../README.md")]

//! Finite-domain planning tasks.
//!
//! This crate defines the grounded task representation consumed by the rest
//! of the workspace: variables with finite domains, facts, operators, states,
//! the partial goal, plus validation and the JSON task format.

pub mod state;
pub mod task;
pub mod verbosity;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;

pub use state::State;
pub use task::{Fact, Operator, OperatorId, Task, TaskError, Variable, VariableId};
pub use verbosity::Verbosity;
