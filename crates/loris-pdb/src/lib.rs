#![doc = include_str!("../README.md")]

//! Patterns, projections, pattern databases, and abstract solutions.

pub mod pattern;
pub mod pdb;
pub mod projection;
pub mod solution;

pub use pattern::Pattern;
pub use pdb::PatternDatabase;
pub use projection::{AbstractOperator, AbstractOperatorId, PdbError, Projection};
pub use solution::AbstractSolution;
