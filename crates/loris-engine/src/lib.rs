#![doc = include_str!("../README.md")]

//! CEGAR pattern-collection generation engine.
//!
//! This crate drives the refinement loop: seed an initial collection of
//! goal patterns, detect flaws by simulating abstract plans on the concrete
//! task, and repair one flaw per iteration under PDB and collection size
//! budgets.

pub mod cegar;
pub mod error;
pub mod result;

pub use cegar::{generate_pattern_collection, Cegar, CegarOptions, InitialCollection};
pub use error::GenerationError;
pub use result::{
    GenerationReport, GenerationResult, Plan, PatternCollection, TerminationReason,
};
