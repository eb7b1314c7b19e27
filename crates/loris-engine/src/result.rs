use std::sync::Arc;

use serde::Serialize;

use loris_pdb::{Pattern, PatternDatabase};
use loris_task::OperatorId;

/// Why the refinement loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The wall-clock budget ran out.
    TimeLimit,
    /// The refinement budget ran out.
    MaxRefinements,
    /// No unsolved pattern produced a flaw; nothing left to refine.
    NoMoreFlaws,
    /// An abstract plan executed concretely to a goal under an empty
    /// blacklist; the task is solved.
    ConcreteSolution,
}

/// A concrete plan discovered during flaw detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Task operator ids in execution order.
    pub operators: Vec<OperatorId>,
    /// Summed operator cost.
    pub cost: u64,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

/// The generated patterns together with their PDBs.
///
/// PDBs are shared so callers may keep them after the driver is gone.
#[derive(Debug, Clone)]
pub struct PatternCollection {
    pub patterns: Vec<Pattern>,
    pub pdbs: Vec<Arc<PatternDatabase>>,
}

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub refinements: u64,
    pub elapsed_secs: f64,
    pub termination: TerminationReason,
    pub patterns: Vec<Pattern>,
    /// Summed PDB size of the returned collection.
    pub collection_size: u64,
    pub blacklist_size: usize,
}

/// Everything `Cegar::generate` returns.
#[derive(Debug)]
pub struct GenerationResult {
    pub collection: PatternCollection,
    /// Present iff the run terminated with `ConcreteSolution`.
    pub concrete_plan: Option<Plan>,
    pub report: GenerationReport,
}
