//! Abstract solutions: a pattern, its PDB, and one extracted plan.

use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use loris_task::{OperatorId, Task, Verbosity};

use crate::pattern::Pattern;
use crate::pdb::PatternDatabase;
use crate::projection::{AbstractOperatorId, PdbError, Projection};

/// A pattern together with its PDB and one abstract plan.
///
/// The plan is a sequence of steps; each step is a non-empty set of abstract
/// operators that are equally good at that point (they all decrease the
/// remaining goal distance by exactly their own cost). In non-wildcard mode
/// every step holds exactly one operator, chosen uniformly with the injected
/// RNG.
#[derive(Debug)]
pub struct AbstractSolution {
    pdb: Arc<PatternDatabase>,
    plan: Vec<Vec<AbstractOperatorId>>,
    plan_cost: u64,
    solvable: bool,
    solved: bool,
}

impl AbstractSolution {
    pub fn new(
        task: &Task,
        pattern: Pattern,
        rng: &mut ChaCha8Rng,
        wildcard_plans: bool,
        verbosity: Verbosity,
    ) -> Result<Self, PdbError> {
        let projection = Projection::new(task, pattern)?;
        let pdb = PatternDatabase::build(projection);

        let init_rank = pdb.projection().project_state(&task.initial_state);
        let mut plan = Vec::new();
        let mut plan_cost: u64 = 0;
        let solvable = pdb.distance(init_rank).is_some();

        if solvable {
            let projection = pdb.projection();
            let mut values = vec![0usize; projection.pattern().len()];
            let mut rank = init_rank;
            loop {
                let dist = match pdb.distance(rank) {
                    Some(0) | None => break,
                    Some(dist) => dist,
                };
                projection.unrank_into(rank, &mut values);
                let mut class = Vec::new();
                let mut next_of = Vec::new();
                for (abs_id, op) in projection.operators().iter().enumerate() {
                    if !op.is_applicable(&values) {
                        continue;
                    }
                    let succ = projection.successor_rank(rank, &values, op);
                    let improves = pdb
                        .distance(succ)
                        .is_some_and(|d| d as u64 + op.cost as u64 == dist as u64);
                    if improves {
                        class.push(abs_id);
                        next_of.push(succ);
                    }
                }
                // Every finite non-goal distance was set by relaxing some
                // operator edge, so the class cannot be empty.
                debug_assert!(!class.is_empty());
                let pick = rng.gen_range(0..class.len());
                plan_cost += projection.operators()[class[pick]].cost as u64;
                rank = next_of[pick];
                if wildcard_plans {
                    plan.push(class);
                } else {
                    plan.push(vec![class[pick]]);
                }
            }
        }

        if verbosity >= Verbosity::Verbose {
            if solvable {
                debug!(
                    pattern = %pdb.pattern(),
                    steps = plan.len(),
                    cost = plan_cost,
                    "extracted abstract plan"
                );
            } else {
                debug!(pattern = %pdb.pattern(), "projection has no abstract solution");
            }
        }

        Ok(Self {
            pdb: Arc::new(pdb),
            plan,
            plan_cost,
            solvable,
            solved: false,
        })
    }

    pub fn pattern(&self) -> &Pattern {
        self.pdb.pattern()
    }

    pub fn pdb(&self) -> &Arc<PatternDatabase> {
        &self.pdb
    }

    /// The extracted plan: one equivalence class of operators per step.
    pub fn plan(&self) -> &[Vec<AbstractOperatorId>] {
        &self.plan
    }

    /// Summed cost of the operators chosen while extracting the plan. Equals
    /// the abstract goal distance of the initial state.
    pub fn plan_cost(&self) -> u64 {
        self.plan_cost
    }

    /// Whether any abstract plan to an abstract goal exists.
    pub fn solvable(&self) -> bool {
        self.solvable
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn mark_solved(&mut self) {
        self.solved = true;
    }

    /// The task operator realizing the abstract operator `abs_id`.
    pub fn concrete_op_of(&self, abs_id: AbstractOperatorId) -> OperatorId {
        self.pdb.projection().operators()[abs_id].concrete_id
    }

    /// Render the plan with task operator names, one step per line.
    pub fn render_plan(&self, task: &Task) -> String {
        let mut out = String::new();
        for (i, step) in self.plan.iter().enumerate() {
            let names: Vec<&str> = step
                .iter()
                .map(|&abs_id| task.operators[self.concrete_op_of(abs_id)].name.as_str())
                .collect();
            out.push_str(&format!("step {i}: {}\n", names.join(" | ")));
        }
        out
    }
}
