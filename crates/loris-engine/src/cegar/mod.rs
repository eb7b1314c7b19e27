//! The refinement driver: options, collection state, seeding, main loop.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::{IndexMap, IndexSet};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use loris_pdb::{AbstractSolution, Pattern};
use loris_task::{OperatorId, Task, VariableId, Verbosity};

use crate::error::GenerationError;
use crate::result::{
    GenerationReport, GenerationResult, Plan, PatternCollection, TerminationReason,
};

mod flaws;
mod refinement;
mod timeout;

pub(crate) use flaws::Flaw;

/// How the initial pattern collection is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialCollection {
    /// One singleton pattern for the configured given goal variable.
    GivenGoal,
    /// One singleton pattern for a randomly drawn goal variable.
    RandomGoal,
    /// One singleton pattern per goal variable.
    #[default]
    AllGoals,
}

impl FromStr for InitialCollection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "given-goal" => Ok(InitialCollection::GivenGoal),
            "random-goal" => Ok(InitialCollection::RandomGoal),
            "all-goals" => Ok(InitialCollection::AllGoals),
            other => Err(format!(
                "unknown initial collection '{other}' (expected given-goal, random-goal, or all-goals)"
            )),
        }
    }
}

/// Options for pattern-collection generation.
///
/// `u64::MAX` plays the role of infinity for the refinement and size
/// budgets, `usize::MAX` for the blacklist draw, and `max_time: None`
/// disables the wall-clock budget. The size budgets are not applied to the
/// initial goal-variable patterns.
#[derive(Debug, Clone)]
pub struct CegarOptions {
    pub max_refinements: u64,
    pub max_pdb_size: u64,
    pub max_collection_size: u64,
    /// Extract wildcard plans (one equivalence class of operators per step)
    /// instead of one operator per step.
    pub wildcard_plans: bool,
    /// Mark a pattern solved when its plan reaches an abstract but not a
    /// concrete goal, instead of growing it to cover missing goals.
    pub ignore_goal_violations: bool,
    /// Number of randomly drawn non-goal variables to blacklist up front.
    pub global_blacklist_size: usize,
    pub initial: InitialCollection,
    /// Seed variable for `InitialCollection::GivenGoal`; must be a goal
    /// variable.
    pub given_goal: Option<VariableId>,
    pub max_time: Option<Duration>,
    pub verbosity: Verbosity,
}

impl Default for CegarOptions {
    fn default() -> Self {
        Self {
            max_refinements: u64::MAX,
            max_pdb_size: 1_000_000,
            max_collection_size: u64::MAX,
            wildcard_plans: true,
            ignore_goal_violations: false,
            global_blacklist_size: 0,
            initial: InitialCollection::AllGoals,
            given_goal: None,
            max_time: None,
            verbosity: Verbosity::Normal,
        }
    }
}

/// Generate a pattern collection for `task` with a freshly seeded RNG.
///
/// Convenience wrapper around [`Cegar::new`] + [`Cegar::generate`].
pub fn generate_pattern_collection(
    task: &Task,
    options: CegarOptions,
    rng: ChaCha8Rng,
) -> Result<GenerationResult, GenerationError> {
    Cegar::new(task, options, rng).generate()
}

/// The collection state of one generation run.
///
/// Slot indices into `solutions` are stable identities: a merge vacates the
/// absorbed slot and the vacated index is never reused, so in-flight flaws
/// always refer to the same logical pattern.
pub struct Cegar<'a> {
    task: &'a Task,
    options: CegarOptions,
    rng: ChaCha8Rng,
    remaining_goals: Vec<VariableId>,
    blacklist: IndexSet<VariableId>,
    solutions: Vec<Option<AbstractSolution>>,
    /// variable -> index of the live slot whose pattern contains it.
    lookup: IndexMap<VariableId, usize>,
    /// Summed PDB size over live slots.
    collection_size: u64,
    concrete_solution_index: Option<usize>,
    concrete_plan: Option<Vec<OperatorId>>,
}

impl<'a> Cegar<'a> {
    pub fn new(task: &'a Task, options: CegarOptions, rng: ChaCha8Rng) -> Self {
        Self {
            task,
            options,
            rng,
            remaining_goals: Vec::new(),
            blacklist: IndexSet::new(),
            solutions: Vec::new(),
            lookup: IndexMap::new(),
            collection_size: 0,
            concrete_solution_index: None,
            concrete_plan: None,
        }
    }

    /// Run the refinement loop to completion and return the collection, or
    /// the concrete plan if one was discovered on the way.
    pub fn generate(mut self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let deadline = timeout::deadline_from_max_time(self.options.max_time);

        self.task.validate().map_err(GenerationError::Task)?;
        self.check_given_goal()?;
        self.seed_remaining_goals();
        self.seed_blacklist();
        self.seed_initial_collection()?;

        let mut refinements: u64 = 0;
        let termination = loop {
            if timeout::deadline_exceeded(deadline) {
                break TerminationReason::TimeLimit;
            }
            let flaws = self.get_flaws()?;
            if flaws.is_empty() {
                break if self.concrete_solution_index.is_some() {
                    TerminationReason::ConcreteSolution
                } else {
                    TerminationReason::NoMoreFlaws
                };
            }
            if timeout::deadline_exceeded(deadline) {
                break TerminationReason::TimeLimit;
            }
            if refinements == self.options.max_refinements {
                break TerminationReason::MaxRefinements;
            }
            self.refine(&flaws)?;
            refinements += 1;
            if self.options.verbosity >= Verbosity::Verbose {
                debug!(
                    iteration = refinements,
                    collection_size = self.collection_size,
                    collection = %self.render_collection(),
                    "refined collection"
                );
            }
        };

        self.log_termination(termination);
        Ok(self.into_result(start.elapsed(), refinements, termination))
    }

    fn check_given_goal(&self) -> Result<(), GenerationError> {
        if self.options.initial == InitialCollection::GivenGoal && self.options.given_goal.is_none()
        {
            return Err(GenerationError::MissingGivenGoal);
        }
        if let Some(var) = self.options.given_goal {
            if var >= self.task.num_variables() {
                return Err(GenerationError::GivenGoalOutOfRange {
                    var,
                    num_variables: self.task.num_variables(),
                });
            }
            if self.task.goal_value(var).is_none() {
                return Err(GenerationError::GivenGoalNotAGoal { var });
            }
        }
        Ok(())
    }

    /// Save all goal variables in random order for refinement later.
    fn seed_remaining_goals(&mut self) {
        self.remaining_goals = self.task.goal_variables();
        self.remaining_goals.shuffle(&mut self.rng);
    }

    /// Draw the configured number of non-goal variables into the blacklist,
    /// uniformly without replacement.
    fn seed_blacklist(&mut self) {
        if self.options.global_blacklist_size == 0 {
            return;
        }
        let mut non_goals: Vec<VariableId> = (0..self.task.num_variables())
            .filter(|var| !self.remaining_goals.contains(var))
            .collect();
        non_goals.shuffle(&mut self.rng);
        non_goals.truncate(self.options.global_blacklist_size.min(non_goals.len()));
        for var in non_goals {
            if self.options.verbosity >= Verbosity::Verbose {
                debug!(var, "blacklisting variable");
            }
            self.blacklist.insert(var);
        }
    }

    fn seed_initial_collection(&mut self) -> Result<(), GenerationError> {
        match self.options.initial {
            InitialCollection::GivenGoal => {
                let var = self
                    .options
                    .given_goal
                    .ok_or(GenerationError::MissingGivenGoal)?;
                self.update_goals(var);
                self.add_pattern_for_var(var)?;
            }
            InitialCollection::RandomGoal => {
                if let Some(var) = self.remaining_goals.pop() {
                    self.add_pattern_for_var(var)?;
                }
            }
            InitialCollection::AllGoals => {
                while let Some(var) = self.remaining_goals.pop() {
                    self.add_pattern_for_var(var)?;
                }
            }
        }
        if self.options.verbosity >= Verbosity::Verbose {
            debug!(collection = %self.render_collection(), "initial collection");
        }
        Ok(())
    }

    fn log_termination(&self, termination: TerminationReason) {
        if self.options.verbosity < Verbosity::Normal {
            return;
        }
        match termination {
            TerminationReason::TimeLimit => info!("time limit reached"),
            TerminationReason::MaxRefinements => {
                info!("maximum allowed number of refinements reached")
            }
            TerminationReason::NoMoreFlaws => {
                info!("flaw list empty, no further refinements possible")
            }
            TerminationReason::ConcreteSolution => {
                info!("task solved during computation of abstract solutions");
                if let Some(index) = self.concrete_solution_index {
                    if let Some(solution) = self.solutions[index].as_ref() {
                        info!(
                            steps = solution.plan().len(),
                            cost = solution.plan_cost(),
                            "concrete plan:\n{}",
                            solution.render_plan(self.task)
                        );
                    }
                }
            }
        }
    }

    fn into_result(
        self,
        elapsed: Duration,
        refinements: u64,
        termination: TerminationReason,
    ) -> GenerationResult {
        let mut patterns = Vec::new();
        let mut pdbs = Vec::new();
        let mut concrete_plan = None;

        if let Some(index) = self.concrete_solution_index {
            if let Some(solution) = self.solutions[index].as_ref() {
                patterns.push(solution.pattern().clone());
                pdbs.push(Arc::clone(solution.pdb()));
            }
            let operators = self.concrete_plan.unwrap_or_default();
            let cost = operators
                .iter()
                .map(|&op| self.task.operators[op].cost as u64)
                .sum();
            concrete_plan = Some(Plan { operators, cost });
        } else {
            for solution in self.solutions.iter().flatten() {
                patterns.push(solution.pattern().clone());
                pdbs.push(Arc::clone(solution.pdb()));
            }
        }

        let collection_size = pdbs.iter().map(|pdb| pdb.size()).sum();
        let report = GenerationReport {
            refinements,
            elapsed_secs: elapsed.as_secs_f64(),
            termination,
            patterns: patterns.clone(),
            collection_size,
            blacklist_size: self.blacklist.len(),
        };
        if self.options.verbosity >= Verbosity::Normal {
            info!(
                refinements,
                elapsed_secs = report.elapsed_secs,
                num_patterns = patterns.len(),
                collection_size,
                "pattern collection generation finished"
            );
        }

        GenerationResult {
            collection: PatternCollection { patterns, pdbs },
            concrete_plan,
            report,
        }
    }

    fn render_collection(&self) -> String {
        let rendered: Vec<String> = self
            .solutions
            .iter()
            .flatten()
            .map(|solution| solution.pattern().to_string())
            .collect();
        format!("[{}]", rendered.join(", "))
    }
}
