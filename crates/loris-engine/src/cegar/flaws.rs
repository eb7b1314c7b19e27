//! Flaw detection: simulate abstract plans on the concrete initial state.

use super::*;

/// One reason an abstract plan diverged from concrete semantics: the
/// variable whose concrete value blocked a plan step, or a concrete goal
/// left unmet at the end of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flaw {
    pub solution_index: usize,
    pub variable: VariableId,
}

impl Cegar<'_> {
    /// Collect flaws across all live, unsolved slots.
    ///
    /// Returns an empty list either when nothing is left to refine or when a
    /// concrete solution was discovered (the caller distinguishes via
    /// `concrete_solution_index`). A slot without any abstract solution
    /// proves the task unsolvable.
    pub(crate) fn get_flaws(&mut self) -> Result<Vec<Flaw>, GenerationError> {
        let mut flaws = Vec::new();
        for index in 0..self.solutions.len() {
            let Some(solution) = self.solutions[index].as_ref() else {
                continue;
            };
            if solution.is_solved() {
                continue;
            }
            if !solution.solvable() {
                let pattern = solution.pattern().clone();
                if self.options.verbosity >= Verbosity::Normal {
                    info!(pattern = %pattern, "problem unsolvable");
                }
                return Err(GenerationError::Unsolvable { pattern });
            }

            let new_flaws = self.apply_plan(index);
            if self.concrete_solution_index.is_some() {
                return Ok(Vec::new());
            }
            flaws.extend(new_flaws);
        }
        Ok(flaws)
    }

    /// Try to execute one slot's abstract plan from the concrete initial
    /// state and report why it failed.
    ///
    /// Each plan step is a set of equivalent abstract operators, tried in
    /// order. Preconditions on blacklisted variables are ignored; every
    /// violated precondition of a failed operator is recorded as a flaw. The
    /// accumulated flaws are discarded as soon as some operator of the step
    /// applies; if no operator applies, execution stops and the flaws
    /// recorded so far for this step are the result.
    fn apply_plan(&mut self, solution_index: usize) -> Vec<Flaw> {
        let mut flaws = Vec::new();
        let Some(solution) = self.solutions[solution_index].as_ref() else {
            return flaws;
        };
        let pattern = solution.pattern().clone();

        let mut current = self.task.initial_state.clone();
        let mut executed: Vec<OperatorId> = Vec::new();
        for step in solution.plan() {
            let mut step_applied = false;
            for &abs_op in step {
                let op_id = solution.concrete_op_of(abs_op);
                let op = &self.task.operators[op_id];
                let mut blocked = false;
                for precondition in &op.preconditions {
                    if self.blacklist.contains(&precondition.var) {
                        continue;
                    }
                    if !current.satisfies(precondition) {
                        blocked = true;
                        flaws.push(Flaw {
                            solution_index,
                            variable: precondition.var,
                        });
                    }
                }
                if !blocked {
                    step_applied = true;
                    flaws.clear();
                    current = current.successor(op);
                    executed.push(op_id);
                    break;
                }
            }
            if !step_applied {
                break;
            }
        }

        if !flaws.is_empty() {
            if self.options.verbosity >= Verbosity::Verbose {
                debug!(pattern = %pattern, flaws = flaws.len(), "plan failed");
            }
            return flaws;
        }

        // The plan ran to completion without flaws.
        if self.task.is_goal_state(&current) {
            if self.blacklist.is_empty() {
                if self.options.verbosity >= Verbosity::Verbose {
                    debug!(
                        pattern = %pattern,
                        "plan reached a concrete goal state with nothing blacklisted, task solved"
                    );
                }
                self.concrete_solution_index = Some(solution_index);
                self.concrete_plan = Some(executed);
            } else {
                // Ignored preconditions on blacklisted variables mean the
                // plan is not guaranteed to work in the concrete state space.
                if self.options.verbosity >= Verbosity::Verbose {
                    debug!(
                        pattern = %pattern,
                        "plan reached a concrete goal state under a non-empty blacklist, \
                         marking pattern solved"
                    );
                }
                self.mark_solved(solution_index);
            }
        } else if self.options.ignore_goal_violations {
            if self.options.verbosity >= Verbosity::Verbose {
                debug!(pattern = %pattern, "goal violations ignored, marking pattern solved");
            }
            self.mark_solved(solution_index);
        } else {
            // Collect all unmet goals that are still available.
            for fact in &self.task.goal {
                if !current.satisfies(fact)
                    && !self.blacklist.contains(&fact.var)
                    && self.remaining_goals.contains(&fact.var)
                {
                    flaws.push(Flaw {
                        solution_index,
                        variable: fact.var,
                    });
                }
            }
            if flaws.is_empty() {
                // No goal left that could be added to the collection.
                if self.options.verbosity >= Verbosity::Verbose {
                    debug!(pattern = %pattern, "no more goals to add, marking pattern solved");
                }
                self.mark_solved(solution_index);
            }
        }

        flaws
    }

    fn mark_solved(&mut self, index: usize) {
        if let Some(solution) = self.solutions[index].as_mut() {
            solution.mark_solved();
        }
    }
}
