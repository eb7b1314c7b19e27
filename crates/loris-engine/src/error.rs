use thiserror::Error;

use loris_pdb::{Pattern, PdbError};
use loris_task::{TaskError, VariableId};

/// Errors that terminate pattern-collection generation.
///
/// Budget exhaustion (time, refinements, size limits) is not an error; the
/// driver returns the collection built so far instead.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("task is invalid: {0}")]
    Task(#[from] TaskError),
    #[error("initial collection mode 'given-goal' requires a given goal variable")]
    MissingGivenGoal,
    #[error("given goal variable {var} is out of range of the task's {num_variables} variables")]
    GivenGoalOutOfRange { var: VariableId, num_variables: usize },
    #[error("given goal variable {var} is not a goal variable")]
    GivenGoalNotAGoal { var: VariableId },
    #[error("pattern {pattern} has no abstract solution, the task is unsolvable")]
    Unsolvable { pattern: Pattern },
    #[error(transparent)]
    Pdb(#[from] PdbError),
}

impl GenerationError {
    /// Whether this error proves the task has no solution.
    pub fn is_unsolvable(&self) -> bool {
        matches!(self, GenerationError::Unsolvable { .. })
    }

    /// Whether this error was caused by invalid input or configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            GenerationError::Task(_)
                | GenerationError::MissingGivenGoal
                | GenerationError::GivenGoalOutOfRange { .. }
                | GenerationError::GivenGoalNotAGoal { .. }
        )
    }
}
