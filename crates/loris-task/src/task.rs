//! Grounded task representation: variables, facts, operators, goal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::State;

/// A unique identifier for a state variable.
pub type VariableId = usize;
/// A unique identifier for a grounded operator.
pub type OperatorId = usize;

/// A state variable with a finite domain `0..domain_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub domain_size: usize,
}

/// An assignment of one value to one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub var: VariableId,
    pub value: usize,
}

impl Fact {
    pub fn new(var: VariableId, value: usize) -> Self {
        Self { var, value }
    }
}

/// A grounded operator with precondition and effect facts.
///
/// Costs default to 1 and must be strictly positive; zero-cost operators are
/// rejected by validation because plan extraction walks strictly decreasing
/// goal distances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    #[serde(default)]
    pub preconditions: Vec<Fact>,
    pub effects: Vec<Fact>,
    #[serde(default = "default_cost")]
    pub cost: u32,
}

fn default_cost() -> u32 {
    1
}

/// Errors raised by task validation or loading.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("variable {var} has an empty domain")]
    EmptyDomain { var: VariableId },
    #[error("initial state assigns {actual} variables, task has {expected}")]
    InitialStateLength { expected: usize, actual: usize },
    #[error("initial state value {value} for variable {var} exceeds its domain")]
    InitialValueOutOfDomain { var: VariableId, value: usize },
    #[error("{context} references unknown variable {var}")]
    VariableOutOfRange { var: VariableId, context: String },
    #[error("{context} assigns out-of-domain value {value} to variable {var}")]
    ValueOutOfDomain {
        var: VariableId,
        value: usize,
        context: String,
    },
    #[error("goal constrains variable {var} more than once")]
    DuplicateGoalVariable { var: VariableId },
    #[error("task has an empty goal")]
    EmptyGoal,
    #[error("operator {op} ({name}) has cost 0")]
    ZeroCostOperator { op: OperatorId, name: String },
    #[error("operator {op} ({name}) has no effects")]
    EffectlessOperator { op: OperatorId, name: String },
    #[error("operator {op} ({name}) touches variable {var} twice in {context}")]
    DuplicateOperatorFact {
        op: OperatorId,
        name: String,
        var: VariableId,
        context: String,
    },
    #[error("task is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A grounded finite-domain planning task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub variables: Vec<Variable>,
    pub initial_state: State,
    /// Partial goal: one required value per goal variable.
    pub goal: Vec<Fact>,
    pub operators: Vec<Operator>,
}

impl Task {
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            initial_state: State::empty(),
            goal: Vec::new(),
            operators: Vec::new(),
        }
    }

    /// Deserialize a task from its JSON format and validate it.
    pub fn from_json_str(source: &str) -> Result<Self, TaskError> {
        let task: Task = serde_json::from_str(source)?;
        task.validate()?;
        Ok(task)
    }

    pub fn add_variable(&mut self, name: impl Into<String>, domain_size: usize) -> VariableId {
        let id = self.variables.len();
        self.variables.push(Variable {
            name: name.into(),
            domain_size,
        });
        id
    }

    pub fn add_operator(&mut self, op: Operator) -> OperatorId {
        let id = self.operators.len();
        self.operators.push(op);
        id
    }

    pub fn find_variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variables.iter().position(|v| v.name == name)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn domain_size(&self, var: VariableId) -> usize {
        self.variables[var].domain_size
    }

    /// Goal variables in task enumeration order.
    pub fn goal_variables(&self) -> Vec<VariableId> {
        self.goal.iter().map(|fact| fact.var).collect()
    }

    pub fn goal_value(&self, var: VariableId) -> Option<usize> {
        self.goal
            .iter()
            .find(|fact| fact.var == var)
            .map(|fact| fact.value)
    }

    pub fn is_goal_state(&self, state: &State) -> bool {
        self.goal.iter().all(|fact| state.satisfies(fact))
    }

    /// Check internal consistency of the task.
    ///
    /// Every fact must reference an existing variable and an in-domain value,
    /// the initial state must be a total assignment, the goal must be
    /// non-empty and constrain each variable at most once, and every operator
    /// must have at least one effect, positive cost, and at most one
    /// precondition/effect per variable.
    pub fn validate(&self) -> Result<(), TaskError> {
        for (var, variable) in self.variables.iter().enumerate() {
            if variable.domain_size == 0 {
                return Err(TaskError::EmptyDomain { var });
            }
        }

        if self.initial_state.len() != self.variables.len() {
            return Err(TaskError::InitialStateLength {
                expected: self.variables.len(),
                actual: self.initial_state.len(),
            });
        }
        for var in 0..self.variables.len() {
            let value = self.initial_state.value(var);
            if value >= self.domain_size(var) {
                return Err(TaskError::InitialValueOutOfDomain { var, value });
            }
        }

        if self.goal.is_empty() {
            return Err(TaskError::EmptyGoal);
        }
        let mut seen_goal_vars = std::collections::HashSet::new();
        for fact in &self.goal {
            self.check_fact(fact, "goal")?;
            if !seen_goal_vars.insert(fact.var) {
                return Err(TaskError::DuplicateGoalVariable { var: fact.var });
            }
        }

        for (op_id, op) in self.operators.iter().enumerate() {
            if op.cost == 0 {
                return Err(TaskError::ZeroCostOperator {
                    op: op_id,
                    name: op.name.clone(),
                });
            }
            if op.effects.is_empty() {
                return Err(TaskError::EffectlessOperator {
                    op: op_id,
                    name: op.name.clone(),
                });
            }
            for (facts, context) in [
                (&op.preconditions, "preconditions"),
                (&op.effects, "effects"),
            ] {
                let mut seen = std::collections::HashSet::new();
                for fact in facts {
                    self.check_fact(fact, &format!("operator {}", op.name))?;
                    if !seen.insert(fact.var) {
                        return Err(TaskError::DuplicateOperatorFact {
                            op: op_id,
                            name: op.name.clone(),
                            var: fact.var,
                            context: context.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn check_fact(&self, fact: &Fact, context: &str) -> Result<(), TaskError> {
        if fact.var >= self.variables.len() {
            return Err(TaskError::VariableOutOfRange {
                var: fact.var,
                context: context.to_string(),
            });
        }
        if fact.value >= self.domain_size(fact.var) {
            return Err(TaskError::ValueOutOfDomain {
                var: fact.var,
                value: fact.value,
                context: context.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new()
    }
}
