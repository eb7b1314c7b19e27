//! Task projections: abstract operators and perfect-hash state ranking.

use thiserror::Error;

use loris_task::{OperatorId, State, Task};

use crate::pattern::Pattern;

/// A unique identifier for an operator of a projection.
pub type AbstractOperatorId = usize;

/// Errors raised while building a projection or its pattern database.
#[derive(Debug, Error)]
pub enum PdbError {
    #[error("pattern {pattern} has more abstract states than u64 can count")]
    AbstractStateOverflow { pattern: Pattern },
    #[error("pattern {pattern} induces {states} abstract states, too many to index on this platform")]
    TooManyAbstractStates { pattern: Pattern, states: u64 },
}

/// A task operator restricted to the variables of a pattern.
///
/// Facts are stored as (pattern position, value) pairs. Operators without any
/// effect on the pattern are dropped from the projection.
#[derive(Debug, Clone)]
pub struct AbstractOperator {
    /// The task operator this projection entry was derived from.
    pub concrete_id: OperatorId,
    pub preconditions: Vec<(usize, usize)>,
    pub effects: Vec<(usize, usize)>,
    pub cost: u32,
}

impl AbstractOperator {
    pub fn is_applicable(&self, values: &[usize]) -> bool {
        self.preconditions
            .iter()
            .all(|&(pos, value)| values[pos] == value)
    }
}

/// The projection of a task onto a pattern.
///
/// Abstract states are ranked by a mixed-radix perfect hash over the pattern
/// variables' domains; ranks index the distance table of the PDB built on
/// top of this projection.
#[derive(Debug, Clone)]
pub struct Projection {
    pattern: Pattern,
    domain_sizes: Vec<usize>,
    multipliers: Vec<u64>,
    num_states: u64,
    operators: Vec<AbstractOperator>,
    goal: Vec<(usize, usize)>,
}

impl Projection {
    pub fn new(task: &Task, pattern: Pattern) -> Result<Self, PdbError> {
        let domain_sizes: Vec<usize> = pattern
            .variables()
            .iter()
            .map(|&var| task.domain_size(var))
            .collect();

        let mut multipliers = Vec::with_capacity(domain_sizes.len());
        let mut num_states: u64 = 1;
        for &domain in &domain_sizes {
            multipliers.push(num_states);
            num_states = num_states
                .checked_mul(domain as u64)
                .ok_or_else(|| PdbError::AbstractStateOverflow {
                    pattern: pattern.clone(),
                })?;
        }
        if usize::try_from(num_states).is_err() {
            return Err(PdbError::TooManyAbstractStates {
                pattern: pattern.clone(),
                states: num_states,
            });
        }

        let mut operators = Vec::new();
        for (concrete_id, op) in task.operators.iter().enumerate() {
            let effects: Vec<(usize, usize)> = op
                .effects
                .iter()
                .filter_map(|fact| pattern.position(fact.var).map(|pos| (pos, fact.value)))
                .collect();
            if effects.is_empty() {
                continue;
            }
            let preconditions = op
                .preconditions
                .iter()
                .filter_map(|fact| pattern.position(fact.var).map(|pos| (pos, fact.value)))
                .collect();
            operators.push(AbstractOperator {
                concrete_id,
                preconditions,
                effects,
                cost: op.cost,
            });
        }

        let goal = task
            .goal
            .iter()
            .filter_map(|fact| pattern.position(fact.var).map(|pos| (pos, fact.value)))
            .collect();

        Ok(Self {
            pattern,
            domain_sizes,
            multipliers,
            num_states,
            operators,
            goal,
        })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn num_states(&self) -> u64 {
        self.num_states
    }

    pub(crate) fn num_states_usize(&self) -> usize {
        // Checked against usize in `new`.
        self.num_states as usize
    }

    pub fn operators(&self) -> &[AbstractOperator] {
        &self.operators
    }

    pub fn goal_facts(&self) -> &[(usize, usize)] {
        &self.goal
    }

    /// Rank of an abstract state given one value per pattern position.
    pub fn rank(&self, values: &[usize]) -> u64 {
        values
            .iter()
            .zip(&self.multipliers)
            .map(|(&value, &multiplier)| value as u64 * multiplier)
            .sum()
    }

    /// Decode `rank` into `values`, one entry per pattern position.
    pub fn unrank_into(&self, rank: u64, values: &mut [usize]) {
        let mut rest = rank;
        for (pos, &domain) in self.domain_sizes.iter().enumerate() {
            values[pos] = (rest % domain as u64) as usize;
            rest /= domain as u64;
        }
    }

    /// Rank of the successor reached by applying `op` to the state `values`
    /// (which must be the decoded form of `rank`).
    pub fn successor_rank(&self, rank: u64, values: &[usize], op: &AbstractOperator) -> u64 {
        let mut delta: i128 = 0;
        for &(pos, new_value) in &op.effects {
            delta += (new_value as i128 - values[pos] as i128) * self.multipliers[pos] as i128;
        }
        (rank as i128 + delta) as u64
    }

    /// Rank of the projection of a concrete state.
    pub fn project_state(&self, state: &State) -> u64 {
        self.pattern
            .variables()
            .iter()
            .zip(&self.multipliers)
            .map(|(&var, &multiplier)| state.value(var) as u64 * multiplier)
            .sum()
    }

    pub fn is_goal(&self, values: &[usize]) -> bool {
        self.goal.iter().all(|&(pos, value)| values[pos] == value)
    }
}
