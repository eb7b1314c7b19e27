//! Total variable assignments and operator application.

use serde::{Deserialize, Serialize};

use crate::task::{Fact, Operator, VariableId};

/// A total assignment of values to all task variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Vec<usize>);

impl State {
    pub fn new(values: Vec<usize>) -> Self {
        Self(values)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn value(&self, var: VariableId) -> usize {
        self.0[var]
    }

    pub fn values(&self) -> &[usize] {
        &self.0
    }

    pub fn satisfies(&self, fact: &Fact) -> bool {
        self.0[fact.var] == fact.value
    }

    /// The state reached by applying `op`'s effects to this state.
    ///
    /// Preconditions are not checked here; applicability is the caller's
    /// concern.
    pub fn successor(&self, op: &Operator) -> State {
        let mut values = self.0.clone();
        for effect in &op.effects {
            values[effect.var] = effect.value;
        }
        State(values)
    }
}
