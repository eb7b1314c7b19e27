//! Canonical variable patterns.

use std::fmt;

use serde::Serialize;

use loris_task::{Task, VariableId};

/// A sorted set of task variables defining a projection.
///
/// Patterns are canonical: ascending order, no duplicates. Two patterns are
/// equal iff their canonical forms match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Pattern(Vec<VariableId>);

impl Pattern {
    /// Canonicalize `vars` into a pattern. Idempotent on canonical input.
    pub fn new(mut vars: Vec<VariableId>) -> Self {
        vars.sort_unstable();
        vars.dedup();
        Self(vars)
    }

    pub fn singleton(var: VariableId) -> Self {
        Self(vec![var])
    }

    pub fn variables(&self) -> &[VariableId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, var: VariableId) -> bool {
        self.0.binary_search(&var).is_ok()
    }

    /// Position of `var` within the pattern, if present.
    pub fn position(&self, var: VariableId) -> Option<usize> {
        self.0.binary_search(&var).ok()
    }

    /// The canonical union of two patterns.
    pub fn union(&self, other: &Pattern) -> Pattern {
        let mut vars = self.0.clone();
        vars.extend_from_slice(&other.0);
        Pattern::new(vars)
    }

    /// This pattern extended by one variable.
    pub fn with_variable(&self, var: VariableId) -> Pattern {
        let mut vars = self.0.clone();
        vars.push(var);
        Pattern::new(vars)
    }

    /// Number of abstract states in the induced projection: the product of
    /// the pattern variables' domain sizes. `None` on u64 overflow.
    pub fn num_abstract_states(&self, task: &Task) -> Option<u64> {
        self.0.iter().try_fold(1u64, |product, &var| {
            product.checked_mul(task.domain_size(var) as u64)
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, var) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var}")?;
        }
        write!(f, "]")
    }
}
