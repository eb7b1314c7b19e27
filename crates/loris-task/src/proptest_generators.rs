//! Proptest strategies for generating well-formed `Task` instances.

use proptest::prelude::*;

use crate::state::State;
use crate::task::{Fact, Operator, Task};

/// Raw operator material before values are clamped into variable domains:
/// precondition variables, effect variables, and one raw value per task
/// variable for each of the two fact lists.
type RawOperator = (Vec<usize>, Vec<usize>, Vec<usize>, Vec<usize>);

/// Strategy for a well-formed task suitable for property testing.
///
/// Generated tasks have:
/// - 1–5 variables with domain sizes 2–4
/// - a total initial state
/// - a non-empty goal on distinct variables
/// - 0–6 operators, each with at least one effect and unit cost
pub fn arb_task() -> impl Strategy<Value = Task> {
    (1..=5usize)
        .prop_flat_map(|num_vars| {
            (
                proptest::collection::vec(2..=4usize, num_vars),
                proptest::collection::vec(0..4usize, num_vars),
                proptest::collection::vec(0..4usize, num_vars),
                proptest::sample::subsequence((0..num_vars).collect::<Vec<_>>(), 1..=num_vars),
                proptest::collection::vec(arb_raw_operator(num_vars), 0..=6),
            )
        })
        .prop_map(|(domains, raw_init, raw_goal, goal_vars, raw_ops)| {
            let mut task = Task::new();
            for (i, &domain_size) in domains.iter().enumerate() {
                task.add_variable(format!("v{i}"), domain_size);
            }
            task.initial_state = State::new(clamped(&raw_init, &domains));
            task.goal = goal_vars
                .into_iter()
                .map(|var| Fact::new(var, raw_goal[var] % domains[var]))
                .collect();
            for (i, (pre_vars, eff_vars, raw_pre, raw_eff)) in raw_ops.into_iter().enumerate() {
                let preconditions = pre_vars
                    .into_iter()
                    .map(|var| Fact::new(var, raw_pre[var] % domains[var]))
                    .collect();
                let effects = eff_vars
                    .into_iter()
                    .map(|var| Fact::new(var, raw_eff[var] % domains[var]))
                    .collect();
                task.add_operator(Operator {
                    name: format!("op{i}"),
                    preconditions,
                    effects,
                    cost: 1,
                });
            }
            task
        })
}

fn arb_raw_operator(num_vars: usize) -> impl Strategy<Value = RawOperator> {
    (
        proptest::sample::subsequence((0..num_vars).collect::<Vec<_>>(), 0..=num_vars),
        proptest::sample::subsequence((0..num_vars).collect::<Vec<_>>(), 1..=num_vars),
        proptest::collection::vec(0..4usize, num_vars),
        proptest::collection::vec(0..4usize, num_vars),
    )
}

fn clamped(raw: &[usize], domains: &[usize]) -> Vec<usize> {
    raw.iter()
        .zip(domains)
        .map(|(&value, &domain)| value % domain)
        .collect()
}
