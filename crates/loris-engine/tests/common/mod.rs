#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use loris_engine::CegarOptions;
use loris_task::{Fact, Operator, State, Task, Verbosity};

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn quiet_options() -> CegarOptions {
    CegarOptions {
        verbosity: Verbosity::Silent,
        ..CegarOptions::default()
    }
}

/// One boolean variable, one operator with empty preconditions setting it.
pub fn one_step_task() -> Task {
    let mut task = Task::new();
    task.add_variable("x", 2);
    task.initial_state = State::new(vec![0]);
    task.goal = vec![Fact::new(0, 1)];
    task.add_operator(Operator {
        name: "set-x".into(),
        preconditions: vec![],
        effects: vec![Fact::new(0, 1)],
        cost: 1,
    });
    task
}

/// Goals on a and b; setting a requires b to be set first.
pub fn chained_goals_task() -> Task {
    let mut task = Task::new();
    task.add_variable("a", 2);
    task.add_variable("b", 2);
    task.initial_state = State::new(vec![0, 0]);
    task.goal = vec![Fact::new(0, 1), Fact::new(1, 1)];
    task.add_operator(Operator {
        name: "set-a-needs-b".into(),
        preconditions: vec![Fact::new(1, 1)],
        effects: vec![Fact::new(0, 1)],
        cost: 1,
    });
    task.add_operator(Operator {
        name: "set-b".into(),
        preconditions: vec![],
        effects: vec![Fact::new(1, 1)],
        cost: 1,
    });
    task
}

/// Goals on a and b, reachable independently.
pub fn independent_goals_task() -> Task {
    let mut task = Task::new();
    task.add_variable("a", 2);
    task.add_variable("b", 2);
    task.initial_state = State::new(vec![0, 0]);
    task.goal = vec![Fact::new(0, 1), Fact::new(1, 1)];
    task.add_operator(Operator {
        name: "set-a".into(),
        preconditions: vec![],
        effects: vec![Fact::new(0, 1)],
        cost: 1,
    });
    task.add_operator(Operator {
        name: "set-b".into(),
        preconditions: vec![],
        effects: vec![Fact::new(1, 1)],
        cost: 1,
    });
    task
}

/// Goals on a and b; b only becomes reachable after a is set, so the
/// singleton pattern on a reaches its abstract goal while the concrete goal
/// on b stays unmet.
pub fn gated_goals_task() -> Task {
    let mut task = Task::new();
    task.add_variable("a", 2);
    task.add_variable("b", 2);
    task.initial_state = State::new(vec![0, 0]);
    task.goal = vec![Fact::new(0, 1), Fact::new(1, 1)];
    task.add_operator(Operator {
        name: "set-a".into(),
        preconditions: vec![],
        effects: vec![Fact::new(0, 1)],
        cost: 1,
    });
    task.add_operator(Operator {
        name: "set-b-needs-a".into(),
        preconditions: vec![Fact::new(0, 1)],
        effects: vec![Fact::new(1, 1)],
        cost: 1,
    });
    task
}

/// Initial differs from the goal and there are no operators at all.
pub fn trivially_unsolvable_task() -> Task {
    let mut task = Task::new();
    task.add_variable("x", 2);
    task.initial_state = State::new(vec![0]);
    task.goal = vec![Fact::new(0, 1)];
    task
}
