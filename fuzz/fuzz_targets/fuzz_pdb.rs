#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use loris_pdb::{AbstractSolution, Pattern};
use loris_task::{Fact, Operator, State, Task, Verbosity};

/// Raw material for a tiny task; values are clamped into range before use.
#[derive(Debug, Arbitrary)]
struct TaskSpec {
    num_vars: u8,
    domains: Vec<u8>,
    init: Vec<u8>,
    goal: Vec<(u8, u8)>,
    ops: Vec<(Vec<(u8, u8)>, Vec<(u8, u8)>)>,
    pattern: Vec<u8>,
    seed: u64,
    wildcard: bool,
}

fuzz_target!(|spec: TaskSpec| {
    let num_vars = (spec.num_vars % 5 + 1) as usize;
    let mut task = Task::new();
    for i in 0..num_vars {
        let domain = spec.domains.get(i).map_or(2, |&d| (d % 4 + 1) as usize);
        task.add_variable(format!("v{i}"), domain);
    }
    let init: Vec<usize> = (0..num_vars)
        .map(|i| spec.init.get(i).map_or(0, |&v| v as usize % task.domain_size(i)))
        .collect();
    task.initial_state = State::new(init);
    for &(var, value) in spec.goal.iter().take(num_vars) {
        let var = var as usize % num_vars;
        if task.goal_value(var).is_none() {
            task.goal.push(Fact::new(var, value as usize % task.domain_size(var)));
        }
    }
    for (i, (pre, eff)) in spec.ops.iter().take(8).enumerate() {
        let mut preconditions = Vec::new();
        let mut effects = Vec::new();
        for &(var, value) in pre.iter().take(num_vars) {
            let var = var as usize % num_vars;
            if !preconditions.iter().any(|f: &Fact| f.var == var) {
                preconditions.push(Fact::new(var, value as usize % task.domain_size(var)));
            }
        }
        for &(var, value) in eff.iter().take(num_vars) {
            let var = var as usize % num_vars;
            if !effects.iter().any(|f: &Fact| f.var == var) {
                effects.push(Fact::new(var, value as usize % task.domain_size(var)));
            }
        }
        if effects.is_empty() {
            continue;
        }
        task.add_operator(Operator {
            name: format!("op{i}"),
            preconditions,
            effects,
            cost: 1,
        });
    }
    if task.goal.is_empty() || task.validate().is_err() {
        return;
    }

    let pattern = Pattern::new(
        spec.pattern
            .iter()
            .take(num_vars)
            .map(|&v| v as usize % num_vars)
            .collect(),
    );
    if pattern.is_empty() {
        return;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(spec.seed);
    let _ = AbstractSolution::new(&task, pattern, &mut rng, spec.wildcard, Verbosity::Silent);
});
