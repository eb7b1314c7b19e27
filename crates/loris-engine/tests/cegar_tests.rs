mod common;
use common::*;

use std::time::Duration;

use loris_engine::{
    generate_pattern_collection, CegarOptions, GenerationError, InitialCollection,
    TerminationReason,
};
use loris_pdb::Pattern;

#[test]
fn trivially_unsolvable_task_is_reported_on_the_first_pass() {
    let task = trivially_unsolvable_task();
    let err = generate_pattern_collection(&task, quiet_options(), rng(0)).unwrap_err();
    assert!(matches!(err, GenerationError::Unsolvable { .. }));
}

#[test]
fn one_step_task_is_solved_outright() {
    let task = one_step_task();
    let result = generate_pattern_collection(&task, quiet_options(), rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::ConcreteSolution);
    assert_eq!(result.collection.patterns, vec![Pattern::singleton(0)]);
    assert_eq!(result.collection.pdbs.len(), 1);
    let plan = result.concrete_plan.expect("concrete plan");
    assert_eq!(plan.operators, vec![0]);
    assert_eq!(plan.cost, 1);
    assert_eq!(result.report.refinements, 0);
}

#[test]
fn precondition_flaw_leads_to_a_merge_and_a_concrete_plan() {
    let task = chained_goals_task();
    let result = generate_pattern_collection(&task, quiet_options(), rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::ConcreteSolution);
    assert_eq!(result.collection.patterns, vec![Pattern::new(vec![0, 1])]);
    let plan = result.concrete_plan.expect("concrete plan");
    // set-b must run before set-a-needs-b
    assert_eq!(plan.operators, vec![1, 0]);
    assert_eq!(plan.cost, 2);
    assert_eq!(result.report.refinements, 1);
}

#[test]
fn size_budgets_force_a_blacklist_instead_of_a_merge() {
    let task = chained_goals_task();
    let options = CegarOptions {
        max_pdb_size: 2,
        max_collection_size: 2,
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::NoMoreFlaws);
    assert!(result.concrete_plan.is_none());
    let mut patterns = result.collection.patterns.clone();
    patterns.sort_by(|a, b| a.variables().cmp(b.variables()));
    assert_eq!(
        patterns,
        vec![Pattern::singleton(0), Pattern::singleton(1)]
    );
    assert_eq!(result.report.blacklist_size, 1);
}

#[test]
fn goal_violation_grows_the_pattern_to_the_missing_goal() {
    let task = gated_goals_task();
    let options = CegarOptions {
        initial: InitialCollection::GivenGoal,
        given_goal: Some(0),
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::ConcreteSolution);
    assert_eq!(result.collection.patterns, vec![Pattern::new(vec![0, 1])]);
    assert_eq!(result.report.refinements, 1);
    let plan = result.concrete_plan.expect("concrete plan");
    assert_eq!(plan.operators, vec![0, 1]);
    assert_eq!(plan.cost, 2);
}

#[test]
fn ignoring_goal_violations_stops_at_a_single_pattern() {
    let task = independent_goals_task();
    let options = CegarOptions {
        initial: InitialCollection::GivenGoal,
        given_goal: Some(0),
        ignore_goal_violations: true,
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::NoMoreFlaws);
    assert_eq!(result.collection.patterns, vec![Pattern::singleton(0)]);
    assert!(result.concrete_plan.is_none());
    assert_eq!(result.report.refinements, 0);
}

#[test]
fn zero_refinements_still_runs_one_flaw_detection_pass() {
    let task = chained_goals_task();
    let options = CegarOptions {
        max_refinements: 0,
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::MaxRefinements);
    assert_eq!(result.report.refinements, 0);
    assert_eq!(result.collection.patterns.len(), 2);
}

#[test]
fn zero_refinements_can_still_discover_a_concrete_plan() {
    let task = one_step_task();
    let options = CegarOptions {
        max_refinements: 0,
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::ConcreteSolution);
    assert!(result.concrete_plan.is_some());
}

#[test]
fn zero_time_budget_returns_right_after_seeding() {
    let task = chained_goals_task();
    let options = CegarOptions {
        max_time: Some(Duration::ZERO),
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::TimeLimit);
    assert_eq!(result.report.refinements, 0);
    assert_eq!(result.collection.patterns.len(), 2);
}

#[test]
fn unit_pdb_budget_keeps_every_pattern_a_singleton() {
    let task = chained_goals_task();
    let options = CegarOptions {
        max_pdb_size: 1,
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(3)).unwrap();
    assert!(result
        .collection
        .patterns
        .iter()
        .all(|pattern| pattern.len() == 1));
    assert!(result.concrete_plan.is_none());
}

#[test]
fn blacklisting_every_non_goal_marks_patterns_solved_without_a_plan() {
    let mut task = one_step_task();
    task.add_variable("noise", 2);
    task.initial_state = loris_task::State::new(vec![0, 0]);
    let options = CegarOptions {
        global_blacklist_size: usize::MAX,
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::NoMoreFlaws);
    assert!(result.concrete_plan.is_none());
    assert_eq!(result.report.blacklist_size, 1);
}

#[test]
fn non_wildcard_plans_solve_the_chained_task_too() {
    let task = chained_goals_task();
    let options = CegarOptions {
        wildcard_plans: false,
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(0)).unwrap();
    assert_eq!(result.report.termination, TerminationReason::ConcreteSolution);
}

#[test]
fn identical_seeds_give_identical_runs() {
    let task = chained_goals_task();
    let first = generate_pattern_collection(&task, quiet_options(), rng(17)).unwrap();
    let second = generate_pattern_collection(&task, quiet_options(), rng(17)).unwrap();
    assert_eq!(first.collection.patterns, second.collection.patterns);
    assert_eq!(first.concrete_plan, second.concrete_plan);
    assert_eq!(first.report.refinements, second.report.refinements);
    assert_eq!(first.report.termination, second.report.termination);
}

#[test]
fn report_collection_size_matches_the_returned_pdbs() {
    let task = chained_goals_task();
    let options = CegarOptions {
        max_pdb_size: 2,
        max_collection_size: 2,
        ..quiet_options()
    };
    let result = generate_pattern_collection(&task, options, rng(0)).unwrap();
    let summed: u64 = result.collection.pdbs.iter().map(|pdb| pdb.size()).sum();
    assert_eq!(result.report.collection_size, summed);
    assert_eq!(
        result.report.patterns.len(),
        result.collection.pdbs.len()
    );
}

#[test]
fn returned_pdbs_outlive_the_driver() {
    let task = one_step_task();
    let result = generate_pattern_collection(&task, quiet_options(), rng(0)).unwrap();
    let pdb = result.collection.pdbs[0].clone();
    drop(result);
    assert_eq!(pdb.size(), 2);
    assert_eq!(pdb.goal_distance(&task.initial_state), Some(1));
}
