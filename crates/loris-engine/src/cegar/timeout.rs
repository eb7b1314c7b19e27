//! Deadline helpers for the refinement loop's wall-clock budget.

use std::time::{Duration, Instant};

pub(crate) fn deadline_from_max_time(max_time: Option<Duration>) -> Option<Instant> {
    max_time.and_then(|budget| Instant::now().checked_add(budget))
}

pub(crate) fn deadline_exceeded(deadline: Option<Instant>) -> bool {
    match deadline {
        Some(deadline) => Instant::now() >= deadline,
        None => false,
    }
}
