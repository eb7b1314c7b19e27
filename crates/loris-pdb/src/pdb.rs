//! Pattern databases: complete abstract goal-distance tables.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use loris_task::State;

use crate::pattern::Pattern;
use crate::projection::Projection;

const INFINITE: u32 = u32::MAX;

/// The complete table of shortest abstract goal distances for a projection.
///
/// Distances are computed once at construction by a uniform-cost sweep from
/// all abstract goal states over the reversed projected transition graph.
/// States that cannot reach an abstract goal have no distance.
#[derive(Debug, Clone)]
pub struct PatternDatabase {
    projection: Projection,
    distances: Vec<u32>,
}

impl PatternDatabase {
    pub fn build(projection: Projection) -> Self {
        let num_states = projection.num_states_usize();
        let num_positions = projection.pattern().len();

        // Predecessor adjacency: reversed[succ] lists (pred, cost) edges.
        let mut reversed: Vec<Vec<(usize, u32)>> = vec![Vec::new(); num_states];
        let mut distances = vec![INFINITE; num_states];
        let mut heap = BinaryHeap::new();
        let mut values = vec![0usize; num_positions];

        for rank in 0..num_states {
            projection.unrank_into(rank as u64, &mut values);
            for op in projection.operators() {
                if op.is_applicable(&values) {
                    let succ = projection.successor_rank(rank as u64, &values, op) as usize;
                    reversed[succ].push((rank, op.cost));
                }
            }
            if projection.is_goal(&values) {
                distances[rank] = 0;
                heap.push(Reverse((0u32, rank)));
            }
        }

        while let Some(Reverse((dist, state))) = heap.pop() {
            if dist > distances[state] {
                continue;
            }
            for &(pred, cost) in &reversed[state] {
                let candidate = dist.saturating_add(cost);
                if candidate < distances[pred] {
                    distances[pred] = candidate;
                    heap.push(Reverse((candidate, pred)));
                }
            }
        }

        Self {
            projection,
            distances,
        }
    }

    /// Number of abstract states in the projection.
    pub fn size(&self) -> u64 {
        self.projection.num_states()
    }

    pub fn pattern(&self) -> &Pattern {
        self.projection.pattern()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Goal distance of the abstract state `rank`, or `None` if no abstract
    /// goal is reachable from it.
    pub fn distance(&self, rank: u64) -> Option<u32> {
        let dist = self.distances[rank as usize];
        (dist != INFINITE).then_some(dist)
    }

    /// Goal distance of the projection of a concrete state.
    pub fn goal_distance(&self, state: &State) -> Option<u32> {
        self.distance(self.projection.project_state(state))
    }
}
