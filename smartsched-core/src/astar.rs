//! A* search for a minimum-cost ordering of a user's tasks.
//!
//! A state is the *set* of tasks already placed; two orders reaching the same
//! set are one state. g sums the effective costs placed so far and h sums the
//! costs still to place. Since a task's cost does not depend on its position,
//! h is exact, f = g + h is the same for every state, and the first complete
//! state popped is optimal.
//!
//! Open-set order is (f, g, insertion sequence), lowest first, which keeps the
//! output reproducible.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::config::SearchLimits;
use crate::cost::{validate_hours, CostModel};
use crate::error::{Result, ScheduleError};
use crate::task::Task;
use crate::user::User;

/// Canonical key for a set of placed tasks: one bit per task position.
///
/// Task ids are checked for uniqueness before a search, so equal bitsets mean
/// equal id sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlacedSet {
    words: Vec<u64>,
}

impl PlacedSet {
    pub fn empty(n: usize) -> Self {
        Self {
            words: vec![0; n.div_ceil(64)],
        }
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.words[pos / 64] & (1 << (pos % 64)) != 0
    }

    pub fn with(&self, pos: usize) -> Self {
        let mut next = self.clone();
        next.words[pos / 64] |= 1 << (pos % 64);
        next
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

#[derive(Debug, Clone)]
pub struct SearchNode {
    pub placed: PlacedSet,
    pub g: f64,
    pub h: f64,
    pub f: f64,
    /// Arena index of the node this one was reached from.
    pub parent: Option<usize>,
    /// Position of the task placed on the step from `parent`.
    pub last: Option<usize>,
    closed: bool,
}

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    g: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the lowest (f, g, seq) pops first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AStarStats {
    pub expanded: usize,
    pub generated: usize,
    /// Successors that mapped onto an already known state.
    pub merged: usize,
    /// Distinct states created.
    pub states: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AStarOutcome {
    pub order: Vec<Task>,
    pub total_cost: f64,
    pub stats: AStarStats,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AStarSearch {
    cost_model: CostModel,
    limits: SearchLimits,
}

impl AStarSearch {
    pub fn new(cost_model: CostModel, limits: SearchLimits) -> Self {
        Self { cost_model, limits }
    }

    /// Permutation of `tasks` with minimal accumulated effective cost.
    pub fn find_optimal_order(&self, tasks: &[Task], user: &User) -> Result<Vec<Task>> {
        Ok(self.search(tasks, user)?.order)
    }

    pub fn search(&self, tasks: &[Task], user: &User) -> Result<AStarOutcome> {
        validate_hours(tasks)?;
        let mut ids = HashSet::with_capacity(tasks.len());
        if let Some(dup) = tasks.iter().find(|t| !ids.insert(t.id)) {
            return Err(ScheduleError::DuplicateTaskId(dup.id));
        }

        let n = tasks.len();
        let costs: Vec<f64> = tasks
            .iter()
            .map(|t| self.cost_model.effective_cost(t, user))
            .collect();
        let heuristic = |placed: &PlacedSet| -> f64 {
            (0..n).filter(|&i| !placed.contains(i)).map(|i| costs[i]).sum()
        };

        let start = PlacedSet::empty(n);
        let h0 = heuristic(&start);
        let mut arena = vec![SearchNode {
            placed: start.clone(),
            g: 0.0,
            h: h0,
            f: h0,
            parent: None,
            last: None,
            closed: false,
        }];
        let mut index: HashMap<PlacedSet, usize> = HashMap::from([(start, 0)]);
        let mut open = BinaryHeap::from([OpenEntry {
            f: h0,
            g: 0.0,
            seq: 0,
            node: 0,
        }]);
        let mut seq = 0u64;
        let mut stats = AStarStats {
            states: 1,
            ..AStarStats::default()
        };
        let mut deepest = 0;

        while let Some(entry) = open.pop() {
            let current = &arena[entry.node];
            // Skip closed states and entries superseded by a cheaper path.
            if current.closed || entry.g.total_cmp(&current.g) != Ordering::Equal {
                continue;
            }

            let placed_count = current.placed.len();
            deepest = deepest.max(placed_count);
            if placed_count == n {
                let order = reconstruct(&arena, entry.node, tasks);
                let total_cost = arena[entry.node].g;
                debug!(
                    tasks = n,
                    total_cost,
                    expanded = stats.expanded,
                    merged = stats.merged,
                    "a* ordering solved"
                );
                return Ok(AStarOutcome {
                    order,
                    total_cost,
                    stats,
                });
            }

            stats.expanded += 1;
            self.limits.check(stats.expanded)?;
            arena[entry.node].closed = true;
            let placed = arena[entry.node].placed.clone();
            let g_here = arena[entry.node].g;

            for next in (0..n).filter(|&i| !placed.contains(i)) {
                stats.generated += 1;
                let key = placed.with(next);
                let g = g_here + costs[next];

                match index.entry(key) {
                    Entry::Occupied(slot) => {
                        stats.merged += 1;
                        let existing = &mut arena[*slot.get()];
                        if existing.closed || g >= existing.g {
                            continue;
                        }
                        existing.g = g;
                        existing.f = g + existing.h;
                        existing.parent = Some(entry.node);
                        existing.last = Some(next);
                        seq += 1;
                        open.push(OpenEntry {
                            f: existing.f,
                            g,
                            seq,
                            node: *slot.get(),
                        });
                    }
                    Entry::Vacant(slot) => {
                        let h = heuristic(slot.key());
                        let id = arena.len();
                        arena.push(SearchNode {
                            placed: slot.key().clone(),
                            g,
                            h,
                            f: g + h,
                            parent: Some(entry.node),
                            last: Some(next),
                            closed: false,
                        });
                        slot.insert(id);
                        stats.states += 1;
                        seq += 1;
                        open.push(OpenEntry {
                            f: g + h,
                            g,
                            seq,
                            node: id,
                        });
                    }
                }
            }
        }

        Err(ScheduleError::SearchExhausted {
            placed: deepest,
            total: n,
        })
    }
}

fn reconstruct(arena: &[SearchNode], goal: usize, tasks: &[Task]) -> Vec<Task> {
    let mut order = Vec::with_capacity(tasks.len());
    let mut cursor = Some(goal);
    while let Some(i) = cursor {
        if let Some(pos) = arena[i].last {
            order.push(tasks[pos].clone());
        }
        cursor = arena[i].parent;
    }
    order.reverse();
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn task(id: u64, hours: f64) -> Task {
        Task::new(id, format!("t{id}")).with_hours(hours)
    }

    fn assert_permutation(order: &[Task], tasks: &[Task]) {
        assert_eq!(order.len(), tasks.len());
        let mut got: Vec<u64> = order.iter().map(|t| t.id).collect();
        let mut want: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        got.sort_unstable();
        want.sort_unstable();
        assert_eq!(got, want);
    }

    #[test]
    fn test_order_is_permutation_with_total_cost() {
        let user = User::new(1, "ana").with_hobby("art");
        let model = CostModel::default();
        for n in 0..=8u64 {
            let tasks: Vec<Task> = (0..n)
                .map(|i| {
                    let t = task(100 + i, (i % 3) as f64 + 0.5 * i as f64);
                    if i % 2 == 0 { t.with_category("Art") } else { t }
                })
                .collect();
            let out = AStarSearch::default().search(&tasks, &user).unwrap();
            assert_permutation(&out.order, &tasks);

            let expected: f64 = tasks.iter().map(|t| model.effective_cost(t, &user)).sum();
            assert!((out.total_cost - expected).abs() < 1e-9, "n={n}");
            let along_order: f64 = out.order.iter().map(|t| model.effective_cost(t, &user)).sum();
            assert!((along_order - expected).abs() < 1e-9, "n={n}");
        }
    }

    #[test]
    fn test_empty_list_gives_empty_order() {
        let out = AStarSearch::default().search(&[], &User::new(1, "ana")).unwrap();
        assert!(out.order.is_empty());
        assert_eq!(out.total_cost, 0.0);
        assert_eq!(out.stats.expanded, 0);
    }

    #[test]
    fn test_same_set_via_different_orders_is_one_state() {
        let tasks = vec![task(1, 1.0), task(2, 2.0), task(3, 3.0)];
        let out = AStarSearch::default().search(&tasks, &User::new(1, "ana")).unwrap();

        // 2^3 subsets, not the 16 nodes of an order tree.
        assert_eq!(out.stats.states, 8);
        // 3 + 3*2 + 3*1 successors, of which only 7 are new states.
        assert_eq!(out.stats.generated, 12);
        assert_eq!(out.stats.merged, 5);
        // Every non-goal subset is expanded exactly once.
        assert_eq!(out.stats.expanded, 7);
        assert_permutation(&out.order, &tasks);
    }

    #[test]
    fn test_placed_set_equality_ignores_insertion_order() {
        let a = PlacedSet::empty(70).with(0).with(65).with(3);
        let b = PlacedSet::empty(70).with(3).with(0).with(65);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.contains(65));
        assert!(!a.contains(64));
        assert!(PlacedSet::empty(70).is_empty());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let tasks = vec![task(1, 1.0), task(2, 1.0), task(1, 2.0)];
        let err = AStarSearch::default().search(&tasks, &User::new(1, "ana")).unwrap_err();
        assert_eq!(err, ScheduleError::DuplicateTaskId(1));
    }

    #[test]
    fn test_negative_hours_are_rejected() {
        let tasks = vec![task(1, 1.0), task(2, -0.5)];
        let err = AStarSearch::default().search(&tasks, &User::new(1, "ana")).unwrap_err();
        assert_eq!(err, ScheduleError::InvalidHours { task: 2, hours: -0.5 });
    }

    #[test]
    fn test_node_limit() {
        let tasks: Vec<Task> = (0..6).map(|i| task(i, 1.0)).collect();
        let search = AStarSearch::new(CostModel::default(), SearchLimits::with_max_expanded_nodes(4));
        assert_eq!(
            search.search(&tasks, &User::new(1, "ana")),
            Err(ScheduleError::NodeLimitExceeded { limit: 4 })
        );
    }

    #[test]
    fn test_repeated_searches_are_identical() {
        let tasks = vec![
            task(4, 2.0).with_priority(Priority::HIGH),
            task(7, 2.0),
            task(9, 0.0),
            task(2, 1.5),
        ];
        let user = User::new(1, "ana");
        let first = AStarSearch::default().find_optimal_order(&tasks, &user).unwrap();
        for _ in 0..5 {
            assert_eq!(AStarSearch::default().find_optimal_order(&tasks, &user).unwrap(), first);
        }
    }
}
