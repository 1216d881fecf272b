//! Branch-and-Bound task selection under an hour budget.
//!
//! A 0/1 knapsack: value = effective priority, weight = required hours.
//! Tasks are sorted once by descending effective priority, then an explicit
//! stack explores include/exclude decisions depth first. The include branch is
//! pushed before the exclude branch, so exclusion is explored first.
//!
//! Incumbent handling:
//! - the bound is raised by *any* popped node whose priority beats it. A
//!   partial node is always completable by excluding every remaining task, so
//!   its priority is an achievable value.
//! - the returned selection only ever comes from a complete leaf
//!   (`index == n`), replaced on strictly greater priority.
//! - a node is cut when even taking every remaining task that still fits
//!   could not reach the bound. The cut is strict, so it never changes which
//!   leaf is reported.

use tracing::debug;

use crate::config::SearchLimits;
use crate::cost::{validate_hours, CostModel};
use crate::error::{Result, ScheduleError};
use crate::task::Task;
use crate::user::User;

#[derive(Debug, Clone)]
struct BnbNode {
    /// Next position in the sorted task order.
    index: usize,
    priority: u64,
    hours: f64,
    /// Positions (in sorted order) of the included tasks.
    selected: Vec<usize>,
}

impl BnbNode {
    fn root() -> Self {
        Self {
            index: 0,
            priority: 0,
            hours: 0.0,
            selected: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BnbStats {
    pub explored: usize,
    pub leaves: usize,
    pub pruned: usize,
    pub incumbent_updates: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BnbOutcome {
    pub selected: Vec<Task>,
    pub total_priority: u64,
    pub total_hours: f64,
    pub stats: BnbStats,
}

struct Candidate<'a> {
    task: &'a Task,
    priority: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBoundSolver {
    cost_model: CostModel,
    limits: SearchLimits,
}

impl BranchAndBoundSolver {
    pub fn new(cost_model: CostModel, limits: SearchLimits) -> Self {
        Self { cost_model, limits }
    }

    /// Subset of `tasks` with maximal total effective priority within `max_hours`.
    pub fn find_best_combination(
        &self,
        tasks: &[Task],
        user: &User,
        max_hours: f64,
    ) -> Result<Vec<Task>> {
        Ok(self.search(tasks, user, max_hours)?.selected)
    }

    pub fn search(&self, tasks: &[Task], user: &User, max_hours: f64) -> Result<BnbOutcome> {
        validate_hours(tasks)?;
        if !max_hours.is_finite() || max_hours < 0.0 {
            return Err(ScheduleError::InvalidBudget(max_hours));
        }

        let mut order: Vec<Candidate> = tasks
            .iter()
            .map(|task| Candidate {
                task,
                priority: u64::from(self.cost_model.effective_priority(task, user)),
            })
            .collect();
        // Stable: equal priorities keep input order.
        order.sort_by(|a, b| b.priority.cmp(&a.priority));
        let n = order.len();

        let mut stats = BnbStats::default();
        let mut bound: u64 = 0;
        let mut best: Option<BnbNode> = None;
        let mut stack = vec![BnbNode::root()];

        while let Some(node) = stack.pop() {
            stats.explored += 1;
            self.limits.check(stats.explored)?;

            if node.priority > bound {
                bound = node.priority;
                stats.incumbent_updates += 1;
            }

            if node.index >= n {
                stats.leaves += 1;
                if best.as_ref().is_none_or(|b| node.priority > b.priority) {
                    best = Some(node);
                }
                continue;
            }

            if node.priority + optimistic_gain(&order, &node, max_hours) < bound {
                stats.pruned += 1;
                continue;
            }

            let candidate = &order[node.index];
            let hours_with = node.hours + candidate.task.required_hours;

            if hours_with <= max_hours {
                let mut selected = node.selected.clone();
                selected.push(node.index);
                stack.push(BnbNode {
                    index: node.index + 1,
                    priority: node.priority + candidate.priority,
                    hours: hours_with,
                    selected,
                });
            }

            stack.push(BnbNode {
                index: node.index + 1,
                ..node
            });
        }

        let best = best.unwrap_or_else(BnbNode::root);
        debug!(
            tasks = n,
            max_hours,
            priority = best.priority,
            hours = best.hours,
            explored = stats.explored,
            pruned = stats.pruned,
            "branch-and-bound selection solved"
        );

        Ok(BnbOutcome {
            selected: best
                .selected
                .iter()
                .map(|&pos| order[pos].task.clone())
                .collect(),
            total_priority: best.priority,
            total_hours: best.hours,
            stats,
        })
    }
}

/// Upper bound on priority still collectable below `node`: every remaining
/// task that would fit on its own in the hours left.
fn optimistic_gain(order: &[Candidate], node: &BnbNode, max_hours: f64) -> u64 {
    let left = max_hours - node.hours;
    order[node.index..]
        .iter()
        .filter(|c| c.task.required_hours <= left)
        .map(|c| c.priority)
        .sum()
}
