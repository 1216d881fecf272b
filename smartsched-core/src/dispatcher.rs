//! Scheduling dispatcher: picks a solver by algorithm and wraps its result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::astar::AStarSearch;
use crate::bnb::BranchAndBoundSolver;
use crate::config::SchedulerConfig;
use crate::error::{Result, ScheduleError};
use crate::hungarian::HungarianSolver;
use crate::task::Task;
use crate::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Hungarian,
    BranchAndBound,
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Hungarian, Algorithm::BranchAndBound, Algorithm::AStar];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Hungarian => "hungarian",
            Algorithm::BranchAndBound => "branch-and-bound",
            Algorithm::AStar => "a-star",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hungarian" | "munkres" => Ok(Algorithm::Hungarian),
            "branch-and-bound" | "branchandbound" | "bnb" => Ok(Algorithm::BranchAndBound),
            "a-star" | "astar" | "a*" => Ok(Algorithm::AStar),
            _ => Err(ScheduleError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Solver output. The shape depends on the algorithm that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "kebab-case")]
pub enum Schedule {
    /// `slots[i]` is the slot assigned to input task `i`.
    Assignment(Vec<usize>),
    /// Subset of the input tasks, in descending effective priority.
    Selection(Vec<Task>),
    /// Every input task exactly once, in execution order.
    Ordering(Vec<Task>),
}

impl Schedule {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Schedule::Assignment(_) => Algorithm::Hungarian,
            Schedule::Selection(_) => Algorithm::BranchAndBound,
            Schedule::Ordering(_) => Algorithm::AStar,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Schedule::Assignment(a) => a.len(),
            Schedule::Selection(t) | Schedule::Ordering(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stateless front door over the three solvers.
///
/// Build once from a [`SchedulerConfig`] and share by reference; calls do not
/// touch any state besides their own arguments.
#[derive(Debug, Clone, Copy)]
pub struct SchedulingDispatcher {
    config: SchedulerConfig,
    hungarian: HungarianSolver,
    bnb: BranchAndBoundSolver,
    astar: AStarSearch,
}

impl Default for SchedulingDispatcher {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl SchedulingDispatcher {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            hungarian: HungarianSolver::new(config.cost_model),
            bnb: BranchAndBoundSolver::new(config.cost_model, config.limits),
            astar: AStarSearch::new(config.cost_model, config.limits),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run `algorithm` over `tasks` for `user`.
    ///
    /// `max_hours` is only read by Branch-and-Bound; when absent the configured
    /// default budget applies.
    pub fn schedule(
        &self,
        algorithm: Algorithm,
        tasks: &[Task],
        user: &User,
        max_hours: Option<f64>,
    ) -> Result<Schedule> {
        match algorithm {
            Algorithm::Hungarian => self
                .hungarian
                .solve_with_hobby_bonus(tasks, user)
                .map(Schedule::Assignment),
            Algorithm::BranchAndBound => {
                let budget = max_hours.unwrap_or(self.config.default_max_hours);
                self.bnb
                    .find_best_combination(tasks, user, budget)
                    .map(Schedule::Selection)
            }
            Algorithm::AStar => self
                .astar
                .find_optimal_order(tasks, user)
                .map(Schedule::Ordering),
        }
    }

    /// Same as [`schedule`](Self::schedule) with the algorithm given by name.
    pub fn schedule_by_name(
        &self,
        algorithm: &str,
        tasks: &[Task],
        user: &User,
        max_hours: Option<f64>,
    ) -> Result<Schedule> {
        self.schedule(algorithm.parse()?, tasks, user, max_hours)
    }
}
