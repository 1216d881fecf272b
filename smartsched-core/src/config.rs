//! Solver configuration shared by the dispatcher and the individual solvers.

use serde::{Deserialize, Serialize};

use crate::cost::CostModel;
use crate::error::{Result, ScheduleError};

/// Hour budget used when Branch-and-Bound is requested without one.
pub const DEFAULT_MAX_HOURS: f64 = 10.0;

/// Optional cap on search effort. Unlimited by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchLimits {
    pub max_expanded_nodes: Option<usize>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_expanded_nodes(limit: usize) -> Self {
        Self {
            max_expanded_nodes: Some(limit),
        }
    }

    pub(crate) fn check(&self, expanded: usize) -> Result<()> {
        match self.max_expanded_nodes {
            Some(limit) if expanded > limit => Err(ScheduleError::NodeLimitExceeded { limit }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub default_max_hours: f64,
    pub cost_model: CostModel,
    pub limits: SearchLimits,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_max_hours: DEFAULT_MAX_HOURS,
            cost_model: CostModel::default(),
            limits: SearchLimits::unlimited(),
        }
    }
}
