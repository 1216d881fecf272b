use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use smartsched_core::{Algorithm, CostModel, SchedulerConfig, SearchLimits, DEFAULT_MAX_HOURS};

use crate::state::Paths;

/// Default expansion cap. A* visits every subset of the task list, so this
/// keeps a plain `schedule` run bounded (lists of up to 18 tasks finish).
pub const DEFAULT_NODE_CAP: usize = 500_000;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduling: SchedulingSection,
    pub logging: LoggingSection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingSection {
    pub default_algorithm: Algorithm,
    /// Budget for Branch-and-Bound when neither --max-hours nor --day is given.
    pub default_max_hours: f64,
    pub hobby_hour_bonus: f64,
    pub hobby_priority_bonus: u32,
    /// Cap on nodes expanded by A* and Branch-and-Bound; 0 means unlimited.
    pub max_expanded_nodes: usize,
}

impl Default for SchedulingSection {
    fn default() -> Self {
        let model = CostModel::default();
        Self {
            default_algorithm: Algorithm::AStar,
            default_max_hours: DEFAULT_MAX_HOURS,
            hobby_hour_bonus: model.hour_bonus,
            hobby_priority_bonus: model.priority_bonus,
            max_expanded_nodes: DEFAULT_NODE_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `tracing_subscriber::EnvFilter` directive, overridden by RUST_LOG and -v.
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// IANA zone used to read and print due dates.
    pub timezone: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let s = &self.scheduling;
        if !s.default_max_hours.is_finite() || s.default_max_hours < 0.0 {
            bail!("scheduling.default_max_hours must be >= 0, got {}", s.default_max_hours);
        }
        if !s.hobby_hour_bonus.is_finite() {
            bail!("scheduling.hobby_hour_bonus must be a finite number");
        }
        if self.display.timezone.parse::<chrono_tz::Tz>().is_err() {
            bail!("display.timezone: unknown zone '{}'", self.display.timezone);
        }
        Ok(())
    }

    pub fn to_scheduler_config(&self) -> SchedulerConfig {
        let s = &self.scheduling;
        let limits = match s.max_expanded_nodes {
            0 => SearchLimits::unlimited(),
            n => SearchLimits::with_max_expanded_nodes(n),
        };
        SchedulerConfig {
            default_max_hours: s.default_max_hours,
            cost_model: CostModel {
                hour_bonus: s.hobby_hour_bonus,
                priority_bonus: s.hobby_priority_bonus,
            },
            limits,
        }
    }
}

pub fn load_config(paths: &Paths) -> Result<Config> {
    let p = paths.config_path();
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate().with_context(|| format!("invalid {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config(paths: &Paths, cfg: &Config) -> Result<()> {
    paths.ensure_home()?;
    let p = paths.config_path();
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write the default config unless one exists. Returns whether it wrote.
pub fn init_config(paths: &Paths) -> Result<bool> {
    if paths.config_path().exists() {
        return Ok(false);
    }
    save_config(paths, &Config::default())?;
    Ok(true)
}
