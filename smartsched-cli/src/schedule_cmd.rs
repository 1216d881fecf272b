use anyhow::Result;
use chrono::Weekday;
use clap::Args;
use smartsched_core::{Algorithm, Schedule, ScheduleError, SchedulingDispatcher, User};
use smartsched_store::{JsonStore, TaskRepository};

use crate::config::Config;
use crate::output::render_schedule;
use crate::state::{resolve_user, Paths};

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Username or id
    #[arg(long)]
    pub user: String,

    /// hungarian | branch-and-bound | a-star (default from config)
    #[arg(long, short)]
    pub algorithm: Option<Algorithm>,

    /// Hour budget for branch-and-bound
    #[arg(long, conflicts_with = "day")]
    pub max_hours: Option<f64>,

    /// Use the user's free hours on this weekday as the budget
    #[arg(long)]
    pub day: Option<Weekday>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

fn budget_for(args: &ScheduleArgs, user: &User) -> Option<f64> {
    match (args.max_hours, args.day) {
        (Some(h), _) => Some(h),
        (None, Some(day)) => {
            let hours = user.free_hours_on(day);
            if hours == 0.0 {
                tracing::warn!(%day, user = %user.username, "no free time on that day; budget is 0h");
            }
            Some(hours)
        }
        (None, None) => None,
    }
}

/// Load the user's tasks and run the chosen solver over them.
pub fn compute(paths: &Paths, cfg: &Config, args: &ScheduleArgs) -> Result<(Schedule, String)> {
    let store = JsonStore::open(paths.store_path())?;
    let user = resolve_user(store.db(), &args.user)?;
    let tasks = store.db().tasks_for_user(user.id);

    let algorithm = args.algorithm.unwrap_or(cfg.scheduling.default_algorithm);
    let budget = budget_for(args, &user);
    let sched_cfg = cfg.to_scheduler_config();
    let dispatcher = SchedulingDispatcher::new(sched_cfg);

    tracing::debug!(%algorithm, tasks = tasks.len(), ?budget, "scheduling");
    let schedule = match dispatcher.schedule(algorithm, &tasks, &user, budget) {
        Err(e @ ScheduleError::NodeLimitExceeded { .. }) => {
            return Err(anyhow::Error::new(e).context(format!(
                "{} tasks is too many for {algorithm} under the current cap; raise \
                 scheduling.max_expanded_nodes in {} (0 = unlimited)",
                tasks.len(),
                paths.config_path().display()
            )));
        }
        other => other?,
    };

    let shown_budget = match algorithm {
        Algorithm::BranchAndBound => Some(budget.unwrap_or(sched_cfg.default_max_hours)),
        _ => None,
    };
    let text = if args.json {
        serde_json::to_string_pretty(&schedule)?
    } else {
        render_schedule(
            &schedule,
            &tasks,
            &user,
            &sched_cfg.cost_model,
            shown_budget,
            &cfg.display.timezone,
        )?
    };
    Ok((schedule, text))
}

pub fn run(paths: &Paths, cfg: &Config, args: ScheduleArgs) -> Result<()> {
    let (_, text) = compute(paths, cfg, &args)?;
    println!("{}", text.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use smartsched_core::{FreeTimeInterval, Priority, Task};
    use smartsched_store::UserRepository;

    fn seeded() -> (tempfile::TempDir, Paths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::resolve(Some(dir.path().to_path_buf())).unwrap();
        let mut store = JsonStore::open(paths.store_path()).unwrap();
        let ana = store
            .db_mut()
            .create_user(
                User::new(0, "ana").with_hobby("Running").with_free_time(FreeTimeInterval::new(
                    Weekday::Sat,
                    NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                    NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                )),
            )
            .unwrap();
        let db = store.db_mut();
        db.add_task(Task::new(0, "essay").with_user(ana.id).with_hours(4.0).with_priority(Priority::HIGH))
            .unwrap();
        db.add_task(Task::new(0, "run").with_user(ana.id).with_hours(2.0).with_category("running"))
            .unwrap();
        db.add_task(Task::new(0, "laundry").with_user(ana.id).with_hours(1.0).with_priority(Priority::LOW))
            .unwrap();
        store.save().unwrap();
        (dir, paths)
    }

    fn args(algorithm: Algorithm) -> ScheduleArgs {
        ScheduleArgs {
            user: "ana".into(),
            algorithm: Some(algorithm),
            max_hours: None,
            day: None,
            json: false,
        }
    }

    #[test]
    fn test_default_algorithm_comes_from_config() {
        let (_dir, paths) = seeded();
        let mut a = args(Algorithm::Hungarian);
        a.algorithm = None;
        let (schedule, _) = compute(&paths, &Config::default(), &a).unwrap();
        assert_eq!(schedule.algorithm(), Algorithm::AStar);
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn test_day_budget_uses_free_time() {
        let (_dir, paths) = seeded();
        let mut a = args(Algorithm::BranchAndBound);
        a.day = Some(Weekday::Sat);
        let (schedule, text) = compute(&paths, &Config::default(), &a).unwrap();
        let Schedule::Selection(picked) = schedule else {
            panic!("expected a selection");
        };
        let hours: f64 = picked.iter().map(|t| t.required_hours).sum();
        assert!(hours <= 3.0);
        assert!(text.contains("of 3h budget"));
    }

    #[test]
    fn test_json_output_carries_kind() {
        let (_dir, paths) = seeded();
        let mut a = args(Algorithm::Hungarian);
        a.json = true;
        let (_, text) = compute(&paths, &Config::default(), &a).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["kind"], "assignment");
    }

    #[test]
    fn test_node_cap_from_config_is_enforced() {
        let (_dir, paths) = seeded();
        let mut cfg = Config::default();
        cfg.scheduling.max_expanded_nodes = 1;
        let err = compute(&paths, &cfg, &args(Algorithm::AStar)).unwrap_err();
        assert!(format!("{err:#}").contains("max_expanded_nodes"), "{err:#}");

        cfg.scheduling.max_expanded_nodes = 0;
        assert!(compute(&paths, &cfg, &args(Algorithm::AStar)).is_ok());
    }
}
