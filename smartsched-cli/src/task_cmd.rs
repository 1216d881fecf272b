use anyhow::{bail, Context, Result};
use clap::Subcommand;
use smartsched_core::{parse_due_date, Priority, Task, TaskId};
use smartsched_ingest::parse_tasks_csv;
use smartsched_store::{JsonStore, TaskRepository, UserRepository};
use std::path::PathBuf;

use crate::config::Config;
use crate::output::task_line;
use crate::state::{resolve_user, Paths};

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task for a user
    Add {
        #[arg(long)]
        user: String,

        title: String,

        /// low | medium | high | <rank>
        #[arg(long, default_value = "medium")]
        priority: Priority,

        #[arg(long, default_value_t = 1.0)]
        hours: f64,

        #[arg(long)]
        description: Option<String>,

        /// "YYYY-MM-DD[ HH:MM]" in the configured display timezone
        #[arg(long)]
        due: Option<String>,

        /// Matched against the user's hobbies
        #[arg(long)]
        category: Option<String>,
    },

    /// List tasks (all users unless --user)
    List {
        #[arg(long)]
        user: Option<String>,
    },

    /// Remove a task by id
    Remove { id: TaskId },

    /// Import tasks from a CSV file (title,description,priority,hours,due,category)
    Import {
        #[arg(long)]
        user: String,

        #[arg(long)]
        csv: PathBuf,
    },
}

pub fn run(paths: &Paths, cfg: &Config, command: TaskCommand) -> Result<()> {
    let tz = cfg.display.timezone.as_str();
    let mut store = JsonStore::open(paths.store_path())?;

    match command {
        TaskCommand::Add {
            user,
            title,
            priority,
            hours,
            description,
            due,
            category,
        } => {
            if !hours.is_finite() || hours < 0.0 {
                bail!("--hours must be a finite number >= 0");
            }
            let owner = resolve_user(store.db(), &user)?;
            let mut task = Task::new(0, title)
                .with_user(owner.id)
                .with_priority(priority)
                .with_hours(hours);
            if let Some(d) = description {
                task = task.with_description(d);
            }
            if let Some(c) = category {
                task = task.with_category(c);
            }
            if let Some(d) = due {
                task = task.with_due_date(parse_due_date(&d, tz).context("--due")?);
            }
            let task = store.db_mut().add_task(task)?;
            store.save()?;
            println!("Added {}", task_line(&task, tz)?);
        }

        TaskCommand::List { user } => {
            let tasks = match user {
                Some(key) => store.db().tasks_for_user(resolve_user(store.db(), &key)?.id),
                None => store.db().all_tasks(),
            };
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for t in &tasks {
                let owner = store
                    .db()
                    .get_user(t.user_id)
                    .map(|u| u.username)
                    .unwrap_or_else(|| "?".to_string());
                println!("{} @{}", task_line(t, tz)?, owner);
            }
        }

        TaskCommand::Remove { id } => {
            if !store.db_mut().delete_task(id) {
                bail!("no task with id {id}");
            }
            store.save()?;
            println!("Removed task #{id}");
        }

        TaskCommand::Import { user, csv } => {
            if !csv.exists() {
                bail!("CSV not found: {} (pass --csv <path>)", csv.display());
            }
            let owner = resolve_user(store.db(), &user)?;
            let drafts = parse_tasks_csv(&csv, tz)?;
            let count = drafts.len();
            for draft in drafts {
                store.db_mut().add_task(draft.into_task(0, owner.id))?;
            }
            store.save()?;
            tracing::info!(count, user = %owner.username, "imported tasks");
            println!("Imported {} task(s) from {} for {}", count, csv.display(), owner.username);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartsched_core::User;

    fn seeded() -> (tempfile::TempDir, Paths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::resolve(Some(dir.path().to_path_buf())).unwrap();
        let mut store = JsonStore::open(paths.store_path()).unwrap();
        store.db_mut().create_user(User::new(0, "ana")).unwrap();
        store.save().unwrap();
        (dir, paths)
    }

    #[test]
    fn test_add_and_remove() {
        let (_dir, paths) = seeded();
        let cfg = Config::default();
        run(
            &paths,
            &cfg,
            TaskCommand::Add {
                user: "ana".into(),
                title: "Essay".into(),
                priority: Priority::HIGH,
                hours: 2.5,
                description: None,
                due: Some("2026-11-01".into()),
                category: Some("Writing".into()),
            },
        )
        .unwrap();

        let store = JsonStore::open(paths.store_path()).unwrap();
        let tasks = store.db().all_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, Priority::HIGH);
        assert_eq!(tasks[0].due_date.unwrap().to_rfc3339(), "2026-11-01T23:59:00+00:00");

        run(&paths, &cfg, TaskCommand::Remove { id: tasks[0].id }).unwrap();
        assert!(run(&paths, &cfg, TaskCommand::Remove { id: tasks[0].id }).is_err());
    }

    #[test]
    fn test_add_rejects_non_finite_hours() {
        let (_dir, paths) = seeded();
        let add = |hours: f64| {
            run(
                &paths,
                &Config::default(),
                TaskCommand::Add {
                    user: "ana".into(),
                    title: "Forever".into(),
                    priority: Priority::MEDIUM,
                    hours,
                    description: None,
                    due: None,
                    category: None,
                },
            )
        };
        assert!(add(f64::INFINITY).is_err());
        assert!(add(f64::NAN).is_err());
        assert!(add(-1.0).is_err());

        let store = JsonStore::open(paths.store_path()).unwrap();
        assert!(store.db().all_tasks().is_empty());
    }

    #[test]
    fn test_import_csv() {
        let (dir, paths) = seeded();
        let csv = dir.path().join("tasks.csv");
        std::fs::write(&csv, "title,hours,priority,category\nRead,2,high,Reading\nRun,1,,\n").unwrap();

        run(
            &paths,
            &Config::default(),
            TaskCommand::Import { user: "ana".into(), csv },
        )
        .unwrap();

        let store = JsonStore::open(paths.store_path()).unwrap();
        let ana = store.db().get_user_by_username("ana").unwrap();
        let tasks = store.db().tasks_for_user(ana.id);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Read");
        assert_eq!(tasks[1].priority, Priority::MEDIUM);
    }

    #[test]
    fn test_unknown_owner_is_an_error() {
        let (_dir, paths) = seeded();
        let err = run(
            &paths,
            &Config::default(),
            TaskCommand::List { user: Some("nobody".into()) },
        )
        .unwrap_err();
        assert!(err.to_string().contains("no user 'nobody'"));
    }
}
