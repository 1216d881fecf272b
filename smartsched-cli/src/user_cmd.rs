use anyhow::{bail, Result};
use clap::Subcommand;
use smartsched_core::User;
use smartsched_ingest::parse_free_time_line;
use smartsched_store::{FreeTimeRepository, HobbyRepository, JsonStore, TaskRepository, UserRepository};

use crate::state::{resolve_user, Paths};

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create a user
    Add {
        username: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Hobby tag (repeatable)
        #[arg(long = "hobby")]
        hobbies: Vec<String>,

        /// Informational daily free hours
        #[arg(long, default_value_t = 0.0)]
        free_hours_per_day: f64,
    },

    /// List all users
    List,

    /// Show one user with hobbies, free time and task count
    Show { user: String },

    /// Delete a user and all of their tasks
    Delete { user: String },

    /// Manage hobby tags
    Hobby {
        #[command(subcommand)]
        command: HobbyCommand,
    },

    /// Manage weekly free-time windows
    FreeTime {
        #[command(subcommand)]
        command: FreeTimeCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum HobbyCommand {
    Add { user: String, name: String },
    Remove { user: String, name: String },
}

#[derive(Subcommand, Debug)]
pub enum FreeTimeCommand {
    /// Add a window, e.g. `Mon 18:00-21:00`
    Add {
        user: String,
        #[arg(num_args = 1.., required = true)]
        window: Vec<String>,
    },
    List { user: String },
    Remove { user: String, id: u64 },
}

pub fn run(paths: &Paths, command: UserCommand) -> Result<()> {
    let mut store = JsonStore::open(paths.store_path())?;

    match command {
        UserCommand::Add {
            username,
            email,
            hobbies,
            free_hours_per_day,
        } => {
            if !free_hours_per_day.is_finite() || free_hours_per_day < 0.0 {
                bail!("--free-hours-per-day must be >= 0");
            }
            let mut user = User::new(0, username).with_email(email);
            for h in hobbies {
                user = user.with_hobby(h);
            }
            user.free_hours_per_day = free_hours_per_day;
            let user = store.db_mut().create_user(user)?;
            store.save()?;
            println!("Created user #{} '{}'", user.id, user.username);
        }

        UserCommand::List => {
            let users = store.db().all_users();
            if users.is_empty() {
                println!("No users. Run: smartsched setup");
            }
            for u in users {
                println!("#{} {} {}", u.id, u.username, u.email);
            }
        }

        UserCommand::Show { user } => {
            let u = resolve_user(store.db(), &user)?;
            print!("{}", describe_user(&u, store.db().tasks_for_user(u.id).len()));
        }

        UserCommand::Delete { user } => {
            let u = resolve_user(store.db(), &user)?;
            let tasks = store.db().tasks_for_user(u.id).len();
            store.db_mut().delete_user(u.id);
            store.save()?;
            println!("Deleted user #{} '{}' and {} task(s)", u.id, u.username, tasks);
        }

        UserCommand::Hobby { command } => match command {
            HobbyCommand::Add { user, name } => {
                let u = resolve_user(store.db(), &user)?;
                store.db_mut().add_hobby(u.id, &name)?;
                store.save()?;
                println!("Added hobby '{}' to {}", name.trim(), u.username);
            }
            HobbyCommand::Remove { user, name } => {
                let u = resolve_user(store.db(), &user)?;
                if !store.db_mut().remove_hobby(u.id, &name)? {
                    bail!("{} has no hobby '{}'", u.username, name);
                }
                store.save()?;
                println!("Removed hobby '{}' from {}", name, u.username);
            }
        },

        UserCommand::FreeTime { command } => match command {
            FreeTimeCommand::Add { user, window } => {
                let u = resolve_user(store.db(), &user)?;
                let interval = parse_free_time_line(&window.join(" "))?;
                let interval = store.db_mut().add_free_time(u.id, interval)?;
                store.save()?;
                println!(
                    "Added window #{}: {} {}-{} ({}h)",
                    interval.id,
                    interval.day,
                    interval.start.format("%H:%M"),
                    interval.end.format("%H:%M"),
                    interval.hours()
                );
            }
            FreeTimeCommand::List { user } => {
                let u = resolve_user(store.db(), &user)?;
                for i in store.db().free_time_for_user(u.id) {
                    println!(
                        "#{} {} {}-{} ({}h)",
                        i.id,
                        i.day,
                        i.start.format("%H:%M"),
                        i.end.format("%H:%M"),
                        i.hours()
                    );
                }
            }
            FreeTimeCommand::Remove { user, id } => {
                let u = resolve_user(store.db(), &user)?;
                if !store.db_mut().remove_free_time(u.id, id)? {
                    bail!("{} has no free-time window #{}", u.username, id);
                }
                store.save()?;
                println!("Removed window #{id}");
            }
        },
    }

    Ok(())
}

fn describe_user(u: &User, task_count: usize) -> String {
    let mut s = format!("#{} {}\n", u.id, u.username);
    if !u.email.is_empty() {
        s.push_str(&format!("email: {}\n", u.email));
    }
    let hobbies: Vec<&str> = u.hobbies.iter().map(|h| h.name.as_str()).collect();
    s.push_str(&format!("hobbies: {}\n", if hobbies.is_empty() { "-".to_string() } else { hobbies.join(", ") }));
    if u.free_hours_per_day > 0.0 {
        s.push_str(&format!("free hours/day: {}\n", u.free_hours_per_day));
    }
    s.push_str("free time:\n");
    for i in &u.free_time {
        s.push_str(&format!(
            "  #{} {} {}-{}\n",
            i.id,
            i.day,
            i.start.format("%H:%M"),
            i.end.format("%H:%M")
        ));
    }
    s.push_str(&format!("tasks: {task_count}\n"));
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn temp_paths() -> (tempfile::TempDir, Paths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::resolve(Some(dir.path().to_path_buf())).unwrap();
        (dir, paths)
    }

    fn add(paths: &Paths, name: &str) {
        run(
            paths,
            UserCommand::Add {
                username: name.into(),
                email: String::new(),
                hobbies: vec!["Reading".into()],
                free_hours_per_day: 2.0,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_user_lifecycle() {
        let (_dir, paths) = temp_paths();
        add(&paths, "ana");
        assert!(run(
            &paths,
            UserCommand::Add {
                username: "ana".into(),
                email: String::new(),
                hobbies: vec![],
                free_hours_per_day: 0.0,
            },
        )
        .is_err());

        run(
            &paths,
            UserCommand::FreeTime {
                command: FreeTimeCommand::Add {
                    user: "ana".into(),
                    window: vec!["Tue".into(), "18:00-20:00".into()],
                },
            },
        )
        .unwrap();
        run(
            &paths,
            UserCommand::Hobby {
                command: HobbyCommand::Add { user: "1".into(), name: "Chess".into() },
            },
        )
        .unwrap();

        let store = JsonStore::open(paths.store_path()).unwrap();
        let ana = store.db().get_user_by_username("ana").unwrap();
        assert_eq!(ana.free_hours_on(Weekday::Tue), 2.0);
        assert!(ana.has_hobby("chess"));
        assert_eq!(ana.free_hours_per_day, 2.0);

        assert!(run(
            &paths,
            UserCommand::Hobby {
                command: HobbyCommand::Remove { user: "ana".into(), name: "Golf".into() },
            },
        )
        .is_err());

        run(&paths, UserCommand::Delete { user: "ana".into() }).unwrap();
        assert!(run(&paths, UserCommand::Show { user: "ana".into() }).is_err());
    }

    #[test]
    fn test_describe_user() {
        let u = User::new(3, "bo").with_hobby("Running");
        let text = describe_user(&u, 4);
        assert!(text.starts_with("#3 bo\n"));
        assert!(text.contains("hobbies: Running"));
        assert!(text.contains("tasks: 4"));
    }
}
