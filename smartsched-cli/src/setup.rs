use anyhow::{bail, Result};
use smartsched_core::User;
use smartsched_ingest::parse_free_time_line;
use smartsched_store::{JsonStore, UserRepository};
use std::io::{self, BufRead, Write};

use crate::config::init_config;
use crate::state::Paths;

struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn read_line(&mut self) -> Result<String> {
        let mut s = String::new();
        self.input.read_line(&mut s)?;
        Ok(s.trim().to_string())
    }

    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{}: ", label)?;
        self.output.flush().ok();
        self.read_line()
    }

    fn prompt_multiline(&mut self, label: &str) -> Result<Vec<String>> {
        writeln!(self.output, "{} (enter one per line; blank line to finish)", label)?;
        let mut out = Vec::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush().ok();
            let s = self.read_line()?;
            if s.is_empty() {
                break;
            }
            out.push(s);
        }
        Ok(out)
    }
}

pub fn run_setup(paths: &Paths) -> Result<()> {
    let stdin = io::stdin();
    run_setup_with(paths, stdin.lock(), io::stdout())?;
    Ok(())
}

pub fn run_setup_with<R: BufRead, W: Write>(paths: &Paths, input: R, output: W) -> Result<User> {
    let mut p = Prompter { input, output };
    writeln!(p.output, "SmartScheduler setup\n")?;

    let mut store = JsonStore::open(paths.store_path())?;

    let username = p.prompt("Username")?;
    if username.is_empty() {
        bail!("a username is required");
    }
    if store.db().get_user_by_username(&username).is_some() {
        bail!("user '{username}' already exists");
    }
    let email = p.prompt("Email (optional)")?;
    let hobbies = p.prompt_multiline("Hobbies (matched against task categories)")?;
    let windows = p.prompt_multiline("Weekly free time, e.g. 'Mon 18:00-21:00'")?;

    let mut user = User::new(0, username).with_email(email);
    for h in hobbies {
        user = user.with_hobby(h);
    }
    for line in &windows {
        match parse_free_time_line(line) {
            Ok(interval) => user = user.with_free_time(interval),
            Err(e) => writeln!(p.output, "skipping '{line}': {e:#}")?,
        }
    }

    let user = store.db_mut().create_user(user)?;
    store.save()?;
    let wrote_config = init_config(paths)?;

    writeln!(p.output, "\nCreated user #{} '{}'", user.id, user.username)?;
    writeln!(p.output, "- {}", store.path().display())?;
    if wrote_config {
        writeln!(p.output, "- {}", paths.config_path().display())?;
    }

    writeln!(p.output, "\nNext recommended steps:")?;
    writeln!(p.output, "- smartsched task import --user {} --csv tasks.csv", user.username)?;
    writeln!(p.output, "- smartsched schedule --user {}", user.username)?;

    Ok(user)
}
