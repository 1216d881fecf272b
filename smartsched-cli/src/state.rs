use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use smartsched_store::Database;
use smartsched_core::User;

pub const HOME_ENV: &str = "SMARTSCHED_HOME";

/// Where config and data live: `--home`, then `$SMARTSCHED_HOME`, then
/// `~/.smartsched`.
#[derive(Debug, Clone)]
pub struct Paths {
    home: PathBuf,
}

impl Paths {
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        let home = match override_dir {
            Some(dir) => dir,
            None => match std::env::var_os(HOME_ENV) {
                Some(dir) if !dir.is_empty() => PathBuf::from(dir),
                _ => default_home()?,
            },
        };
        Ok(Self { home })
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn ensure_home(&self) -> Result<&Path> {
        fs::create_dir_all(&self.home)
            .with_context(|| format!("create {}", self.home.display()))?;
        Ok(&self.home)
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    pub fn store_path(&self) -> PathBuf {
        self.home.join("store.json")
    }
}

fn default_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".smartsched"))
}

/// Accepts a numeric id or a username.
pub fn resolve_user(db: &Database, key: &str) -> Result<User> {
    db.find_user(key)
        .with_context(|| format!("no user '{key}' (add one with: smartsched user add <name>)"))
}
