//! JSON file persistence for [`Database`].

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::database::Database;

/// A [`Database`] bound to a file on disk.
///
/// Nothing is written until [`save`](Self::save); a missing file opens as an
/// empty database.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    db: Database,
}

impl JsonStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let db = if path.exists() {
            let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "store file missing, starting empty");
            Database::new()
        };
        Ok(Self { path, db })
    }

    /// Write to a sibling temp file, then rename over the target so readers
    /// never observe a half-written store.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.db)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("rename {} -> {}", tmp.display(), self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "saved store");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut Database {
        &mut self.db
    }
}
