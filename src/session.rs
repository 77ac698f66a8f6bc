use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::{
    domain::{Category, TimeAccumulator, ToggleOutcome, TrackerError, whole_minutes_between},
    storage::{self, LogStore, StorageError},
};

/// One process run: the accumulator plus the log file its totals go to.
pub struct Session {
    started_at: DateTime<Local>,
    tracker: TimeAccumulator,
    store: LogStore,
    log_path: Option<PathBuf>,
}

impl Session {
    pub fn new(categories: Vec<Category>, store: LogStore, started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            tracker: TimeAccumulator::new(categories),
            store,
            log_path: None,
        }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Restarts the session clock. Only meaningful before the first save.
    pub fn restart_clock(&mut self, now: DateTime<Local>) {
        self.started_at = now;
    }

    pub fn tracker(&self) -> &TimeAccumulator {
        &self.tracker
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    pub fn resume_candidate(&self, now: DateTime<Local>) -> Option<PathBuf> {
        self.store.find_resume_candidate(now.date_naive())
    }

    /// Seeds totals from `candidate` and binds later saves to it. A file
    /// that cannot be read leaves the session fresh and unbound.
    pub fn resume_from(&mut self, candidate: &Path) -> Result<usize, StorageError> {
        let applied = storage::merge_into(candidate, &mut self.tracker)?;
        self.log_path = Some(candidate.to_path_buf());
        info!(path = %candidate.display(), rows = applied, "resumed previous session");
        Ok(applied)
    }

    pub fn toggle(
        &mut self,
        category: &str,
        now: DateTime<Local>,
    ) -> Result<ToggleOutcome, TrackerError> {
        self.tracker.toggle(category, now)
    }

    /// The file name is fixed by the first save and reused afterwards, even
    /// though the duration it encodes goes stale.
    pub fn save(&mut self, now: DateTime<Local>) -> Result<PathBuf, StorageError> {
        let path = match &self.log_path {
            Some(path) => path.clone(),
            None => {
                let session_minutes = whole_minutes_between(self.started_at, now);
                let name = storage::log_file_name(self.started_at, session_minutes);
                self.store.path_for(&name)
            }
        };

        self.store.save(&path, &self.tracker)?;
        if self.log_path.is_none() {
            self.log_path = Some(path.clone());
        }
        info!(path = %path.display(), "saved work log");
        Ok(path)
    }

    /// Save path used by both the explicit save action and exit. Failures
    /// are logged and leave the in-memory totals intact for a retry.
    pub fn save_best_effort(&mut self, now: DateTime<Local>) -> Result<PathBuf, String> {
        self.save(now).map_err(|e| {
            error!(error = %e, "could not save work log");
            e.to_string()
        })
    }
}

pub fn log_resume_failure(path: &Path, error: &StorageError) {
    warn!(path = %path.display(), error = %error, "could not read previous log, starting fresh");
}
