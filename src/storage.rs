use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::{DateTime, Local, NaiveDate};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use directories::ProjectDirs;
use thiserror::Error;
use tracing::debug;

use crate::{constants::LOG_FORMAT, domain::TimeAccumulator};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not encode log rows: {0}")]
    Csv(#[from] csv::Error),
}

impl StorageError {
    fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| StorageError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A parsed `category,minutes` row from a log file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRow {
    pub category: String,
    pub minutes: u64,
}

pub fn date_prefix(date: NaiveDate) -> String {
    format!(
        "{}{}",
        LOG_FORMAT.file_prefix,
        date.format(LOG_FORMAT.date_key)
    )
}

/// `work_log_<YYYYMMDD_HHmmss>_<N>min.csv` for a session that started at
/// `session_start` and has run `session_minutes` so far.
pub fn log_file_name(session_start: DateTime<Local>, session_minutes: u64) -> String {
    format!(
        "{}{}_{}min.csv",
        LOG_FORMAT.file_prefix,
        session_start.format(LOG_FORMAT.timestamp_key),
        session_minutes
    )
}

pub struct LogStore {
    dir: PathBuf,
}

impl LogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// The same-day log with the newest modification time. Equal mtimes
    /// fall back to the greatest file name.
    pub fn find_resume_candidate(&self, date: NaiveDate) -> Option<PathBuf> {
        let prefix = date_prefix(date);
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %self.dir.display(), error = %e, "no log directory to resume from");
                return None;
            }
        };

        let mut candidates: Vec<(SystemTime, PathBuf)> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
            .filter_map(|e| {
                let metadata = e.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }
                Some((metadata.modified().ok()?, e.path()))
            })
            .collect();

        candidates.sort();
        candidates.pop().map(|(_, path)| path)
    }

    /// Writes the header and one row per configured category, replacing
    /// whatever the file held before.
    pub fn save(&self, path: &Path, tracker: &TimeAccumulator) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(StorageError::io("could not create", &self.dir))?;
        let content = encode_rows(tracker)?;
        atomic_write(path, &content)
    }
}

pub fn encode_rows(tracker: &TimeAccumulator) -> Result<Vec<u8>, StorageError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(LOG_FORMAT.header)?;
    for (category, minutes) in tracker.totals() {
        writer.write_record([category, minutes.to_string().as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| StorageError::Csv(e.into_error().into()))
}

/// Reads every well-formed row after the header. Rows with the wrong field
/// count or a minutes value that is not a non-negative integer are skipped.
pub fn load_log_rows(path: &Path) -> Result<Vec<LogRow>, StorageError> {
    let file = File::open(path).map_err(StorageError::io("could not open", path))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(file);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(line = line + 2, error = %e, "skipping unreadable log row");
                continue;
            }
        };

        if record.len() != 2 {
            debug!(line = line + 2, fields = record.len(), "skipping malformed log row");
            continue;
        }

        let minutes: u64 = match record[1].parse() {
            Ok(minutes) => minutes,
            Err(_) => {
                debug!(line = line + 2, value = &record[1], "skipping row with invalid minutes");
                continue;
            }
        };

        rows.push(LogRow {
            category: record[0].to_string(),
            minutes,
        });
    }

    Ok(rows)
}

/// Seeds `tracker` from a log file, returning how many rows were applied.
/// Later rows for the same category overwrite earlier ones.
pub fn merge_into(path: &Path, tracker: &mut TimeAccumulator) -> Result<usize, StorageError> {
    let mut applied = 0;
    for row in load_log_rows(path)? {
        if tracker.seed(&row.category, row.minutes) {
            applied += 1;
        } else {
            debug!(category = row.category.as_str(), "ignoring row for unconfigured category");
        }
    }
    Ok(applied)
}

pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let mut tmp_file =
        File::create(&tmp_path).map_err(StorageError::io("could not create", &tmp_path))?;
    tmp_file
        .write_all(content)
        .map_err(StorageError::io("could not write", &tmp_path))?;
    tmp_file
        .sync_all()
        .map_err(StorageError::io("could not sync", &tmp_path))?;
    fs::rename(&tmp_path, path).map_err(StorageError::io("could not replace", path))?;
    Ok(())
}

pub fn write_text_file(path: &Path, content: &str) -> Result<(), StorageError> {
    atomic_write(path, content.as_bytes())
}

pub fn get_state_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "worklog", "worklog") {
        if let Some(state_dir) = proj_dirs.state_dir() {
            return state_dir.to_path_buf();
        }
        return proj_dirs.data_local_dir().to_path_buf();
    }
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;
    use crate::domain::categories_from_names;

    fn tracker() -> TimeAccumulator {
        TimeAccumulator::new(categories_from_names(["Work", "Break"]))
    }

    fn set_mtime(path: &Path, secs_after_epoch: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch))
            .unwrap();
    }

    #[test]
    fn test_save_writes_every_category_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path().join("work_logs"));
        let mut tt = tracker();
        tt.seed("Work", 5);

        let path = store.path_for("work_log_test.csv");
        store.save(&path, &tt).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Category,TimeSpent(Minutes)\nWork,5\nBreak,0\n");
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path());
        let path = store.path_for("work_log_overwrite.csv");
        fs::write(&path, "stale\nrows\nthat\nshould\ngo\n").unwrap();

        let mut tt = tracker();
        tt.seed("Break", 12);
        store.save(&path, &tt).unwrap();
        store.save(&path, &tt).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Category,TimeSpent(Minutes)\nWork,0\nBreak,12\n");

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_round_trip_restricted_to_configured_categories() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path());
        let path = store.path_for("work_log_roundtrip.csv");

        let mut saved = tracker();
        saved.seed("Work", 95);
        saved.seed("Break", 17);
        store.save(&path, &saved).unwrap();

        let mut loaded = tracker();
        let applied = merge_into(&path, &mut loaded).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(loaded.totals(), saved.totals());
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work_log_20261016_090000_3min.csv");
        fs::write(
            &path,
            "Category,TimeSpent(Minutes)\nWork,7\nBadRow\nBreak,x\nLunch,4\nBreak,2,extra\nBreak,3\n",
        )
        .unwrap();

        let rows = load_log_rows(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                LogRow {
                    category: "Work".to_string(),
                    minutes: 7
                },
                LogRow {
                    category: "Lunch".to_string(),
                    minutes: 4
                },
                LogRow {
                    category: "Break".to_string(),
                    minutes: 3
                },
            ]
        );

        let mut tt = tracker();
        assert_eq!(merge_into(&path, &mut tt).unwrap(), 2);
        assert_eq!(tt.totals(), vec![("Work", 7), ("Break", 3)]);
    }

    #[test]
    fn test_resume_candidate_prefers_latest_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path());
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        let newer_name = dir.path().join("work_log_20261016_080000_10min.csv");
        let older_name = dir.path().join("work_log_20261016_170000_45min.csv");
        let other_day = dir.path().join("work_log_20261015_170000_45min.csv");
        for path in [&newer_name, &older_name, &other_day] {
            fs::write(path, "Category,TimeSpent(Minutes)\n").unwrap();
        }

        set_mtime(&older_name, 1_000);
        set_mtime(&newer_name, 2_000);
        set_mtime(&other_day, 3_000);

        assert_eq!(store.find_resume_candidate(today), Some(newer_name));
    }

    #[test]
    fn test_resume_candidate_absent() {
        let dir = tempfile::tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        let missing = LogStore::new(dir.path().join("nope"));
        assert_eq!(missing.find_resume_candidate(today), None);

        let empty = LogStore::new(dir.path());
        fs::write(dir.path().join("notes.csv"), "x").unwrap();
        assert_eq!(empty.find_resume_candidate(today), None);
    }

    #[test]
    fn test_log_file_name_format() {
        let start = Local
            .with_ymd_and_hms(2026, 10, 16, 9, 5, 7)
            .single()
            .unwrap();
        assert_eq!(log_file_name(start, 42), "work_log_20261016_090507_42min.csv");
        assert!(log_file_name(start, 0).starts_with(&date_prefix(start.date_naive())));
    }

    #[test]
    fn test_save_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();

        let store = LogStore::new(&blocker);
        let path = store.path_for("work_log_fail.csv");
        let err = store.save(&path, &tracker()).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
