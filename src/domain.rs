use chrono::{DateTime, Local};
use ratatui::style::Color;
use thiserror::Error;
use tracing::debug;

use crate::constants::COLORS;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CategoryId(pub usize);

impl CategoryId {
    pub fn new(id: usize) -> Self {
        CategoryId(id)
    }
}

#[derive(Clone, Debug)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: Color,
}

/// Builds the fixed category list in declaration order. The position in the
/// list doubles as the id, so ids are stable for the whole process.
pub fn categories_from_names<I, S>(names: I) -> Vec<Category>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| Category {
            id: CategoryId::new(idx),
            name: name.into(),
            color: COLORS[idx % COLORS.len()],
        })
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryStatus {
    Running,
    Stopped,
}

/// A per-category state change produced by a toggle. The UI applies these to
/// the row bound to `category`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryEvent {
    pub category: String,
    pub status: CategoryStatus,
    pub total_minutes: u64,
}

/// Events in the order they happened: a stop of the previously running
/// category always precedes the start of the new one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub events: Vec<CategoryEvent>,
}

#[derive(Clone, Copy, Debug)]
struct RunningEntry {
    category_id: CategoryId,
    started_at: DateTime<Local>,
}

/// Whole minutes elapsed between two wall-clock readings, truncated toward
/// zero. A clock that stepped backward yields 0.
pub fn whole_minutes_between(start: DateTime<Local>, now: DateTime<Local>) -> u64 {
    let seconds = (now - start).num_seconds();
    if seconds <= 0 { 0 } else { (seconds / 60) as u64 }
}

/// Sum of minute totals, pinned at `u64::MAX` instead of wrapping. Resumed
/// logs can carry arbitrarily large values.
pub fn total_minutes<I: IntoIterator<Item = u64>>(minutes: I) -> u64 {
    minutes.into_iter().fold(0, u64::saturating_add)
}

pub struct TimeAccumulator {
    categories: Vec<Category>,
    running: Option<RunningEntry>,
    minutes: Vec<u64>,
}

impl TimeAccumulator {
    pub fn new(categories: Vec<Category>) -> Self {
        let minutes = vec![0; categories.len()];
        Self {
            categories,
            running: None,
            minutes,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_id_by_name(&self, name: &str) -> Option<CategoryId> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
    }

    pub fn minutes_for(&self, name: &str) -> u64 {
        self.category_id_by_name(name)
            .map_or(0, |id| self.minutes[id.0])
    }

    /// Totals in configured order, including categories that never ran.
    pub fn totals(&self) -> Vec<(&str, u64)> {
        self.categories
            .iter()
            .map(|c| (c.name.as_str(), self.minutes[c.id.0]))
            .collect()
    }

    pub fn running_category(&self) -> Option<&Category> {
        self.running
            .and_then(|entry| self.categories.get(entry.category_id.0))
    }

    pub fn running_since(&self) -> Option<DateTime<Local>> {
        self.running.map(|entry| entry.started_at)
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.running_category().is_some_and(|c| c.name == name)
    }

    /// Replaces the total of a known category. Used when seeding from a
    /// resumed log before any toggling happens; unknown names are ignored.
    pub fn seed(&mut self, name: &str, minutes: u64) -> bool {
        match self.category_id_by_name(name) {
            Some(id) => {
                self.minutes[id.0] = minutes;
                true
            }
            None => false,
        }
    }

    pub fn toggle(
        &mut self,
        name: &str,
        now: DateTime<Local>,
    ) -> Result<ToggleOutcome, TrackerError> {
        let id = self
            .category_id_by_name(name)
            .ok_or_else(|| TrackerError::UnknownCategory(name.to_string()))?;

        let mut outcome = ToggleOutcome::default();

        if let Some(entry) = self.running {
            outcome.events.push(self.stop(entry, now));
            if entry.category_id == id {
                return Ok(outcome);
            }
        }

        self.running = Some(RunningEntry {
            category_id: id,
            started_at: now,
        });
        debug!(category = name, "category started");
        outcome.events.push(CategoryEvent {
            category: name.to_string(),
            status: CategoryStatus::Running,
            total_minutes: self.minutes[id.0],
        });

        Ok(outcome)
    }

    fn stop(&mut self, entry: RunningEntry, now: DateTime<Local>) -> CategoryEvent {
        let elapsed = whole_minutes_between(entry.started_at, now);
        let idx = entry.category_id.0;
        self.minutes[idx] = self.minutes[idx].saturating_add(elapsed);
        self.running = None;

        let category = self.categories[idx].name.clone();
        debug!(
            category = category.as_str(),
            elapsed,
            total = self.minutes[idx],
            "category stopped"
        );

        CategoryEvent {
            category,
            status: CategoryStatus::Stopped,
            total_minutes: self.minutes[idx],
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone};

    use super::*;

    fn t0() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 10, 16, 9, 0, 0)
            .single()
            .unwrap()
    }

    fn tracker() -> TimeAccumulator {
        TimeAccumulator::new(categories_from_names(["Work", "Break"]))
    }

    fn running_count(tt: &TimeAccumulator) -> usize {
        tt.categories()
            .iter()
            .filter(|c| tt.is_running(&c.name))
            .count()
    }

    #[test]
    fn test_whole_minutes_truncates() {
        let start = t0();
        assert_eq!(whole_minutes_between(start, start + ChronoDuration::seconds(59)), 0);
        assert_eq!(whole_minutes_between(start, start + ChronoDuration::seconds(95)), 1);
        assert_eq!(whole_minutes_between(start, start + ChronoDuration::seconds(185)), 3);
        assert_eq!(whole_minutes_between(start, start - ChronoDuration::seconds(300)), 0);
    }

    #[test]
    fn test_toggle_scenario_work_then_break() {
        let mut tt = tracker();
        let start = t0();

        let outcome = tt.toggle("Work", start).unwrap();
        assert_eq!(
            outcome.events,
            vec![CategoryEvent {
                category: "Work".to_string(),
                status: CategoryStatus::Running,
                total_minutes: 0,
            }]
        );

        let at_95 = start + ChronoDuration::seconds(95);
        let outcome = tt.toggle("Work", at_95).unwrap();
        assert_eq!(
            outcome.events,
            vec![CategoryEvent {
                category: "Work".to_string(),
                status: CategoryStatus::Stopped,
                total_minutes: 1,
            }]
        );
        assert!(tt.running_category().is_none());

        tt.toggle("Break", at_95).unwrap();
        let outcome = tt
            .toggle("Work", at_95 + ChronoDuration::seconds(185))
            .unwrap();

        assert_eq!(outcome.events.len(), 2);
        assert_eq!(outcome.events[0].category, "Break");
        assert_eq!(outcome.events[0].status, CategoryStatus::Stopped);
        assert_eq!(outcome.events[0].total_minutes, 3);
        assert_eq!(outcome.events[1].category, "Work");
        assert_eq!(outcome.events[1].status, CategoryStatus::Running);
        assert_eq!(outcome.events[1].total_minutes, 1);

        assert_eq!(tt.minutes_for("Break"), 3);
        assert_eq!(tt.minutes_for("Work"), 1);
        assert!(tt.is_running("Work"));
        assert_eq!(tt.running_since(), Some(at_95 + ChronoDuration::seconds(185)));
    }

    #[test]
    fn test_toggle_is_not_idempotent() {
        let mut tt = tracker();
        let start = t0();

        tt.toggle("Work", start).unwrap();
        tt.toggle("Work", start + ChronoDuration::minutes(2)).unwrap();
        assert!(!tt.is_running("Work"));

        tt.toggle("Work", start + ChronoDuration::minutes(3)).unwrap();
        assert!(tt.is_running("Work"));
        assert_eq!(tt.minutes_for("Work"), 2);
    }

    #[test]
    fn test_at_most_one_running() {
        let mut tt = tracker();
        let start = t0();
        let sequence = ["Work", "Break", "Break", "Work", "Break", "Work", "Work"];

        for (step, name) in sequence.iter().enumerate() {
            tt.toggle(name, start + ChronoDuration::seconds(step as i64 * 70))
                .unwrap();
            assert!(running_count(&tt) <= 1);
        }
    }

    #[test]
    fn test_totals_never_decrease() {
        let mut tt = tracker();
        let start = t0();
        tt.toggle("Work", start).unwrap();
        tt.toggle("Work", start + ChronoDuration::minutes(10)).unwrap();

        tt.toggle("Work", start + ChronoDuration::minutes(20)).unwrap();
        tt.toggle("Work", start + ChronoDuration::minutes(15)).unwrap();

        assert_eq!(tt.minutes_for("Work"), 10);
    }

    #[test]
    fn test_stop_saturates_huge_seeded_total() {
        let mut tt = tracker();
        let start = t0();
        tt.seed("Work", u64::MAX);

        tt.toggle("Work", start).unwrap();
        let outcome = tt
            .toggle("Work", start + ChronoDuration::minutes(2))
            .unwrap();

        assert_eq!(outcome.events[0].total_minutes, u64::MAX);
        assert_eq!(tt.minutes_for("Work"), u64::MAX);
    }

    #[test]
    fn test_total_minutes_saturates() {
        assert_eq!(total_minutes([3, 4]), 7);
        assert_eq!(total_minutes([u64::MAX, 5]), u64::MAX);
        assert_eq!(total_minutes(Vec::new()), 0);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut tt = tracker();
        let start = t0();
        tt.toggle("Work", start).unwrap();

        let err = tt
            .toggle("Lunch", start + ChronoDuration::minutes(5))
            .unwrap_err();
        assert_eq!(err, TrackerError::UnknownCategory("Lunch".to_string()));
        assert!(tt.is_running("Work"));
        assert_eq!(tt.minutes_for("Work"), 0);
        assert_eq!(tt.running_since(), Some(start));
    }

    #[test]
    fn test_seed_ignores_unknown() {
        let mut tt = tracker();
        assert!(tt.seed("Work", 42));
        assert!(!tt.seed("Lunch", 7));
        assert_eq!(tt.totals(), vec![("Work", 42), ("Break", 0)]);
    }

    #[test]
    fn test_categories_keep_declaration_order() {
        let categories = categories_from_names(["C", "A", "B"]);
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(categories[2].id, CategoryId::new(2));
        assert_eq!(categories[1].color, COLORS[1]);
    }
}
