use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::{
    domain::{CategoryEvent, CategoryStatus},
    session,
};

use super::{App, StatusMessage, UiMode};

impl App {
    pub(super) fn toggle_category_at(&mut self, index: usize, now: DateTime<Local>) {
        let Some(category) = self.buttons.get(index).map(|b| b.category.clone()) else {
            return;
        };

        match self.session.toggle(&category, now) {
            Ok(outcome) => {
                for event in &outcome.events {
                    self.apply_event(event);
                }
            }
            Err(e) => {
                warn!(error = %e, "ignoring toggle");
            }
        }
        self.render_needed = true;
    }

    /// Updates the row bound to the event's category. Events for names
    /// without a row are dropped.
    pub(super) fn apply_event(&mut self, event: &CategoryEvent) {
        let Some(&idx) = self.button_index.get(&event.category) else {
            return;
        };
        let button = &mut self.buttons[idx];
        button.status = event.status;
        button.total_minutes = event.total_minutes;
    }

    pub(super) fn save_now(&mut self, now: DateTime<Local>) {
        self.status_message = Some(match self.session.save_best_effort(now) {
            Ok(path) => StatusMessage::Info(format!("Saved to {}", path.display())),
            Err(e) => StatusMessage::Error(format!("Save failed: {}", e)),
        });
        self.render_needed = true;
    }

    pub(super) fn answer_resume(&mut self, resume: bool, now: DateTime<Local>) {
        if resume && let Some(candidate) = self.resume_candidate.clone() {
            match self.session.resume_from(&candidate) {
                Ok(_) => {
                    self.status_message = Some(StatusMessage::Info(format!(
                        "Continuing {}",
                        candidate.display()
                    )));
                }
                Err(e) => {
                    session::log_resume_failure(&candidate, &e);
                    self.status_message = Some(StatusMessage::Error(format!(
                        "Could not continue previous session: {}",
                        e
                    )));
                }
            }
        } else {
            info!("starting a fresh session");
        }

        self.sync_buttons_from_tracker();
        self.session.restart_clock(now);
        self.resume_candidate = None;
        self.autosave_armed = self.autosave_on_exit;
        self.ui_mode = UiMode::Main;
        self.render_needed = true;
    }

    fn sync_buttons_from_tracker(&mut self) {
        let tracker = self.session.tracker();
        for button in &mut self.buttons {
            button.total_minutes = tracker.minutes_for(&button.category);
            button.status = if tracker.is_running(&button.category) {
                CategoryStatus::Running
            } else {
                CategoryStatus::Stopped
            };
        }
    }
}
