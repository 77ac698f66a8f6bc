use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{App, ui_helpers};

impl App {
    /// Returns true when the app should exit.
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        self.handle_key_at(key, Local::now())
    }

    pub(super) fn handle_key_at(&mut self, key: KeyEvent, now: DateTime<Local>) -> bool {
        if is_interrupt(&key) {
            return true;
        }

        if self.in_resume_prompt() {
            self.handle_resume_prompt_key(key, now);
            false
        } else {
            self.handle_normal_key(key, now)
        }
    }

    /// The prompt swallows everything except its own answers.
    fn handle_resume_prompt_key(&mut self, key: KeyEvent, now: DateTime<Local>) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.answer_resume(true, now);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.answer_resume(false, now);
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent, now: DateTime<Local>) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index =
                    ui_helpers::wrap_prev_index(self.selected_index, self.row_count());
                self.render_needed = true;
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_index =
                    ui_helpers::wrap_next_index(self.selected_index, self.row_count());
                self.render_needed = true;
                false
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.is_on_save_button() {
                    self.save_now(now);
                } else {
                    self.toggle_category_at(self.selected_index, now);
                }
                false
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.save_now(now);
                false
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                if index < self.buttons.len() {
                    self.selected_index = index;
                    self.toggle_category_at(index, now);
                }
                false
            }
            _ => false,
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}
