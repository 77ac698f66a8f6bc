use chrono::Local;
use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::domain::{self, CategoryStatus};

use super::{App, time_format, ui_helpers, view_style};

const SAVE_LABEL: &str = "Save to CSV";
const HELP_TEXT: &str = "↑/↓ select · enter toggle · 1-9 toggle · s save · q quit";

impl App {
    pub(super) fn draw_frame(&self, f: &mut Frame) {
        let size = f.size();
        let now = Local::now();

        let tracker = self.session.tracker();
        let running = tracker.running_category();
        let border_color = running.map_or(Color::White, |category| category.color);
        let running_title = match (running, tracker.running_since()) {
            (Some(category), Some(since)) => {
                let elapsed = (now - since).num_seconds().max(0) as u64;
                format!("{} {}", category.name, time_format::format_time(elapsed))
            }
            _ => "idle".to_string(),
        };

        let session_seconds = (now - self.session.started_at()).num_seconds().max(0) as u64;
        let session_timer = time_format::format_time(session_seconds);
        let total_title = if self.display_minutes {
            let total = domain::total_minutes(self.buttons.iter().map(|b| b.total_minutes));
            format!("{} min", total)
        } else {
            String::new()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(Span::styled(
                    running_title,
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Left),
            )
            .title(
                Line::from(Span::styled(
                    session_timer,
                    Style::default().fg(Color::White),
                ))
                .alignment(Alignment::Center),
            )
            .title(
                Line::from(Span::styled(
                    total_title,
                    Style::default().fg(Color::White),
                ))
                .alignment(Alignment::Right),
            )
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(size);
        f.render_widget(block, size);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        let items: Vec<ListItem> = self
            .buttons
            .iter()
            .map(|button| {
                let label = ui_helpers::button_label(
                    &button.category,
                    button.status,
                    button.total_minutes,
                    self.display_minutes,
                );
                let item = ListItem::new(Line::from(vec![
                    Span::styled("● ", Style::default().fg(button.color)),
                    Span::raw(label),
                ]));
                if button.status == CategoryStatus::Running {
                    item.style(view_style::running_row_style(button.color))
                } else {
                    item
                }
            })
            .chain(std::iter::once(ListItem::new(Line::from(vec![
                Span::raw("  "),
                Span::styled(SAVE_LABEL, Style::default().add_modifier(Modifier::ITALIC)),
            ]))))
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected_index));

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");
        f.render_stateful_widget(list, chunks[0], &mut list_state);

        let footer_width = chunks[1].width as usize;
        let status_line = match &self.status_message {
            Some(message) => Line::from(Span::styled(
                time_format::truncate_label(message.text(), footer_width),
                view_style::status_style(message),
            )),
            None => Line::from(""),
        };
        let help_line = Line::from(Span::styled(
            time_format::truncate_label(HELP_TEXT, footer_width),
            Style::default().fg(Color::Gray),
        ));
        f.render_widget(Paragraph::new(vec![status_line, help_line]), chunks[1]);

        if self.in_resume_prompt() {
            self.render_resume_modal(f, size);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;
    use ratatui::{Terminal, backend::TestBackend};

    use crate::app::tests::{app_in, t0};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_main_view_shows_button_labels() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), false);
        app.toggle_category_at(0, t0());
        app.toggle_category_at(0, t0() + ChronoDuration::minutes(3));
        app.toggle_category_at(1, t0() + ChronoDuration::minutes(3));

        let mut terminal = Terminal::new(TestBackend::new(70, 12)).unwrap();
        terminal.draw(|f| app.draw_frame(f)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Start Work (3 min)"));
        assert!(text.contains("Stop Break (0 min)"));
        assert!(text.contains("Save to CSV"));
        assert!(text.contains("3 min"));
    }

    #[test]
    fn test_minutes_hidden_when_display_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), false);
        app.display_minutes = false;
        app.toggle_category_at(0, t0());
        app.toggle_category_at(0, t0() + ChronoDuration::minutes(3));

        let mut terminal = Terminal::new(TestBackend::new(70, 12)).unwrap();
        terminal.draw(|f| app.draw_frame(f)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Start Work"));
        assert!(!text.contains("min"));
    }

    #[test]
    fn test_header_total_saturates() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), false);
        app.buttons[0].total_minutes = u64::MAX;
        app.buttons[1].total_minutes = 10;

        let mut terminal = Terminal::new(TestBackend::new(90, 12)).unwrap();
        terminal.draw(|f| app.draw_frame(f)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains(&format!("{} min", u64::MAX)));
    }
}
