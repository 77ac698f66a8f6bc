use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::{App, time_format};

impl App {
    pub(super) fn render_resume_modal(&self, f: &mut Frame, terminal_size: Rect) {
        let modal_rect = self.modal_rect(terminal_size);
        let inner_width = modal_rect.width.saturating_sub(2) as usize;

        let file_name = self
            .resume_candidate
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let text = vec![
            Line::from("A log file for today exists."),
            Line::from("Continue the previous session?"),
            Line::from(Span::styled(
                time_format::truncate_label(&file_name, inner_width),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )),
            Line::from(vec![
                Span::styled("[y] ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("Yes   "),
                Span::styled("[n] ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("No"),
            ]),
        ];

        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(Line::from(Span::styled(
                        "Continue Previous Session",
                        Style::default().fg(Color::White),
                    )))
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(Color::Yellow)),
            );

        f.render_widget(Clear, modal_rect);
        f.render_widget(paragraph, modal_rect);
    }
}
