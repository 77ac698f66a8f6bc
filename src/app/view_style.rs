use ratatui::style::{Color, Modifier, Style};

use super::StatusMessage;

pub(super) fn text_color_for_bg(bg_color: Color) -> Color {
    if let Color::Rgb(r, g, b) = bg_color {
        let brightness = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
        if brightness > 128 {
            Color::Black
        } else {
            Color::White
        }
    } else {
        Color::White
    }
}

pub(super) fn running_row_style(color: Color) -> Style {
    Style::default()
        .fg(text_color_for_bg(color))
        .bg(color)
        .add_modifier(Modifier::BOLD)
}

pub(super) fn status_style(message: &StatusMessage) -> Style {
    match message {
        StatusMessage::Info(_) => Style::default().fg(Color::Green),
        StatusMessage::Error(_) => Style::default().fg(Color::Red),
    }
}
