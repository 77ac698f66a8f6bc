use std::{
    collections::HashMap,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::Color,
};
use tracing::info;

use crate::{
    config::Config,
    constants::TIME_SETTINGS,
    domain::CategoryStatus,
    session::Session,
    shutdown::ShutdownFlag,
};

mod category_state;
mod event_handlers;
mod render_views;
mod resume_modal_view;
mod time_format;
mod ui_helpers;
mod view_style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UiMode {
    ResumePrompt,
    Main,
}

/// One row of the main list, bound to a single category.
#[derive(Clone, Debug)]
struct CategoryButton {
    category: String,
    color: Color,
    status: CategoryStatus,
    total_minutes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Error(text) => text,
        }
    }
}

struct App {
    session: Session,
    display_minutes: bool,
    autosave_on_exit: bool,
    autosave_armed: bool,
    ui_mode: UiMode,
    resume_candidate: Option<PathBuf>,
    buttons: Vec<CategoryButton>,
    button_index: HashMap<String, usize>,
    selected_index: usize,
    status_message: Option<StatusMessage>,
    render_needed: bool,
}

impl App {
    fn new(config: &Config, session: Session, now: DateTime<Local>) -> Self {
        let resume_candidate = session.resume_candidate(now);

        let buttons: Vec<CategoryButton> = session
            .tracker()
            .categories()
            .iter()
            .map(|category| CategoryButton {
                category: category.name.clone(),
                color: category.color,
                status: CategoryStatus::Stopped,
                total_minutes: 0,
            })
            .collect();
        let button_index = buttons
            .iter()
            .enumerate()
            .map(|(idx, button)| (button.category.clone(), idx))
            .collect();

        let ui_mode = if resume_candidate.is_some() {
            UiMode::ResumePrompt
        } else {
            UiMode::Main
        };

        Self {
            session,
            display_minutes: config.display_minutes,
            autosave_on_exit: config.autosave_on_exit,
            autosave_armed: ui_mode == UiMode::Main && config.autosave_on_exit,
            ui_mode,
            resume_candidate,
            buttons,
            button_index,
            selected_index: 0,
            status_message: None,
            render_needed: true,
        }
    }

    fn in_resume_prompt(&self) -> bool {
        matches!(self.ui_mode, UiMode::ResumePrompt)
    }

    /// Rows are the category buttons followed by the save button.
    fn row_count(&self) -> usize {
        self.buttons.len() + 1
    }

    fn is_on_save_button(&self) -> bool {
        self.selected_index == self.buttons.len()
    }

    fn modal_rect(&self, terminal_size: Rect) -> Rect {
        let target_width = terminal_size.width.saturating_mul(2) / 3;
        let target_height = 7;

        let max_width = terminal_size.width.saturating_sub(2).max(1);
        let max_height = terminal_size.height.saturating_sub(2).max(1);

        let modal_width = target_width.clamp(1, max_width);
        let modal_height = target_height.clamp(1, max_height);

        let modal_x = (terminal_size.width.saturating_sub(modal_width)) / 2;
        let modal_y = (terminal_size.height.saturating_sub(modal_height)) / 2;

        Rect::new(modal_x, modal_y, modal_width, modal_height)
    }

    /// Runs the exit-time save when autosave is armed. Called on every way
    /// out of the event loop, before the terminal is restored.
    fn shutdown(&mut self, now: DateTime<Local>) {
        if self.autosave_armed {
            info!(path = ?self.session.log_path(), "autosaving on exit");
            if let Err(e) = self.session.save_best_effort(now) {
                self.status_message =
                    Some(StatusMessage::Error(format!("Autosave failed: {}", e)));
            }
        }
    }
}

pub fn run_ui(config: &Config, session: Session, shutdown: ShutdownFlag) -> Result<(), io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, session, Local::now());

    let result = run_app(&mut terminal, &mut app, &shutdown);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Drives the event loop, then runs the exit save whether the loop ended
/// normally or with a terminal error.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    shutdown: &ShutdownFlag,
) -> Result<(), io::Error> {
    let result = run_loop(terminal, app, shutdown);
    app.shutdown(Local::now());
    result
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    shutdown: &ShutdownFlag,
) -> Result<(), io::Error> {
    let tick_rate = Duration::from_millis(TIME_SETTINGS.tick_ms);
    let poll_rate = Duration::from_millis(TIME_SETTINGS.poll_ms);
    let mut last_tick = Instant::now();

    loop {
        if shutdown.requested() {
            info!("shutdown signal received");
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            app.render_needed = true;
            last_tick = Instant::now();
        }

        if app.render_needed {
            terminal.draw(|f| app.draw_frame(f))?;
            app.render_needed = false;
        }

        if event::poll(poll_rate)?
            && let Event::Key(key) = event::read()?
            && app.handle_key(key)
        {
            break;
        }
    }

    Ok(())
}
