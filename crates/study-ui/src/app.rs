//! Application state and TUI event loop.
//!
//! [`App`] owns the theme, the chart data, which chart is showing and which
//! price lines are visible.  Key handling is kept separate from the terminal
//! loop so it can be tested without a terminal.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::Text,
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::debug;

use crate::change_chart;
use crate::chart_data::ChartData;
use crate::components::header::Header;
use crate::components::logo::Logo;
use crate::price_chart;
use crate::themes::Theme;

// ── ChartView ─────────────────────────────────────────────────────────────────

/// Which chart the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    /// Overall change per category.
    Change,
    /// Normalised index lines.
    Prices,
}

impl ChartView {
    pub fn name(&self) -> &'static str {
        match self {
            ChartView::Change => "Change",
            ChartView::Prices => "Prices",
        }
    }

    /// Key that selects this chart directly.
    pub fn key(&self) -> char {
        match self {
            ChartView::Change => 'b',
            ChartView::Prices => 'l',
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ChartView::Change => ChartView::Prices,
            ChartView::Prices => ChartView::Change,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the chart TUI.
pub struct App {
    pub theme: Theme,
    pub view: ChartView,
    pub data: ChartData,
    /// Visibility per price line, same order as `data.lines`.
    pub visible: Vec<bool>,
    pub logo: Option<Logo>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, data: ChartData, logo: Option<Logo>) -> Self {
        let visible = data.initial_visibility();
        Self {
            theme: Theme::from_name(theme_name),
            view: ChartView::Change,
            data,
            visible,
            logo,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the TUI until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout; exits on `q`,
    /// `Q`, or `Ctrl+C`.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press to the state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.view = self.view.toggled();
            }
            KeyCode::Char('b') => self.view = ChartView::Change,
            KeyCode::Char('l') => self.view = ChartView::Prices,
            KeyCode::Char('a') => self.visible.iter_mut().for_each(|v| *v = true),
            KeyCode::Char('r') => self.visible = self.data.initial_visibility(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let idx = c as usize - '0' as usize;
                self.toggle_line(idx);
            }
            _ => {}
        }
    }

    /// Flip visibility of line `idx`; out-of-range indexes are ignored.
    pub fn toggle_line(&mut self, idx: usize) {
        if let Some(shown) = self.visible.get_mut(idx) {
            *shown = !*shown;
            debug!(
                "{} {}",
                if *shown { "Showing" } else { "Hiding" },
                self.data.lines[idx].label
            );
        }
    }

    // ── Render ────────────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let header = Header::new(self.view, chunks[0].width, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

        let logo = self.logo.as_ref();
        match self.view {
            ChartView::Change => {
                change_chart::render_change_chart(frame, chunks[1], &self.data, &self.theme, logo);
            }
            ChartView::Prices => {
                price_chart::render_price_chart(
                    frame,
                    chunks[1],
                    &self.data,
                    &self.visible,
                    &self.theme,
                    logo,
                );
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
