//! Ratatui-based terminal UI.
//!
//! Shows the six rate cards in a grid with the freshness caption underneath.
//! For the regional provider, ←/→ step through states and each change re-runs
//! the fetch-then-render pipeline.

use std::io;
use std::time::Duration;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::config::{Config, STATES};
use crate::data::RateProvider;
use crate::domain::DisplayCard;
use crate::error::AppError;
use crate::render::{RatesSection, View};

/// Start the TUI.
pub fn run(config: Config, region: Option<String>) -> Result<(), AppError> {
    let provider = crate::data::build_provider(&config)?;
    let mut app = App::new(config, provider, region)?;

    let _screen = ScreenSession::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::upstream(format!("Failed to initialize terminal: {e}")))?;

    app.reload(&mut terminal)?;
    app.event_loop(&mut terminal)
}

/// Raw mode, alternate screen and hidden cursor for the lifetime of the value.
struct ScreenSession;

impl ScreenSession {
    fn enter() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::upstream(format!("Failed to enable raw mode: {e}")))?;
        // From here on `Drop` undoes whatever part of the setup succeeded.
        let session = Self;
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .map_err(|e| AppError::upstream(format!("Failed to prepare screen: {e}")))?;
        Ok(session)
    }
}

impl Drop for ScreenSession {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

struct App {
    config: Config,
    provider: Option<Box<dyn RateProvider>>,
    /// Index into `STATES`; `None` for national providers.
    state_idx: Option<usize>,
    section: RatesSection,
    status: String,
}

impl App {
    fn new(
        config: Config,
        provider: Option<Box<dyn RateProvider>>,
        region: Option<String>,
    ) -> Result<Self, AppError> {
        let state_idx = match region {
            Some(code) => Some(
                STATES
                    .iter()
                    .position(|s| *s == code)
                    .ok_or_else(|| AppError::usage(format!("Unknown state code '{code}'.")))?,
            ),
            None => None,
        };
        Ok(Self {
            config,
            provider,
            state_idx,
            section: RatesSection::new(),
            status: String::new(),
        })
    }

    fn region(&self) -> Option<&'static str> {
        self.state_idx.map(|i| STATES[i])
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.redraw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::upstream(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::upstream(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left => self.step_state(terminal, -1)?,
                        KeyCode::Right => self.step_state(terminal, 1)?,
                        KeyCode::Char('r') => self.reload(terminal)?,
                        _ => {}
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn step_state<B: Backend>(&mut self, terminal: &mut Terminal<B>, delta: isize) -> Result<(), AppError> {
        let Some(idx) = self.state_idx else {
            self.status = format!("{} rates are national.", self.config.provider.display_name());
            return Ok(());
        };
        let n = STATES.len() as isize;
        self.state_idx = Some((idx as isize + delta).rem_euclid(n) as usize);
        self.reload(terminal)
    }

    /// Show the loading state, then fetch and render.
    fn reload<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        self.section.begin_loading();
        self.status = "Fetching rates...".to_string();
        self.redraw(terminal)?;

        let region = self.region();
        let outcome = crate::app::pipeline::load_rates(
            &mut self.section,
            self.provider.as_deref(),
            region,
            crate::app::pipeline::today(),
        );
        self.status = match outcome {
            crate::render::RatesOutcome::Live(set) => {
                format!("Loaded {} of 6 products.", set.quotes.len())
            }
            crate::render::RatesOutcome::Demo => "Showing demo rates.".to_string(),
        };
        Ok(())
    }

    fn redraw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| AppError::upstream(format!("Terminal draw error: {e}")))?;
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut spans = vec![
            Span::styled("rates", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | source: {}", self.config.provider.display_name())),
        ];
        if let Some(region) = self.region() {
            spans.push(Span::raw(" | state: "));
            spans.push(Span::styled(region, Style::default().add_modifier(Modifier::BOLD)));
        }
        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Current Mortgage Rates").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.section.view() == View::Loading {
            let msg = Paragraph::new("Loading current rates...")
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            frame.render_widget(msg, inner);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Length(6), Constraint::Min(0)])
            .split(inner);

        for (row, cards) in self.section.cards().chunks(3).enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ])
                .split(rows[row.min(1)]);
            for (col, card) in cards.iter().enumerate() {
                frame.render_widget(card_widget(card), cols[col]);
            }
        }

        if let Some(caption) = self.section.caption() {
            let p = Paragraph::new(caption.text())
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true });
            frame.render_widget(p, rows[2]);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.state_idx.is_some() {
            "←/→ state  r refresh  q quit"
        } else {
            "r refresh  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn card_widget(card: &DisplayCard) -> Paragraph<'_> {
    let border = if card.featured {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let mut title = card.label.to_string();
    if card.estimated() {
        title.push_str(" *Est.");
    }

    let mut lines = vec![Line::from(Span::styled(
        card.formatted_rate(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(apr) = card.apr {
        lines.push(Line::from(format!("APR {apr:.3}%")));
    }
    if let Some(points) = card.points {
        lines.push(Line::from(format!("Points {points:.2}")));
    }

    Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL).border_style(border))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::config::ProviderKind;
    use crate::render::RatesOutcome;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn draws_demo_cards() {
        let config = Config {
            provider: ProviderKind::Demo,
            ..Config::default()
        };
        let mut app = App::new(config, None, None).unwrap();
        app.section
            .render(&RatesOutcome::Demo, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        let mut terminal = Terminal::new(TestBackend::new(120, 24)).unwrap();
        app.redraw(&mut terminal).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("30-Year Fixed *Est."));
        assert!(text.contains("6.850%"));
        assert!(text.contains("7.100%"));
        assert!(text.contains("Demo rates shown"));
        assert!(!text.contains("state:"));
    }

    #[test]
    fn state_selector_wraps_and_reloads() {
        let config = Config {
            provider: ProviderKind::Regional,
            ..Config::default()
        };
        let mut app = App::new(config, None, Some("WY".to_string())).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 24)).unwrap();

        app.step_state(&mut terminal, 1).unwrap();
        assert_eq!(app.region(), Some("AK"));
        assert_eq!(app.section.view(), View::Grid);
        assert_eq!(app.status, "Showing demo rates.");

        app.step_state(&mut terminal, -1).unwrap();
        assert_eq!(app.region(), Some("WY"));
        assert!(buffer_text(&terminal).contains("state: WY"));
    }

    #[test]
    fn selector_starts_on_requested_state() {
        let config = Config {
            provider: ProviderKind::Regional,
            ..Config::default()
        };
        let code = crate::config::normalize_state("pr").unwrap();
        let app = App::new(config.clone(), None, Some(code)).unwrap();
        assert_eq!(app.region(), Some("PR"));

        let err = App::new(config, None, Some("ZZ".to_string())).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
