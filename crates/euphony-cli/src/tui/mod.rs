use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use euphony_recommend::{MatchKind, RecommendReport};
use ratatui::prelude::*;

pub mod recommendation_list;
pub mod seed_list;

/// Rows visible before the list scrolls; refined by each render.
const VIEWPORT_HEIGHT: usize = 20;

/// Which view the TUI is currently displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Recommendations,
    Seeds,
}

/// A seed as the user gave it, with the catalog track it matched.
#[derive(Debug, Clone)]
pub struct SeedRow {
    pub reference: String,
    pub matched: Option<(String, MatchKind)>,
}

/// Selection and scroll position of one list.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListState {
    pub selected: usize,
    pub offset: usize,
}

impl ListState {
    fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
            if self.selected >= self.offset + VIEWPORT_HEIGHT {
                self.offset = self.selected + 1 - VIEWPORT_HEIGHT;
            }
        }
    }

    fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }
}

/// Application state for the results browser.
#[derive(Debug)]
pub struct App {
    pub view: View,
    pub seeds: Vec<SeedRow>,
    pub report: RecommendReport,
    pub recommendations: ListState,
    pub seed_list: ListState,
    pub should_quit: bool,
}

impl App {
    pub fn new(seeds: Vec<SeedRow>, report: RecommendReport) -> Self {
        Self {
            view: View::Recommendations,
            seeds,
            report,
            recommendations: ListState::default(),
            seed_list: ListState::default(),
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                self.view = match self.view {
                    View::Recommendations => View::Seeds,
                    View::Seeds => View::Recommendations,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => match self.view {
                View::Recommendations => {
                    let len = self.report.outcome.records().len();
                    self.recommendations.down(len);
                }
                View::Seeds => self.seed_list.down(self.seeds.len()),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.view {
                View::Recommendations => self.recommendations.up(),
                View::Seeds => self.seed_list.up(),
            },
            _ => {}
        }
    }
}

/// Run the results browser.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui(seeds: Vec<SeedRow>, report: RecommendReport) -> Result<()> {
    let app = App::new(seeds, report);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop, capturing any error so we can restore the terminal
    let result = run_event_loop(&mut terminal, app);

    // Restore terminal regardless of success or failure
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| match app.view {
            View::Recommendations => recommendation_list::render(frame, &app),
            View::Seeds => seed_list::render(frame, &app),
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
