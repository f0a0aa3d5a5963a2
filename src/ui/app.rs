use crate::api::MyStatClient;
use crate::dashboard::Dashboard;
use crate::ui::render::render_ui;
use crate::ui::state::{AppState, Page};
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::debug;

pub struct App {
    client: MyStatClient,
    date: NaiveDate,
    state: AppState,
}

impl App {
    pub fn new(client: MyStatClient, date: NaiveDate) -> Self {
        Self {
            client,
            date,
            state: AppState::Loading,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        terminal.draw(|f| render_ui(f, &self.state))?;
        self.reload().await;

        loop {
            terminal.draw(|f| render_ui(f, &self.state))?;

            if event::poll(std::time::Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.code == KeyCode::Char('r') {
                        self.state = AppState::Loading;
                        terminal.draw(|f| render_ui(f, &self.state))?;
                        self.reload().await;
                    } else if self.handle_key_event(key) {
                        break; // User quit
                    }
                }
            }
        }

        Ok(())
    }

    /// Fetch every section again, keeping the page the user was on.
    async fn reload(&mut self) {
        let page = self.current_page();
        let dashboard = Dashboard::load(&self.client, self.date).await;

        let nothing_loaded = dashboard.failed_sections() == Dashboard::SECTIONS;
        self.state = if nothing_loaded && !self.client.is_authenticated() {
            AppState::Error {
                message: "Not signed in to MyStat and no data could be loaded. \
                          Check MYSTAT_LOGIN/MYSTAT_PASSWORD and the log file for details."
                    .to_string(),
            }
        } else {
            AppState::Ready { dashboard, page }
        };
    }

    fn current_page(&self) -> Page {
        match &self.state {
            AppState::Ready { page, .. } => *page,
            _ => Page::Home,
        }
    }

    /// Returns true when the user asked to quit.
    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            return true;
        }

        if let AppState::Ready { page, .. } = &mut self.state {
            *page = match key.code {
                KeyCode::Down | KeyCode::Tab => page.next(),
                KeyCode::Up | KeyCode::BackTab => page.previous(),
                _ => *page,
            };
            debug!(page = page.title(), "Switched page");
        }

        false
    }
}
