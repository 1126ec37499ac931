use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;
use ratatui::Terminal;

use crate::config::AppConfig;
use crate::query::Category;
use crate::repository::Repository;
use crate::ui;

pub mod state;

pub use state::{AppState, CategoryPicker, SearchState};

const PAGE: isize = 10;

enum Action {
    Quit,
    SelectNext,
    SelectPrevious,
    PageDown,
    PageUp,
    SelectFirst,
    SelectLast,
    StartSearch,
    PickCategory,
    CycleSort,
    ToggleOrder,
    Reload,
}

/// Terminal front-end. Every repository call happens on the event-loop thread.
pub struct App {
    data_file: PathBuf,
    state: AppState,
    table_state: TableState,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(
        config: Arc<AppConfig>,
        data_file: PathBuf,
        repo: Repository,
        category: Category,
    ) -> Self {
        let state = AppState::new(
            repo,
            category,
            config.default_sort,
            config.tui.highlight_matches,
        );
        let tick_rate = config.tui.tick_rate();
        Self {
            data_file,
            state,
            table_state: TableState::default(),
            should_quit: false,
            tick_rate,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal
                .draw(|frame| {
                    if self.state.is_empty() {
                        self.table_state.select(None);
                    } else {
                        self.table_state.select(Some(self.state.selected));
                    }
                    ui::draw_app(frame, &self.state, &mut self.table_state);
                })
                .context("rendering frame")?;

            if self.should_quit {
                break;
            }

            if event::poll(self.tick_rate).context("polling for terminal events")? {
                match event::read().context("reading terminal event")? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {
                        // next draw picks up the new size
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);

        if self.state.picker.is_some() {
            match key.code {
                KeyCode::Esc => self.state.close_category_picker(),
                KeyCode::Enter => self.state.apply_picker(),
                KeyCode::Char('j') | KeyCode::Down => self.state.picker_move(1),
                KeyCode::Char('k') | KeyCode::Up => self.state.picker_move(-1),
                KeyCode::PageDown => self.state.picker_move(PAGE),
                KeyCode::PageUp => self.state.picker_move(-PAGE),
                _ => {}
            }
            return;
        }

        if self.state.search.active {
            match key.code {
                KeyCode::Esc => {
                    self.state.cancel_search();
                    return;
                }
                KeyCode::Enter => {
                    self.state.finish_search();
                    return;
                }
                KeyCode::Backspace => {
                    self.state.pop_search_char();
                    return;
                }
                KeyCode::Char(ch) if plain => {
                    self.state.push_search_char(ch);
                    return;
                }
                _ => {}
            }
        }

        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Reload)
            }
            KeyCode::Char('q') if plain => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::SelectFirst),
            KeyCode::Char('G') | KeyCode::End => Some(Action::SelectLast),
            KeyCode::Char('/') if plain => Some(Action::StartSearch),
            KeyCode::Char('c') if plain => Some(Action::PickCategory),
            KeyCode::Char('s') if plain => Some(Action::CycleSort),
            KeyCode::Char('o') if plain => Some(Action::ToggleOrder),
            _ => None,
        };

        if let Some(action) = action {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SelectNext => self.state.move_selection(1),
            Action::SelectPrevious => self.state.move_selection(-1),
            Action::PageDown => self.state.move_selection(PAGE),
            Action::PageUp => self.state.move_selection(-PAGE),
            Action::SelectFirst => self.state.select_first(),
            Action::SelectLast => self.state.select_last(),
            Action::StartSearch => self.state.begin_search(),
            Action::PickCategory => self.state.open_category_picker(),
            Action::CycleSort => {
                let key = self.state.cycle_sort_key();
                self.state.set_status_message(Some(format!("排序: {key}")));
            }
            Action::ToggleOrder => {
                self.state.toggle_direction();
                let direction = self.state.sort_spec().direction;
                self.state.set_status_message(Some(format!("顺序: {direction}")));
            }
            Action::Reload => self.handle_reload(),
        }
    }

    fn handle_reload(&mut self) {
        match self.state.reload(&self.data_file) {
            Ok(report) => {
                self.state.set_status_message(Some(format!(
                    "Reloaded {} ({} skipped)",
                    self.data_file.display(),
                    report.skipped
                )));
            }
            Err(err) => {
                tracing::error!(?err, "failed to reload problem listing");
                self.state
                    .set_status_message(Some(format!("加载失败: {err}")));
            }
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("switching to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal backend")?;
    terminal.hide_cursor().context("hiding cursor")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().context("disabling raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("restoring screen state")?;
    Ok(())
}
