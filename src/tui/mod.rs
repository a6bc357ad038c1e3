pub mod state;
pub mod view;

use crate::commands::{self, Action, AppEvent};
use crate::config::Config;
use crate::error::StoreError;
use crate::logging;
use crate::storage::LocalStorage;
use crate::store::TaskStore;
use crate::syllabus;
use crate::tui::state::{AppState, Focus, InputMode, Tab};
use crate::tui::view::draw;
use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, time::Duration};

pub fn run() -> Result<()> {
    // Panic Hook: restore the terminal before printing the panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config = Config::load()?;
    let data_dir = config
        .resolve_data_dir()
        .ok_or(StoreError::NoDataDir)
        .context("set SYLTRACK_DATA_DIR or data_dir in config.toml")?;
    let storage = LocalStorage::new(&data_dir)?;
    logging::init_logging(&config.log_level, storage.data_dir())?;

    // First run: leave an editable copy of the defaults behind.
    if let Some(path) = Config::get_path()
        && !path.exists()
    {
        match config.save() {
            Ok(()) => info!("wrote default config to {}", path.display()),
            Err(e) => warn!("could not write default config: {:#}", e),
        }
    }

    let subjects = syllabus::load_subjects(config.syllabus_path.as_deref())?;
    let mut store = TaskStore::load(storage);

    let today = Local::now().date_naive();
    let mut app_state = AppState::new(
        subjects,
        config.task_kinds.clone(),
        config.notices,
        today,
    );
    app_state.refresh(&store);
    if let Some(w) = store.warnings().first() {
        app_state.message = format!("Warning: {} (starting empty)", w);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let loop_result = event_loop(&mut terminal, &mut app_state, &mut store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    loop_result?;
    store.close()?;
    info!("exiting");
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app_state: &mut AppState,
    store: &mut TaskStore,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app_state))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !handle_key(key, app_state, store)
        {
            return Ok(());
        }
    }
}

fn dispatch(action: Action, app_state: &mut AppState, store: &mut TaskStore) -> AppEvent {
    let event = commands::handle(store, action);
    app_state.message = event.message();
    app_state.refresh(store);
    event
}

/// Returns `false` when the user asked to quit.
fn handle_key(key: KeyEvent, app_state: &mut AppState, store: &mut TaskStore) -> bool {
    match app_state.mode {
        InputMode::Form => {
            handle_form_key(key, app_state, store);
            true
        }
        InputMode::ConfirmDelete => {
            if let KeyCode::Char('y') | KeyCode::Char('Y') = key.code
                && let Some(id) = app_state.selected_task().map(|t| t.id.clone())
            {
                dispatch(Action::DeleteTask(id), app_state, store);
            } else {
                app_state.message = "Delete cancelled.".to_string();
            }
            app_state.mode = InputMode::Normal;
            true
        }
        InputMode::Normal => handle_normal_key(key, app_state, store),
    }
}

fn handle_form_key(key: KeyEvent, app_state: &mut AppState, store: &mut TaskStore) {
    let n_subjects = app_state.subject_options.len();
    let n_kinds = app_state.task_kinds.len();
    let text_field = app_state.form.field.is_text();
    match key.code {
        KeyCode::Esc => {
            app_state.mode = InputMode::Normal;
            app_state.message = "Cancelled.".to_string();
        }
        KeyCode::Tab | KeyCode::Down => app_state.form.next_field(),
        KeyCode::BackTab | KeyCode::Up => app_state.form.prev_field(),
        KeyCode::Left if !text_field => app_state.form.cycle(false, n_subjects, n_kinds),
        KeyCode::Right | KeyCode::Char(' ') if !text_field => {
            app_state.form.cycle(true, n_subjects, n_kinds)
        }
        KeyCode::Char(c) => app_state.form.enter_char(c),
        KeyCode::Backspace => app_state.form.delete_char(),
        KeyCode::Enter => {
            let draft = match app_state.form_draft() {
                Ok(d) => d,
                Err(e) => {
                    app_state.message = format!("Error: {}", e);
                    return;
                }
            };
            let action = match app_state.form.editing_id.clone() {
                Some(id) => Action::UpdateTask(id, draft),
                None => Action::CreateTask(draft),
            };
            // Keep the form open on failure so nothing typed is lost
            if !dispatch(action, app_state, store).is_error() {
                app_state.mode = InputMode::Normal;
            }
        }
        _ => {}
    }
}

fn handle_normal_key(key: KeyEvent, app_state: &mut AppState, store: &mut TaskStore) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
        KeyCode::Tab => app_state.next_tab(),
        KeyCode::Char('1') => app_state.tab = Tab::Subjects,
        KeyCode::Char('2') => app_state.tab = Tab::Tasks,
        KeyCode::Char('3') => app_state.tab = Tab::Notices,
        KeyCode::Down | KeyCode::Char('j') => app_state.next(),
        KeyCode::Up | KeyCode::Char('k') => app_state.previous(),
        KeyCode::PageDown => app_state.jump_forward(10),
        KeyCode::PageUp => app_state.jump_backward(10),
        _ => match app_state.tab {
            Tab::Subjects => handle_subjects_key(key, app_state, store),
            Tab::Tasks => handle_tasks_key(key, app_state, store),
            Tab::Notices => {}
        },
    }
    true
}

fn handle_subjects_key(key: KeyEvent, app_state: &mut AppState, store: &mut TaskStore) {
    match key.code {
        KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
            app_state.toggle_focus()
        }
        KeyCode::Char('J') => app_state.detail_scroll = app_state.detail_scroll.saturating_add(1),
        KeyCode::Char('K') => app_state.detail_scroll = app_state.detail_scroll.saturating_sub(1),
        KeyCode::Enter if app_state.focus == Focus::Chapters => {
            let subject = app_state.selected_subject().map(|s| s.title.clone());
            match (subject, app_state.selected_chapter()) {
                (Some(subject), Some(chapter)) => {
                    dispatch(
                        Action::SetOngoingChapter {
                            subject,
                            chapter: Some(chapter),
                        },
                        app_state,
                        store,
                    );
                }
                _ => app_state.message = "(No Units Found)".to_string(),
            }
        }
        KeyCode::Enter => app_state.focus = Focus::Chapters,
        KeyCode::Char('x') => {
            if let Some(subject) = app_state.selected_subject().map(|s| s.title.clone()) {
                dispatch(
                    Action::SetOngoingChapter {
                        subject,
                        chapter: None,
                    },
                    app_state,
                    store,
                );
            }
        }
        KeyCode::Char('a') => {
            app_state.tab = Tab::Tasks;
            app_state.open_new_form();
        }
        _ => {}
    }
}

fn handle_tasks_key(key: KeyEvent, app_state: &mut AppState, store: &mut TaskStore) {
    match key.code {
        KeyCode::Char('a') => {
            if app_state.subject_options.is_empty() {
                app_state.message = "No subjects to attach a task to.".to_string();
            } else {
                app_state.open_new_form();
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if !app_state.open_edit_form() {
                app_state.message = "Please select a task to update.".to_string();
            }
        }
        KeyCode::Char('d') => {
            if app_state.selected_task().is_some() {
                app_state.mode = InputMode::ConfirmDelete;
            } else {
                app_state.message = "Please select a task to delete.".to_string();
            }
        }
        KeyCode::Char('s') => {
            if let Some(task) = app_state.selected_task() {
                let id = task.id.clone();
                let mut draft = task.to_draft();
                draft.status = draft.status.cycle();
                dispatch(Action::UpdateTask(id, draft), app_state, store);
            }
        }
        _ => {}
    }
}
