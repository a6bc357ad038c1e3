// File: ./src/commands.rs
// Command handlers: one presentation action in, one store operation, one event out
use crate::error::Result;
use crate::model::{Task, TaskDraft};
use crate::store::TaskStore;
use log::warn;

#[derive(Debug, Clone)]
pub enum Action {
    CreateTask(TaskDraft),
    UpdateTask(String, TaskDraft),
    DeleteTask(String),
    /// `None` clears the selection.
    SetOngoingChapter {
        subject: String,
        chapter: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    TaskCreated(Task),
    TaskUpdated(Task),
    TaskDeleted(Task),
    OngoingChanged {
        subject: String,
        chapter: Option<String>,
    },
    Error(String),
}

impl AppEvent {
    pub fn is_error(&self) -> bool {
        matches!(self, AppEvent::Error(_))
    }

    /// One-line status bar text.
    pub fn message(&self) -> String {
        match self {
            AppEvent::TaskCreated(_) => "Task added.".to_string(),
            AppEvent::TaskUpdated(_) => "Task updated.".to_string(),
            AppEvent::TaskDeleted(_) => "Task deleted.".to_string(),
            AppEvent::OngoingChanged {
                chapter: Some(c), ..
            } => format!("Studying: {}", c),
            AppEvent::OngoingChanged { chapter: None, .. } => "Ongoing chapter cleared.".to_string(),
            AppEvent::Error(msg) => format!("Error: {}", msg),
        }
    }
}

/// Runs one action against the store. Form input is validated here, before
/// it reaches the store.
pub fn handle(store: &mut TaskStore, action: Action) -> AppEvent {
    apply(store, action).unwrap_or_else(|e| {
        warn!("command failed: {}", e);
        AppEvent::Error(e.to_string())
    })
}

fn apply(store: &mut TaskStore, action: Action) -> Result<AppEvent> {
    match action {
        Action::CreateTask(draft) => {
            draft.validate()?;
            let task = store.create_task(draft)?;
            Ok(AppEvent::TaskCreated(task.clone()))
        }
        Action::UpdateTask(id, draft) => {
            draft.validate()?;
            let task = store.update_task(&id, draft)?;
            Ok(AppEvent::TaskUpdated(task.clone()))
        }
        Action::DeleteTask(id) => Ok(AppEvent::TaskDeleted(store.delete_task(&id)?)),
        Action::SetOngoingChapter {
            subject,
            chapter: Some(label),
        } => {
            store.set_ongoing_chapter(&subject, &label)?;
            Ok(AppEvent::OngoingChanged {
                subject,
                chapter: Some(label),
            })
        }
        Action::SetOngoingChapter {
            subject,
            chapter: None,
        } => {
            store.clear_ongoing_chapter(&subject)?;
            Ok(AppEvent::OngoingChanged {
                subject,
                chapter: None,
            })
        }
    }
}
