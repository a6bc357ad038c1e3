// File: ./src/store.rs
// Owns the task list and ongoing-chapter selections; every mutation is
// written through to disk before it becomes visible in memory.
use crate::error::{Result, StoreError};
use crate::model::{Task, TaskDraft};
use crate::storage::LocalStorage;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

pub struct TaskStore {
    storage: LocalStorage,
    tasks: HashMap<String, Task>,
    ongoing: BTreeMap<String, String>,
    warnings: Vec<String>,
    /// Documents that failed to load and have not been written since.
    /// `close` leaves them alone so their contents can be recovered.
    tasks_unreadable: bool,
    ongoing_unreadable: bool,
}

/// Returns the loaded value and whether the file could not be read.
fn load_or_default<T: DeserializeOwned + Default>(
    path: &Path,
    warnings: &mut Vec<String>,
) -> (T, bool) {
    match LocalStorage::load_json::<T>(path) {
        Ok(Some(value)) => (value, false),
        Ok(None) => {
            info!("{} not found, starting empty", path.display());
            (T::default(), false)
        }
        Err(e) => {
            warn!("{}; starting empty", e);
            let mut msg = format!("Could not load {}: {}", path.display(), e);
            match backup_unreadable(path) {
                Ok(backup) => msg.push_str(&format!(" (copy kept at {})", backup.display())),
                Err(err) => error!("backing up {} failed: {}", path.display(), err),
            }
            warnings.push(msg);
            (T::default(), true)
        }
    }
}

/// Copies `path` to `<path>.bak` so a later write cannot lose it.
fn backup_unreadable(path: &Path) -> std::io::Result<PathBuf> {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    let backup = PathBuf::from(name);
    fs::copy(path, &backup)?;
    info!("copied {} to {}", path.display(), backup.display());
    Ok(backup)
}

impl TaskStore {
    /// Loads both documents. A missing file is a first run; a malformed one
    /// is reported through [`TaskStore::warnings`], copied to `<file>.bak`
    /// and treated as empty.
    pub fn load(storage: LocalStorage) -> Self {
        let mut warnings = Vec::new();

        let (task_list, tasks_unreadable): (Vec<Task>, bool) =
            load_or_default(&storage.tasks_path(), &mut warnings);
        let (ongoing, ongoing_unreadable): (BTreeMap<String, String>, bool) =
            load_or_default(&storage.ongoing_path(), &mut warnings);

        let tasks: HashMap<String, Task> = task_list
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();

        info!(
            "loaded {} task(s) and {} ongoing chapter(s) from {}",
            tasks.len(),
            ongoing.len(),
            storage.data_dir().display()
        );

        Self {
            storage,
            tasks,
            ongoing,
            warnings,
            tasks_unreadable,
            ongoing_unreadable,
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// All tasks, most recently touched first.
    pub fn tasks(&self) -> Vec<&Task> {
        sorted(&self.tasks)
    }

    pub fn ongoing_chapter(&self, subject: &str) -> Option<&str> {
        self.ongoing.get(subject).map(String::as_str)
    }

    pub fn ongoing_chapters(&self) -> &BTreeMap<String, String> {
        &self.ongoing
    }

    pub fn create_task(&mut self, draft: TaskDraft) -> Result<&Task> {
        let task = Task::from_draft(draft);
        let id = task.id.clone();

        let mut next = self.tasks.clone();
        next.insert(id.clone(), task);
        self.persist_tasks(&next)?;
        self.tasks = next;

        debug!("created task {}", id);
        Ok(&self.tasks[&id])
    }

    pub fn update_task(&mut self, id: &str, draft: TaskDraft) -> Result<&Task> {
        let mut next = self.tasks.clone();
        let task = next
            .get_mut(id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        task.apply_draft(draft);

        self.persist_tasks(&next)?;
        self.tasks = next;

        debug!("updated task {}", id);
        Ok(&self.tasks[id])
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let mut next = self.tasks.clone();
        let removed = next
            .remove(id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;

        self.persist_tasks(&next)?;
        self.tasks = next;

        debug!("deleted task {}", id);
        Ok(removed)
    }

    pub fn set_ongoing_chapter(&mut self, subject: &str, unit_label: &str) -> Result<()> {
        if self.ongoing_chapter(subject) == Some(unit_label) {
            return Ok(());
        }
        let mut next = self.ongoing.clone();
        next.insert(subject.to_string(), unit_label.to_string());

        self.persist_ongoing(&next)?;
        self.ongoing = next;

        debug!("ongoing chapter for '{}' set to '{}'", subject, unit_label);
        Ok(())
    }

    /// Returns whether a selection existed.
    pub fn clear_ongoing_chapter(&mut self, subject: &str) -> Result<bool> {
        if !self.ongoing.contains_key(subject) {
            return Ok(false);
        }
        let mut next = self.ongoing.clone();
        next.remove(subject);

        self.persist_ongoing(&next)?;
        self.ongoing = next;

        debug!("ongoing chapter for '{}' cleared", subject);
        Ok(true)
    }

    /// Flushes both documents. One that failed to load and was never
    /// changed afterwards is left as found on disk.
    pub fn close(mut self) -> Result<()> {
        if self.tasks_unreadable {
            warn!("leaving unreadable {} untouched", self.storage.tasks_path().display());
        } else {
            let tasks = std::mem::take(&mut self.tasks);
            self.persist_tasks(&tasks)?;
        }
        if self.ongoing_unreadable {
            warn!("leaving unreadable {} untouched", self.storage.ongoing_path().display());
        } else {
            let ongoing = std::mem::take(&mut self.ongoing);
            self.persist_ongoing(&ongoing)?;
        }
        info!("store closed");
        Ok(())
    }

    fn persist_tasks(&mut self, tasks: &HashMap<String, Task>) -> Result<()> {
        let path = self.storage.tasks_path();
        LocalStorage::save_json(&path, &sorted(tasks)).inspect_err(|e| {
            error!("saving tasks failed: {}", e);
        })?;
        self.tasks_unreadable = false;
        Ok(())
    }

    fn persist_ongoing(&mut self, ongoing: &BTreeMap<String, String>) -> Result<()> {
        let path = self.storage.ongoing_path();
        LocalStorage::save_json(&path, ongoing).inspect_err(|e| {
            error!("saving ongoing chapters failed: {}", e);
        })?;
        self.ongoing_unreadable = false;
        Ok(())
    }
}

fn sorted(tasks: &HashMap<String, Task>) -> Vec<&Task> {
    let mut list: Vec<&Task> = tasks.values().collect();
    list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
    list
}
