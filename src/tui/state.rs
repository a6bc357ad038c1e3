use crate::config::NoticeConfig;
use crate::error::StoreError;
use crate::model::{Subject, Task, TaskDraft, TaskKind, TaskStatus, parse_date_input};
use crate::store::TaskStore;
use chrono::{Duration, NaiveDate};
use ratatui::widgets::ListState;
use std::collections::BTreeMap;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Tab {
    Subjects,
    Tasks,
    Notices,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Subjects, Tab::Tasks, Tab::Notices];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Subjects => "Syllabus",
            Tab::Tasks => "Tasks",
            Tab::Notices => "Notice Board",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Focus {
    Subjects,
    Chapters,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum InputMode {
    Normal,
    Form,
    ConfirmDelete,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum FormField {
    Subject,
    Kind,
    Description,
    Assigned,
    SubmitBy,
    Status,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Subject,
        FormField::Kind,
        FormField::Description,
        FormField::Assigned,
        FormField::SubmitBy,
        FormField::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Subject => "Subject",
            FormField::Kind => "Type",
            FormField::Description => "Description",
            FormField::Assigned => "Assigned",
            FormField::SubmitBy => "Submit By",
            FormField::Status => "Status",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Description | FormField::Assigned | FormField::SubmitBy
        )
    }

    fn offset(&self, delta: isize) -> FormField {
        let len = Self::ALL.len() as isize;
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0) as isize;
        Self::ALL[(idx + delta).rem_euclid(len) as usize]
    }
}

/// Task create/edit form. Dates stay as typed text until submit.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub editing_id: Option<String>,
    pub subject_idx: usize,
    pub kind_idx: usize,
    pub description: String,
    pub assigned: String,
    pub submit_by: String,
    pub status: TaskStatus,
    pub field: FormField,
}

impl TaskForm {
    pub fn blank(subject_idx: usize, today: NaiveDate) -> Self {
        Self {
            editing_id: None,
            subject_idx,
            kind_idx: 0,
            description: String::new(),
            assigned: today.format("%Y-%m-%d").to_string(),
            submit_by: (today + Duration::days(7)).format("%Y-%m-%d").to_string(),
            status: TaskStatus::Pending,
            field: FormField::Description,
        }
    }

    /// Unknown subjects and kinds are appended to the option lists so an edit
    /// never silently rewrites them.
    pub fn from_task(task: &Task, subjects: &mut Vec<String>, kinds: &mut Vec<String>) -> Self {
        let subject_idx = index_or_push(subjects, &task.subject);
        let kind_idx = index_or_push(kinds, task.kind.as_str());
        Self {
            editing_id: Some(task.id.clone()),
            subject_idx,
            kind_idx,
            description: task.description.clone(),
            assigned: task.date_assigned.format("%Y-%m-%d").to_string(),
            submit_by: task.submit_by.format("%Y-%m-%d").to_string(),
            status: task.status,
            field: FormField::Description,
        }
    }

    pub fn next_field(&mut self) {
        self.field = self.field.offset(1);
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.offset(-1);
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Description => Some(&mut self.description),
            FormField::Assigned => Some(&mut self.assigned),
            FormField::SubmitBy => Some(&mut self.submit_by),
            _ => None,
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Steps a choice field through its options.
    pub fn cycle(&mut self, forward: bool, n_subjects: usize, n_kinds: usize) {
        let step = |idx: usize, len: usize| -> usize {
            if len == 0 {
                0
            } else if forward {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            }
        };
        match self.field {
            FormField::Subject => self.subject_idx = step(self.subject_idx, n_subjects),
            FormField::Kind => self.kind_idx = step(self.kind_idx, n_kinds),
            FormField::Status => {
                self.status = if forward {
                    self.status.cycle()
                } else {
                    // three steps forward is one step back
                    self.status.cycle().cycle().cycle()
                }
            }
            _ => {}
        }
    }

    pub fn to_draft(
        &self,
        subjects: &[String],
        kinds: &[String],
        today: NaiveDate,
    ) -> Result<TaskDraft, StoreError> {
        let subject = subjects.get(self.subject_idx).cloned().unwrap_or_default();
        let kind = kinds
            .get(self.kind_idx)
            .map(|k| TaskKind::from(k.as_str()))
            .unwrap_or_default();
        Ok(TaskDraft {
            subject,
            kind,
            description: self.description.trim().to_string(),
            date_assigned: parse_date_input(&self.assigned, today)?,
            submit_by: parse_date_input(&self.submit_by, today)?,
            status: self.status,
        })
    }
}

fn index_or_push(options: &mut Vec<String>, value: &str) -> usize {
    match options.iter().position(|o| o == value) {
        Some(i) => i,
        None => {
            options.push(value.to_string());
            options.len() - 1
        }
    }
}

pub struct AppState {
    pub tab: Tab,
    pub focus: Focus,
    pub mode: InputMode,
    pub subjects: Vec<Subject>,
    pub subject_state: ListState,
    pub chapter_state: ListState,
    pub detail_scroll: u16,
    pub tasks: Vec<Task>,
    pub task_state: ListState,
    pub ongoing: BTreeMap<String, String>,
    /// Subject titles offered by the form; may grow with dangling references.
    pub subject_options: Vec<String>,
    pub task_kinds: Vec<String>,
    pub notice_cfg: NoticeConfig,
    pub form: TaskForm,
    pub today: NaiveDate,
    pub message: String,
}

impl AppState {
    pub fn new(
        subjects: Vec<Subject>,
        task_kinds: Vec<String>,
        notice_cfg: NoticeConfig,
        today: NaiveDate,
    ) -> Self {
        let mut subject_state = ListState::default();
        subject_state.select(Some(0));
        let mut chapter_state = ListState::default();
        chapter_state.select(Some(0));
        let mut task_state = ListState::default();
        task_state.select(Some(0));
        let subject_options = subjects.iter().map(|s| s.title.clone()).collect();
        Self {
            tab: Tab::Subjects,
            focus: Focus::Subjects,
            mode: InputMode::Normal,
            subjects,
            subject_state,
            chapter_state,
            detail_scroll: 0,
            tasks: vec![],
            task_state,
            ongoing: BTreeMap::new(),
            subject_options,
            task_kinds,
            notice_cfg,
            form: TaskForm::blank(0, today),
            today,
            message: "Tab: Switch view | q: Quit".to_string(),
        }
    }

    /// Re-reads the store snapshot after a command ran.
    pub fn refresh(&mut self, store: &TaskStore) {
        self.tasks = store.tasks().into_iter().cloned().collect();
        self.ongoing = store.ongoing_chapters().clone();
        let len = self.tasks.len();
        match self.task_state.selected() {
            Some(i) if len > 0 && i >= len => self.task_state.select(Some(len - 1)),
            None => self.task_state.select(Some(0)),
            _ => {}
        }
    }

    pub fn selected_subject(&self) -> Option<&Subject> {
        self.subject_state
            .selected()
            .and_then(|i| self.subjects.get(i))
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.task_state.selected().and_then(|i| self.tasks.get(i))
    }

    /// Chapter heading under the cursor in the chapters pane.
    pub fn selected_chapter(&self) -> Option<String> {
        let subject = self.selected_subject()?;
        let idx = self.chapter_state.selected()?;
        subject.units.get(idx).map(|u| u.heading())
    }

    pub fn open_new_form(&mut self) {
        let subject_idx = self.subject_state.selected().unwrap_or(0);
        self.form = TaskForm::blank(subject_idx, self.today);
        self.mode = InputMode::Form;
    }

    pub fn open_edit_form(&mut self) -> bool {
        let Some(task) = self.selected_task().cloned() else {
            return false;
        };
        self.form = TaskForm::from_task(&task, &mut self.subject_options, &mut self.task_kinds);
        self.mode = InputMode::Form;
        true
    }

    pub fn form_draft(&self) -> Result<TaskDraft, StoreError> {
        self.form
            .to_draft(&self.subject_options, &self.task_kinds, self.today)
    }

    fn list_len(&self) -> usize {
        match (self.tab, self.focus) {
            (Tab::Subjects, Focus::Subjects) => self.subjects.len(),
            (Tab::Subjects, Focus::Chapters) => {
                self.selected_subject().map(|s| s.units.len()).unwrap_or(0)
            }
            (Tab::Tasks, _) => self.tasks.len(),
            (Tab::Notices, _) => 0,
        }
    }

    fn active_list(&mut self) -> &mut ListState {
        match (self.tab, self.focus) {
            (Tab::Subjects, Focus::Chapters) => &mut self.chapter_state,
            (Tab::Subjects, Focus::Subjects) => &mut self.subject_state,
            _ => &mut self.task_state,
        }
    }

    fn on_subject_changed(&mut self) {
        self.detail_scroll = 0;
        self.chapter_state.select(Some(0));
    }

    pub fn next(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let list = self.active_list();
        let i = match list.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        list.select(Some(i));
        if self.tab == Tab::Subjects && self.focus == Focus::Subjects {
            self.on_subject_changed();
        }
    }

    pub fn previous(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let list = self.active_list();
        let i = match list.selected() {
            Some(0) | None => len - 1,
            Some(i) => (i - 1).min(len - 1),
        };
        list.select(Some(i));
        if self.tab == Tab::Subjects && self.focus == Focus::Subjects {
            self.on_subject_changed();
        }
    }

    pub fn jump_forward(&mut self, step: usize) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let list = self.active_list();
        let current = list.selected().unwrap_or(0);
        list.select(Some((current + step).min(len - 1)));
        if self.tab == Tab::Subjects && self.focus == Focus::Subjects {
            self.on_subject_changed();
        }
    }

    pub fn jump_backward(&mut self, step: usize) {
        if self.list_len() == 0 {
            return;
        }
        let list = self.active_list();
        let current = list.selected().unwrap_or(0);
        list.select(Some(current.saturating_sub(step)));
        if self.tab == Tab::Subjects && self.focus == Focus::Subjects {
            self.on_subject_changed();
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Subjects => Focus::Chapters,
            Focus::Chapters => Focus::Subjects,
        }
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }
}
