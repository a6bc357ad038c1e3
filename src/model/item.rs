// File: ./src/model/item.rs
// Study task records and their form-side helpers
use crate::error::StoreError;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_TASK_KINDS: [&str; 5] = [
    "Assignment",
    "Lab Report",
    "Project",
    "Presentation",
    "Study Task",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }

    /// Pending and in-progress tasks still need attention.
    pub fn is_open(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }

    /// Next status in form order, wrapping around.
    pub fn cycle(&self) -> Self {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work a task represents. Unknown names are kept verbatim so kinds
/// added through configuration survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    #[default]
    Assignment,
    LabReport,
    Project,
    Presentation,
    StudyTask,
    Other(String),
}

impl TaskKind {
    pub fn as_str(&self) -> &str {
        match self {
            TaskKind::Assignment => "Assignment",
            TaskKind::LabReport => "Lab Report",
            TaskKind::Project => "Project",
            TaskKind::Presentation => "Presentation",
            TaskKind::StudyTask => "Study Task",
            TaskKind::Other(name) => name,
        }
    }
}

impl From<String> for TaskKind {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "assignment" => TaskKind::Assignment,
            "lab report" => TaskKind::LabReport,
            "project" => TaskKind::Project,
            "presentation" => TaskKind::Presentation,
            "study task" => TaskKind::StudyTask,
            _ => TaskKind::Other(s.trim().to_string()),
        }
    }
}

impl From<&str> for TaskKind {
    fn from(s: &str) -> Self {
        TaskKind::from(s.to_string())
    }
}

impl From<TaskKind> for String {
    fn from(kind: TaskKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields a task form submits. Everything except identity and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub subject: String,
    pub kind: TaskKind,
    pub description: String,
    pub date_assigned: NaiveDate,
    pub submit_by: NaiveDate,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Blank form: assigned today, due a week later.
    pub fn new(subject: &str, today: NaiveDate) -> Self {
        Self {
            subject: subject.to_string(),
            kind: TaskKind::default(),
            description: String::new(),
            date_assigned: today,
            submit_by: today + Duration::days(7),
            status: TaskStatus::Pending,
        }
    }

    /// Form-level input check. The store accepts whatever it is given, so
    /// callers that take user input run this first.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.description.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "Task description cannot be empty.".to_string(),
            ));
        }
        if self.subject.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "Please select a subject for the task.".to_string(),
            ));
        }
        if self.date_assigned > self.submit_by {
            return Err(StoreError::InvalidInput(
                "Submission date cannot be before assigned date.".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub subject: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub description: String,
    pub date_assigned: NaiveDate,
    pub submit_by: NaiveDate,
    pub status: TaskStatus,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Task {
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subject: draft.subject,
            kind: draft.kind,
            description: draft.description,
            date_assigned: draft.date_assigned,
            submit_by: draft.submit_by,
            status: draft.status,
            timestamp: Utc::now(),
        }
    }

    /// Replaces every user-editable field, keeping the id.
    pub fn apply_draft(&mut self, draft: TaskDraft) {
        self.subject = draft.subject;
        self.kind = draft.kind;
        self.description = draft.description;
        self.date_assigned = draft.date_assigned;
        self.submit_by = draft.submit_by;
        self.status = draft.status;
        self.timestamp = Utc::now();
    }

    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            subject: self.subject.clone(),
            kind: self.kind.clone(),
            description: self.description.clone(),
            date_assigned: self.date_assigned,
            submit_by: self.submit_by,
            status: self.status,
        }
    }

    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.submit_by - today).num_days()
    }
}

/// Parses a date typed into the task form.
///
/// Accepts `YYYY-MM-DD`, `today`, `tomorrow`, `+N` (days from today) and
/// `next week|month|year`. Anything else is rejected at the form.
pub fn parse_date_input(input: &str, today: NaiveDate) -> Result<NaiveDate, StoreError> {
    let val = input.trim().to_lowercase();
    if let Ok(date) = NaiveDate::parse_from_str(&val, "%Y-%m-%d") {
        return Ok(date);
    }
    match val.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return offset_days(today, 1),
        _ => {}
    }
    if let Some(n) = val.strip_prefix('+')
        && let Ok(days) = n.parse::<i64>()
    {
        return offset_days(today, days);
    }
    if let Some(unit) = val.strip_prefix("next ") {
        let offset = if unit.starts_with("week") {
            7
        } else if unit.starts_with("month") {
            30
        } else if unit.starts_with("year") {
            365
        } else {
            0
        };
        if offset > 0 {
            return offset_days(today, offset);
        }
    }
    Err(StoreError::InvalidInput(format!(
        "Unrecognised date '{}'. Use YYYY-MM-DD, today, tomorrow or +N.",
        input.trim()
    )))
}

fn offset_days(today: NaiveDate, days: i64) -> Result<NaiveDate, StoreError> {
    Duration::try_days(days)
        .and_then(|delta| today.checked_add_signed(delta))
        .ok_or_else(|| StoreError::InvalidInput(format!("Date is out of range: {:+} days.", days)))
}

impl FromStr for TaskStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().to_lowercase() == wanted)
            .ok_or_else(|| StoreError::InvalidInput(format!("Unknown status '{}'", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_json_shape() {
        let mut task = Task::from_draft(TaskDraft {
            subject: "Computer Networks".to_string(),
            kind: TaskKind::LabReport,
            description: "Subnetting lab".to_string(),
            date_assigned: day(2026, 3, 1),
            submit_by: day(2026, 3, 8),
            status: TaskStatus::InProgress,
        });
        task.id = "abc".to_string();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["type"], "Lab Report");
        assert_eq!(value["status"], "In Progress");
        assert_eq!(value["date_assigned"], "2026-03-01");
        assert_eq!(value["submit_by"], "2026-03-08");
    }

    #[test]
    fn test_missing_timestamp_is_tolerated() {
        let json = r#"{"id":"1","subject":"AI","type":"Viva","description":"d",
            "date_assigned":"2026-01-01","submit_by":"2026-01-02","status":"Pending"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.kind, TaskKind::Other("Viva".to_string()));
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn test_kind_from_string() {
        assert_eq!(TaskKind::from("lab report"), TaskKind::LabReport);
        assert_eq!(TaskKind::from("Study Task"), TaskKind::StudyTask);
        assert_eq!(TaskKind::from("Quiz").as_str(), "Quiz");
    }

    #[test]
    fn test_status_cycle_wraps() {
        assert_eq!(TaskStatus::Pending.cycle(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::Cancelled.cycle(), TaskStatus::Pending);
        assert_eq!("in progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_forms() {
        let today = day(2026, 5, 10);
        let mut draft = TaskDraft::new("AI", today);
        assert!(draft.validate().is_err());

        draft.description = "Read chapter 2".to_string();
        assert!(draft.validate().is_ok());

        draft.submit_by = day(2026, 5, 9);
        assert!(matches!(
            draft.validate(),
            Err(StoreError::InvalidInput(_))
        ));

        draft.submit_by = today;
        draft.subject = "  ".to_string();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_apply_draft_keeps_id() {
        let today = day(2026, 5, 10);
        let mut draft = TaskDraft::new("AI", today);
        draft.description = "one".to_string();
        let mut task = Task::from_draft(draft.clone());
        let id = task.id.clone();

        draft.description = "two".to_string();
        draft.status = TaskStatus::Completed;
        task.apply_draft(draft);

        assert_eq!(task.id, id);
        assert_eq!(task.description, "two");
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_parse_date_input() {
        let today = day(2026, 5, 10);
        assert_eq!(parse_date_input("2026-06-01", today).unwrap(), day(2026, 6, 1));
        assert_eq!(parse_date_input("Today", today).unwrap(), today);
        assert_eq!(parse_date_input("tomorrow", today).unwrap(), day(2026, 5, 11));
        assert_eq!(parse_date_input("+3", today).unwrap(), day(2026, 5, 13));
        assert_eq!(parse_date_input("next week", today).unwrap(), day(2026, 5, 17));
        assert!(parse_date_input("someday", today).is_err());
        assert!(parse_date_input("2026-13-40", today).is_err());
    }

    #[test]
    fn test_huge_offsets_are_rejected() {
        let today = day(2026, 10, 17);
        for input in ["+999999999", "+9223372036854775807", "-5"] {
            assert!(
                matches!(parse_date_input(input, today), Err(StoreError::InvalidInput(_))),
                "{} should be rejected",
                input
            );
        }
        assert_eq!(parse_date_input("+0", today).unwrap(), today);
    }
}
