// File: ./src/notice.rs
// Notice board: deadline view derived from the task list on demand
use crate::config::NoticeConfig;
use crate::model::Task;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Overdue,
    DueSoon,
    Upcoming,
}

impl Urgency {
    /// `None` when the deadline is past the horizon.
    pub fn classify(days_left: i64, cfg: &NoticeConfig) -> Option<Self> {
        if days_left < 0 {
            Some(Urgency::Overdue)
        } else if days_left <= cfg.due_soon_days {
            Some(Urgency::DueSoon)
        } else if days_left <= cfg.horizon_days {
            Some(Urgency::Upcoming)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice<'a> {
    pub task: &'a Task,
    pub urgency: Urgency,
    pub days_left: i64,
}

impl Notice<'_> {
    pub fn label(&self) -> String {
        match self.days_left {
            d if d < 0 => format!("Past due by {} day(s)", -d),
            0 => "Due today!".to_string(),
            d => format!("Due in {} day(s)", d),
        }
    }
}

/// Open tasks that are overdue or due within the horizon, soonest first.
pub fn pending_notices<'a, I>(tasks: I, today: NaiveDate, cfg: &NoticeConfig) -> Vec<Notice<'a>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut notices: Vec<Notice<'a>> = tasks
        .into_iter()
        .filter(|t| t.status.is_open())
        .filter_map(|task| {
            let days_left = task.days_left(today);
            Urgency::classify(days_left, cfg).map(|urgency| Notice {
                task,
                urgency,
                days_left,
            })
        })
        .collect();

    notices.sort_by(|a, b| {
        a.task
            .submit_by
            .cmp(&b.task.submit_by)
            .then_with(|| a.task.id.cmp(&b.task.id))
    });
    notices
}

/// The most recently created or edited tasks, newest first.
pub fn recent_updates<'a, I>(tasks: I, limit: usize) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut list: Vec<&Task> = tasks.into_iter().collect();
    list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
    list.truncate(limit);
    list
}
