use crate::config::CoreConfig;
use crate::error::AppError;
use crate::model::{Area, parse_stored_date};
use crate::notify::Notifier;
use crate::storage::json_store;
use std::path::Path;
use time::{Date, Duration, OffsetDateTime, UtcOffset};
use tracing::info;

/// How far ahead of a start or due date the reminder fires.
pub const LOOKAHEAD_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reminder {
    EventStart {
        event_name: String,
        start_date: String,
    },
    TaskDue {
        event_name: String,
        task_title: String,
        area: Area,
        assignee_ids: Vec<u64>,
        due_date: String,
    },
}

impl Reminder {
    pub fn message(&self) -> String {
        match self {
            Self::EventStart {
                event_name,
                start_date,
            } => {
                format!("Reminder (2 weeks): '{event_name}' starts on {start_date}.")
            }
            Self::TaskDue {
                event_name,
                task_title,
                area,
                assignee_ids,
                due_date,
            } => {
                let assignees = if assignee_ids.is_empty() {
                    "(unassigned)".to_string()
                } else {
                    assignee_ids
                        .iter()
                        .map(|id| format!("@{id}"))
                        .collect::<Vec<_>>()
                        .join(" ")
                };
                format!(
                    "Task due in 2 weeks\nEvent: '{event_name}'\nArea: {area}\nTask: {task_title}\nAssignees: {assignees}\nDue: {due_date}"
                )
            }
        }
    }
}

/// Key recorded per task reminder. Derived from title and due date, not from
/// the task id: two tasks with the same title and due date in one event share
/// a single reminder (known limitation, kept for store compatibility).
pub fn task_reminder_key(title: &str, due_date: &str) -> String {
    format!("task::{title}::{due_date}")
}

#[derive(Debug, Default)]
pub struct TickOutcome {
    pub delivered: Vec<Reminder>,
}

/// Resolves "today" in the configured fixed offset, falling back to the
/// process-local offset and then UTC.
pub fn today_in(config: &CoreConfig) -> Date {
    let offset = config
        .utc_offset
        .unwrap_or_else(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC));
    OffsetDateTime::now_utc().to_offset(offset).date()
}

/// One scheduler pass: delivers a reminder for every event starting exactly
/// fourteen days from `today` and every unfinished task due then, unless its
/// key was already recorded. Keys are recorded only after delivery, and the
/// store is written once per tick, only when something fired.
pub fn run_tick(
    path: &Path,
    today: Date,
    notifier: &dyn Notifier,
) -> Result<TickOutcome, AppError> {
    let target = today + Duration::days(LOOKAHEAD_DAYS);
    let target_key = crate::model::format_date(target)?;

    let mut events = json_store::load_events(path)?;
    let mut delivered = Vec::new();

    for event in &mut events {
        if parse_stored_date(&event.start_date)? == target
            && !event.reminded_for_dates.contains(&target_key)
        {
            let reminder = Reminder::EventStart {
                event_name: event.name.clone(),
                start_date: event.start_date.clone(),
            };
            notifier.send(&reminder)?;
            info!(event = %event.name, date = %target_key, "event reminder delivered");
            event.reminded_for_dates.insert(target_key.clone());
            delivered.push(reminder);
        }

        for idx in 0..event.tasks.len() {
            let task = &event.tasks[idx];
            if task.done || parse_stored_date(&task.due_date)? != target {
                continue;
            }

            let key = task_reminder_key(&task.title, &task.due_date);
            if event.reminded_for_dates.contains(&key) {
                continue;
            }

            let reminder = Reminder::TaskDue {
                event_name: event.name.clone(),
                task_title: task.title.clone(),
                area: task.area,
                assignee_ids: task.assignee_ids.clone(),
                due_date: task.due_date.clone(),
            };
            notifier.send(&reminder)?;
            info!(event = %event.name, task = %task.title, "task reminder delivered");
            event.reminded_for_dates.insert(key);
            delivered.push(reminder);
        }
    }

    if !delivered.is_empty() {
        json_store::save_events(path, &events)?;
    }

    Ok(TickOutcome { delivered })
}
