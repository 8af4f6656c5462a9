use crate::config::CoreConfig;
use crate::error::AppError;
use crate::model::Task;
use crate::policy::{Actor, is_manager};

/// Progress a rejected task is reopened at.
pub const REJECTED_PROGRESS: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Open,
    Submitted,
    Approved,
}

impl TaskState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
        }
    }
}

pub fn task_state(task: &Task) -> TaskState {
    if !task.done {
        TaskState::Open
    } else if task.reviewed {
        TaskState::Approved
    } else {
        TaskState::Submitted
    }
}

/// Sets the progress percentage, clamped to [0, 100]. Any value below 100 is
/// a hard reset: done, reviewed, delivery link and reviewer assignment are
/// all cleared, even if the task was already submitted or approved.
pub fn set_progress(task: &mut Task, percent: u8) {
    task.progress = percent.min(100);
    if task.progress < 100 {
        task.done = false;
        task.reviewed = false;
        task.delivery_link.clear();
        task.reviewer_id = None;
    }
}

/// Marks the task finished and submits it for review. The reviewer candidate
/// must hold a manager role; from then on only that reviewer may rule on it.
pub fn complete(
    task: &mut Task,
    delivery_link: &str,
    reviewer: &Actor,
    config: &CoreConfig,
) -> Result<(), AppError> {
    if !is_manager(reviewer, config) {
        return Err(AppError::authorization(
            "the reviewer must hold a manager role",
        ));
    }

    task.progress = 100;
    task.done = true;
    task.delivery_link = delivery_link.trim().to_string();
    task.reviewer_id = Some(reviewer.id);
    task.reviewed = false;
    Ok(())
}

/// Approves or rejects a submitted task. A rejection reopens the task at 90%
/// but keeps the reviewer assignment and delivery link, unlike the reset in
/// [`set_progress`].
pub fn review(
    task: &mut Task,
    actor: &Actor,
    approve: bool,
    config: &CoreConfig,
) -> Result<TaskState, AppError> {
    if !is_manager(actor, config) {
        return Err(AppError::authorization("only managers may review tasks"));
    }

    if !task.done {
        return Err(AppError::validation(
            "task has not been submitted for review",
        ));
    }

    if let Some(reviewer_id) = task.reviewer_id
        && reviewer_id != actor.id
    {
        return Err(AppError::authorization(
            "task already has an assigned reviewer; only that manager may review it",
        ));
    }

    if approve {
        task.reviewed = true;
    } else {
        task.done = false;
        task.progress = REJECTED_PROGRESS;
        task.reviewed = false;
    }

    Ok(task_state(task))
}
