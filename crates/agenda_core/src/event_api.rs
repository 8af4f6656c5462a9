use crate::config::CoreConfig;
use crate::error::AppError;
use crate::lifecycle;
use crate::model::{Area, Event, Task, dedup_assignees, format_date, parse_date};
use crate::model::{event::fresh_event_id, task::fresh_task_id};
use crate::policy::{Actor, can_mutate_task, is_manager};
use crate::storage::json_store;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub acting: String,
    pub partners: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub area: String,
    pub due_date: String,
    pub assignee_ids: Vec<u64>,
    pub tools: Vec<String>,
    pub details: String,
}

/// A not-done task together with its positional coordinates, for area
/// listings.
#[derive(Debug, Clone)]
pub struct PendingTask {
    pub event_index: usize,
    pub event_name: String,
    pub task_index: usize,
    pub task: Task,
}

#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub task: Task,
    pub approved: bool,
}

pub fn list_events() -> Result<Vec<Event>, AppError> {
    let path = json_store::store_path()?;
    list_events_with_path(&path)
}

pub fn pending_tasks_by_area(area: &str) -> Result<Vec<PendingTask>, AppError> {
    let path = json_store::store_path()?;
    pending_tasks_by_area_with_path(&path, area)
}

pub fn add_event(actor: &Actor, new_event: &NewEvent, config: &CoreConfig) -> Result<Event, AppError> {
    let path = json_store::store_path()?;
    add_event_with_path(&path, actor, new_event, config)
}

pub fn add_task(
    actor: &Actor,
    event_index: usize,
    new_task: &NewTask,
    config: &CoreConfig,
) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    add_task_with_path(&path, actor, event_index, new_task, config)
}

pub fn set_progress(
    actor: &Actor,
    event_index: usize,
    task_index: usize,
    percent: u8,
    config: &CoreConfig,
) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    set_progress_with_path(&path, actor, event_index, task_index, percent, config)
}

pub fn complete_task(
    actor: &Actor,
    event_index: usize,
    task_index: usize,
    delivery_link: &str,
    reviewer: &Actor,
    config: &CoreConfig,
) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    complete_task_with_path(&path, actor, event_index, task_index, delivery_link, reviewer, config)
}

pub fn review_task(
    actor: &Actor,
    event_index: usize,
    task_index: usize,
    approve: bool,
    config: &CoreConfig,
) -> Result<ReviewOutcome, AppError> {
    let path = json_store::store_path()?;
    review_task_with_path(&path, actor, event_index, task_index, approve, config)
}

pub fn event_detail(event_index: usize) -> Result<Event, AppError> {
    let path = json_store::store_path()?;
    event_detail_with_path(&path, event_index)
}

fn list_events_with_path(path: &Path) -> Result<Vec<Event>, AppError> {
    json_store::load_events(path)
}

fn pending_tasks_by_area_with_path(path: &Path, area: &str) -> Result<Vec<PendingTask>, AppError> {
    let target = Area::parse(area)?;
    let events = json_store::load_events(path)?;

    let mut pending = Vec::new();
    for (event_pos, event) in events.iter().enumerate() {
        for (task_pos, task) in event.tasks.iter().enumerate() {
            if task.area == target && !task.done {
                pending.push(PendingTask {
                    event_index: event_pos + 1,
                    event_name: event.name.clone(),
                    task_index: task_pos + 1,
                    task: task.clone(),
                });
            }
        }
    }

    Ok(pending)
}

fn add_event_with_path(
    path: &Path,
    actor: &Actor,
    new_event: &NewEvent,
    config: &CoreConfig,
) -> Result<Event, AppError> {
    if !is_manager(actor, config) {
        return Err(AppError::authorization("only managers may add events"));
    }

    let name = new_event.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("event name is required"));
    }

    // Start/end ordering is deliberately not validated.
    let start_date = format_date(parse_date(&new_event.start_date)?)?;
    let end_date = format_date(parse_date(&new_event.end_date)?)?;

    let event = Event {
        id: fresh_event_id(),
        name: name.to_string(),
        start_date,
        end_date,
        acting: new_event.acting.trim().to_string(),
        partners: new_event.partners.trim().to_string(),
        notes: new_event.notes.trim().to_string(),
        tasks: Vec::new(),
        reminded_for_dates: Default::default(),
    };

    let mut events = json_store::load_events(path)?;
    events.push(event.clone());
    json_store::save_events(path, &events)?;

    Ok(event)
}

fn add_task_with_path(
    path: &Path,
    actor: &Actor,
    event_index: usize,
    new_task: &NewTask,
    config: &CoreConfig,
) -> Result<Task, AppError> {
    if !is_manager(actor, config) {
        return Err(AppError::authorization("only managers may add tasks"));
    }

    let title = new_task.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("task title is required"));
    }

    let area = Area::parse(&new_task.area)?;
    let due_date = format_date(parse_date(&new_task.due_date)?)?;

    if new_task.assignee_ids.iter().any(|id| *id == 0) {
        return Err(AppError::validation("assignee ids must be positive"));
    }
    let assignee_ids = dedup_assignees(&new_task.assignee_ids);
    if assignee_ids.is_empty() {
        return Err(AppError::validation("at least one assignee is required"));
    }

    let tools: Vec<String> = new_task
        .tools
        .iter()
        .map(|tool| tool.trim().to_string())
        .filter(|tool| !tool.is_empty())
        .collect();

    let mut events = json_store::load_events(path)?;
    let event_id = event_id_at(&events, event_index)?;
    let event = event_by_id(&mut events, &event_id)?;

    let task = Task {
        id: fresh_task_id(),
        title: title.to_string(),
        area,
        due_date,
        details: new_task.details.trim().to_string(),
        tools,
        assignee_ids,
        progress: 0,
        done: false,
        delivery_link: String::new(),
        reviewer_id: None,
        reviewed: false,
    };
    event.tasks.push(task.clone());
    json_store::save_events(path, &events)?;

    Ok(task)
}

fn set_progress_with_path(
    path: &Path,
    actor: &Actor,
    event_index: usize,
    task_index: usize,
    percent: u8,
    config: &CoreConfig,
) -> Result<Task, AppError> {
    if percent > 100 {
        return Err(AppError::validation("percent must be between 0 and 100"));
    }

    let mut events = json_store::load_events(path)?;
    let event_id = event_id_at(&events, event_index)?;
    let event = event_by_id(&mut events, &event_id)?;
    let task_id = task_id_at(event, task_index)?;
    let task = task_by_id(event, &task_id)?;

    if !can_mutate_task(actor, task, config) {
        return Err(AppError::authorization(
            "only task assignees or managers may update progress",
        ));
    }

    lifecycle::set_progress(task, percent);
    let updated = task.clone();
    json_store::save_events(path, &events)?;

    Ok(updated)
}

fn complete_task_with_path(
    path: &Path,
    actor: &Actor,
    event_index: usize,
    task_index: usize,
    delivery_link: &str,
    reviewer: &Actor,
    config: &CoreConfig,
) -> Result<Task, AppError> {
    let mut events = json_store::load_events(path)?;
    let event_id = event_id_at(&events, event_index)?;
    let event = event_by_id(&mut events, &event_id)?;
    let task_id = task_id_at(event, task_index)?;
    let task = task_by_id(event, &task_id)?;

    if !can_mutate_task(actor, task, config) {
        return Err(AppError::authorization(
            "only task assignees or managers may complete tasks",
        ));
    }

    lifecycle::complete(task, delivery_link, reviewer, config)?;
    let updated = task.clone();
    json_store::save_events(path, &events)?;

    Ok(updated)
}

fn review_task_with_path(
    path: &Path,
    actor: &Actor,
    event_index: usize,
    task_index: usize,
    approve: bool,
    config: &CoreConfig,
) -> Result<ReviewOutcome, AppError> {
    if !is_manager(actor, config) {
        return Err(AppError::authorization("only managers may review tasks"));
    }

    let mut events = json_store::load_events(path)?;
    let event_id = event_id_at(&events, event_index)?;
    let event = event_by_id(&mut events, &event_id)?;
    let task_id = task_id_at(event, task_index)?;
    let task = task_by_id(event, &task_id)?;

    lifecycle::review(task, actor, approve, config)?;
    let updated = task.clone();
    json_store::save_events(path, &events)?;

    Ok(ReviewOutcome {
        task: updated,
        approved: approve,
    })
}

fn event_detail_with_path(path: &Path, event_index: usize) -> Result<Event, AppError> {
    let mut events = json_store::load_events(path)?;
    let event_id = event_id_at(&events, event_index)?;
    let event = event_by_id(&mut events, &event_id)?;
    Ok(event.clone())
}

// Positional indices are the external contract; internally every lookup goes
// through the stable id so a future delete/reorder cannot corrupt a reference
// mid-operation.

fn event_id_at(events: &[Event], event_index: usize) -> Result<String, AppError> {
    if event_index < 1 || event_index > events.len() {
        return Err(AppError::not_found(format!(
            "event index {event_index} is out of range"
        )));
    }
    Ok(events[event_index - 1].id.clone())
}

fn event_by_id<'a>(events: &'a mut [Event], id: &str) -> Result<&'a mut Event, AppError> {
    events
        .iter_mut()
        .find(|event| event.id == id)
        .ok_or_else(|| AppError::not_found(format!("event '{id}' not found")))
}

fn task_id_at(event: &Event, task_index: usize) -> Result<String, AppError> {
    if task_index < 1 || task_index > event.tasks.len() {
        return Err(AppError::not_found(format!(
            "task index {task_index} is out of range"
        )));
    }
    Ok(event.tasks[task_index - 1].id.clone())
}

fn task_by_id<'a>(event: &'a mut Event, id: &str) -> Result<&'a mut Task, AppError> {
    event
        .tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or_else(|| AppError::not_found(format!("task '{id}' not found")))
}
