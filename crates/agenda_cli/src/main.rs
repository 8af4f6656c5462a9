use agenda_cli::cli::{Cli, Command, Verdict, parse_role_list};
use agenda_core::config::{Settings, load_core_config_with_fallback};
use agenda_core::error::AppError;
use agenda_core::event_api::{self, NewEvent, NewTask};
use agenda_core::lifecycle::task_state;
use agenda_core::model::{Event, Task, parse_date};
use agenda_core::notify::notifier_from_env;
use agenda_core::policy::Actor;
use agenda_core::reminder;
use agenda_core::storage::json_store;
use clap::Parser;
use tabled::{Table, Tabled};
use tracing::{Level, error, info};

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "#")]
    index: usize,
    name: String,
    start: String,
    end: String,
    tasks: usize,
}

#[derive(Tabled)]
struct PendingRow {
    event: usize,
    task: usize,
    title: String,
    due: String,
    progress: String,
    assignees: String,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    index: usize,
    status: &'static str,
    title: String,
    area: String,
    due: String,
    progress: String,
    assignees: String,
    delivery: String,
    reviewer: String,
}

fn format_assignees(ids: &[u64]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.iter()
            .map(|id| format!("@{id}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn task_row(index: usize, task: &Task) -> TaskRow {
    TaskRow {
        index,
        status: task_state(task).label(),
        title: task.title.clone(),
        area: task.area.to_string(),
        due: task.due_date.clone(),
        progress: format!("{}%", task.progress),
        assignees: format_assignees(&task.assignee_ids),
        delivery: if task.delivery_link.is_empty() {
            "-".to_string()
        } else {
            task.delivery_link.clone()
        },
        reviewer: task
            .reviewer_id
            .map(|id| format!("@{id}"))
            .unwrap_or_else(|| "-".to_string()),
    }
}

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "title": task.title,
        "area": task.area.as_str(),
        "due_date": task.due_date,
        "progress": task.progress,
        "status": task_state(task).label(),
        "assignee_ids": task.assignee_ids,
        "delivery_link": task.delivery_link,
        "reviewer_id": task.reviewer_id,
    })
}

fn print_event_detail(event: &Event) {
    println!("{}", event.name);
    println!("Period: {} - {}", event.start_date, event.end_date);
    println!("Acting: {}", if event.acting.is_empty() { "-" } else { event.acting.as_str() });
    println!("Partners: {}", if event.partners.is_empty() { "-" } else { event.partners.as_str() });
    println!("Notes: {}", if event.notes.is_empty() { "-" } else { event.notes.as_str() });
    if event.tasks.is_empty() {
        println!("No tasks.");
    } else {
        let rows: Vec<TaskRow> = event
            .tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| task_row(idx + 1, task))
            .collect();
        println!("{}", Table::new(rows));
    }
}

fn resolve_actor(actor: Option<u64>, roles: Option<String>) -> Result<Actor, AppError> {
    let id = match actor {
        Some(id) => id,
        None => {
            let raw = std::env::var("AGENDA_ACTOR_ID").unwrap_or_default();
            if raw.trim().is_empty() {
                return Err(AppError::validation(
                    "actor id is required (use --actor or AGENDA_ACTOR_ID)",
                ));
            }
            raw.trim().parse::<u64>().map_err(|_| {
                AppError::validation("AGENDA_ACTOR_ID must be a positive integer")
            })?
        }
    };
    if id == 0 {
        return Err(AppError::validation("actor id must be positive"));
    }

    let roles_raw = match roles {
        Some(raw) => raw,
        None => std::env::var("AGENDA_ACTOR_ROLES").unwrap_or_default(),
    };

    Ok(Actor::new(id, parse_role_list(&roles_raw)))
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::validation(message)
}

fn load_config_or_warn() -> agenda_core::config::CoreConfig {
    let load = load_core_config_with_fallback();
    if let Some(err) = load.error {
        eprintln!("WARNING: {err}");
    }
    load.config
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Events => {
            let events = event_api::list_events()?;
            if cli.json {
                let payload: Vec<serde_json::Value> = events
                    .iter()
                    .enumerate()
                    .map(|(idx, event)| {
                        serde_json::json!({
                            "index": idx + 1,
                            "name": event.name,
                            "start_date": event.start_date,
                            "end_date": event.end_date,
                            "tasks": event.tasks.len(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::Value::Array(payload));
            } else if events.is_empty() {
                println!("No events registered.");
            } else {
                let rows: Vec<EventRow> = events
                    .iter()
                    .enumerate()
                    .map(|(idx, event)| EventRow {
                        index: idx + 1,
                        name: event.name.clone(),
                        start: event.start_date.clone(),
                        end: event.end_date.clone(),
                        tasks: event.tasks.len(),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }
        Command::Tasks { area } => {
            let pending = event_api::pending_tasks_by_area(&area)?;
            if cli.json {
                let payload: Vec<serde_json::Value> = pending
                    .iter()
                    .map(|entry| {
                        let mut task = task_json(&entry.task);
                        task["event_index"] = serde_json::json!(entry.event_index);
                        task["task_index"] = serde_json::json!(entry.task_index);
                        task["event"] = serde_json::json!(entry.event_name);
                        task
                    })
                    .collect();
                println!("{}", serde_json::Value::Array(payload));
            } else if pending.is_empty() {
                println!("No pending tasks for area '{}'.", area.trim().to_lowercase());
            } else {
                let rows: Vec<PendingRow> = pending
                    .iter()
                    .map(|entry| PendingRow {
                        event: entry.event_index,
                        task: entry.task_index,
                        title: entry.task.title.clone(),
                        due: entry.task.due_date.clone(),
                        progress: format!("{}%", entry.task.progress),
                        assignees: format_assignees(&entry.task.assignee_ids),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }
        Command::AddEvent {
            name,
            start,
            end,
            acting,
            partners,
            notes,
        } => {
            let actor = resolve_actor(cli.actor, cli.roles.clone())?;
            let config = load_config_or_warn();
            let event = event_api::add_event(
                &actor,
                &NewEvent {
                    name,
                    start_date: start,
                    end_date: end,
                    acting,
                    partners,
                    notes,
                },
                &config,
            )?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({"id": event.id, "name": event.name})
                );
            } else {
                println!("Added event: {} ({} - {})", event.name, event.start_date, event.end_date);
            }
        }
        Command::AddTask {
            event,
            title,
            area,
            due,
            assignees,
            tools,
            details,
        } => {
            let actor = resolve_actor(cli.actor, cli.roles.clone())?;
            let config = load_config_or_warn();
            let task = event_api::add_task(
                &actor,
                event,
                &NewTask {
                    title,
                    area,
                    due_date: due,
                    assignee_ids: assignees,
                    tools: tools.split(',').map(str::to_string).collect(),
                    details,
                },
                &config,
            )?;
            if cli.json {
                println!("{}", task_json(&task));
            } else {
                println!(
                    "Added task: {} (due {}, assignees {})",
                    task.title,
                    task.due_date,
                    format_assignees(&task.assignee_ids)
                );
            }
        }
        Command::Progress {
            event,
            task,
            percent,
        } => {
            let actor = resolve_actor(cli.actor, cli.roles.clone())?;
            let config = load_config_or_warn();
            let updated = event_api::set_progress(&actor, event, task, percent, &config)?;
            if cli.json {
                println!("{}", task_json(&updated));
            } else {
                println!("Progress of '{}' set to {}%.", updated.title, updated.progress);
            }
        }
        Command::Done {
            event,
            task,
            link,
            reviewer,
            reviewer_roles,
        } => {
            let actor = resolve_actor(cli.actor, cli.roles.clone())?;
            let config = load_config_or_warn();
            let reviewer = Actor::new(reviewer, parse_role_list(&reviewer_roles));
            let updated = event_api::complete_task(&actor, event, task, &link, &reviewer, &config)?;
            if cli.json {
                println!("{}", task_json(&updated));
            } else {
                println!(
                    "Task '{}' submitted for review to @{}.",
                    updated.title,
                    updated.reviewer_id.unwrap_or_default()
                );
            }
        }
        Command::Review {
            event,
            task,
            verdict,
            message,
        } => {
            let actor = resolve_actor(cli.actor, cli.roles.clone())?;
            let config = load_config_or_warn();
            let approve = verdict == Verdict::Approve;
            let outcome = event_api::review_task(&actor, event, task, approve, &config)?;
            if cli.json {
                let mut payload = task_json(&outcome.task);
                payload["approved"] = serde_json::json!(outcome.approved);
                println!("{payload}");
            } else {
                if outcome.approved {
                    println!("Review approved.");
                } else {
                    println!("Review requested changes (task reopened at 90%).");
                }
                if let Some(comment) = message.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                    println!("Comment: {comment}");
                }
            }
        }
        Command::Show { event } => {
            let detail = event_api::event_detail(event)?;
            if cli.json {
                let value = serde_json::to_value(&detail)
                    .map_err(|err| AppError::invalid_data(err.to_string()))?;
                println!("{value}");
            } else {
                print_event_detail(&detail);
            }
        }
        Command::Remind { today } => {
            let config = load_config_or_warn();
            let today = match today.as_deref() {
                Some(raw) => parse_date(raw)?,
                None => reminder::today_in(&config),
            };
            let path = json_store::store_path()?;
            let notifier = notifier_from_env(&config.reminder_channel)?;
            let outcome = reminder::run_tick(&path, today, notifier.as_ref())?;
            if cli.json {
                let messages: Vec<String> = outcome
                    .delivered
                    .iter()
                    .map(|reminder| reminder.message())
                    .collect();
                println!("{}", serde_json::json!({"delivered": messages}));
            } else {
                for reminder in &outcome.delivered {
                    println!("{}", reminder.message());
                }
                println!("Delivered {} reminder(s).", outcome.delivered.len());
            }
        }
        Command::Serve => run_serve()?,
    }

    Ok(())
}

fn run_serve() -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    info!(
        workspace_id = settings.workspace_id,
        channel = %settings.core.reminder_channel,
        tick_minutes = settings.core.tick_minutes,
        "reminder loop starting"
    );

    let path = json_store::store_path()?;
    let notifier = notifier_from_env(&settings.core.reminder_channel)?;

    loop {
        let today = reminder::today_in(&settings.core);
        match reminder::run_tick(&path, today, notifier.as_ref()) {
            Ok(outcome) => {
                info!(delivered = outcome.delivered.len(), "reminder tick complete");
            }
            Err(err) => error!(%err, "reminder tick failed"),
        }
        std::thread::sleep(std::time::Duration::from_secs(
            settings.core.tick_minutes * 60,
        ));
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
