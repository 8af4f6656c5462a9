pub mod config;
pub mod error;
pub mod event_api;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod policy;
pub mod reminder;
pub mod storage;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::lifecycle::{TaskState, task_state};
    use crate::model::{Area, Task, task::fresh_task_id};

    #[test]
    fn task_has_required_fields() {
        let task = Task {
            id: fresh_task_id(),
            title: "demo".to_string(),
            area: Area::Ensino,
            due_date: "2026-04-10".to_string(),
            details: String::new(),
            tools: Vec::new(),
            assignee_ids: vec![42],
            progress: 0,
            done: false,
            delivery_link: String::new(),
            reviewed: false,
            reviewer_id: None,
        };

        assert!(task.id.starts_with("task-"));
        assert_eq!(task.area, Area::Ensino);
        assert_eq!(task_state(&task), TaskState::Open);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::authorization("not an assignee");
        assert_eq!(err.code(), "authorization");
        assert_eq!(err.to_string(), "authorization - not an assignee");
    }
}
