use crate::config::CoreConfig;
use crate::model::Task;

/// The acting user as reported by the platform glue: a numeric identity plus
/// the role names attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: u64,
    pub roles: Vec<String>,
}

impl Actor {
    pub fn new(id: u64, roles: Vec<String>) -> Self {
        Self { id, roles }
    }
}

pub fn is_manager(actor: &Actor, config: &CoreConfig) -> bool {
    actor
        .roles
        .iter()
        .any(|role| config.manager_roles.contains(&role.trim().to_lowercase()))
}

pub fn can_mutate_task(actor: &Actor, task: &Task, config: &CoreConfig) -> bool {
    is_manager(actor, config) || task.assignee_ids.contains(&actor.id)
}

#[cfg(test)]
mod tests {
    use super::{Actor, can_mutate_task, is_manager};
    use crate::config::CoreConfig;
    use crate::model::{Area, Task, task::fresh_task_id};

    fn task_with_assignees(assignee_ids: Vec<u64>) -> Task {
        Task {
            id: fresh_task_id(),
            title: "demo".to_string(),
            area: Area::Marketing,
            due_date: "2026-04-10".to_string(),
            details: String::new(),
            tools: Vec::new(),
            assignee_ids,
            progress: 0,
            done: false,
            delivery_link: String::new(),
            reviewer_id: None,
            reviewed: false,
        }
    }

    #[test]
    fn is_manager_matches_roles_case_insensitively() {
        let config = CoreConfig::default();
        let actor = Actor::new(1, vec!["Diretoria".to_string()]);
        assert!(is_manager(&actor, &config));

        let actor = Actor::new(1, vec![" LIDERANCA ".to_string()]);
        assert!(is_manager(&actor, &config));

        let actor = Actor::new(1, vec!["membro".to_string()]);
        assert!(!is_manager(&actor, &config));

        let actor = Actor::new(1, Vec::new());
        assert!(!is_manager(&actor, &config));
    }

    #[test]
    fn can_mutate_task_allows_assignees_and_managers() {
        let config = CoreConfig::default();
        let task = task_with_assignees(vec![42]);

        let assignee = Actor::new(42, Vec::new());
        assert!(can_mutate_task(&assignee, &task, &config));

        let manager = Actor::new(7, vec!["lideranca".to_string()]);
        assert!(can_mutate_task(&manager, &task, &config));

        let outsider = Actor::new(99, vec!["membro".to_string()]);
        assert!(!can_mutate_task(&outsider, &task, &config));
    }
}
