use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Marketing,
    Diretoria,
    Rh,
    Financeiro,
    Ensino,
}

impl Area {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_lowercase().as_str() {
            "marketing" => Ok(Self::Marketing),
            "diretoria" => Ok(Self::Diretoria),
            "rh" => Ok(Self::Rh),
            "financeiro" => Ok(Self::Financeiro),
            "ensino" => Ok(Self::Ensino),
            other => Err(AppError::validation(format!(
                "unknown area '{other}', expected marketing, diretoria, rh, financeiro or ensino"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Marketing => "marketing",
            Self::Diretoria => "diretoria",
            Self::Rh => "rh",
            Self::Financeiro => "financeiro",
            Self::Ensino => "ensino",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "fresh_task_id")]
    pub id: String,
    pub title: String,
    pub area: Area,
    pub due_date: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub assignee_ids: Vec<u64>,
    #[serde(default, deserialize_with = "clamp_progress")]
    pub progress: u8,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub delivery_link: String,
    #[serde(default)]
    pub reviewer_id: Option<u64>,
    #[serde(default)]
    pub reviewed: bool,
}

pub fn fresh_task_id() -> String {
    format!("task-{}", OffsetDateTime::now_utc().unix_timestamp_nanos())
}

/// Removes duplicate assignee ids keeping the first occurrence order.
pub fn dedup_assignees(ids: &[u64]) -> Vec<u64> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

fn clamp_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(value.clamp(0, 100) as u8)
}

#[cfg(test)]
mod tests {
    use super::{Area, Task, dedup_assignees};

    #[test]
    fn area_parse_accepts_all_values_case_insensitively() {
        assert_eq!(Area::parse("marketing").unwrap(), Area::Marketing);
        assert_eq!(Area::parse(" Diretoria ").unwrap(), Area::Diretoria);
        assert_eq!(Area::parse("RH").unwrap(), Area::Rh);
        assert_eq!(Area::parse("financeiro").unwrap(), Area::Financeiro);
        assert_eq!(Area::parse("ENSINO").unwrap(), Area::Ensino);
    }

    #[test]
    fn area_parse_rejects_unknown_values() {
        let err = Area::parse("vendas").unwrap_err();
        assert_eq!(err.code(), "validation");
    }

    #[test]
    fn dedup_assignees_keeps_first_occurrence_order() {
        assert_eq!(dedup_assignees(&[42, 99, 42, 7, 99]), vec![42, 99, 7]);
        assert_eq!(dedup_assignees(&[]), Vec::<u64>::new());
    }

    #[test]
    fn task_deserialization_clamps_progress() {
        let raw = r#"{
            "title": "demo",
            "area": "rh",
            "due_date": "2026-04-10",
            "progress": 180
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.progress, 100);

        let raw = raw.replace("180", "-5");
        let task: Task = serde_json::from_str(&raw).unwrap();
        assert_eq!(task.progress, 0);
    }

    #[test]
    fn task_deserialization_defaults_optional_fields() {
        let raw = r#"{"title": "demo", "area": "ensino", "due_date": "2026-04-10"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();

        assert!(!task.id.is_empty());
        assert_eq!(task.details, "");
        assert!(task.tools.is_empty());
        assert!(task.assignee_ids.is_empty());
        assert_eq!(task.progress, 0);
        assert!(!task.done);
        assert_eq!(task.delivery_link, "");
        assert_eq!(task.reviewer_id, None);
        assert!(!task.reviewed);
    }

    #[test]
    fn task_deserialization_rejects_unknown_area() {
        let raw = r#"{"title": "demo", "area": "vendas", "due_date": "2026-04-10"}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }
}
