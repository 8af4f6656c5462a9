use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default = "fresh_event_id")]
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub acting: String,
    #[serde(default)]
    pub partners: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    // BTreeSet so the serialized key list is always sorted.
    #[serde(default)]
    pub reminded_for_dates: BTreeSet<String>,
}

pub fn fresh_event_id() -> String {
    format!("event-{}", OffsetDateTime::now_utc().unix_timestamp_nanos())
}
