pub mod event;
pub mod task;

pub use event::Event;
pub use task::{Area, Task, dedup_assignees};

use crate::error::AppError;
use time::Date;
use time::macros::format_description;

pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), &format)
        .map_err(|_| AppError::validation(format!("invalid date '{}', expected YYYY-MM-DD", raw.trim())))
}

pub fn format_date(date: Date) -> Result<String, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Parses a date that was read back from the store rather than typed by a user.
pub fn parse_stored_date(raw: &str) -> Result<Date, AppError> {
    parse_date(raw).map_err(|_| AppError::invalid_data(format!("stored date '{raw}' is not YYYY-MM-DD")))
}
