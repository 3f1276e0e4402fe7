mod checks;
mod document;
mod habit;

pub use checks::{CheckMap, WeekKey, DAYS_PER_WEEK};
pub use document::Document;
pub use habit::{Habit, HabitId};

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a stored document is rejected on load.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid document JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Habit {0} has an empty name")]
    EmptyHabitName(HabitId),

    #[error("Habit ID {0} appears more than once")]
    DuplicateHabitId(HabitId),

    #[error("Week key {0} is not a Sunday")]
    NotASunday(NaiveDate),

    #[error("Day index {0} is outside 0..=6")]
    DayIndexOutOfRange(u8),
}
