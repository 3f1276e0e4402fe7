//! Habit tracker core.
//!
//! A [`Document`] of habits and their per-day checks, persisted as one JSON
//! string in a key-value store, plus the completion statistics derived from
//! it. Renderers (the `habits` CLI, a browser front end) only go through the
//! store, the [`stats`] functions and the [`Tracker`] session.

pub mod models;
pub mod stats;
pub mod store;
pub mod tracker;

pub use models::{CheckMap, Document, DocumentError, Habit, HabitId, WeekKey};
pub use stats::{
    day_counts, day_index, is_trackable, month_grid, start_of_week, week_key, weekly_series,
    DayCounts, MonthDay,
};
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageKeyValueStore;
pub use store::{
    new_habit_id, FileKeyValueStore, HabitStore, KeyValueStore, MemoryKeyValueStore,
    StorageError, DEFAULT_STORAGE_KEY,
};
pub use tracker::{Tracker, TrackerError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
