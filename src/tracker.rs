//! A session over one persisted document.
//!
//! [`Tracker`] owns the in-memory [`Document`] and the [`HabitStore`] it came
//! from. Every mutation writes the whole document back before returning.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Document, Habit, HabitId};
use crate::stats::{self, DayCounts, MonthDay};
use crate::store::{new_habit_id, HabitStore, KeyValueStore, StorageError};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Habit name cannot be empty")]
    EmptyName,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct Tracker<S> {
    store: HabitStore<S>,
    doc: Document,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Loads the stored document, falling back to an empty one.
    pub fn open(store: HabitStore<S>) -> Self {
        let doc = store.load();
        Self { store, doc }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn store(&self) -> &HabitStore<S> {
        &self.store
    }

    /// Adds a habit that counts from `created_at` onwards.
    pub fn add_habit(&mut self, name: &str, created_at: NaiveDate) -> Result<Habit, TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::EmptyName);
        }

        let habit = Habit::new(new_habit_id(&self.doc), name, created_at);
        self.doc.habits.push(habit.clone());
        self.persist()?;

        tracing::info!("Added habit '{}' ({})", habit.name, habit.id);
        Ok(habit)
    }

    /// Flips the check for `habit` on `date`.
    ///
    /// Returns the new state, or `None` without touching storage when the
    /// habit doesn't exist, wasn't created yet on that date, or the date's
    /// week runs past the representable range.
    pub fn toggle_check(
        &mut self,
        habit: HabitId,
        date: NaiveDate,
    ) -> Result<Option<bool>, TrackerError> {
        if !stats::is_trackable(date) {
            tracing::debug!("Week of {} is out of range, ignoring toggle", date);
            return Ok(None);
        }

        match self.doc.habit(habit) {
            Some(h) if h.is_active_on(date) => {}
            Some(_) => {
                tracing::debug!("Habit {} not active on {}, ignoring toggle", habit, date);
                return Ok(None);
            }
            None => {
                tracing::debug!("Unknown habit {}, ignoring toggle", habit);
                return Ok(None);
            }
        }

        let week = stats::week_key(date);
        let day = stats::day_index(date);
        let checked = !self.doc.checks.is_checked(habit, week, day);
        self.doc.checks.set(habit, week, day, checked);
        self.persist()?;

        Ok(Some(checked))
    }

    /// Removes a habit and all of its checks. Unknown IDs are a no-op.
    pub fn delete_habit(&mut self, habit: HabitId) -> Result<Option<Habit>, TrackerError> {
        let Some(pos) = self.doc.habits.iter().position(|h| h.id == habit) else {
            tracing::debug!("Unknown habit {}, nothing to delete", habit);
            return Ok(None);
        };

        let removed = self.doc.habits.remove(pos);
        self.doc.checks.remove_habit(habit);
        self.persist()?;

        tracing::info!("Deleted habit '{}' ({})", removed.name, removed.id);
        Ok(Some(removed))
    }

    /// Clears every habit's checks for the week containing `date`.
    /// Returns how many checked days were cleared.
    pub fn reset_week(&mut self, date: NaiveDate) -> Result<usize, TrackerError> {
        if !stats::is_trackable(date) {
            tracing::debug!("Week of {} is out of range, nothing to reset", date);
            return Ok(0);
        }

        let week = stats::week_key(date);
        let cleared = self.doc.checks.clear_week(week);
        self.persist()?;

        tracing::info!("Reset week {} ({} check(s) cleared)", week, cleared);
        Ok(cleared)
    }

    pub fn day_counts(&self, date: NaiveDate) -> DayCounts {
        stats::day_counts(&self.doc, date)
    }

    pub fn weekly_series(&self, week_start: NaiveDate) -> [u32; 7] {
        stats::weekly_series(&self.doc, week_start)
    }

    pub fn month_grid(&self, year: i32, month: u32) -> Vec<MonthDay> {
        stats::month_grid(&self.doc, year, month)
    }

    fn persist(&mut self) -> Result<(), TrackerError> {
        self.store.save(&self.doc)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKeyValueStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_tracker() -> Tracker<MemoryKeyValueStore> {
        Tracker::open(HabitStore::new(MemoryKeyValueStore::new()))
    }

    /// Reopens a session over the same backend contents.
    fn reopen(tracker: &Tracker<MemoryKeyValueStore>) -> Tracker<MemoryKeyValueStore> {
        let store = HabitStore::with_key(tracker.store().backend().clone(), tracker.store().key());
        Tracker::open(store)
    }

    #[test]
    fn test_open_empty() {
        let tracker = test_tracker();
        assert_eq!(tracker.document(), &Document::new());
    }

    #[test]
    fn test_add_habit_persists() {
        let mut tracker = test_tracker();
        let habit = tracker.add_habit("  Read ", date(2024, 1, 3)).unwrap();

        assert_eq!(habit.name, "Read");
        assert_eq!(tracker.document().habits, vec![habit.clone()]);
        assert_eq!(reopen(&tracker).document().habits, vec![habit]);
    }

    #[test]
    fn test_add_habit_empty_name_rejected() {
        let mut tracker = test_tracker();
        assert!(matches!(
            tracker.add_habit("   ", date(2024, 1, 3)),
            Err(TrackerError::EmptyName)
        ));
        assert!(tracker.document().habits.is_empty());
        assert!(tracker.store().backend().get(tracker.store().key()).unwrap().is_none());
    }

    #[test]
    fn test_habits_keep_creation_order() {
        let mut tracker = test_tracker();
        for name in ["Read", "Walk", "Stretch"] {
            tracker.add_habit(name, date(2024, 1, 1)).unwrap();
        }
        let reloaded = reopen(&tracker);
        let names: Vec<&str> = reloaded
            .document()
            .habits
            .iter()
            .map(|h| h.name.as_str())
            .collect();
        assert_eq!(names, ["Read", "Walk", "Stretch"]);
    }

    #[test]
    fn test_toggle_scenario() {
        let mut tracker = test_tracker();
        let read = tracker.add_habit("Read", date(2024, 1, 3)).unwrap();

        assert_eq!(tracker.day_counts(date(2024, 1, 1)), DayCounts::default());
        assert_eq!(
            tracker.day_counts(date(2024, 1, 3)),
            DayCounts { done: 0, total: 1 }
        );

        assert_eq!(tracker.toggle_check(read.id, date(2024, 1, 3)).unwrap(), Some(true));
        let counts = tracker.day_counts(date(2024, 1, 3));
        assert_eq!(counts, DayCounts { done: 1, total: 1 });
        assert_eq!(counts.ratio(), 1.0);

        // Survives a reload.
        assert_eq!(reopen(&tracker).day_counts(date(2024, 1, 3)), counts);

        assert_eq!(tracker.toggle_check(read.id, date(2024, 1, 3)).unwrap(), Some(false));
        assert!(tracker.document().checks.is_empty());
    }

    #[test]
    fn test_toggle_unknown_habit_is_noop() {
        let mut tracker = test_tracker();
        assert_eq!(tracker.toggle_check(HabitId::new(), date(2024, 1, 3)).unwrap(), None);
        assert!(tracker.document().checks.is_empty());
    }

    #[test]
    fn test_toggle_before_creation_is_noop() {
        let mut tracker = test_tracker();
        let read = tracker.add_habit("Read", date(2024, 1, 3)).unwrap();
        assert_eq!(tracker.toggle_check(read.id, date(2024, 1, 2)).unwrap(), None);
        assert!(tracker.document().checks.is_empty());
    }

    #[test]
    fn test_delete_habit_removes_checks() {
        let mut tracker = test_tracker();
        let read = tracker.add_habit("Read", date(2024, 1, 1)).unwrap();
        let walk = tracker.add_habit("Walk", date(2024, 1, 1)).unwrap();
        tracker.toggle_check(read.id, date(2024, 1, 2)).unwrap();
        tracker.toggle_check(walk.id, date(2024, 1, 2)).unwrap();

        let removed = tracker.delete_habit(read.id).unwrap();
        assert_eq!(removed, Some(read.clone()));

        let reloaded = reopen(&tracker);
        assert!(!reloaded.document().contains_habit(read.id));
        assert_eq!(reloaded.document().checks.checked_days(read.id), 0);
        assert_eq!(
            reloaded.day_counts(date(2024, 1, 2)),
            DayCounts { done: 1, total: 1 }
        );
    }

    #[test]
    fn test_delete_unknown_habit_is_noop() {
        let mut tracker = test_tracker();
        tracker.add_habit("Read", date(2024, 1, 1)).unwrap();
        assert_eq!(tracker.delete_habit(HabitId::new()).unwrap(), None);
        assert_eq!(tracker.document().habits.len(), 1);
    }

    #[test]
    fn test_recreated_habit_has_no_history() {
        let mut tracker = test_tracker();
        let first = tracker.add_habit("Read", date(2024, 1, 1)).unwrap();
        tracker.toggle_check(first.id, date(2024, 1, 2)).unwrap();
        tracker.delete_habit(first.id).unwrap();

        let second = tracker.add_habit("Read", date(2024, 1, 1)).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(
            tracker.day_counts(date(2024, 1, 2)),
            DayCounts { done: 0, total: 1 }
        );
    }

    #[test]
    fn test_reset_week() {
        let mut tracker = test_tracker();
        let read = tracker.add_habit("Read", date(2024, 1, 1)).unwrap();
        tracker.toggle_check(read.id, date(2024, 1, 8)).unwrap();
        tracker.toggle_check(read.id, date(2024, 1, 9)).unwrap();
        tracker.toggle_check(read.id, date(2024, 1, 15)).unwrap();

        assert_eq!(tracker.reset_week(date(2024, 1, 10)).unwrap(), 2);
        assert_eq!(tracker.weekly_series(date(2024, 1, 7)), [0; 7]);
        assert_eq!(reopen(&tracker).weekly_series(date(2024, 1, 14)), [0, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_month_grid_through_tracker() {
        let mut tracker = test_tracker();
        let read = tracker.add_habit("Read", date(2024, 4, 1)).unwrap();
        tracker.toggle_check(read.id, date(2024, 4, 30)).unwrap();

        let grid = tracker.month_grid(2024, 4);
        assert_eq!(grid.len(), 30);
        assert_eq!(grid[29].percent, 1.0);
    }

    #[test]
    fn test_open_discards_malformed_document() {
        let backend = MemoryKeyValueStore::new().with_entry("habit-tracker.v1", "{oops");
        let mut tracker = Tracker::open(HabitStore::new(backend));
        assert_eq!(tracker.document(), &Document::new());

        // The next mutation overwrites the bad slot with a valid document.
        tracker.add_habit("Read", date(2024, 1, 1)).unwrap();
        assert_eq!(reopen(&tracker).document().habits.len(), 1);
    }

    #[test]
    fn test_out_of_range_weeks_are_ignored() {
        let mut tracker = test_tracker();
        let habit = tracker.add_habit("Read", NaiveDate::MIN).unwrap();

        assert_eq!(tracker.toggle_check(habit.id, NaiveDate::MAX).unwrap(), None);
        assert_eq!(tracker.toggle_check(habit.id, NaiveDate::MIN).unwrap(), None);
        assert_eq!(tracker.reset_week(NaiveDate::MAX).unwrap(), 0);
        assert!(tracker.document().checks.is_empty());
        assert_eq!(tracker.weekly_series(NaiveDate::MAX), [0; 7]);
    }
}
