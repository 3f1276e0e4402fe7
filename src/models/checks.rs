//! Sparse per-day check marks.
//!
//! Checks are keyed `habit -> week -> day of week`. A missing entry at any
//! level means "not checked", so only days that were actually checked take
//! up space in the persisted document.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{DocumentError, HabitId};

/// Number of days in a tracked week (Sunday through Saturday).
pub const DAYS_PER_WEEK: u8 = 7;

/// Canonical key of a Sunday-to-Saturday week: the date of its Sunday.
///
/// Serializes as `YYYY-MM-DD`. Deserializing a date that is not a Sunday
/// fails, so a loaded document can never hold two keys for one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Caller guarantees `sunday` is a Sunday.
    pub(crate) fn from_sunday(sunday: NaiveDate) -> Self {
        debug_assert_eq!(sunday.weekday(), Weekday::Sun);
        Self(sunday)
    }

    /// The Sunday this key stands for.
    pub fn start(&self) -> NaiveDate {
        self.0
    }

    /// Date of the given day of this week (0 = Sunday), or `None` past the
    /// last representable date.
    pub fn day(&self, index: u8) -> Option<NaiveDate> {
        self.0.checked_add_days(Days::new(u64::from(index)))
    }

    /// The representable dates of the week, Sunday first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let week = *self;
        (0..DAYS_PER_WEEK).filter_map(move |i| week.day(i))
    }
}

impl TryFrom<NaiveDate> for WeekKey {
    type Error = DocumentError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        if date.weekday() == Weekday::Sun {
            Ok(Self(date))
        } else {
            Err(DocumentError::NotASunday(date))
        }
    }
}

impl From<WeekKey> for NaiveDate {
    fn from(key: WeekKey) -> Self {
        key.0
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

type WeekChecks = BTreeMap<WeekKey, BTreeMap<u8, bool>>;

/// `habit -> week -> day index -> checked`, with default-false lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckMap(BTreeMap<HabitId, WeekChecks>);

impl CheckMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_checked(&self, habit: HabitId, week: WeekKey, day: u8) -> bool {
        self.0
            .get(&habit)
            .and_then(|weeks| weeks.get(&week))
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or(false)
    }

    /// Set or clear a single check.
    ///
    /// Clearing removes the entry and prunes any map left empty, keeping the
    /// map sparse. Day indices past Saturday are ignored.
    pub fn set(&mut self, habit: HabitId, week: WeekKey, day: u8, checked: bool) {
        if day >= DAYS_PER_WEEK {
            return;
        }
        if checked {
            self.0
                .entry(habit)
                .or_default()
                .entry(week)
                .or_default()
                .insert(day, true);
            return;
        }

        if let Some(weeks) = self.0.get_mut(&habit) {
            if let Some(days) = weeks.get_mut(&week) {
                days.remove(&day);
                if days.is_empty() {
                    weeks.remove(&week);
                }
            }
            if weeks.is_empty() {
                self.0.remove(&habit);
            }
        }
    }

    /// Drop every check belonging to a habit. Returns true if any existed.
    pub fn remove_habit(&mut self, habit: HabitId) -> bool {
        self.0.remove(&habit).is_some()
    }

    /// Drop every habit's checks for one week. Returns the number of days
    /// that were checked.
    pub fn clear_week(&mut self, week: WeekKey) -> usize {
        let mut cleared = 0;
        self.0.retain(|_, weeks| {
            if let Some(days) = weeks.remove(&week) {
                cleared += days.values().filter(|checked| **checked).count();
            }
            !weeks.is_empty()
        });
        cleared
    }

    /// Number of checked days recorded for a habit across all weeks.
    pub fn checked_days(&self, habit: HabitId) -> usize {
        self.0
            .get(&habit)
            .map(|weeks| {
                weeks
                    .values()
                    .flat_map(|days| days.values())
                    .filter(|checked| **checked)
                    .count()
            })
            .unwrap_or(0)
    }

    pub(crate) fn validate(&self) -> Result<(), DocumentError> {
        for weeks in self.0.values() {
            for days in weeks.values() {
                if let Some(day) = days.keys().find(|day| **day >= DAYS_PER_WEEK) {
                    return Err(DocumentError::DayIndexOutOfRange(*day));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sunday() -> WeekKey {
        WeekKey::try_from(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()).unwrap()
    }

    #[test]
    fn test_week_key_rejects_non_sunday() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            WeekKey::try_from(monday),
            Err(DocumentError::NotASunday(d)) if d == monday
        ));
    }

    #[test]
    fn test_week_key_days() {
        let days: Vec<NaiveDate> = sunday().days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(days[6], NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    }

    #[test]
    fn test_week_key_display() {
        assert_eq!(sunday().to_string(), "2023-12-31");
    }

    #[test]
    fn test_missing_entries_are_unchecked() {
        let checks = CheckMap::new();
        assert!(!checks.is_checked(HabitId::new(), sunday(), 3));
    }

    #[test]
    fn test_set_and_clear_prunes_empty_maps() {
        let habit = HabitId::new();
        let mut checks = CheckMap::new();

        checks.set(habit, sunday(), 2, true);
        assert!(checks.is_checked(habit, sunday(), 2));
        assert!(!checks.is_checked(habit, sunday(), 3));

        checks.set(habit, sunday(), 2, false);
        assert!(!checks.is_checked(habit, sunday(), 2));
        assert!(checks.is_empty());
    }

    #[test]
    fn test_set_ignores_day_out_of_range() {
        let habit = HabitId::new();
        let mut checks = CheckMap::new();
        checks.set(habit, sunday(), DAYS_PER_WEEK, true);
        checks.set(habit, sunday(), 9, true);

        assert!(checks.is_empty());
        assert!(checks.validate().is_ok());
    }

    #[test]
    fn test_week_key_days_stop_at_last_date() {
        let last = WeekKey::from_sunday(crate::stats::start_of_week(NaiveDate::MAX));
        let days: Vec<NaiveDate> = last.days().collect();

        assert!(days.len() < 7);
        assert_eq!(days.last(), Some(&NaiveDate::MAX));
        assert!(last.day(6).is_none());
    }

    #[test]
    fn test_clearing_unknown_habit_is_noop() {
        let mut checks = CheckMap::new();
        checks.set(HabitId::new(), sunday(), 0, false);
        assert!(checks.is_empty());
    }

    #[test]
    fn test_remove_habit() {
        let keep = HabitId::new();
        let gone = HabitId::new();
        let mut checks = CheckMap::new();
        checks.set(keep, sunday(), 1, true);
        checks.set(gone, sunday(), 1, true);

        assert!(checks.remove_habit(gone));
        assert!(!checks.remove_habit(gone));
        assert!(checks.is_checked(keep, sunday(), 1));
        assert_eq!(checks.checked_days(gone), 0);
    }

    #[test]
    fn test_clear_week_only_touches_that_week() {
        let habit = HabitId::new();
        let next_week = WeekKey::from_sunday(sunday().day(7).unwrap());
        let mut checks = CheckMap::new();
        checks.set(habit, sunday(), 1, true);
        checks.set(habit, sunday(), 2, true);
        checks.set(habit, next_week, 4, true);

        assert_eq!(checks.clear_week(sunday()), 2);
        assert!(!checks.is_checked(habit, sunday(), 1));
        assert!(checks.is_checked(habit, next_week, 4));
        assert_eq!(checks.checked_days(habit), 1);
    }

    #[test]
    fn test_json_shape() {
        let habit = HabitId::new();
        let mut checks = CheckMap::new();
        checks.set(habit, sunday(), 3, true);

        let json = serde_json::to_value(&checks).unwrap();
        assert_eq!(json[habit.to_string()]["2023-12-31"]["3"], true);
    }

    #[test]
    fn test_deserialize_rejects_non_sunday_week() {
        let habit = HabitId::new();
        let json = format!(r#"{{"{}": {{"2024-01-01": {{"1": true}}}}}}"#, habit);
        assert!(serde_json::from_str::<CheckMap>(&json).is_err());
    }

    #[test]
    fn test_validate_day_range() {
        let habit = HabitId::new();
        let json = format!(r#"{{"{}": {{"2023-12-31": {{"7": true}}}}}}"#, habit);
        let checks: CheckMap = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            checks.validate(),
            Err(DocumentError::DayIndexOutOfRange(7))
        ));
    }
}
