//! Completion statistics derived from a [`Document`].
//!
//! Everything here is a pure function of the document and a date; nothing is
//! cached or written back.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::models::{Document, WeekKey};

/// Returns the Sunday of the week containing `date`.
///
/// Dates before the first representable Sunday map to that Sunday.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    checked_start_of_week(date).unwrap_or_else(first_sunday)
}

/// Whether the whole week containing `date` is representable, so it can be
/// checked and reset.
pub fn is_trackable(date: NaiveDate) -> bool {
    checked_start_of_week(date)
        .and_then(|start| start.checked_add_days(Days::new(6)))
        .is_some()
}

fn checked_start_of_week(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
}

fn first_sunday() -> NaiveDate {
    let offset = (7 - NaiveDate::MIN.weekday().num_days_from_sunday()) % 7;
    NaiveDate::MIN + Days::new(u64::from(offset))
}

/// Canonical key of the week containing `date`.
pub fn week_key(date: NaiveDate) -> WeekKey {
    WeekKey::from_sunday(start_of_week(date))
}

/// Position of `date` within its week, Sunday = 0.
pub fn day_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// How many active habits were done on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayCounts {
    pub done: u32,
    pub total: u32,
}

impl DayCounts {
    /// `done / total`, or 0 when no habit was active.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.done) / f64::from(self.total)
        }
    }
}

/// Counts the habits that existed on `date` and how many of them were checked.
pub fn day_counts(doc: &Document, date: NaiveDate) -> DayCounts {
    let week = week_key(date);
    let day = day_index(date);

    doc.habits
        .iter()
        .filter(|habit| habit.is_active_on(date))
        .fold(DayCounts::default(), |mut counts, habit| {
            counts.total += 1;
            if doc.checks.is_checked(habit.id, week, day) {
                counts.done += 1;
            }
            counts
        })
}

/// Done counts for the seven days of a week, Sunday first.
///
/// `week_start` may be any day of the week; it is normalized to its Sunday.
/// Days past the last representable date count as 0.
pub fn weekly_series(doc: &Document, week_start: NaiveDate) -> [u32; 7] {
    let week = week_key(week_start);
    std::array::from_fn(|i| {
        week.day(i as u8)
            .map(|date| day_counts(doc, date).done)
            .unwrap_or(0)
    })
}

/// One calendar cell of a month view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthDay {
    pub date: NaiveDate,
    pub done: u32,
    pub total: u32,
    /// Completion ratio in `[0, 1]`.
    pub percent: f64,
}

/// One entry per day of the month, in date order.
///
/// An invalid month yields an empty grid.
pub fn month_grid(doc: &Document, year: i32, month: u32) -> Vec<MonthDay> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| {
            let counts = day_counts(doc, date);
            MonthDay {
                date,
                done: counts.done,
                total: counts.total,
                percent: counts.ratio(),
            }
        })
        .collect()
}
