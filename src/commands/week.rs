use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::json;

use habits::{day_index, week_key, Document, KeyValueStore, Tracker, WeekKey};

use super::{confirm, parse_date_or_today, OutputFormat};

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Args)]
pub struct WeekCommand {
    #[command(subcommand)]
    pub command: WeekSubcommand,
}

#[derive(Subcommand)]
pub enum WeekSubcommand {
    /// Show the check grid and completion series for a week
    Show {
        /// Any day of the week (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Clear every check in a week
    Reset {
        /// Any day of the week (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl WeekCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        tracker: &mut Tracker<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WeekSubcommand::Show { date, format } => {
                let date = parse_date_or_today(date)?;
                let week = week_key(date);
                let series = tracker.weekly_series(week.start());

                match format {
                    OutputFormat::Json => {
                        let value = week_json(tracker.document(), week, &series);
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", render_week(tracker.document(), week, &series));
                    }
                }
                Ok(())
            }

            WeekSubcommand::Reset { date, force } => {
                let date = parse_date_or_today(date)?;
                let week = week_key(date);

                if !force && !confirm(&format!("Clear all checks for the week of {}?", week))? {
                    println!("Reset cancelled.");
                    return Ok(());
                }

                let cleared = tracker.reset_week(date)?;
                println!("Cleared {} check(s) for the week of {}", cleared, week);
                Ok(())
            }
        }
    }
}

/// A habit's cell on one day: `None` before the habit existed.
fn cell(doc: &Document, habit_index: usize, day: NaiveDate) -> Option<bool> {
    let habit = &doc.habits[habit_index];
    if !habit.is_active_on(day) {
        return None;
    }
    let week = week_key(day);
    let index = day_index(day);
    Some(doc.checks.is_checked(habit.id, week, index))
}

fn render_week(doc: &Document, week: WeekKey, series: &[u32; 7]) -> String {
    let mut out = String::new();
    let width = doc
        .habits
        .iter()
        .map(|h| h.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(5);

    out.push_str(&format!("Week of {}\n", week));
    out.push_str(&format!("{:width$} ", "Habit", width = width));
    for name in DAY_NAMES {
        out.push_str(&format!(" {}", name));
    }
    out.push('\n');

    for (i, habit) in doc.habits.iter().enumerate() {
        out.push_str(&format!("{:width$} ", habit.name, width = width));
        for day in week.days() {
            let mark = match cell(doc, i, day) {
                Some(true) => "✓",
                Some(false) => "·",
                None => " ",
            };
            out.push_str(&format!("  {} ", mark));
        }
        out.push('\n');
    }

    out.push_str(&format!("{:width$} ", "Done", width = width));
    for done in series {
        out.push_str(&format!(" {:>3}", done));
    }
    out.push('\n');
    out
}

fn week_json(doc: &Document, week: WeekKey, series: &[u32; 7]) -> serde_json::Value {
    let days: Vec<NaiveDate> = week.days().collect();
    let habits: Vec<serde_json::Value> = doc
        .habits
        .iter()
        .enumerate()
        .map(|(i, habit)| {
            let checks: Vec<Option<bool>> = days.iter().map(|d| cell(doc, i, *d)).collect();
            json!({
                "id": habit.id,
                "name": habit.name,
                "checks": checks,
            })
        })
        .collect();

    json!({
        "week": week,
        "days": days,
        "habits": habits,
        "series": series,
    })
}
