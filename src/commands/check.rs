use clap::Args;

use habits::{KeyValueStore, Tracker};

use super::{parse_date_or_today, resolve_habit};

/// Toggle a habit's check for one day
#[derive(Args)]
pub struct CheckCommand {
    /// Habit ID or name
    pub habit: String,

    /// Day to toggle (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,
}

impl CheckCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        tracker: &mut Tracker<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let date = parse_date_or_today(&self.date)?;
        let habit = resolve_habit(tracker.document(), &self.habit)?.clone();

        match tracker.toggle_check(habit.id, date)? {
            Some(true) => println!("Checked '{}' on {}", habit.name, date),
            Some(false) => println!("Unchecked '{}' on {}", habit.name, date),
            None => {
                return Err(format!(
                    "'{}' was not tracked yet on {} (started {})",
                    habit.name, date, habit.created_at
                )
                .into());
            }
        }

        let counts = tracker.day_counts(date);
        println!(
            "{}: {}/{} done ({:.0}%)",
            date,
            counts.done,
            counts.total,
            counts.ratio() * 100.0
        );
        Ok(())
    }
}
