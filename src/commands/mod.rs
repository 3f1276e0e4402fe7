mod check;
mod config_cmd;
mod habit;
mod month;
mod week;

pub use check::CheckCommand;
pub use config_cmd::ConfigCommand;
pub use habit::HabitCommand;
pub use month::MonthCommand;
pub use week::WeekCommand;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;
use std::io::{self, Write};

use habits::{is_trackable, Document, Habit};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parses a `YYYY-MM-DD` argument, defaulting to today.
pub fn parse_date_or_today(date: &Option<String>) -> Result<NaiveDate, String> {
    let parsed = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", d))?,
        None => Local::now().date_naive(),
    };

    if !is_trackable(parsed) {
        return Err(format!("Date '{}' is outside the supported range", parsed));
    }
    Ok(parsed)
}

/// Resolves a habit by ID or name.
pub fn resolve_habit<'a>(doc: &'a Document, reference: &str) -> Result<&'a Habit, String> {
    doc.find_habit(reference)
        .ok_or_else(|| format!("Habit not found: {}", reference))
}

/// Asks a yes/no question on stdin; anything but `y` means no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
