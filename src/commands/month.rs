use chrono::{Datelike, Local, NaiveDate};
use clap::Args;

use habits::{KeyValueStore, MonthDay, Tracker};

use super::OutputFormat;

const CELL_WIDTH: usize = 5;

/// Show a month calendar of daily completion
#[derive(Args)]
pub struct MonthCommand {
    /// Month to show (YYYY-MM), defaults to the current month
    #[arg(long, short)]
    pub month: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl MonthCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        tracker: &Tracker<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let first = parse_month(&self.month)?;
        let grid = tracker.month_grid(first.year(), first.month());

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&grid)?),
            OutputFormat::Text => print!("{}", render_month(first, &grid)),
        }
        Ok(())
    }
}

/// Parses `YYYY-MM` into the first day of that month.
fn parse_month(month: &Option<String>) -> Result<NaiveDate, String> {
    match month {
        Some(m) => NaiveDate::parse_from_str(&format!("{}-01", m), "%Y-%m-%d")
            .map_err(|_| format!("Invalid month format '{}'. Use YYYY-MM.", m)),
        None => {
            let today = Local::now().date_naive();
            Ok(today.with_day(1).unwrap_or(today))
        }
    }
}

fn percent_label(day: &MonthDay) -> String {
    if day.total == 0 {
        "-".to_string()
    } else {
        format!("{:.0}%", day.percent * 100.0)
    }
}

/// Sunday-first calendar: a row of day numbers followed by a row of
/// completion percentages for each week.
fn render_month(first: NaiveDate, grid: &[MonthDay]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", first.format("%B %Y")));
    for name in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
        out.push_str(&format!("{:>width$}", name, width = CELL_WIDTH));
    }
    out.push('\n');

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<Option<&MonthDay>> = vec![None; leading];
    cells.extend(grid.iter().map(Some));

    for week in cells.chunks(7) {
        let mut days = String::new();
        let mut percents = String::new();
        for cell in week {
            match cell {
                Some(day) => {
                    days.push_str(&format!("{:>width$}", day.date.day(), width = CELL_WIDTH));
                    percents.push_str(&format!(
                        "{:>width$}",
                        percent_label(day),
                        width = CELL_WIDTH
                    ));
                }
                None => {
                    days.push_str(&" ".repeat(CELL_WIDTH));
                    percents.push_str(&" ".repeat(CELL_WIDTH));
                }
            }
        }
        out.push_str(days.trim_end());
        out.push('\n');
        out.push_str(percents.trim_end());
        out.push('\n');
    }
    out
}
