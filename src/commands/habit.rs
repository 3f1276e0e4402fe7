use clap::{Args, Subcommand};

use habits::{KeyValueStore, Tracker};

use super::{confirm, parse_date_or_today, resolve_habit, OutputFormat};

#[derive(Args)]
pub struct HabitCommand {
    #[command(subcommand)]
    pub command: HabitSubcommand,
}

#[derive(Subcommand)]
pub enum HabitSubcommand {
    /// Add a new habit
    Add {
        /// Habit name
        name: String,

        /// Date the habit starts counting (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List habits
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a habit and all of its checks
    Delete {
        /// Habit ID or name
        habit: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl HabitCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        tracker: &mut Tracker<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            HabitSubcommand::Add { name, date } => {
                let created_at = parse_date_or_today(date)?;
                let habit = tracker.add_habit(name, created_at)?;
                println!("Added habit '{}' starting {}", habit.name, habit.created_at);
                println!("ID: {}", habit.id);
                Ok(())
            }

            HabitSubcommand::List { format } => {
                let doc = tracker.document();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&doc.habits)?);
                    }
                    OutputFormat::Text => {
                        if doc.habits.is_empty() {
                            println!("No habits yet. Add one with 'habits habit add <NAME>'.");
                            return Ok(());
                        }
                        for habit in &doc.habits {
                            let checked = doc.checks.checked_days(habit.id);
                            println!(
                                "{}  {:20} since {}  ({} day(s) checked)",
                                habit.id, habit.name, habit.created_at, checked
                            );
                        }
                        println!("\nTotal: {} habit(s)", doc.habits.len());
                    }
                }
                Ok(())
            }

            HabitSubcommand::Delete { habit, force } => {
                let habit = resolve_habit(tracker.document(), habit)?.clone();

                if !force && !confirm(&format!("Delete habit '{}' and its history?", habit.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                tracker.delete_habit(habit.id)?;
                println!("Deleted habit '{}'", habit.name);
                Ok(())
            }
        }
    }
}
