use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{CheckMap, DocumentError, Habit, HabitId};

/// The whole persisted state: habits in creation order plus their checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub checks: CheckMap,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn contains_habit(&self, id: HabitId) -> bool {
        self.habit(id).is_some()
    }

    /// Look a habit up by ID, falling back to a case-insensitive name match.
    pub fn find_habit(&self, reference: &str) -> Option<&Habit> {
        if let Ok(id) = reference.parse::<HabitId>() {
            if let Some(habit) = self.habit(id) {
                return Some(habit);
            }
        }
        let wanted = reference.trim().to_lowercase();
        self.habits.iter().find(|h| h.name.to_lowercase() == wanted)
    }

    /// Parse a stored document and check the invariants serde can't express.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: Document = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::with_capacity(self.habits.len());
        for habit in &self.habits {
            if habit.name.trim().is_empty() {
                return Err(DocumentError::EmptyHabitName(habit.id));
            }
            if !seen.insert(habit.id) {
                return Err(DocumentError::DuplicateHabitId(habit.id));
            }
        }
        self.checks.validate()
    }
}
