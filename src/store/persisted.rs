//! The document's single persisted slot.

use crate::models::{Document, HabitId};

use super::{KeyValueStore, StorageError};

/// Key the document is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "habit-tracker.v1";

/// Loads and saves the whole [`Document`] under one key of a
/// [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct HabitStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> HabitStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Loads the stored document.
    ///
    /// Never fails: a missing slot, an unreadable backend or bytes that are
    /// not a valid document all yield the empty document.
    pub fn load(&self) -> Document {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!("No document stored under '{}', starting empty", self.key);
                return Document::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read '{}': {}", self.key, e);
                return Document::new();
            }
        };

        match Document::from_json(&raw) {
            Ok(doc) => {
                tracing::info!("Loaded {} habit(s) from '{}'", doc.habits.len(), self.key);
                doc
            }
            Err(e) => {
                tracing::warn!("Discarding malformed document in '{}': {}", self.key, e);
                Document::new()
            }
        }
    }

    /// Serializes the whole document and overwrites the slot.
    ///
    /// A document that [`load`](Self::load) would reject is never written,
    /// so the stored copy is left as it was.
    pub fn save(&mut self, doc: &Document) -> Result<(), StorageError> {
        doc.validate()?;
        let json = doc.to_json()?;
        self.backend.set(&self.key, &json)?;
        tracing::debug!("Saved {} bytes to '{}'", json.len(), self.key);
        Ok(())
    }
}

/// Generates an ID no habit in `doc` already uses.
pub fn new_habit_id(doc: &Document) -> HabitId {
    loop {
        let id = HabitId::new();
        if !doc.contains_habit(id) {
            return id;
        }
    }
}
