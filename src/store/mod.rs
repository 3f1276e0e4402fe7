//! Persistence of the habit document.
//!
//! The document lives as one JSON string under a fixed key of a
//! [`KeyValueStore`]:
//! - native builds use [`FileKeyValueStore`], one `<key>.json` file per key
//! - WASM builds can use `LocalStorageKeyValueStore` (browser `localStorage`)
//! - tests use [`MemoryKeyValueStore`]

mod kv;
mod persisted;

#[cfg(target_arch = "wasm32")]
pub use kv::LocalStorageKeyValueStore;
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use persisted::{new_habit_id, HabitStore, DEFAULT_STORAGE_KEY};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::DocumentError;

/// Errors from the key-value backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Refusing to save invalid document: {0}")]
    Invalid(#[from] DocumentError),
}
