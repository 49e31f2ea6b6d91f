use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::date::PuzzleDate;
use crate::engine::EngineState;
use crate::model::SessionSnapshot;

/// Key the session snapshot lives under.
pub const SESSION_KEY: &str = "ACCloneData";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key/value store with local-storage semantics.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage, used by tests and as a fallback when no data
/// directory is available.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the date-keyed session snapshot.
pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write the snapshot for `today`. Nothing is written until the game has
    /// started, so an unopened puzzle never clobbers an earlier save.
    /// Returns whether a write happened.
    pub fn save(&mut self, state: &EngineState, today: PuzzleDate) -> Result<bool, StorageError> {
        if !state.game_started {
            return Ok(false);
        }
        let snapshot = SessionSnapshot {
            day: today.day,
            month: today.month,
            year: today.year,
            words: state.words.clone(),
            completed_groups: state.completed_groups.clone(),
            incorrect_count: state.incorrect_count,
            past_guesses: state.past_guesses.clone(),
        };
        let json = serde_json::to_string(&snapshot)?;
        self.storage.set_item(SESSION_KEY, &json)?;
        Ok(true)
    }

    /// The saved snapshot, if there is one for `today`. Corrupt or stale data
    /// reads as no session.
    pub fn load(&self, today: PuzzleDate) -> Option<SessionSnapshot> {
        let raw = self.storage.get_item(SESSION_KEY)?;
        let snapshot: SessionSnapshot = match serde_json::from_str(&raw) {
            Ok(s) => s,
            Err(e) => {
                debug!(error = %e, "discarding unreadable session");
                return None;
            }
        };
        if snapshot.date() != today {
            debug!(saved = ?snapshot.date(), today = ?today, "discarding session from another day");
            return None;
        }
        Some(snapshot)
    }
}
