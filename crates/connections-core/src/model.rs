use serde::{Deserialize, Serialize};

use crate::date::PuzzleDate;
use crate::difficulty::Difficulty;

/// A board word: the card text, the category it belongs to and the slot it
/// currently occupies. `id` always equals `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub content: String,
    pub group: String,
    pub position: usize,
}

impl Word {
    pub fn new(content: &str, group: &str, position: usize) -> Self {
        Self {
            id: content.to_string(),
            content: content.to_string(),
            group: group.to_string(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupData {
    pub difficulty_rank: Difficulty,
    pub words: Vec<String>,
}

/// A group the player has found, in the order found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedGroup {
    pub group_name: String,
    pub group: GroupData,
}

/// Persisted subset of the engine state, keyed by calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub words: Vec<Word>,
    pub completed_groups: Vec<CompletedGroup>,
    pub incorrect_count: u32,
    pub past_guesses: Vec<Vec<String>>,
}

impl SessionSnapshot {
    pub fn date(&self) -> PuzzleDate {
        PuzzleDate::new(self.year, self.month, self.day)
    }
}

/// Sort a guess so two guesses of the same words compare equal.
pub fn normalize_guess(words: &[String]) -> Vec<String> {
    let mut sorted = words.to_vec();
    sorted.sort();
    sorted
}
