use serde::{Deserialize, Serialize};

/// Status value the upstream feed uses for a published puzzle.
pub const STATUS_OK: &str = "OK";

/// A daily puzzle as published by the upstream feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleFeed {
    pub status: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub print_date: String,
    #[serde(default)]
    pub editor: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub cards: Vec<Card>,
}

/// A word on the board and the slot it starts in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub content: String,
    pub position: usize,
}

impl PuzzleFeed {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn word_count(&self) -> usize {
        self.categories.iter().map(|c| c.cards.len()).sum()
    }
}
