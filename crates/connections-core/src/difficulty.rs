use serde::{Deserialize, Serialize};

/// Difficulty rank of a category, taken from its order in the feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Difficulty {
    Straightforward,
    Easy,
    Medium,
    Tricky,
}

impl Difficulty {
    pub fn label(&self) -> &str {
        match self {
            Difficulty::Straightforward => "Straightforward",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Tricky => "Tricky",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Difficulty::Straightforward => 0,
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Tricky => 3,
        }
    }

    /// Rank for the category at `index` in the feed. Anything past the
    /// fourth category is clamped to the hardest rank.
    pub fn from_index(index: usize) -> Difficulty {
        match index {
            0 => Difficulty::Straightforward,
            1 => Difficulty::Easy,
            2 => Difficulty::Medium,
            _ => Difficulty::Tricky,
        }
    }

    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Straightforward,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Tricky,
        ]
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.rank()
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        match rank {
            0..=3 => Ok(Difficulty::from_index(rank as usize)),
            other => Err(format!("difficulty rank out of range: {}", other)),
        }
    }
}
