pub mod date;
pub mod difficulty;
pub mod engine;
pub mod feed;
pub mod guess;
pub mod hints;
pub mod model;
pub mod persistence;
pub mod session;

pub use date::PuzzleDate;
pub use difficulty::Difficulty;
pub use engine::{reduce, Action, EngineState};
pub use feed::PuzzleFeed;
pub use guess::{Advisory, Verdict};
pub use model::{CompletedGroup, GroupData, SessionSnapshot, Word};
pub use persistence::{MemoryStorage, SessionStore, Storage, StorageError};
pub use session::GameSession;

/// Number of categories in a daily puzzle.
pub const CATEGORY_COUNT: usize = 4;

/// Number of words in every category, and the size of a guess.
pub const GROUP_SIZE: usize = 4;
