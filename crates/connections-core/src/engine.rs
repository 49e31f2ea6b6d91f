use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::RngExt;

use crate::difficulty::Difficulty;
use crate::feed::PuzzleFeed;
use crate::model::{normalize_guess, CompletedGroup, GroupData, SessionSnapshot, Word};
use crate::{CATEGORY_COUNT, GROUP_SIZE};

/// Everything the board needs to render one daily puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub words: Vec<Word>,
    pub groups_by_name: HashMap<String, GroupData>,
    pub completed_groups: Vec<CompletedGroup>,
    pub selected: Vec<String>,
    pub incorrect_count: u32,
    pub past_guesses: Vec<Vec<String>>,
    pub loading: bool,
    pub load_error: bool,
    pub game_started: bool,
    pub game_over: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            words: Vec::new(),
            groups_by_name: HashMap::new(),
            completed_groups: Vec::new(),
            selected: Vec::new(),
            incorrect_count: 0,
            past_guesses: Vec::new(),
            loading: true,
            load_error: false,
            game_started: false,
            game_over: false,
        }
    }
}

/// Intents the host can dispatch into the engine.
#[derive(Debug, Clone)]
pub enum Action {
    LoadPuzzle(PuzzleFeed),
    LoadFailed,
    RestoreSession(SessionSnapshot),
    SetError,
    StartGame,
    ToggleSelect(String),
    SetSelected(Vec<String>),
    Shuffle,
    SubmitGroup(String),
    RecordIncorrectGuess,
    GameOver,
}

impl EngineState {
    pub fn word(&self, content: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.content == content)
    }

    pub fn is_group_completed(&self, name: &str) -> bool {
        self.completed_groups.iter().any(|g| g.group_name == name)
    }

    /// First board slot not taken by a completed group.
    pub fn front_block_start(&self) -> usize {
        self.completed_groups.len() * GROUP_SIZE
    }

    /// A word can be picked while the game runs and its group is still open.
    pub fn is_selectable(&self, content: &str) -> bool {
        !self.game_over
            && self
                .word(content)
                .is_some_and(|w| !self.is_group_completed(&w.group))
    }

    pub fn is_selected(&self, content: &str) -> bool {
        self.selected.iter().any(|s| s == content)
    }

    /// Words not yet part of a completed group, in board order.
    pub fn remaining_words(&self) -> Vec<&Word> {
        let mut words: Vec<&Word> = self
            .words
            .iter()
            .filter(|w| !self.is_group_completed(&w.group))
            .collect();
        words.sort_by_key(|w| w.position);
        words
    }

    pub fn has_guessed(&self, words: &[String]) -> bool {
        let guess = normalize_guess(words);
        self.past_guesses.iter().any(|past| *past == guess)
    }
}

/// Apply `action` to `state`, returning the next state. Shuffles draw from the
/// thread-local generator.
pub fn reduce(state: &EngineState, action: Action) -> EngineState {
    reduce_with(state, action, &mut rand::rng())
}

/// Same as [`reduce`] with an explicit random source for `Shuffle`.
pub fn reduce_with<R: RngExt + ?Sized>(
    state: &EngineState,
    action: Action,
    rng: &mut R,
) -> EngineState {
    match action {
        Action::LoadPuzzle(feed) => load_puzzle(state, &feed),
        Action::LoadFailed => EngineState {
            words: Vec::new(),
            loading: true,
            ..state.clone()
        },
        Action::RestoreSession(snapshot) => EngineState {
            words: snapshot.words,
            completed_groups: snapshot.completed_groups,
            incorrect_count: snapshot.incorrect_count,
            past_guesses: snapshot.past_guesses,
            selected: Vec::new(),
            loading: false,
            ..state.clone()
        },
        Action::SetError => EngineState {
            load_error: true,
            ..state.clone()
        },
        Action::StartGame => EngineState {
            game_started: true,
            ..state.clone()
        },
        Action::ToggleSelect(content) => toggle_select(state, content),
        Action::SetSelected(list) => set_selected(state, list),
        Action::Shuffle => shuffle(state, rng),
        Action::SubmitGroup(name) => submit_group(state, &name),
        Action::RecordIncorrectGuess => record_incorrect(state),
        Action::GameOver => {
            if state.completed_groups.len() < CATEGORY_COUNT {
                return state.clone();
            }
            EngineState {
                game_over: true,
                selected: Vec::new(),
                ..state.clone()
            }
        }
    }
}

fn load_puzzle(state: &EngineState, feed: &PuzzleFeed) -> EngineState {
    let words: Vec<Word> = feed
        .categories
        .iter()
        .flat_map(|category| {
            category
                .cards
                .iter()
                .map(|card| Word::new(&card.content, &category.title, card.position))
        })
        .collect();
    if words.is_empty() {
        return state.clone();
    }

    let groups_by_name = feed
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let group = GroupData {
                difficulty_rank: Difficulty::from_index(i),
                words: category.cards.iter().map(|c| c.content.clone()).collect(),
            };
            (category.title.clone(), group)
        })
        .collect();

    EngineState {
        words,
        groups_by_name,
        loading: false,
        ..state.clone()
    }
}

fn toggle_select(state: &EngineState, content: String) -> EngineState {
    if !state.is_selectable(&content) {
        return state.clone();
    }

    let mut selected = state.selected.clone();
    if let Some(idx) = selected.iter().position(|s| *s == content) {
        selected.remove(idx);
    } else if selected.len() < GROUP_SIZE {
        selected.push(content);
    } else {
        return state.clone();
    }

    EngineState {
        selected,
        ..state.clone()
    }
}

fn set_selected(state: &EngineState, list: Vec<String>) -> EngineState {
    let mut selected: Vec<String> = Vec::with_capacity(GROUP_SIZE);
    for content in list {
        if selected.len() == GROUP_SIZE {
            break;
        }
        if state.is_selectable(&content) && !selected.contains(&content) {
            selected.push(content);
        }
    }
    EngineState {
        selected,
        ..state.clone()
    }
}

/// Shuffle the positions of the words outside the front block.
fn shuffle<R: RngExt + ?Sized>(state: &EngineState, rng: &mut R) -> EngineState {
    let start = state.front_block_start();
    let mut words = state.words.clone();

    let open: Vec<usize> = (0..words.len())
        .filter(|&i| words[i].position >= start)
        .collect();
    let mut positions: Vec<usize> = open.iter().map(|&i| words[i].position).collect();
    positions.shuffle(rng);
    for (&i, position) in open.iter().zip(positions) {
        words[i].position = position;
    }

    EngineState {
        words,
        ..state.clone()
    }
}

fn submit_group(state: &EngineState, name: &str) -> EngineState {
    let group = match state.groups_by_name.get(name) {
        Some(group) => group.clone(),
        None => return state.clone(),
    };
    let all_in_group = state.selected.len() == GROUP_SIZE
        && state
            .selected
            .iter()
            .all(|s| state.word(s).is_some_and(|w| w.group == name));
    if !all_in_group || state.is_group_completed(name) {
        return state.clone();
    }

    let start = state.front_block_start();
    let in_front = |w: &Word| w.position >= start && w.position < start + GROUP_SIZE;
    let mut words = state.words.clone();

    let mut incoming: Vec<usize> = (0..words.len())
        .filter(|&i| state.is_selected(&words[i].content) && !in_front(&words[i]))
        .collect();
    incoming.sort_by_key(|&i| words[i].position);

    let mut outgoing: Vec<usize> = (0..words.len())
        .filter(|&i| in_front(&words[i]) && !state.is_selected(&words[i].content))
        .collect();
    outgoing.sort_by_key(|&i| words[i].position);

    for (&a, &b) in incoming.iter().zip(outgoing.iter()) {
        let position = words[a].position;
        words[a].position = words[b].position;
        words[b].position = position;
    }

    let mut completed_groups = state.completed_groups.clone();
    completed_groups.push(CompletedGroup {
        group_name: name.to_string(),
        group,
    });

    EngineState {
        words,
        completed_groups,
        selected: Vec::new(),
        ..state.clone()
    }
}

fn record_incorrect(state: &EngineState) -> EngineState {
    if state.selected.len() != GROUP_SIZE {
        return state.clone();
    }
    let mut past_guesses = state.past_guesses.clone();
    past_guesses.push(normalize_guess(&state.selected));
    EngineState {
        incorrect_count: state.incorrect_count + 1,
        past_guesses,
        ..state.clone()
    }
}
