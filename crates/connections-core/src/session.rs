use std::fmt::Display;

use rand::RngExt;
use tracing::{debug, info, warn};

use crate::date::PuzzleDate;
use crate::engine::{reduce, reduce_with, Action, EngineState};
use crate::feed::PuzzleFeed;
use crate::guess::{classify, Verdict};
use crate::hints::{title_hints, word_hints, Hint};
use crate::model::SessionSnapshot;
use crate::persistence::{SessionStore, Storage};
use crate::{CATEGORY_COUNT, GROUP_SIZE};

/// Owns the engine state for one day's puzzle, and mirrors it into storage
/// after every transition.
pub struct GameSession<S: Storage> {
    state: EngineState,
    store: SessionStore<S>,
    today: PuzzleDate,
    feed: Option<PuzzleFeed>,
    resumed: bool,
}

impl<S: Storage> GameSession<S> {
    pub fn new(storage: S, today: PuzzleDate) -> Self {
        Self {
            state: EngineState::default(),
            store: SessionStore::new(storage),
            today,
            feed: None,
            resumed: false,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn feed(&self) -> Option<&PuzzleFeed> {
        self.feed.as_ref()
    }

    /// Whether a saved session for today was picked up after loading.
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn dispatch(&mut self, action: Action) -> &EngineState {
        let next = reduce(&self.state, action);
        self.commit(next)
    }

    pub fn dispatch_with<R: RngExt + ?Sized>(&mut self, action: Action, rng: &mut R) -> &EngineState {
        let next = reduce_with(&self.state, action, rng);
        self.commit(next)
    }

    fn commit(&mut self, next: EngineState) -> &EngineState {
        let next = if next.completed_groups.len() == CATEGORY_COUNT && !next.game_over {
            info!(incorrect = next.incorrect_count, "puzzle complete");
            reduce(&next, Action::GameOver)
        } else {
            next
        };

        if needs_save(&self.state, &next) {
            match self.store.save(&next, self.today) {
                Ok(true) => debug!(date = ?self.today, "session saved"),
                Ok(false) => {}
                Err(e) => warn!(error = %e, "failed to save session"),
            }
        }

        self.state = next;
        &self.state
    }

    /// Apply the result of the puzzle fetch.
    pub fn on_feed<E: Display>(&mut self, result: Result<PuzzleFeed, E>) {
        let feed = match result {
            Ok(feed) => feed,
            Err(e) => {
                warn!(error = %e, "puzzle request failed");
                self.dispatch(Action::SetError);
                return;
            }
        };

        if !feed.is_ok() {
            warn!(status = %feed.status, "puzzle feed not ready");
            self.dispatch(Action::SetError);
            self.dispatch(Action::LoadFailed);
            return;
        }

        info!(id = feed.id, words = feed.word_count(), "puzzle loaded");
        self.dispatch(Action::LoadPuzzle(feed.clone()));
        self.feed = Some(feed);

        match self.store.load(self.today) {
            Some(snapshot) if fits_puzzle(&snapshot, &self.state) => {
                info!(found = snapshot.completed_groups.len(), "resuming saved session");
                self.dispatch(Action::RestoreSession(snapshot));
                self.resumed = true;
            }
            Some(_) => debug!("discarding session that does not match the puzzle"),
            None => {}
        }
    }

    /// Check the current selection and apply the matching transition. A
    /// counted miss also clears the selection; a repeated guess keeps it.
    pub fn submit(&mut self) -> Option<Verdict> {
        if self.state.game_over {
            return None;
        }
        let verdict = classify(&self.state)?;
        debug!(?verdict, selected = ?self.state.selected, "guess classified");
        if let Some(action) = verdict.action() {
            self.dispatch(action);
        }
        if matches!(verdict, Verdict::Incorrect { .. }) {
            self.dispatch(Action::SetSelected(Vec::new()));
        }
        Some(verdict)
    }

    pub fn word_hints(&self) -> Vec<Hint> {
        self.feed.as_ref().map(word_hints).unwrap_or_default()
    }

    pub fn title_hints(&self) -> Vec<Hint> {
        self.feed
            .as_ref()
            .map(|f| title_hints(f, self.state.incorrect_count))
            .unwrap_or_default()
    }
}

/// A snapshot only restores onto the puzzle it was taken from: the same
/// words and groups, positions forming `0..n`, and completed groups that
/// exist and sit in the front block.
fn fits_puzzle(snapshot: &SessionSnapshot, state: &EngineState) -> bool {
    if snapshot.words.len() != state.words.len() {
        return false;
    }

    let mut contents: Vec<&str> = snapshot.words.iter().map(|w| w.content.as_str()).collect();
    contents.sort_unstable();
    contents.dedup();
    if contents.len() != state.words.len() {
        return false;
    }
    let words_known = snapshot.words.iter().all(|w| {
        state
            .word(&w.content)
            .is_some_and(|known| known.id == w.id && known.group == w.group)
    });
    if !words_known {
        return false;
    }

    let mut positions: Vec<usize> = snapshot.words.iter().map(|w| w.position).collect();
    positions.sort_unstable();
    if positions.iter().enumerate().any(|(i, &p)| i != p) {
        return false;
    }

    let completed = &snapshot.completed_groups;
    if completed.len() > CATEGORY_COUNT {
        return false;
    }
    let front = completed.len() * GROUP_SIZE;
    completed.iter().enumerate().all(|(i, c)| {
        state.groups_by_name.get(&c.group_name) == Some(&c.group)
            && !completed[..i].iter().any(|prev| prev.group_name == c.group_name)
            && snapshot
                .words
                .iter()
                .filter(|w| w.group == c.group_name)
                .all(|w| w.position < front)
    })
}

fn needs_save(prev: &EngineState, next: &EngineState) -> bool {
    next.game_started
        && (!prev.game_started
            || prev.words != next.words
            || prev.completed_groups != next.completed_groups
            || prev.incorrect_count != next.incorrect_count
            || prev.past_guesses != next.past_guesses)
}
