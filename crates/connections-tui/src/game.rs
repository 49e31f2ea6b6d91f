use std::time::{Duration, Instant};

use chrono::NaiveDate;
use connections_core::hints::Hint;
use connections_core::{Action, EngineState, GameSession, PuzzleDate, PuzzleFeed, Storage, Verdict, Word};
use tracing::debug;

use crate::timers::{TimerId, Timers};

/// Pause between pressing submit and the verdict.
pub const CHECK_DELAY: Duration = Duration::from_millis(1000);
/// How long a wrong guess stays highlighted.
pub const WRONG_DELAY: Duration = Duration::from_millis(2000);
pub const SHUFFLE_DELAY: Duration = Duration::from_millis(500);
pub const TOAST_DELAY: Duration = Duration::from_millis(2300);

pub const BOARD_COLUMNS: usize = 4;

pub const GAME_OVER_MESSAGE: &str = "Good work!";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Menu,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    None,
    Hints,
    HowToPlay,
    QuitConfirm,
}

/// Presentation-only work that runs after a delay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transient {
    ResolveGuess,
    ClearChecking,
    ClearWrong,
    EndShuffle,
    ExpireToast(String),
}

pub struct Game<S: Storage> {
    pub session: GameSession<S>,
    /// Index into the remaining (uncompleted) words in board order.
    pub cursor: usize,
    pub overlay: Overlay,
    /// Words bouncing while a guess is checked.
    pub checking: Vec<String>,
    /// Words shaking after a wrong guess.
    pub wrong: Vec<String>,
    pub shuffling: bool,
    pub toasts: Vec<String>,
    pub revealed_hints: Vec<usize>,
    pub timers: Timers<Transient>,
    pending_guess: Option<TimerId>,
    wrong_timer: Option<TimerId>,
    shuffle_timer: Option<TimerId>,
}

impl<S: Storage> Game<S> {
    pub fn new(storage: S, today: PuzzleDate) -> Self {
        Self {
            session: GameSession::new(storage, today),
            cursor: 0,
            overlay: Overlay::None,
            checking: Vec::new(),
            wrong: Vec::new(),
            shuffling: false,
            toasts: Vec::new(),
            revealed_hints: Vec::new(),
            timers: Timers::new(),
            pending_guess: None,
            wrong_timer: None,
            shuffle_timer: None,
        }
    }

    pub fn state(&self) -> &EngineState {
        self.session.state()
    }

    pub fn screen(&self) -> Screen {
        let state = self.state();
        if state.loading {
            Screen::Loading
        } else if !state.game_started {
            Screen::Menu
        } else {
            Screen::Playing
        }
    }

    pub fn on_feed<E: std::fmt::Display>(&mut self, result: Result<PuzzleFeed, E>) {
        self.session.on_feed(result);
    }

    pub fn start(&mut self) {
        if self.screen() == Screen::Menu {
            self.session.dispatch(Action::StartGame);
        }
    }

    pub fn is_checking(&self) -> bool {
        self.pending_guess.is_some()
    }

    pub fn remaining_words(&self) -> Vec<&Word> {
        self.state().remaining_words()
    }

    pub fn cursor_word(&self) -> Option<String> {
        self.remaining_words()
            .get(self.cursor)
            .map(|w| w.content.clone())
    }

    pub fn move_cursor(&mut self, dr: i32, dc: i32) {
        let count = self.remaining_words().len();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        let rows = count.div_ceil(BOARD_COLUMNS) as i32;
        let row = (self.cursor / BOARD_COLUMNS) as i32;
        let col = (self.cursor % BOARD_COLUMNS) as i32;
        let row = (row + dr).rem_euclid(rows) as usize;
        let col = (col + dc).rem_euclid(BOARD_COLUMNS as i32) as usize;
        self.cursor = (row * BOARD_COLUMNS + col).min(count - 1);
    }

    fn clamp_cursor(&mut self) {
        let count = self.remaining_words().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    pub fn toggle_at_cursor(&mut self) {
        if self.is_checking() {
            return;
        }
        if let Some(content) = self.cursor_word() {
            self.session.dispatch(Action::ToggleSelect(content));
        }
    }

    pub fn deselect_all(&mut self) {
        if self.is_checking() {
            return;
        }
        self.session.dispatch(Action::SetSelected(Vec::new()));
    }

    pub fn shuffle(&mut self, now: Instant) {
        if self.state().game_over || self.is_checking() {
            return;
        }
        self.session.dispatch(Action::Shuffle);
        self.shuffling = true;
        if let Some(id) = self.shuffle_timer.take() {
            self.timers.cancel(id);
        }
        self.shuffle_timer = Some(self.timers.schedule(now, SHUFFLE_DELAY, Transient::EndShuffle));
    }

    /// Start checking the selection. The verdict lands after `CHECK_DELAY`.
    pub fn submit(&mut self, now: Instant) {
        let state = self.state();
        if state.game_over || state.selected.len() != BOARD_COLUMNS || self.is_checking() {
            return;
        }
        self.checking = state.selected.clone();
        self.timers.schedule(now, CHECK_DELAY, Transient::ClearChecking);
        self.pending_guess = Some(self.timers.schedule(now, CHECK_DELAY, Transient::ResolveGuess));
    }

    fn resolve_guess(&mut self, now: Instant) {
        self.pending_guess = None;
        let submitted = self.state().selected.clone();
        let verdict = match self.session.submit() {
            Some(v) => v,
            None => return,
        };
        debug!(?verdict, "guess resolved");

        if let Some(advisory) = verdict.advisory() {
            self.toast(advisory.text(), now);
        }
        if let Verdict::Incorrect { .. } = verdict {
            self.wrong = submitted;
            if let Some(id) = self.wrong_timer.take() {
                self.timers.cancel(id);
            }
            self.wrong_timer = Some(self.timers.schedule(now, WRONG_DELAY, Transient::ClearWrong));
        }
        self.clamp_cursor();
    }

    /// Show `text` unless the same toast is already up.
    pub fn toast(&mut self, text: &str, now: Instant) {
        if self.toasts.iter().any(|t| t == text) {
            return;
        }
        self.toasts.push(text.to_string());
        self.timers
            .schedule(now, TOAST_DELAY, Transient::ExpireToast(text.to_string()));
    }

    /// Run every timer due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for task in self.timers.pop_due(now) {
            self.fire(task, now);
        }
    }

    fn fire(&mut self, task: Transient, now: Instant) {
        match task {
            Transient::ResolveGuess => self.resolve_guess(now),
            Transient::ClearChecking => self.checking.clear(),
            Transient::ClearWrong => {
                self.wrong_timer = None;
                self.wrong.clear();
            }
            Transient::EndShuffle => {
                self.shuffle_timer = None;
                self.shuffling = false;
            }
            Transient::ExpireToast(text) => self.toasts.retain(|t| *t != text),
        }
    }

    pub fn toggle_overlay(&mut self, overlay: Overlay) {
        self.overlay = if self.overlay == overlay {
            Overlay::None
        } else {
            overlay
        };
    }

    pub fn word_hints(&self) -> Vec<Hint> {
        self.session.word_hints()
    }

    pub fn title_hints(&self) -> Vec<Hint> {
        self.session.title_hints()
    }

    pub fn reveal_hint(&mut self, index: usize) {
        if index >= self.word_hints().len() {
            return;
        }
        if let Some(pos) = self.revealed_hints.iter().position(|&i| i == index) {
            self.revealed_hints.remove(pos);
        } else {
            self.revealed_hints.push(index);
        }
    }

    // ── Menu text ────────────────────────────────────────────────────────

    pub fn menu_heading(&self) -> &'static str {
        if self.session.resumed() {
            "Welcome Back"
        } else {
            "Another Connections Clone..."
        }
    }

    pub fn menu_description(&self) -> String {
        if self.session.resumed() {
            format!(
                "You have {}/4 categories. Keep going!",
                self.state().completed_groups.len()
            )
        } else {
            "Group words that share a common thread.".to_string()
        }
    }

    pub fn menu_button(&self) -> &'static str {
        if self.session.resumed() {
            "Continue"
        } else {
            "Play"
        }
    }

    /// "No. 412" / "Edited by ..." / "June 9, 2024" lines for the menu.
    pub fn puzzle_details(&self) -> Option<(u64, String, String)> {
        let feed = self.session.feed()?;
        Some((feed.id, feed.editor.clone(), format_print_date(&feed.print_date)))
    }
}

/// `2024-06-09` -> `June 9, 2024`. Unparseable dates are shown as given.
pub fn format_print_date(print_date: &str) -> String {
    match NaiveDate::parse_from_str(print_date, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => print_date.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use connections_core::feed::{Card, Category};
    use connections_core::MemoryStorage;

    pub(crate) fn feed() -> PuzzleFeed {
        let groups: [(&str, [&str; 4]); 4] = [
            ("FISH", ["Bass", "Flounder", "Salmon", "Trout"]),
            ("FIRE ___", ["Ant", "Drill", "Island", "Opal"]),
            ("HOMOPHONES", ["Hare", "Heir", "Air", "Ere"]),
            ("NBA TEAMS", ["Heat", "Jazz", "Nets", "Suns"]),
        ];
        PuzzleFeed {
            status: "OK".into(),
            id: 412,
            print_date: "2024-06-09".into(),
            editor: "Test Editor".into(),
            categories: groups
                .iter()
                .enumerate()
                .map(|(g, (title, words))| Category {
                    title: title.to_string(),
                    cards: words
                        .iter()
                        .enumerate()
                        .map(|(w, c)| Card {
                            content: c.to_string(),
                            position: g * 4 + w,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub(crate) fn playing() -> Game<MemoryStorage> {
        let mut game = Game::new(MemoryStorage::new(), PuzzleDate::new(2024, 6, 9));
        assert_eq!(game.screen(), Screen::Loading);
        game.on_feed(Ok::<_, String>(feed()));
        assert_eq!(game.screen(), Screen::Menu);
        game.start();
        assert_eq!(game.screen(), Screen::Playing);
        game
    }

    pub(crate) fn select(game: &mut Game<MemoryStorage>, words: &[&str]) {
        let list = words.iter().map(|s| s.to_string()).collect();
        game.session.dispatch(Action::SetSelected(list));
    }

    #[test]
    fn verdict_waits_for_check_delay() {
        let start = Instant::now();
        let mut game = playing();
        select(&mut game, &["Bass", "Flounder", "Salmon", "Trout"]);
        game.submit(start);
        assert!(game.is_checking());
        assert_eq!(game.checking.len(), 4);

        game.toggle_at_cursor();
        assert_eq!(game.state().selected.len(), 4);

        game.tick(start + CHECK_DELAY - Duration::from_millis(1));
        assert!(game.state().completed_groups.is_empty());

        game.tick(start + CHECK_DELAY);
        assert!(!game.is_checking());
        assert!(game.checking.is_empty());
        assert_eq!(game.state().completed_groups.len(), 1);
        assert_eq!(game.remaining_words().len(), 12);
    }

    #[test]
    fn wrong_guess_shakes_then_clears() {
        let start = Instant::now();
        let mut game = playing();
        select(&mut game, &["Bass", "Flounder", "Salmon", "Ant"]);
        game.submit(start);
        let verdict_at = start + CHECK_DELAY;
        game.tick(verdict_at);

        assert_eq!(game.state().incorrect_count, 1);
        assert_eq!(game.wrong.len(), 4);
        assert_eq!(game.toasts, vec!["One away..."]);

        game.tick(verdict_at + WRONG_DELAY);
        assert!(game.wrong.is_empty());
        assert_eq!(game.toasts, vec!["One away..."]);

        game.tick(verdict_at + TOAST_DELAY);
        assert!(game.toasts.is_empty());
    }

    #[test]
    fn repeated_guess_only_toasts() {
        let start = Instant::now();
        let mut game = playing();
        select(&mut game, &["Bass", "Ant", "Hare", "Heat"]);
        game.submit(start);
        game.tick(start + CHECK_DELAY);

        select(&mut game, &["Heat", "Hare", "Ant", "Bass"]);
        let later = start + Duration::from_secs(5);
        game.submit(later);
        game.tick(later + CHECK_DELAY);

        assert_eq!(game.state().incorrect_count, 1);
        assert_eq!(game.toasts, vec!["Already guessed!"]);
        assert!(game.wrong.is_empty());
    }

    #[test]
    fn duplicate_toasts_are_collapsed() {
        let now = Instant::now();
        let mut game = playing();
        game.toast("One away...", now);
        game.toast("One away...", now);
        assert_eq!(game.toasts.len(), 1);
    }

    #[test]
    fn overlapping_shuffles_extend_the_animation() {
        let start = Instant::now();
        let mut game = playing();
        game.shuffle(start);
        game.shuffle(start + Duration::from_millis(400));

        game.tick(start + SHUFFLE_DELAY);
        assert!(game.shuffling);
        game.tick(start + Duration::from_millis(400) + SHUFFLE_DELAY);
        assert!(!game.shuffling);
    }

    #[test]
    fn cursor_wraps_on_the_grid() {
        let mut game = playing();
        game.move_cursor(0, -1);
        assert_eq!(game.cursor, 3);
        game.move_cursor(-1, 0);
        assert_eq!(game.cursor, 15);
        game.move_cursor(1, 1);
        assert_eq!(game.cursor, 0);
        assert_eq!(game.cursor_word().as_deref(), Some("Bass"));
    }

    #[test]
    fn menu_text_reflects_resume() {
        let game = playing();
        assert_eq!(game.menu_heading(), "Another Connections Clone...");
        assert_eq!(game.menu_button(), "Play");
        let (id, editor, date) = game.puzzle_details().unwrap();
        assert_eq!(id, 412);
        assert_eq!(editor, "Test Editor");
        assert_eq!(date, "June 9, 2024");
    }

    #[test]
    fn print_date_falls_back_to_raw_text() {
        assert_eq!(format_print_date("soon"), "soon");
    }
}
