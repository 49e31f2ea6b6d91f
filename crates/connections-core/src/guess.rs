use std::collections::HashMap;

use crate::engine::{Action, EngineState};
use crate::GROUP_SIZE;

/// Outcome of checking the current four-word selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct { group_name: String },
    Incorrect { one_away: bool },
    AlreadyGuessed,
}

/// Short-lived message shown to the player. Never changes the game result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advisory {
    OneAway,
    AlreadyGuessed,
}

impl Advisory {
    pub fn text(&self) -> &'static str {
        match self {
            Advisory::OneAway => "One away...",
            Advisory::AlreadyGuessed => "Already guessed!",
        }
    }
}

impl Verdict {
    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            Verdict::Incorrect { one_away: true } => Some(Advisory::OneAway),
            Verdict::AlreadyGuessed => Some(Advisory::AlreadyGuessed),
            _ => None,
        }
    }

    /// The engine transition this verdict calls for, if any.
    pub fn action(&self) -> Option<Action> {
        match self {
            Verdict::Correct { group_name } => Some(Action::SubmitGroup(group_name.clone())),
            Verdict::Incorrect { .. } => Some(Action::RecordIncorrectGuess),
            Verdict::AlreadyGuessed => None,
        }
    }
}

/// Classify the current selection. Returns `None` unless exactly four words
/// are selected.
pub fn classify(state: &EngineState) -> Option<Verdict> {
    if state.selected.len() != GROUP_SIZE {
        return None;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for content in &state.selected {
        let word = state.word(content)?;
        *counts.entry(word.group.as_str()).or_insert(0) += 1;
    }

    if counts.len() == 1 {
        let group_name = counts.into_keys().next()?.to_string();
        return Some(Verdict::Correct { group_name });
    }

    if state.has_guessed(&state.selected) {
        return Some(Verdict::AlreadyGuessed);
    }

    let one_away = counts.values().any(|&n| n == GROUP_SIZE - 1);
    Some(Verdict::Incorrect { one_away })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reduce;
    use crate::engine::tests::loaded;

    fn with_selection(words: &[&str]) -> EngineState {
        let list = words.iter().map(|s| s.to_string()).collect();
        reduce(&loaded(), Action::SetSelected(list))
    }

    #[test]
    fn needs_four_words() {
        assert_eq!(classify(&with_selection(&["Bass", "Trout"])), None);
    }

    #[test]
    fn single_group_is_correct() {
        let verdict = classify(&with_selection(&["Trout", "Bass", "Salmon", "Flounder"]));
        assert_eq!(
            verdict,
            Some(Verdict::Correct {
                group_name: "FISH".into()
            })
        );
        assert_eq!(verdict.unwrap().advisory(), None);
    }

    #[test]
    fn three_of_a_group_is_one_away() {
        let verdict = classify(&with_selection(&["Bass", "Salmon", "Trout", "Opal"])).unwrap();
        assert_eq!(verdict, Verdict::Incorrect { one_away: true });
        assert_eq!(verdict.advisory(), Some(Advisory::OneAway));
        assert!(matches!(verdict.action(), Some(Action::RecordIncorrectGuess)));
    }

    #[test]
    fn two_and_two_is_plain_incorrect() {
        let verdict = classify(&with_selection(&["Bass", "Salmon", "Ant", "Opal"])).unwrap();
        assert_eq!(verdict, Verdict::Incorrect { one_away: false });
        assert_eq!(verdict.advisory(), None);
    }

    #[test]
    fn repeated_guess_in_any_order_is_flagged() {
        let state = with_selection(&["Bass", "Salmon", "Trout", "Opal"]);
        let state = reduce(&state, Action::RecordIncorrectGuess);
        let reordered = ["Opal", "Trout", "Bass", "Salmon"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let state = reduce(&state, Action::SetSelected(reordered));

        let verdict = classify(&state).unwrap();
        assert_eq!(verdict, Verdict::AlreadyGuessed);
        assert_eq!(verdict.advisory().unwrap().text(), "Already guessed!");
        assert!(verdict.action().is_none());
    }
}
