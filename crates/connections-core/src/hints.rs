use crate::difficulty::Difficulty;
use crate::feed::PuzzleFeed;

/// Incorrect guesses needed before category titles are offered as hints.
pub const TITLE_HINT_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub difficulty: Difficulty,
    pub text: String,
}

/// One word per category. Category `i` reveals its `i`-th card by position,
/// so each level points at a different slot.
pub fn word_hints(feed: &PuzzleFeed) -> Vec<Hint> {
    feed.categories
        .iter()
        .enumerate()
        .filter_map(|(i, category)| {
            let mut cards: Vec<_> = category.cards.iter().collect();
            cards.sort_by_key(|c| c.position);
            let card = cards.get(i).or(cards.last())?;
            Some(Hint {
                difficulty: Difficulty::from_index(i),
                text: card.content.clone(),
            })
        })
        .collect()
}

/// Category titles, once the player has struggled long enough.
pub fn title_hints(feed: &PuzzleFeed, incorrect_count: u32) -> Vec<Hint> {
    if incorrect_count < TITLE_HINT_THRESHOLD {
        return Vec::new();
    }
    feed.categories
        .iter()
        .enumerate()
        .map(|(i, category)| Hint {
            difficulty: Difficulty::from_index(i),
            text: category.title.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::sample_feed;

    #[test]
    fn each_level_reveals_a_different_slot() {
        let hints = word_hints(&sample_feed());
        let texts: Vec<&str> = hints.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Bass", "Drill", "Air", "Suns"]);
        assert_eq!(hints[3].difficulty, Difficulty::Tricky);
    }

    #[test]
    fn titles_unlock_after_five_misses() {
        let feed = sample_feed();
        assert!(title_hints(&feed, 4).is_empty());
        let titles = title_hints(&feed, 5);
        assert_eq!(titles.len(), 4);
        assert_eq!(titles[0].text, "FISH");
        assert_eq!(titles[0].difficulty.label(), "Straightforward");
    }
}
