use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar day a puzzle (and a saved session) belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("missing date component")]
    Missing,
    #[error("year must have exactly four digits")]
    Year,
    #[error("month must have one or two digits between 1 and 12")]
    Month,
    #[error("day must have one or two digits between 1 and 31")]
    Day,
}

impl PuzzleDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Unpadded `Y-M-D` form used in the proxy route.
    pub fn path_segment(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }

    /// Zero-padded `YYYY-MM-DD` form used by the upstream feed.
    pub fn feed_slug(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// Parse the `Y-M-D` route segment. Components are checked before any
    /// value is accepted, so nothing malformed reaches the upstream call.
    pub fn parse_path(segment: &str) -> Result<PuzzleDate, DateError> {
        let mut parts = segment.split('-');
        let (year, month, day) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(y), Some(m), Some(d), None) => (y, m, d),
            _ => return Err(DateError::Missing),
        };
        if year.is_empty() || month.is_empty() || day.is_empty() {
            return Err(DateError::Missing);
        }

        let year = parse_digits(year, 4..=4).ok_or(DateError::Year)?;
        let month = parse_digits(month, 1..=2)
            .filter(|m| (1..=12).contains(m))
            .ok_or(DateError::Month)?;
        let day = parse_digits(day, 1..=2)
            .filter(|d| (1..=31).contains(d))
            .ok_or(DateError::Day)?;

        Ok(PuzzleDate::new(year as i32, month, day))
    }
}

fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unpadded_segment() {
        let date = PuzzleDate::parse_path("2024-6-9").unwrap();
        assert_eq!(date, PuzzleDate::new(2024, 6, 9));
        assert_eq!(date.feed_slug(), "2024-06-09");
        assert_eq!(date.path_segment(), "2024-6-9");
    }

    #[test]
    fn parses_padded_segment() {
        assert_eq!(
            PuzzleDate::parse_path("2023-12-31").unwrap(),
            PuzzleDate::new(2023, 12, 31)
        );
    }

    #[test]
    fn rejects_missing_components() {
        assert_eq!(PuzzleDate::parse_path("2024-6"), Err(DateError::Missing));
        assert_eq!(PuzzleDate::parse_path("2024--9"), Err(DateError::Missing));
        assert_eq!(PuzzleDate::parse_path(""), Err(DateError::Missing));
        assert_eq!(PuzzleDate::parse_path("2024-6-9-1"), Err(DateError::Missing));
    }

    #[test]
    fn rejects_wrong_digit_counts() {
        assert_eq!(PuzzleDate::parse_path("24-6-9"), Err(DateError::Year));
        assert_eq!(PuzzleDate::parse_path("20245-6-9"), Err(DateError::Year));
        assert_eq!(PuzzleDate::parse_path("2024-006-9"), Err(DateError::Month));
        assert_eq!(PuzzleDate::parse_path("2024-6-009"), Err(DateError::Day));
    }

    #[test]
    fn rejects_non_digits_and_out_of_range() {
        assert_eq!(PuzzleDate::parse_path("20x4-6-9"), Err(DateError::Year));
        assert_eq!(PuzzleDate::parse_path("2024-13-9"), Err(DateError::Month));
        assert_eq!(PuzzleDate::parse_path("2024-0-9"), Err(DateError::Month));
        assert_eq!(PuzzleDate::parse_path("2024-6-32"), Err(DateError::Day));
        assert_eq!(PuzzleDate::parse_path("2024-+6-9"), Err(DateError::Month));
    }
}
