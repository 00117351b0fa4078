//! Best-score persistence
//!
//! A single value under a fixed key, stored as a decimal string.

use crate::error::GameError;
use crate::persistence::KeyValueStore;

/// Storage key for the best score
pub const HIGH_SCORE_KEY: &str = "highScore";

/// Parse a stored high score: leading decimal digits, surrounding whitespace ignored
///
/// Anything without leading digits (including negatives) reads as absent.
pub fn parse_high_score(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Read-through/write-through best score
#[derive(Debug)]
pub struct HighScore {
    store: Box<dyn KeyValueStore>,
    value: u64,
}

impl HighScore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let mut high_score = Self { store, value: 0 };
        high_score.reload();
        high_score
    }

    /// Last loaded or committed value
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Stored value, `None` when missing or unparseable
    pub fn read(&self) -> Option<u64> {
        let raw = self.store.get(HIGH_SCORE_KEY)?;
        let parsed = parse_high_score(&raw);
        if parsed.is_none() {
            log::warn!("Ignoring invalid stored high score {:?}", raw);
        }
        parsed
    }

    /// Refresh from storage, falling back to zero
    pub fn reload(&mut self) -> u64 {
        self.value = self.read().unwrap_or(0);
        self.value
    }

    /// Persist a raw value; rejected before touching storage unless it is a
    /// finite non-negative integer
    pub fn store(&mut self, value: f64) -> Result<u64, GameError> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
            return Err(GameError::InvalidHighScore(value));
        }
        let value = value as u64;
        self.store.set(HIGH_SCORE_KEY, &value.to_string())?;
        self.value = value;
        Ok(value)
    }

    /// Keep the larger of `score` and the stored best; true on a new record
    pub fn commit(&mut self, score: u64) -> Result<bool, GameError> {
        let best = self.reload();
        if score > best {
            self.store(score as f64)?;
            log::info!("New high score: {}", score);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_parse_high_score() {
        assert_eq!(parse_high_score("42"), Some(42));
        assert_eq!(parse_high_score(" 7 "), Some(7));
        assert_eq!(parse_high_score("12abc"), Some(12));
        assert_eq!(parse_high_score("abc"), None);
        assert_eq!(parse_high_score(""), None);
        assert_eq!(parse_high_score("-5"), None);
        assert_eq!(parse_high_score("NaN"), None);
    }

    #[test]
    fn test_missing_value_is_zero() {
        let high_score = HighScore::new(Box::new(MemoryStore::new()));
        assert_eq!(high_score.value(), 0);
        assert_eq!(high_score.read(), None);
    }

    #[test]
    fn test_corrupt_value_falls_back_and_is_overwritten() {
        let store = MemoryStore::with_entry(HIGH_SCORE_KEY, "garbage");
        let mut high_score = HighScore::new(Box::new(store.clone()));
        assert_eq!(high_score.value(), 0);
        assert!(high_score.commit(3).unwrap());
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("3"));
    }

    #[test]
    fn test_non_finite_write_rejected() {
        let store = MemoryStore::with_entry(HIGH_SCORE_KEY, "10");
        let mut high_score = HighScore::new(Box::new(store.clone()));
        for bad in [f64::NAN, f64::INFINITY, -1.0, 2.5] {
            assert!(matches!(
                high_score.store(bad),
                Err(GameError::InvalidHighScore(_))
            ));
        }
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("10"));
        assert_eq!(high_score.value(), 10);
    }

    #[test]
    fn test_commit_keeps_maximum() {
        let store = MemoryStore::with_entry(HIGH_SCORE_KEY, "10");
        let mut high_score = HighScore::new(Box::new(store.clone()));
        assert!(!high_score.commit(4).unwrap());
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("10"));
        assert!(high_score.commit(11).unwrap());
        assert_eq!(high_score.value(), 11);
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("11"));
    }
}
