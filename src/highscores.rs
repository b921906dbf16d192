//! High score record
//!
//! Persisted under a single key as a versioned envelope. Older builds wrote
//! a bare integer, sometimes under `highScore`; those are still read and
//! rewritten in the current format on the next save.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, PersistenceError};

/// Storage key
pub const STORAGE_KEY: &str = "highscore";
/// Keys written by older builds
const LEGACY_KEYS: &[&str] = &["highScore"];
/// Envelope version of the current schema
pub const SCHEMA_VERSION: u32 = 1;

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Check if a score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Raise the record if `score` beats it. Returns true when it did.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Parse a stored value in the current or legacy format
    pub fn parse(raw: &str) -> Result<Self, PersistenceError> {
        match persistence::decode::<HighScore>(raw, SCHEMA_VERSION) {
            Ok(score) => Ok(score),
            Err(err) => parse_legacy(raw).ok_or(err),
        }
    }

    /// Load from storage; anything missing or unreadable counts as 0
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        for key in std::iter::once(STORAGE_KEY).chain(LEGACY_KEYS.iter().copied()) {
            match store.get(key) {
                Ok(Some(raw)) => match Self::parse(&raw) {
                    Ok(score) => {
                        log::info!("Loaded high score {} from {:?}", score.best, key);
                        return score;
                    }
                    Err(err) => log::warn!("Ignoring stored high score under {:?}: {}", key, err),
                },
                Ok(None) => {}
                Err(err) => {
                    log::warn!("High score unavailable: {}", err);
                    return Self::default();
                }
            }
        }

        log::info!("No high score found, starting fresh");
        Self::default()
    }

    /// Write the record and drop any legacy copies
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), PersistenceError> {
        let raw = persistence::encode(SCHEMA_VERSION, self)?;
        store.set(STORAGE_KEY, &raw)?;
        for key in LEGACY_KEYS {
            store.remove(key)?;
        }
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}

/// Bare number as written by older builds
fn parse_legacy(raw: &str) -> Option<HighScore> {
    let raw = raw.trim();
    if let Ok(best) = raw.parse::<u64>() {
        return Some(HighScore::new(best));
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(HighScore::new(value.floor() as u64))
    } else {
        None
    }
}
