#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-effort persistence for the high score and the unlocked level.
//!
//! Values are stored as strings under fixed keys in a [`KeyValueStore`].
//! [`Persistence`] adapts any such store to the game's [`ProgressStore`]
//! contract: read failures fall back to defaults and write failures are
//! logged and swallowed.

mod file;

use std::collections::HashMap;

use ee_dash_core::{ProgressStore, StoredProgress};

pub use file::JsonFileStore;

/// Key holding the best session score.
pub const HIGH_SCORE_KEY: &str = "eeDashHighScore";

/// Key holding the highest unlocked level index.
pub const UNLOCKED_LEVEL_KEY: &str = "eeDashUnlockedLevel";

/// Errors raised by key-value backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend cannot be used at all.
    #[error("storage backend is unavailable")]
    Unavailable,
    /// Reading or writing the backing file failed.
    #[error("storage io failed for {path}: {source}")]
    Io {
        /// File that was accessed.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The backing file does not hold a JSON string map.
    #[error("storage file {path} is malformed: {source}")]
    Malformed {
        /// File that was parsed.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage in the style of browser local storage.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store, optionally simulating an unavailable backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    /// Creates an empty, working store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every operation fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            unavailable: true,
        }
    }

    /// Creates a store pre-populated with raw values.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            unavailable: false,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        let _ = self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Adapts a [`KeyValueStore`] to the game's persistence contract.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S> Persistence<S> {
    /// Wraps the provided store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the wrapped store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Unwraps the persistence adapter.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: KeyValueStore> Persistence<S> {
    fn read_count(&self, key: &str) -> u64 {
        match self.store.get(key) {
            Ok(Some(raw)) => parse_count(&raw),
            Ok(None) => 0,
            Err(error) => {
                tracing::warn!(key, %error, "unable to read stored progress");
                0
            }
        }
    }

    fn write_count(&mut self, key: &str, value: u64) {
        if let Err(error) = self.store.set(key, &value.to_string()) {
            tracing::warn!(key, %error, "unable to persist progress");
        }
    }
}

impl<S: KeyValueStore + std::fmt::Debug> ProgressStore for Persistence<S> {
    fn load(&self) -> StoredProgress {
        let high_score = u32::try_from(self.read_count(HIGH_SCORE_KEY)).unwrap_or(u32::MAX);
        let unlocked_level = usize::try_from(self.read_count(UNLOCKED_LEVEL_KEY)).unwrap_or(0);
        StoredProgress {
            high_score,
            unlocked_level,
        }
    }

    fn save_high_score(&mut self, high_score: u32) {
        self.write_count(HIGH_SCORE_KEY, u64::from(high_score));
    }

    fn save_unlocked_level(&mut self, index: usize) {
        self.write_count(UNLOCKED_LEVEL_KEY, index as u64);
    }
}

/// Parses a stored numeric string.
///
/// Non-numeric, negative and non-finite values read as zero; fractions are floored.
#[must_use]
pub fn parse_count(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.floor() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_count;

    #[test]
    fn stored_counts_are_sanitised() {
        assert_eq!(parse_count("12"), 12);
        assert_eq!(parse_count(" 7 "), 7);
        assert_eq!(parse_count("3.9"), 3);
        assert_eq!(parse_count("-4"), 0);
        assert_eq!(parse_count("NaN"), 0);
        assert_eq!(parse_count("inf"), 0);
        assert_eq!(parse_count("banana"), 0);
        assert_eq!(parse_count(""), 0);
    }
}
