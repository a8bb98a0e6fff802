//! Persisted records
//!
//! The whole persisted footprint is two scalars: the best score and the time
//! the last sidebar reward was claimed. Stored as JSON numbers. Read failures
//! fall back to zero; write failures are logged and dropped.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::platform::Storage;

pub const HIGH_SCORE_KEY: &str = "highScore";
pub const LAST_REWARD_TIME_KEY: &str = "lastRewardTime";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Records {
    pub high_score: u64,
    /// Unix timestamp (ms), 0 when never claimed
    pub last_reward_time: f64,
}

impl Records {
    pub fn load(storage: &dyn Storage) -> Self {
        let records = Self {
            high_score: read_or_default(storage, HIGH_SCORE_KEY),
            last_reward_time: read_or_default(storage, LAST_REWARD_TIME_KEY),
        };
        log::info!(
            "Loaded records: high score {}, last reward at {}",
            records.high_score,
            records.last_reward_time
        );
        records
    }

    /// Store `score` if it beats the stored high score.
    ///
    /// The stored value is re-read so a concurrent writer is never
    /// overwritten by a lower score. Returns true for a new record.
    pub fn submit_score(&mut self, score: u64, storage: &mut dyn Storage) -> bool {
        let previous = read_or_default::<u64>(&*storage, HIGH_SCORE_KEY).max(self.high_score);
        if score <= previous {
            self.high_score = previous;
            return false;
        }

        self.high_score = score;
        if let Err(e) = write(storage, HIGH_SCORE_KEY, &score) {
            log::warn!("Failed to save high score: {e}");
        } else {
            log::info!("New high score: {score}");
        }
        true
    }

    /// Milliseconds until the next reward may be claimed (0 when ready)
    pub fn reward_wait(&self, now_ms: f64, cooldown_ms: f64) -> f64 {
        (self.last_reward_time + cooldown_ms - now_ms).max(0.0)
    }

    pub fn mark_reward_claimed(&mut self, now_ms: f64, storage: &mut dyn Storage) {
        self.last_reward_time = now_ms;
        if let Err(e) = write(storage, LAST_REWARD_TIME_KEY, &now_ms) {
            log::warn!("Failed to save reward time: {e}");
        }
    }
}

fn read<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>, StorageError> {
    match storage.get_item(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Malformed {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

fn read_or_default<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    match read(storage, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            log::warn!("Storage read failed, using default: {e}");
            T::default()
        }
    }
}

fn write<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::WriteFailed {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    storage.set_item(key, &raw)
}
