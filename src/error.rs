//! Error types
//!
//! Nothing here is fatal: callers log these and fall back to a safe default.

use thiserror::Error;

/// Invalid tuning data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Host key-value storage failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write failed for `{key}`: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Malformed value for `{key}`: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A frame could not be completed
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Player position is not finite: ({x}, {y})")]
    NonFinitePlayer { x: f32, y: f32 },

    #[error("Frame panicked: {0}")]
    Panicked(String),
}

/// Skill activation rejected (informational, shown as a notice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkillDenied {
    #[error("Need {required} points to use the wave")]
    InsufficientScore { required: u64 },

    #[error("Wave skill is cooling down")]
    CoolingDown,
}

/// Reward grant rejected
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RewardDenied {
    #[error("Reward already claimed, try again in {remaining_ms:.0} ms")]
    CoolingDown { remaining_ms: f64 },
}
