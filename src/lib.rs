//! Dash Dodge - falling-obstacle dodge mini-game core
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (player, obstacles, skills, revive flow)
//! - `driver`: Per-frame driver with error containment
//! - `platform`: Host contracts (storage, loading monitor)
//! - `persistence`: High score and reward timestamp records
//! - `config`: Data-driven game tuning

pub mod config;
pub mod driver;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::GameConfig;
pub use driver::{FrameDriver, FrameOutcome};
pub use error::{ConfigError, RewardDenied, SimError, SkillDenied, StorageError};
pub use persistence::Records;

/// Game loop constants
pub mod consts {
    /// Fixed simulation step in milliseconds (assumes 60 frames per second)
    pub const FRAME_MS: f32 = 16.67;
    /// Delay before the driver resumes after a failed frame
    pub const ERROR_BACKOFF_MS: f64 = 1000.0;
}
