//! Fixed-step simulation module
//!
//! All gameplay logic lives here:
//! - Fixed 16.67 ms step per tick, no delta-time correction
//! - Seeded RNG only
//! - No rendering or host dependencies beyond the `Storage` trait

pub mod collision;
pub mod effects;
pub mod obstacle;
pub mod player;
pub mod revive;
pub mod score;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_hit, in_wave_ring, wave_sweep};
pub use effects::{Effect, Particle};
pub use obstacle::{Obstacle, SpawnReport, advance_obstacles, find_gaps, spawn_batch};
pub use player::{Dash, Player, WaveSkill};
pub use revive::AdClose;
pub use snapshot::RenderSnapshot;
pub use state::{GameEvent, GameState, ModeFlags, Notice, ReviveAd, Screen};
pub use tick::{TickInput, tick};
