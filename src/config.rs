//! Game tuning
//!
//! Every value has a default matching the shipped game; a JSON document can
//! override any subset of them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Player hitbox, inset inside the sprite bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxConfig {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for HitboxConfig {
    fn default() -> Self {
        Self {
            offset_x: 15.0,
            offset_y: 15.0,
            width: 30.0,
            height: 50.0,
        }
    }
}

/// Static tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub width: f32,
    pub height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal base speed (pixels per frame)
    pub player_speed: f32,
    /// Vertical speed as a fraction of `player_speed`
    pub vertical_speed_factor: f32,
    /// Dash speed as a multiple of `player_speed`
    pub dash_speed_factor: f32,
    pub hitbox: HitboxConfig,
    /// Closest the player may get to the top edge
    pub min_player_y: f32,
    /// Gap kept between the player and the bottom edge
    pub bottom_margin: f32,
    /// Spawn point distance from the bottom edge
    pub spawn_offset_bottom: f32,

    // === Lives ===
    pub max_lives: u8,
    pub revive_delay_ms: f32,

    // === Dash ===
    pub max_dash_duration_ms: f32,
    pub dash_cooldown_ms: f32,

    // === Wave skill ===
    pub wave_skill_required_score: u64,
    pub wave_radius: f32,
    /// Radius growth per frame
    pub wave_speed: f32,
    pub wave_duration_ms: f32,
    pub wave_cooldown_ms: f32,
    /// Half thickness of the ring that destroys obstacles
    pub wave_ring_half_width: f32,

    // === Obstacles ===
    pub max_live_obstacles: usize,
    pub spawn_sections: usize,
    pub max_spawn_batch: usize,
    pub obstacle_min_width: f32,
    pub obstacle_max_width: f32,
    pub obstacle_aspect: f32,
    pub obstacle_min_speed: f32,
    pub obstacle_max_speed: f32,
    /// Extra room beyond the player width a passable gap needs
    pub gap_margin: f32,

    // === Rewards ===
    pub sidebar_reward: u64,
    pub ad_reward: u64,
    pub share_bonus: u64,
    pub reward_cooldown_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 375.0,
            height: 667.0,

            player_width: 60.0,
            player_height: 80.0,
            player_speed: 8.0,
            vertical_speed_factor: 0.8,
            dash_speed_factor: 2.0,
            hitbox: HitboxConfig::default(),
            min_player_y: 100.0,
            bottom_margin: 20.0,
            spawn_offset_bottom: 120.0,

            max_lives: 3,
            revive_delay_ms: 2000.0,

            max_dash_duration_ms: 500.0,
            dash_cooldown_ms: 1000.0,

            wave_skill_required_score: 10,
            wave_radius: 100.0,
            wave_speed: 5.0,
            wave_duration_ms: 1000.0,
            wave_cooldown_ms: 3000.0,
            wave_ring_half_width: 15.0,

            max_live_obstacles: 6,
            spawn_sections: 4,
            max_spawn_batch: 3,
            obstacle_min_width: 40.0,
            obstacle_max_width: 60.0,
            obstacle_aspect: 1.2,
            obstacle_min_speed: 3.0,
            obstacle_max_speed: 5.0,
            gap_margin: 40.0,

            sidebar_reward: 100,
            ad_reward: 20,
            share_bonus: 10,
            reward_cooldown_ms: 24.0 * 60.0 * 60.0 * 1000.0,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(invalid("width/height", "must be positive"));
        }
        if self.player_width > self.width {
            return Err(invalid("player_width", "must fit the playfield"));
        }
        if self.min_player_y > self.max_player_y() {
            return Err(invalid("min_player_y", "leaves no vertical room"));
        }
        if self.spawn_sections == 0 {
            return Err(invalid("spawn_sections", "must be at least 1"));
        }
        // Section sampling is without replacement
        if self.max_spawn_batch == 0 || self.max_spawn_batch > self.spawn_sections {
            return Err(invalid(
                "max_spawn_batch",
                format!("must be in 1..={}", self.spawn_sections),
            ));
        }
        if self.obstacle_min_width >= self.obstacle_max_width {
            return Err(invalid("obstacle_min_width", "must be below obstacle_max_width"));
        }
        if self.obstacle_max_width > self.section_width() {
            return Err(invalid("obstacle_max_width", "must fit inside one section"));
        }
        if self.obstacle_min_speed >= self.obstacle_max_speed {
            return Err(invalid("obstacle_min_speed", "must be below obstacle_max_speed"));
        }
        Ok(())
    }

    /// Default spawn point (top-left of the sprite)
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(
            (self.width - self.player_width) / 2.0,
            self.height - self.spawn_offset_bottom,
        )
    }

    pub fn max_player_x(&self) -> f32 {
        self.width - self.player_width
    }

    pub fn max_player_y(&self) -> f32 {
        self.height - self.player_height - self.bottom_margin
    }

    pub fn section_width(&self) -> f32 {
        self.width / self.spawn_sections as f32
    }

    /// Narrowest horizontal gap the player can pass through
    pub fn min_gap(&self) -> f32 {
        self.player_width + self.gap_margin
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
