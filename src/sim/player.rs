//! Player state machine: movement, dash and wave skill
//!
//! All timers move by the fixed `FRAME_MS` step, never by measured time.

use glam::Vec2;
use serde::Serialize;

use super::collision::Rect;
use crate::config::GameConfig;
use crate::consts::FRAME_MS;
use crate::error::SkillDenied;

/// Dash sub-state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Dash {
    pub is_dashing: bool,
    /// Remaining dash time (ms)
    pub duration: f32,
    /// Remaining cooldown (ms)
    pub cooldown: f32,
}

/// Expanding-ring attack sub-state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WaveSkill {
    pub is_active: bool,
    pub radius: f32,
    /// Remaining active time (ms)
    pub duration: f32,
    /// Remaining cooldown (ms)
    pub cooldown: f32,
    pub center: Vec2,
}

/// The player sprite
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub vertical_speed: f32,
    pub dash_speed: f32,
    pub max_dash_duration: f32,
    /// Horizontal intent in {-1, 0, 1}
    pub move_direction: i8,
    /// Vertical intent in {-1, 0, 1}
    pub vertical_direction: i8,
    pub dash: Dash,
    pub wave: WaveSkill,
    /// Hidden while a revive is pending
    pub visible: bool,
    /// Offset of the hitbox from `pos`
    pub hitbox_offset: Vec2,
    pub hitbox_size: Vec2,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: config.spawn_point(),
            size: Vec2::new(config.player_width, config.player_height),
            speed: config.player_speed,
            vertical_speed: config.player_speed * config.vertical_speed_factor,
            dash_speed: config.player_speed * config.dash_speed_factor,
            max_dash_duration: config.max_dash_duration_ms,
            move_direction: 0,
            vertical_direction: 0,
            dash: Dash::default(),
            wave: WaveSkill::default(),
            visible: true,
            hitbox_offset: Vec2::new(config.hitbox.offset_x, config.hitbox.offset_y),
            hitbox_size: Vec2::new(config.hitbox.width, config.hitbox.height),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Collision rectangle (smaller than the sprite)
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos + self.hitbox_offset, self.hitbox_size)
    }

    /// Start a dash if the cooldown has elapsed. Returns whether it started.
    pub fn start_dash(&mut self) -> bool {
        if self.dash.cooldown > 0.0 {
            return false;
        }
        self.dash.is_dashing = true;
        self.dash.duration = self.max_dash_duration;
        true
    }

    /// Activate the wave centered on the player.
    ///
    /// Does not touch the score: the caller deducts the cost when this
    /// returns `Ok`.
    pub fn use_wave_skill(&mut self, score: u64, config: &GameConfig) -> Result<(), SkillDenied> {
        if score < config.wave_skill_required_score {
            return Err(SkillDenied::InsufficientScore {
                required: config.wave_skill_required_score,
            });
        }
        if self.wave.cooldown > 0.0 {
            return Err(SkillDenied::CoolingDown);
        }

        self.wave.is_active = true;
        self.wave.radius = 0.0;
        self.wave.duration = config.wave_duration_ms;
        self.wave.center = self.center();
        log::debug!("Wave activated at {:?}", self.wave.center);
        Ok(())
    }

    /// Advance dash and wave timers by one frame
    pub fn advance_timers(&mut self, config: &GameConfig) {
        if self.dash.cooldown > 0.0 {
            self.dash.cooldown -= FRAME_MS;
        }
        if self.dash.is_dashing {
            self.dash.duration -= FRAME_MS;
            if self.dash.duration <= 0.0 {
                self.dash.is_dashing = false;
                self.dash.cooldown = config.dash_cooldown_ms;
            }
        }

        if self.wave.cooldown > 0.0 {
            self.wave.cooldown -= FRAME_MS;
        }
        if self.wave.is_active {
            self.wave.radius += config.wave_speed;
            self.wave.duration -= FRAME_MS;
            if self.wave.duration <= 0.0 || self.wave.radius >= config.wave_radius {
                self.wave.is_active = false;
                self.wave.cooldown = config.wave_cooldown_ms;
            }
        }
    }

    /// Apply movement intent, clamped to the playfield
    pub fn advance_position(&mut self, config: &GameConfig) {
        let speed = if self.dash.is_dashing {
            self.dash_speed
        } else {
            self.speed
        };
        let x = self.pos.x + f32::from(self.move_direction) * speed;
        self.pos.x = x.clamp(0.0, config.max_player_x());

        if self.vertical_direction != 0 {
            let vertical_speed = if self.dash.is_dashing {
                self.dash_speed
            } else {
                self.vertical_speed
            };
            let y = self.pos.y + f32::from(self.vertical_direction) * vertical_speed;
            self.pos.y = y.clamp(config.min_player_y, config.max_player_y());
        }
    }

    /// Clear intent, timers and skills, and return to the spawn point
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames_until<F: Fn(&Player) -> bool>(player: &mut Player, config: &GameConfig, done: F) -> u32 {
        let mut frames = 0;
        while !done(player) {
            player.advance_timers(config);
            frames += 1;
            assert!(frames < 10_000, "timer never elapsed");
        }
        frames
    }

    #[test]
    fn test_dash_lifecycle() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);

        assert!(player.start_dash());
        assert!(player.dash.is_dashing);
        assert_eq!(player.dash.duration, 500.0);

        // 500ms at 16.67ms per frame
        let dash_frames = frames_until(&mut player, &config, |p| !p.dash.is_dashing);
        assert_eq!(dash_frames, 30);
        assert_eq!(player.dash.cooldown, 1000.0);

        // Rejected while cooling down, with no state change
        let before = player.dash;
        assert!(!player.start_dash());
        assert_eq!(player.dash, before);

        let cooldown_frames = frames_until(&mut player, &config, |p| p.dash.cooldown <= 0.0);
        assert_eq!(cooldown_frames, 60);
        assert!(player.start_dash());
    }

    #[test]
    fn test_dash_doubles_speed() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        player.move_direction = 1;
        let start = player.pos.x;

        player.advance_position(&config);
        assert_eq!(player.pos.x - start, 8.0);

        player.start_dash();
        let before = player.pos.x;
        player.advance_position(&config);
        assert_eq!(player.pos.x - before, 16.0);
    }

    #[test]
    fn test_vertical_speed_is_slower() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        player.vertical_direction = -1;
        let start = player.pos.y;
        player.advance_position(&config);
        assert!((start - player.pos.y - 6.4).abs() < 1e-4);
    }

    #[test]
    fn test_wave_rejected_when_score_too_low() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        let before = player.wave;

        let result = player.use_wave_skill(9, &config);
        assert_eq!(result, Err(SkillDenied::InsufficientScore { required: 10 }));
        assert_eq!(player.wave, before);
    }

    #[test]
    fn test_wave_rejected_while_cooling_down() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        player.wave.cooldown = 100.0;
        let before = player.wave;

        assert_eq!(player.use_wave_skill(50, &config), Err(SkillDenied::CoolingDown));
        assert_eq!(player.wave, before);
    }

    #[test]
    fn test_wave_expands_then_cools_down() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);

        assert!(player.use_wave_skill(10, &config).is_ok());
        assert!(player.wave.is_active);
        assert_eq!(player.wave.radius, 0.0);
        assert_eq!(player.wave.center, player.center());

        // Radius hits 100 after 20 frames, before the 1000ms duration elapses
        let frames = frames_until(&mut player, &config, |p| !p.wave.is_active);
        assert_eq!(frames, 20);
        assert_eq!(player.wave.radius, 100.0);
        assert_eq!(player.wave.cooldown, 3000.0);
    }

    #[test]
    fn test_reset_returns_to_spawn() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        player.pos = Vec2::new(0.0, 100.0);
        player.move_direction = -1;
        player.start_dash();
        player.visible = false;

        player.reset(&config);
        assert_eq!(player.pos, config.spawn_point());
        assert_eq!(player.move_direction, 0);
        assert!(!player.dash.is_dashing);
        assert!(player.visible);
    }
}
