//! Game state and the host-facing event outbox
//!
//! One owner mutates this from one thread; collaborators see it only through
//! snapshots and drained events.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::effects::Effect;
use super::obstacle::Obstacle;
use super::player::Player;
use crate::config::GameConfig;
use crate::error::SkillDenied;
use crate::persistence::Records;

/// Which full-screen view is up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    Loading,
    Start,
    Settings,
    /// Playfield (possibly paused, reviving or game over)
    Game,
}

/// Mode flags as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeFlags {
    pub is_loading: bool,
    pub is_start_screen: bool,
    pub is_settings_screen: bool,
    pub is_game_over: bool,
    pub is_reviving: bool,
    pub is_paused: bool,
}

/// Short non-blocking message for the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub text: String,
    pub duration_ms: u32,
}

/// Requests and notifications for the host, in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Show the revive ad (`attempt` is 0 for the first try)
    ShowReviveAd { attempt: u8 },
    /// Show the reward ad, reloading it first when `reload` is set
    ShowRewardAd { reload: bool },
    ReviveCompleted { fallback: bool },
    PlayerHit { lives: u8 },
    ObstacleDestroyed { pos: Vec2 },
    GameOver { score: u64, new_high_score: bool },
    Notice(Notice),
}

/// Revive ad bookkeeping
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviveAd {
    /// The host created an ad instance
    pub available: bool,
    /// The player finished (or was credited with) the ad
    pub watched: bool,
    /// Show attempts that failed in the current revive
    pub failed_shows: u8,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub seed: u64,
    pub rng: Pcg32,
    pub screen: Screen,
    pub paused: bool,
    pub game_over: bool,
    pub reviving: bool,
    pub score: u64,
    pub lives: u8,
    /// Cosmetic countdown shown while reviving (ms)
    pub revive_countdown: f32,
    pub revive_ad: ReviveAd,
    pub reward_ad_failures: u8,
    pub records: Records,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub effects: Vec<Effect>,
    /// Frames simulated since the round started
    pub frame: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// New state on the loading screen, paused until the player starts
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(&config);
        let lives = config.max_lives;
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            screen: Screen::Loading,
            paused: true,
            game_over: false,
            reviving: false,
            score: 0,
            lives,
            revive_countdown: 0.0,
            revive_ad: ReviveAd::default(),
            reward_ad_failures: 0,
            records: Records::default(),
            player,
            obstacles: Vec::new(),
            effects: Vec::new(),
            frame: 0,
            events: Vec::new(),
        }
    }

    pub fn flags(&self) -> ModeFlags {
        ModeFlags {
            is_loading: self.screen == Screen::Loading,
            is_start_screen: self.screen == Screen::Start,
            is_settings_screen: self.screen == Screen::Settings,
            is_game_over: self.game_over,
            is_reviving: self.reviving,
            is_paused: self.paused,
        }
    }

    /// Whether the playfield advances this frame (reviving still counts down)
    pub fn is_simulating(&self) -> bool {
        self.screen == Screen::Game && !self.paused && !self.game_over
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn notify(&mut self, text: impl Into<String>, duration_ms: u32) {
        self.events.push(GameEvent::Notice(Notice {
            text: text.into(),
            duration_ms,
        }));
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Input operations ===

    pub fn set_move_direction(&mut self, direction: i8) {
        self.player.move_direction = direction.signum();
    }

    pub fn set_vertical_direction(&mut self, direction: i8) {
        self.player.vertical_direction = direction.signum();
    }

    pub fn start_dash(&mut self) -> bool {
        self.player.start_dash()
    }

    /// Cast the wave and pay its cost. Denials become notices.
    pub fn use_wave_skill(&mut self) -> bool {
        match self.player.use_wave_skill(self.score, &self.config) {
            Ok(()) => {
                self.score -= self.config.wave_skill_required_score;
                true
            }
            Err(denied) => {
                let duration_ms = match denied {
                    SkillDenied::InsufficientScore { .. } => 1500,
                    SkillDenied::CoolingDown => 1000,
                };
                self.notify(denied.to_string(), duration_ms);
                false
            }
        }
    }

    // === Screen transitions ===

    /// Loading finished: show the start screen
    pub fn finish_loading(&mut self) {
        if self.screen == Screen::Loading {
            self.screen = Screen::Start;
        }
    }

    pub fn start_game(&mut self) {
        if self.screen == Screen::Start {
            log::info!("Round started (seed {})", self.seed);
            self.screen = Screen::Game;
            self.paused = false;
        }
    }

    pub fn open_settings(&mut self) {
        if self.screen == Screen::Start {
            self.screen = Screen::Settings;
        }
    }

    pub fn go_back(&mut self) {
        if self.screen == Screen::Settings {
            self.screen = Screen::Start;
        }
    }

    /// Ignored while game over or reviving
    pub fn toggle_pause(&mut self) -> bool {
        if self.screen != Screen::Game || self.game_over || self.reviving {
            return false;
        }
        self.paused = !self.paused;
        log::info!("Game {}", if self.paused { "paused" } else { "resumed" });
        true
    }

    /// Fresh round: score, lives, field and player reset
    pub fn restart(&mut self) {
        self.score = 0;
        self.game_over = false;
        self.lives = self.config.max_lives;
        self.reviving = false;
        self.revive_countdown = 0.0;
        self.revive_ad.watched = false;
        self.revive_ad.failed_shows = 0;
        self.obstacles.clear();
        self.effects.clear();
        self.player.reset(&self.config);
        self.frame = 0;
    }

    /// Reset and return to the start screen, paused
    pub fn back_to_menu(&mut self) {
        self.restart();
        self.screen = Screen::Start;
        self.paused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.finish_loading();
        state.start_game();
        state
    }

    #[test]
    fn test_new_state_waits_on_loading() {
        let state = GameState::new(GameConfig::default(), 1);
        let flags = state.flags();
        assert!(flags.is_loading);
        assert!(flags.is_paused);
        assert!(!state.is_simulating());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_screen_flow() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.start_game();
        assert_eq!(state.screen, Screen::Loading);

        state.finish_loading();
        state.open_settings();
        assert!(state.flags().is_settings_screen);
        state.go_back();
        assert!(state.flags().is_start_screen);

        state.start_game();
        assert!(state.is_simulating());
    }

    #[test]
    fn test_wave_cast_deducts_cost() {
        let mut state = playing();
        state.score = 12;

        assert!(state.use_wave_skill());
        assert_eq!(state.score, 2);
        assert!(state.player.wave.is_active);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_wave_denial_leaves_score_and_notifies() {
        let mut state = playing();
        state.score = 9;

        assert!(!state.use_wave_skill());
        assert_eq!(state.score, 9);
        assert!(!state.player.wave.is_active);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::Notice(Notice { duration_ms: 1500, .. })]
        ));
    }

    #[test]
    fn test_pause_blocked_while_reviving() {
        let mut state = playing();
        assert!(state.toggle_pause());
        assert!(state.paused);
        assert!(state.toggle_pause());

        state.reviving = true;
        assert!(!state.toggle_pause());
        assert!(!state.paused);
    }

    #[test]
    fn test_back_to_menu_resets_round() {
        let mut state = playing();
        state.score = 30;
        state.lives = 1;
        state.player.pos = Vec2::new(0.0, 100.0);

        state.back_to_menu();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.player.pos, state.config.spawn_point());
        assert!(state.flags().is_start_screen);
        assert!(state.paused);
    }

    #[test]
    fn test_direction_is_normalized() {
        let mut state = playing();
        state.set_move_direction(5);
        state.set_vertical_direction(-3);
        assert_eq!(state.player.move_direction, 1);
        assert_eq!(state.player.vertical_direction, -1);
    }
}
