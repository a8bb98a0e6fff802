//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one frame.

use super::collision::{first_hit, wave_sweep};
use super::effects::{Effect, update_effects};
use super::obstacle::{advance_obstacles, spawn_batch};
use super::state::{GameEvent, GameState};
use crate::error::SimError;
use crate::platform::Storage;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New horizontal intent, if it changed
    pub move_direction: Option<i8>,
    /// New vertical intent, if it changed
    pub vertical_direction: Option<i8>,
    /// Dash button pressed
    pub dash: bool,
    /// Wave button pressed
    pub wave: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed step
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    storage: &mut dyn Storage,
) -> Result<(), SimError> {
    if input.pause {
        state.toggle_pause();
    }

    // Don't tick on menus, while paused or after game over
    if !state.is_simulating() {
        return Ok(());
    }

    if state.reviving {
        state.advance_revive();
        update_effects(&mut state.effects);
        return Ok(());
    }

    state.frame += 1;

    // Input
    if let Some(direction) = input.move_direction {
        state.set_move_direction(direction);
    }
    if let Some(direction) = input.vertical_direction {
        state.set_vertical_direction(direction);
    }
    if input.dash {
        state.start_dash();
    }
    if input.wave {
        state.use_wave_skill();
    }

    // Player timers and movement
    state.player.advance_timers(&state.config);
    state.player.advance_position(&state.config);

    // Wave ring vs obstacles
    if state.player.wave.is_active {
        sweep_wave(state);
    }
    update_effects(&mut state.effects);

    // Obstacle field
    state.score += advance_obstacles(&mut state.obstacles, state.config.height);
    if state.obstacles.len() < state.config.max_live_obstacles {
        spawn_batch(&mut state.obstacles, &state.config, &mut state.rng);
    }

    // Player vs obstacles: one hit per frame at most
    if let Some(index) = first_hit(&state.player.hitbox(), &state.obstacles) {
        log::debug!("Player hit obstacle {index} on frame {}", state.frame);
        state.on_collision(storage);
    }

    check_player(state)
}

fn sweep_wave(state: &mut GameState) {
    let wave = state.player.wave;
    if !wave.center.is_finite() || !wave.radius.is_finite() {
        log::warn!("Skipping wave sweep, bad geometry: {:?}", wave);
        return;
    }

    let hit = wave_sweep(
        &mut state.obstacles,
        wave.center,
        wave.radius,
        state.config.wave_ring_half_width,
    );
    for obstacle in &hit {
        state.score += 1;
        state.effects.push(Effect::burst(obstacle, &mut state.rng));
        state.push_event(GameEvent::ObstacleDestroyed {
            pos: obstacle.rect().center(),
        });
    }
}

/// A non-finite player position cannot be recovered in place: put the
/// player back on the spawn point and report the frame as failed.
fn check_player(state: &mut GameState) -> Result<(), SimError> {
    let pos = state.player.pos;
    if pos.is_finite() {
        return Ok(());
    }
    state.player.pos = state.config.spawn_point();
    Err(SimError::NonFinitePlayer { x: pos.x, y: pos.y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::platform::MemoryStorage;
    use crate::sim::obstacle::Obstacle;
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(GameConfig::default(), seed);
        state.finish_loading();
        state.start_game();
        state
    }

    fn obstacle_at(pos: Vec2) -> Obstacle {
        Obstacle {
            pos,
            size: Vec2::new(40.0, 48.0),
            speed: 0.0,
            kind: 0,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_no_tick_before_start() {
        let mut storage = MemoryStorage::new();
        let mut state = GameState::new(GameConfig::default(), 1);
        tick(&mut state, &TickInput::default(), &mut storage).unwrap();
        assert_eq!(state.frame, 0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_tick_spawns_obstacles() {
        let mut storage = MemoryStorage::new();
        let mut state = playing(1);
        tick(&mut state, &TickInput::default(), &mut storage).unwrap();
        assert_eq!(state.frame, 1);
        assert!(!state.obstacles.is_empty());
        assert!(state.obstacles.iter().all(|o| o.pos.y < 0.0));
    }

    #[test]
    fn test_tick_pause() {
        let mut storage = MemoryStorage::new();
        let mut state = playing(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, &mut storage).unwrap();
        assert!(state.paused);
        assert_eq!(state.frame, 0);

        tick(&mut state, &TickInput::default(), &mut storage).unwrap();
        assert_eq!(state.frame, 0);

        // Unpause
        tick(&mut state, &pause, &mut storage).unwrap();
        assert!(!state.paused);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_wave_destroys_obstacle_on_ring() {
        let mut storage = MemoryStorage::new();
        let mut state = playing(2);
        state.score = 10;
        let center = state.player.center();

        // Obstacle centered 5px out: hit on the first expansion (radius 5)
        let on_ring = obstacle_at(center + Vec2::new(5.0, 0.0) - Vec2::new(20.0, 24.0));
        // Obstacle centered 200px out: beyond the max radius
        let far = obstacle_at(center - Vec2::new(0.0, 200.0) - Vec2::new(20.0, 24.0));
        state.obstacles = vec![on_ring, far.clone(), far.clone(), far.clone(), far.clone(), far];

        let input = TickInput {
            wave: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut storage).unwrap();

        // 10 - 10 for the cast + 1 for the kill
        assert_eq!(state.score, 1);
        assert_eq!(state.effects.len(), 1);
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleDestroyed { .. }))
        );
    }

    #[test]
    fn test_ring_edge_exactly_at_radius_plus_sixteen_survives() {
        let mut state = playing(2);
        state.player.wave.is_active = true;
        state.player.wave.center = Vec2::new(100.0, 300.0);
        state.player.wave.radius = 50.0;

        let half = Vec2::new(20.0, 24.0);
        state.obstacles = vec![
            obstacle_at(Vec2::new(150.0, 300.0) - half),
            obstacle_at(Vec2::new(166.0, 300.0) - half),
        ];

        sweep_wave(&mut state);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].rect().center(), Vec2::new(166.0, 300.0));
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_bad_wave_geometry_skipped() {
        let mut state = playing(2);
        state.player.wave.is_active = true;
        state.player.wave.center = Vec2::new(f32::NAN, 0.0);
        state.obstacles = vec![obstacle_at(Vec2::ZERO)];

        sweep_wave(&mut state);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_collision_triggers_revive() {
        let mut storage = MemoryStorage::new();
        let mut state = playing(3);
        let hitbox = state.player.hitbox();
        state.obstacles = vec![obstacle_at(hitbox.pos); 6];

        tick(&mut state, &TickInput::default(), &mut storage).unwrap();
        // No ad instance: revive completes at once
        assert_eq!(state.lives, 1);
        assert!(state.obstacles.is_empty());
        assert!(!state.game_over);
    }

    #[test]
    fn test_reviving_only_counts_down() {
        let mut storage = MemoryStorage::new();
        let mut state = playing(3);
        state.revive_ad.available = true;
        let hitbox = state.player.hitbox();
        state.obstacles = vec![obstacle_at(hitbox.pos); 6];
        tick(&mut state, &TickInput::default(), &mut storage).unwrap();
        assert!(state.reviving);

        let frame = state.frame;
        tick(&mut state, &TickInput::default(), &mut storage).unwrap();
        assert_eq!(state.frame, frame);
        assert!(state.obstacles.is_empty());
        assert!((state.revive_countdown - (2000.0 - 16.67)).abs() < 1e-3);
    }

    #[test]
    fn test_non_finite_player_reported_and_reset() {
        let mut storage = MemoryStorage::new();
        let mut state = playing(4);
        state.player.speed = f32::NAN;
        state.set_move_direction(1);

        let result = tick(&mut state, &TickInput::default(), &mut storage);
        assert!(matches!(result, Err(SimError::NonFinitePlayer { .. })));
        assert_eq!(state.player.pos, state.config.spawn_point());
    }

    #[test]
    fn test_determinism() {
        let mut storage1 = MemoryStorage::new();
        let mut storage2 = MemoryStorage::new();
        let mut state1 = playing(99999);
        let mut state2 = playing(99999);

        let inputs = [
            TickInput {
                move_direction: Some(1),
                ..Default::default()
            },
            TickInput {
                dash: true,
                ..Default::default()
            },
            TickInput {
                vertical_direction: Some(-1),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, &mut storage1).unwrap();
                tick(&mut state2, input, &mut storage2).unwrap();
            }
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
        assert_eq!(state1.player.pos, state2.player.pos);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            seed in any::<u64>(),
            moves in prop::collection::vec((-1i8..=1, -1i8..=1, any::<bool>()), 1..200),
        ) {
            let mut storage = MemoryStorage::new();
            let mut state = playing(seed);
            let max_x = state.config.max_player_x();
            let (min_y, max_y) = (state.config.min_player_y, state.config.max_player_y());

            for (h, v, dash) in moves {
                let input = TickInput {
                    move_direction: Some(h),
                    vertical_direction: Some(v),
                    dash,
                    ..Default::default()
                };
                tick(&mut state, &input, &mut storage).unwrap();
                if state.game_over {
                    state.restart();
                }
                let pos = state.player.pos;
                prop_assert!(pos.x >= 0.0 && pos.x <= max_x);
                prop_assert!(pos.y >= min_y && pos.y <= max_y);
            }
        }
    }
}
