//! Read-only view handed to the renderer once per frame

use serde::Serialize;

use super::effects::Effect;
use super::obstacle::Obstacle;
use super::player::Player;
use super::state::{GameState, ModeFlags};

#[derive(Debug, Serialize)]
pub struct RenderSnapshot<'a> {
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub effects: &'a [Effect],
    pub lives: u8,
    pub score: u64,
    pub high_score: u64,
    pub flags: ModeFlags,
    pub revive_countdown_ms: f32,
}

impl<'a> RenderSnapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            player: &state.player,
            obstacles: &state.obstacles,
            effects: &state.effects,
            lives: state.lives,
            score: state.score,
            high_score: state.records.high_score.max(state.score),
            flags: state.flags(),
            revive_countdown_ms: state.revive_countdown.max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_snapshot_serializes_flags_and_player() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.score = 12;
        state.revive_countdown = -5.0;

        let json = serde_json::to_value(RenderSnapshot::capture(&state)).unwrap();
        assert_eq!(json["score"], 12);
        assert_eq!(json["high_score"], 12);
        assert_eq!(json["flags"]["is_loading"], true);
        assert_eq!(json["revive_countdown_ms"], 0.0);
        assert_eq!(json["player"]["visible"], true);
    }
}
