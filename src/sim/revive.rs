//! Life and revive sequencing
//!
//! Alive -> (hit, lives left) -> Reviving -> (ad watched or fallback) -> Alive
//! Alive -> (hit, no lives left) -> GameOver
//!
//! A failing or missing ad never blocks the revive: it falls back to
//! completing as if the ad had been watched.

use super::state::{GameEvent, GameState};
use crate::consts::FRAME_MS;
use crate::platform::Storage;

/// Show attempts before giving up on the revive ad
const REVIVE_AD_ATTEMPTS: u8 = 2;

/// Result of an ad playback, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdClose {
    /// Played to the end (false on early exit)
    pub is_ended: bool,
}

impl GameState {
    /// Player touched an obstacle
    pub fn on_collision(&mut self, storage: &mut dyn Storage) {
        if self.lives > 0 {
            self.lives -= 1;
            self.push_event(GameEvent::PlayerHit { lives: self.lives });
            if self.lives > 0 {
                self.start_revive();
                return;
            }
        }
        self.enter_game_over(storage);
    }

    fn enter_game_over(&mut self, storage: &mut dyn Storage) {
        self.game_over = true;
        let new_high_score = self.records.submit_score(self.score, storage);
        log::info!("Game over with score {}", self.score);
        self.push_event(GameEvent::GameOver {
            score: self.score,
            new_high_score,
        });
        self.notify(format!("Game over, score: {}", self.score), 2000);
    }

    /// Clear the field, hide the player and ask the host for the revive ad
    pub fn start_revive(&mut self) {
        self.reviving = true;
        self.revive_countdown = self.config.revive_delay_ms;
        self.player.visible = false;
        self.obstacles.clear();
        self.player.pos.x = (self.config.width - self.player.size.x) / 2.0;
        self.revive_ad.failed_shows = 0;
        log::info!("Reviving, {} lives left", self.lives);

        if self.revive_ad.available {
            self.push_event(GameEvent::ShowReviveAd { attempt: 0 });
        } else {
            log::info!("No revive ad instance, skipping ad");
            self.fallback_revive();
        }
    }

    /// Finish the revive unless an ad is still owed.
    ///
    /// Returns whether the revive completed.
    pub fn complete_revive(&mut self) -> bool {
        if self.revive_ad.available && !self.revive_ad.watched {
            return false;
        }

        self.revive_ad.watched = false;
        self.reviving = false;
        self.player.visible = true;
        self.revive_countdown = 0.0;
        self.lives = 1;
        self.game_over = false;
        self.player.pos = self.config.spawn_point();
        true
    }

    /// Credit the ad as watched and complete the revive anyway
    pub fn fallback_revive(&mut self) {
        log::info!("Reviving without ad");
        self.revive_ad.watched = true;
        if self.complete_revive() {
            self.push_event(GameEvent::ReviveCompleted { fallback: true });
        }
    }

    /// Host callback: the revive ad closed
    pub fn on_revive_ad_closed(&mut self, close: AdClose) {
        if !self.reviving {
            log::debug!("Revive ad closed outside a revive, ignoring");
            return;
        }
        if close.is_ended {
            self.revive_ad.watched = true;
            if self.complete_revive() {
                self.push_event(GameEvent::ReviveCompleted { fallback: false });
            }
        } else {
            self.revive_ad.watched = false;
            self.fallback_revive();
        }
    }

    /// Host callback: `show()` for the revive ad rejected. Retries once.
    pub fn on_revive_ad_show_failed(&mut self) {
        if !self.reviving {
            return;
        }
        self.revive_ad.failed_shows += 1;
        if self.revive_ad.failed_shows < REVIVE_AD_ATTEMPTS {
            log::warn!("Revive ad failed to show, retrying");
            self.push_event(GameEvent::ShowReviveAd {
                attempt: self.revive_ad.failed_shows,
            });
        } else {
            log::warn!("Revive ad failed to show, falling back");
            self.fallback_revive();
        }
    }

    /// Per-frame countdown while reviving.
    ///
    /// Reaching zero only attempts the revive; with an ad still owed it
    /// keeps waiting for the ad callback.
    pub fn advance_revive(&mut self) {
        self.revive_countdown -= FRAME_MS;
        if self.revive_countdown <= 0.0 && self.complete_revive() {
            self.push_event(GameEvent::ReviveCompleted { fallback: false });
        }
    }

    /// Revive straight from the game-over screen. Ignored mid-round.
    pub fn revive_now(&mut self) -> bool {
        if !self.game_over {
            return false;
        }
        self.lives = 1;
        self.game_over = false;
        self.reviving = false;
        self.player.visible = true;
        self.player.pos = self.config.spawn_point();
        true
    }
}
