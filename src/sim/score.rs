//! Score grants from outside the playfield: reward ad, sidebar, share

use super::revive::AdClose;
use super::state::GameEvent;
use super::state::GameState;
use crate::error::RewardDenied;
use crate::platform::Storage;

/// Reward ad show attempts before giving up
const REWARD_AD_ATTEMPTS: u8 = 2;

impl GameState {
    /// Ask the host to show the reward ad
    pub fn request_reward_ad(&mut self) {
        self.reward_ad_failures = 0;
        self.push_event(GameEvent::ShowRewardAd { reload: false });
    }

    /// Host callback: reward ad failed to show. Reloads once, then gives up.
    pub fn on_reward_ad_show_failed(&mut self) {
        self.reward_ad_failures = self.reward_ad_failures.saturating_add(1);
        if self.reward_ad_failures < REWARD_AD_ATTEMPTS {
            log::warn!("Reward ad failed to show, reloading");
            self.push_event(GameEvent::ShowRewardAd { reload: true });
        } else {
            log::warn!("Reward ad failed after reload");
            self.notify("Ad failed to load, please retry", 2000);
        }
    }

    /// Host callback: reward ad closed. Only a full view earns points.
    pub fn on_reward_ad_closed(&mut self, close: AdClose) {
        if close.is_ended {
            self.score += self.config.ad_reward;
            self.notify(format!("+{} points!", self.config.ad_reward), 2000);
        } else {
            self.notify("Watch the whole ad to earn the reward", 2000);
        }
    }

    /// Once per cooldown window; persists the claim time
    pub fn claim_sidebar_reward(
        &mut self,
        now_ms: f64,
        storage: &mut dyn Storage,
    ) -> Result<u64, RewardDenied> {
        let remaining_ms = self
            .records
            .reward_wait(now_ms, self.config.reward_cooldown_ms);
        if remaining_ms > 0.0 {
            return Err(RewardDenied::CoolingDown { remaining_ms });
        }

        let reward = self.config.sidebar_reward;
        self.score += reward;
        self.records.mark_reward_claimed(now_ms, storage);
        log::info!("Sidebar reward claimed: +{reward}");
        Ok(reward)
    }

    pub fn grant_share_bonus(&mut self) -> u64 {
        self.score += self.config.share_bonus;
        self.config.share_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::persistence::LAST_REWARD_TIME_KEY;
    use crate::platform::MemoryStorage;
    use crate::sim::state::Notice;

    const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

    #[test]
    fn test_reward_ad_grants_only_when_watched() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.on_reward_ad_closed(AdClose { is_ended: false });
        assert_eq!(state.score, 0);

        state.on_reward_ad_closed(AdClose { is_ended: true });
        assert_eq!(state.score, 20);
    }

    #[test]
    fn test_reward_ad_reloads_once_then_notifies() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.request_reward_ad();
        state.on_reward_ad_show_failed();
        state.on_reward_ad_show_failed();

        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::ShowRewardAd { reload: false });
        assert_eq!(events[1], GameEvent::ShowRewardAd { reload: true });
        assert!(matches!(&events[2], GameEvent::Notice(Notice { .. })));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_sidebar_reward_once_per_day() {
        let mut storage = MemoryStorage::new();
        let mut state = GameState::new(GameConfig::default(), 1);
        let now = 1_700_000_000_000.0;

        assert_eq!(state.claim_sidebar_reward(now, &mut storage), Ok(100));
        assert_eq!(state.score, 100);
        assert!(storage.get_item(LAST_REWARD_TIME_KEY).unwrap().is_some());

        let denied = state.claim_sidebar_reward(now + 1_000.0, &mut storage);
        assert!(matches!(denied, Err(RewardDenied::CoolingDown { .. })));
        assert_eq!(state.score, 100);

        assert_eq!(state.claim_sidebar_reward(now + DAY_MS, &mut storage), Ok(100));
        assert_eq!(state.score, 200);
    }

    #[test]
    fn test_share_bonus() {
        let mut state = GameState::new(GameConfig::default(), 1);
        assert_eq!(state.grant_share_bonus(), 10);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_repeated_reward_ad_failures_stay_quiet() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.request_reward_ad();
        for _ in 0..300 {
            state.on_reward_ad_show_failed();
        }

        let events = state.drain_events();
        let reloads = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ShowRewardAd { reload: true }))
            .count();
        assert_eq!(reloads, 1);
        assert_eq!(events.len(), 301);
    }
}
