//! Mini-game host bridge (wasm32)
//!
//! The host shim owns the canvas, touch hit-testing and the ad/login APIs.
//! It calls `frame` from its animation callback, forwards input and ad
//! callbacks, renders `snapshot()` and acts on `drain_events()`.
//!
//! wasm32 aborts on panic, so a panicking frame surfaces in the host as a
//! thrown `RuntimeError` and leaves this instance unusable. The host wraps
//! every call in try/catch, checks `has_panicked()`, and builds a fresh
//! `WasmGame` (records survive in LocalStorage).

use std::sync::atomic::{AtomicBool, Ordering};

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::driver::{FrameDriver, FrameOutcome};
use crate::platform::{LocalStorage, MemoryStorage, Storage};
use crate::sim::AdClose;

static PANICKED: AtomicBool = AtomicBool::new(false);

#[wasm_bindgen(start)]
pub fn start() {
    std::panic::set_hook(Box::new(|info| {
        PANICKED.store(true, Ordering::SeqCst);
        console_error_panic_hook::hook(info);
    }));
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Dash Dodge core loaded");
}

/// True once any call has panicked; the current instance must be replaced
#[wasm_bindgen]
pub fn has_panicked() -> bool {
    PANICKED.load(Ordering::SeqCst)
}

#[wasm_bindgen]
pub struct WasmGame {
    driver: FrameDriver,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, revive_ad_available: bool) -> WasmGame {
        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("Bad config, using defaults: {e}");
                GameConfig::default()
            })
        };
        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Some(storage) => Box::new(storage),
            None => {
                log::warn!("LocalStorage unavailable, records will not persist");
                Box::new(MemoryStorage::new())
            }
        };

        let now = js_sys::Date::now();
        PANICKED.store(false, Ordering::SeqCst);
        let mut driver = FrameDriver::new(config, now as u64, storage, now);
        driver.state_mut().revive_ad.available = revive_ad_available;
        WasmGame { driver }
    }

    /// Returns false while loading or backing off after an error
    pub fn frame(&mut self) -> bool {
        self.driver.frame(js_sys::Date::now()) == FrameOutcome::Stepped
    }

    pub fn set_loading_progress(&mut self, progress: u32) {
        self.driver
            .set_loading_progress(progress, js_sys::Date::now());
    }

    pub fn set_move(&mut self, horizontal: i8, vertical: i8) {
        self.driver.set_move_direction(horizontal);
        self.driver.set_vertical_direction(vertical);
    }

    pub fn dash(&mut self) {
        self.driver.press_dash();
    }

    pub fn wave(&mut self) {
        self.driver.press_wave();
    }

    pub fn toggle_pause(&mut self) {
        self.driver.press_pause();
    }

    pub fn start_game(&mut self) {
        self.driver.state_mut().start_game();
    }

    pub fn open_settings(&mut self) {
        self.driver.state_mut().open_settings();
    }

    pub fn go_back(&mut self) {
        self.driver.state_mut().go_back();
    }

    pub fn restart(&mut self) {
        self.driver.restart();
    }

    pub fn back_to_menu(&mut self) {
        self.driver.back_to_menu();
    }

    /// Only acts on the game-over screen
    pub fn revive_now(&mut self) -> bool {
        self.driver.state_mut().revive_now()
    }

    pub fn set_revive_ad_available(&mut self, available: bool) {
        self.driver.state_mut().revive_ad.available = available;
    }

    pub fn on_revive_ad_closed(&mut self, is_ended: bool) {
        self.driver
            .state_mut()
            .on_revive_ad_closed(AdClose { is_ended });
    }

    pub fn on_revive_ad_failed(&mut self) {
        self.driver.state_mut().on_revive_ad_show_failed();
    }

    pub fn request_reward_ad(&mut self) {
        self.driver.state_mut().request_reward_ad();
    }

    pub fn on_reward_ad_closed(&mut self, is_ended: bool) {
        self.driver
            .state_mut()
            .on_reward_ad_closed(AdClose { is_ended });
    }

    pub fn on_reward_ad_failed(&mut self) {
        self.driver.state_mut().on_reward_ad_show_failed();
    }

    /// Granted points, or 0 when still cooling down
    pub fn claim_sidebar_reward(&mut self) -> u32 {
        match self.driver.claim_sidebar_reward(js_sys::Date::now()) {
            Ok(points) => points as u32,
            Err(denied) => {
                log::info!("{denied}");
                0
            }
        }
    }

    pub fn share_bonus(&mut self) {
        self.driver.state_mut().grant_share_bonus();
    }

    /// Render state as JSON
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.driver.snapshot()).unwrap_or_default()
    }

    /// Pending host requests and notices as a JSON array
    pub fn drain_events(&mut self) -> String {
        serde_json::to_string(&self.driver.drain_events()).unwrap_or_else(|_| "[]".into())
    }
}
