//! Frame driver
//!
//! Called once per display refresh. Runs exactly one fixed simulation step
//! per call, so game speed follows the host's frame rate. A failed frame is
//! logged, its partial mutations kept, and the loop pauses for
//! `ERROR_BACKOFF_MS` before resuming.
//!
//! Panics are only contained where unwinding exists (native builds).
//! wasm32 aborts instead; `crate::wasm` reports that to the host.

use std::panic::{self, AssertUnwindSafe};

use crate::config::GameConfig;
use crate::consts::ERROR_BACKOFF_MS;
use crate::error::{RewardDenied, SimError};
use crate::persistence::Records;
use crate::platform::{LoadingMonitor, LoadingStatus, Storage};
use crate::sim::{GameEvent, GameState, RenderSnapshot, TickInput, tick};

/// What happened on one `frame` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Still loading, nothing simulated
    Loading,
    /// One step ran (it may have been a no-op on menus or while paused)
    Stepped,
    /// Recovering from an earlier failure
    Backoff,
    /// This frame failed and was contained
    Failed,
}

pub struct FrameDriver {
    state: GameState,
    storage: Box<dyn Storage>,
    loading: LoadingMonitor,
    input: TickInput,
    resume_at: Option<f64>,
}

impl FrameDriver {
    pub fn new(config: GameConfig, seed: u64, storage: Box<dyn Storage>, now_ms: f64) -> Self {
        let mut state = GameState::new(config, seed);
        state.records = Records::load(storage.as_ref());
        Self {
            state,
            storage,
            loading: LoadingMonitor::new(now_ms),
            input: TickInput::default(),
            resume_at: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn storage_mut(&mut self) -> &mut dyn Storage {
        self.storage.as_mut()
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot::capture(&self.state)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn set_loading_progress(&mut self, progress: u32, now_ms: f64) {
        self.loading.set_progress(progress, now_ms);
    }

    // === Input (applied on the next step) ===

    pub fn set_move_direction(&mut self, direction: i8) {
        self.input.move_direction = Some(direction);
    }

    pub fn set_vertical_direction(&mut self, direction: i8) {
        self.input.vertical_direction = Some(direction);
    }

    pub fn press_dash(&mut self) {
        self.input.dash = true;
    }

    pub fn press_wave(&mut self) {
        self.input.wave = true;
    }

    pub fn press_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn claim_sidebar_reward(&mut self, now_ms: f64) -> Result<u64, RewardDenied> {
        self.state
            .claim_sidebar_reward(now_ms, self.storage.as_mut())
    }

    /// Start a new round with fresh records
    pub fn restart(&mut self) {
        self.state.restart();
        self.state.records = Records::load(self.storage.as_ref());
        self.input = TickInput::default();
    }

    /// Reset and return to the start screen, dropping held input
    pub fn back_to_menu(&mut self) {
        self.state.back_to_menu();
        self.state.records = Records::load(self.storage.as_ref());
        self.input = TickInput::default();
    }

    /// Advance one display frame
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        if let Some(resume_at) = self.resume_at {
            if now_ms < resume_at {
                return FrameOutcome::Backoff;
            }
            log::info!("Resuming frame loop");
            self.resume_at = None;
        }

        match self.loading.poll(now_ms) {
            LoadingStatus::Loading { .. } => return FrameOutcome::Loading,
            LoadingStatus::Complete { .. } => self.state.finish_loading(),
        }

        let input = std::mem::take(&mut self.input);
        let state = &mut self.state;
        let storage = self.storage.as_mut();
        let result = panic::catch_unwind(AssertUnwindSafe(|| tick(state, &input, storage)))
            .unwrap_or_else(|payload| Err(SimError::Panicked(panic_message(payload.as_ref()))));

        // Held directions persist across frames
        self.input.move_direction = input.move_direction;
        self.input.vertical_direction = input.vertical_direction;

        match result {
            Ok(()) => FrameOutcome::Stepped,
            Err(e) => {
                self.contain(e, now_ms);
                FrameOutcome::Failed
            }
        }
    }

    fn contain(&mut self, error: SimError, now_ms: f64) {
        log::error!("Frame failed: {error}");
        if self.loading.is_loading() {
            log::warn!("Forcing loading to complete after error");
            self.loading.force_complete();
            self.state.finish_loading();
        }
        self.resume_at = Some(now_ms + ERROR_BACKOFF_MS);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
