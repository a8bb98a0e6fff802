//! Resource loading watchdog
//!
//! Loading always finishes: stalled progress and slow hosts are cut off by
//! wall-clock timeouts.

/// Hard limit on the whole loading phase
pub const LOADING_TIMEOUT_MS: f64 = 10_000.0;
/// How long progress may sit in [90, 100) before it is forced
pub const STALL_TIMEOUT_MS: f64 = 5_000.0;
const STALL_THRESHOLD: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStatus {
    Loading { progress: u8 },
    /// `forced` when a timeout or an error ended loading
    Complete { forced: bool },
}

#[derive(Debug, Clone)]
pub struct LoadingMonitor {
    progress: u8,
    started_at: f64,
    stalled_since: Option<f64>,
    status: LoadingStatus,
}

impl LoadingMonitor {
    pub fn new(now_ms: f64) -> Self {
        Self {
            progress: 0,
            started_at: now_ms,
            stalled_since: None,
            status: LoadingStatus::Loading { progress: 0 },
        }
    }

    pub fn status(&self) -> LoadingStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadingStatus::Loading { .. })
    }

    /// Report progress (percent). Values above 100 are clamped.
    pub fn set_progress(&mut self, progress: u32, now_ms: f64) {
        if !self.is_loading() {
            return;
        }
        if progress > 100 {
            log::warn!("Loading progress {progress}% out of range, clamping to 100%");
        }
        self.progress = progress.min(100) as u8;
        if self.progress >= STALL_THRESHOLD && self.stalled_since.is_none() {
            self.stalled_since = Some(now_ms);
        }
        self.status = LoadingStatus::Loading {
            progress: self.progress,
        };
    }

    /// Check timeouts and completion
    pub fn poll(&mut self, now_ms: f64) -> LoadingStatus {
        if !self.is_loading() {
            return self.status;
        }

        if self.progress >= 100 {
            log::info!("Loading complete");
            self.status = LoadingStatus::Complete { forced: false };
        } else if now_ms - self.started_at > LOADING_TIMEOUT_MS {
            log::warn!("Loading timed out after {LOADING_TIMEOUT_MS} ms, forcing completion");
            self.force_complete();
        } else if self
            .stalled_since
            .is_some_and(|since| now_ms - since > STALL_TIMEOUT_MS)
        {
            log::warn!("Loading stuck at {}%, forcing completion", self.progress);
            self.force_complete();
        }
        self.status
    }

    pub fn force_complete(&mut self) {
        self.progress = 100;
        self.status = LoadingStatus::Complete { forced: true };
    }
}
