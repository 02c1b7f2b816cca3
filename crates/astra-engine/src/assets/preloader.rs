/// Minimum time the preloader stays up, even when assets are instant.
const MIN_DWELL_MS: f64 = 1000.0;

/// Asset loading progress gate.
///
/// The host reports percentages as assets arrive; the engine activates
/// the first scene once loading hits 100% and at least a second has
/// passed, so the loading screen never flashes.
#[derive(Debug)]
pub struct Preloader {
    progress: f32,
    started_at_ms: f64,
}

impl Preloader {
    pub fn new(now_ms: f64) -> Self {
        Self {
            progress: 0.0,
            started_at_ms: now_ms,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Report loading progress in percent. Regressions are ignored.
    pub fn set_progress(&mut self, percent: f32) {
        if percent < self.progress {
            log::debug!("preloader progress went backwards: {}", percent);
            return;
        }
        self.progress = percent.min(100.0);
    }

    pub fn ready(&self, now_ms: f64) -> bool {
        self.progress >= 100.0 && now_ms - self.started_at_ms >= MIN_DWELL_MS
    }
}
