/// Nominal duration of one simulation frame in milliseconds (60 fps).
/// All per-frame speeds in the engine are expressed in units per frame at
/// this rate; variable elapsed time is normalized against it.
pub const FRAME_INTERVAL_MS: f32 = 1000.0 / 60.0;

/// What the host loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickDecision {
    /// Run one frame with the given elapsed time, then re-arm.
    Frame { dt: f32, rearm_ms: f32 },
    /// Not enough time elapsed. Re-arm for the remainder.
    Skip { rearm_ms: f32 },
    /// The loop is halted. Do not re-arm.
    Halted,
}

/// Fixed-interval frame scheduler.
///
/// A tick whose elapsed time reaches the interval executes exactly one
/// frame and resets the baseline to the tick timestamp. There is no
/// catch-up: a long stall still produces a single frame, and no residual
/// time carries over.
#[derive(Debug)]
pub struct FrameScheduler {
    interval_ms: f32,
    time_last_frame: f64,
    paused: bool,
    halted: bool,
}

impl FrameScheduler {
    pub fn new(interval_ms: f32, now_ms: f64) -> Self {
        Self {
            interval_ms,
            time_last_frame: now_ms,
            paused: false,
            halted: false,
        }
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    pub fn tick(&mut self, now_ms: f64) -> TickDecision {
        if self.halted {
            return TickDecision::Halted;
        }
        let elapsed = (now_ms - self.time_last_frame) as f32;
        // Re-arm is the remaining slice of the interval, clamped at zero:
        // after a frame (elapsed past the interval) the host comes right
        // back, and clock skew cannot produce a negative delay.
        let rearm_ms = (self.interval_ms - elapsed).max(0.0);
        if elapsed >= self.interval_ms {
            self.time_last_frame = now_ms;
            TickDecision::Frame {
                dt: elapsed,
                rearm_ms,
            }
        } else {
            TickDecision::Skip { rearm_ms }
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Enter pause. Always allowed; focus loss must be able to pause
    /// menus and loading screens too.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Request leaving pause. Refused while the current scene is not
    /// playable; the game resumes only where play can continue.
    pub fn try_unpause(&mut self, scene_playable: bool) -> bool {
        if !scene_playable {
            log::debug!("unpause refused: scene not playable");
            return false;
        }
        self.paused = false;
        true
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Resume from halt. The baseline is resynchronized so the stall does
    /// not register as elapsed frame time.
    pub fn unhalt(&mut self, now_ms: f64) {
        self.halted = false;
        self.time_last_frame = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tick_skips_with_remainder() {
        let mut sched = FrameScheduler::new(FRAME_INTERVAL_MS, 0.0);
        match sched.tick(10.0) {
            TickDecision::Skip { rearm_ms } => {
                assert!((rearm_ms - (FRAME_INTERVAL_MS - 10.0)).abs() < 1e-4)
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn two_short_ticks_run_exactly_one_frame() {
        // 10 ms then 10 more: the second tick crosses the 16.67 ms
        // interval and must produce one frame with no residue.
        let mut sched = FrameScheduler::new(FRAME_INTERVAL_MS, 0.0);
        assert!(matches!(sched.tick(10.0), TickDecision::Skip { .. }));
        match sched.tick(20.0) {
            TickDecision::Frame { dt, .. } => assert!((dt - 20.0).abs() < 1e-4),
            other => panic!("expected frame, got {:?}", other),
        }
        // Baseline reset: the next tick measures from 20 ms, nothing
        // accumulated from the overshoot.
        assert!(matches!(sched.tick(30.0), TickDecision::Skip { .. }));
    }

    #[test]
    fn long_stall_is_a_single_frame() {
        let mut sched = FrameScheduler::new(FRAME_INTERVAL_MS, 0.0);
        match sched.tick(500.0) {
            TickDecision::Frame { dt, rearm_ms } => {
                assert!((dt - 500.0).abs() < 1e-3);
                // The interval is long spent: call back immediately.
                assert_eq!(rearm_ms, 0.0);
            }
            other => panic!("expected frame, got {:?}", other),
        }
        assert!(matches!(sched.tick(505.0), TickDecision::Skip { .. }));
    }

    #[test]
    fn rearm_never_negative() {
        let mut sched = FrameScheduler::new(FRAME_INTERVAL_MS, 100.0);
        // Host clock skew: tick earlier than the baseline.
        match sched.tick(90.0) {
            TickDecision::Skip { rearm_ms } => assert!(rearm_ms >= 0.0),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn unpause_gated_by_playable_scene() {
        let mut sched = FrameScheduler::new(FRAME_INTERVAL_MS, 0.0);
        sched.pause();
        assert!(sched.is_paused());
        // Unpausing on a menu is refused; play cannot resume there.
        assert!(!sched.try_unpause(false));
        assert!(sched.is_paused());
        assert!(sched.try_unpause(true));
        assert!(!sched.is_paused());
    }

    #[test]
    fn unhalt_resyncs_baseline() {
        let mut sched = FrameScheduler::new(FRAME_INTERVAL_MS, 0.0);
        sched.halt();
        assert_eq!(sched.tick(1000.0), TickDecision::Halted);
        sched.unhalt(1000.0);
        // The 1000 ms halt does not count as elapsed time.
        assert!(matches!(sched.tick(1005.0), TickDecision::Skip { .. }));
    }
}
