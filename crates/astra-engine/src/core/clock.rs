/// Per-scene timer registry with independent accumulators.
///
/// Each subscription fires whenever its own accumulator reaches its
/// interval; subscriptions are not aligned to each other or to any
/// global epoch.
#[derive(Debug, Default)]
pub struct UnalignedClock {
    subs: Vec<Subscription>,
}

#[derive(Debug)]
struct Subscription {
    id: String,
    interval_ms: f32,
    acc_ms: f32,
}

impl UnalignedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer. A duplicate id replaces the old subscription and
    /// is logged, since it usually means a scene forgot to unsubscribe.
    pub fn subscribe(&mut self, id: impl Into<String>, interval_ms: f32) {
        let id = id.into();
        if let Some(existing) = self.subs.iter_mut().find(|s| s.id == id) {
            log::warn!("clock subscription '{}' replaced", id);
            existing.interval_ms = interval_ms;
            existing.acc_ms = 0.0;
            return;
        }
        self.subs.push(Subscription {
            id,
            interval_ms,
            acc_ms: 0.0,
        });
    }

    pub fn unsubscribe(&mut self, id: &str) {
        self.subs.retain(|s| s.id != id);
    }

    /// Advance all accumulators, returning the ids due this step in
    /// registration order. A due accumulator resets to zero.
    pub fn step(&mut self, dt_ms: f32) -> Vec<String> {
        let mut due = Vec::new();
        for sub in &mut self.subs {
            sub.acc_ms += dt_ms;
            if sub.acc_ms >= sub.interval_ms {
                sub.acc_ms = 0.0;
                due.push(sub.id.clone());
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

/// Engine-global coarse ticker: half-second, second and five-second bands.
#[derive(Debug, Default)]
pub struct GlobalClock {
    acc_half: f32,
    acc_second: f32,
    acc_five: f32,
}

/// Which global bands fired during a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTicks {
    pub half_second: bool,
    pub second: bool,
    pub five_seconds: bool,
}

impl GlobalClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, dt_ms: f32) -> ClockTicks {
        let mut ticks = ClockTicks::default();
        self.acc_half += dt_ms;
        if self.acc_half >= 500.0 {
            self.acc_half = 0.0;
            ticks.half_second = true;
        }
        self.acc_second += dt_ms;
        if self.acc_second >= 1000.0 {
            self.acc_second = 0.0;
            ticks.second = true;
        }
        self.acc_five += dt_ms;
        if self.acc_five >= 5000.0 {
            self.acc_five = 0.0;
            ticks.five_seconds = true;
        }
        ticks
    }
}
