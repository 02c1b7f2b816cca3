//! Engine-level input state: the pressed set with repeat suppression,
//! the recent-press ring buffer feeding combo detection, and pointer
//! handling with coordinate correction.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;

use crate::input::keys::KeyCode;
use crate::input::router::{Notification, SceneInput};

/// Presses remembered for consecutive combos.
const RECENT_CAP: usize = 10;
/// The ring resets after this much silence.
const RECENT_STALE_MS: f64 = 1000.0;
/// Clicks are ignored this long after a viewport resize.
const RESIZE_SETTLE_MS: f64 = 1000.0;

#[derive(Debug)]
pub struct InputController {
    pressed: HashSet<KeyCode>,
    recent: VecDeque<KeyCode>,
    last_press_ms: f64,
    resize_settle_until_ms: f64,
    /// Top-left of the canvas in page coordinates.
    canvas_offset: Vec2,
    /// Page scroll at the time of the last update.
    scroll_offset: Vec2,
    canvas_size: Vec2,
}

impl InputController {
    pub fn new(canvas_size: Vec2) -> Self {
        Self {
            pressed: HashSet::new(),
            recent: VecDeque::with_capacity(RECENT_CAP),
            last_press_ms: 0.0,
            resize_settle_until_ms: 0.0,
            canvas_offset: Vec2::ZERO,
            scroll_offset: Vec2::ZERO,
            canvas_size,
        }
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Track a key as held without routing it. Returns false when the
    /// key was already down, so callers can drop auto-repeat events.
    pub fn mark_pressed(&mut self, key: KeyCode) -> bool {
        self.pressed.insert(key)
    }

    /// Handle a key-down. Held-key repeats are suppressed: only the
    /// first down event until the matching key-up produces output.
    pub fn key_down(
        &mut self,
        key: KeyCode,
        now_ms: f64,
        router: &mut SceneInput,
        paused: bool,
    ) -> Vec<Notification> {
        if !self.pressed.insert(key) {
            return Vec::new();
        }
        self.record_press(key, now_ms, router, paused)
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.pressed.remove(&key);
    }

    /// Route a press through the listeners and the combo matcher. Also
    /// the entry point for emulated keys, which bypass the pressed set.
    pub fn record_press(
        &mut self,
        key: KeyCode,
        now_ms: f64,
        router: &mut SceneInput,
        paused: bool,
    ) -> Vec<Notification> {
        if now_ms - self.last_press_ms > RECENT_STALE_MS {
            self.recent.clear();
        }
        self.last_press_ms = now_ms;
        self.recent.push_back(key);
        while self.recent.len() > RECENT_CAP {
            self.recent.pop_front();
        }

        let mut out = router.notify_key(key, paused);
        if let Some(name) = router.match_combos(&self.pressed, &self.recent, now_ms) {
            out.extend(router.notify_combo(&name, paused));
        }
        out
    }

    /// The host viewport moved or resized. Pointer input is ignored
    /// until the layout settles.
    pub fn notify_resize(&mut self, canvas_size: Vec2, canvas_offset: Vec2, now_ms: f64) {
        self.canvas_size = canvas_size;
        self.canvas_offset = canvas_offset;
        self.resize_settle_until_ms = now_ms + RESIZE_SETTLE_MS;
    }

    pub fn notify_scroll(&mut self, scroll_offset: Vec2) {
        self.scroll_offset = scroll_offset;
    }

    /// Handle a click/tap in page coordinates. Corrected into canvas
    /// space; rejected outside the canvas or while resize is settling.
    pub fn click(
        &mut self,
        page_pos: Vec2,
        now_ms: f64,
        router: &mut SceneInput,
        paused: bool,
    ) -> Vec<Notification> {
        if now_ms < self.resize_settle_until_ms {
            log::debug!("click dropped while resize settles");
            return Vec::new();
        }
        let pos = page_pos + self.scroll_offset - self.canvas_offset;
        if pos.x < 0.0 || pos.y < 0.0 || pos.x > self.canvas_size.x || pos.y > self.canvas_size.y {
            return Vec::new();
        }
        let hits: Vec<(String, Option<KeyCode>)> = router
            .detect_click(pos)
            .into_iter()
            .map(|z| (z.id.clone(), z.emulated_key))
            .collect();

        let mut out = Vec::new();
        for (zone_id, emulated) in hits {
            out.extend(router.notify_click(&zone_id, paused));
            if let Some(key) = emulated {
                out.extend(self.record_press(key, now_ms, router, paused));
            }
        }
        out
    }
}
