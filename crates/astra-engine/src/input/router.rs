//! Per-scene input routing: key listeners, combo definitions and
//! clickable zones. Dispatch produces notification values the frame
//! loop drains and hands to the game; the router never calls back into
//! game objects.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::Vec2;

use crate::api::types::ListenerId;
use crate::input::keys::{KeyCode, ANY_KEY};

/// A routed input event, tagged with the listener it was registered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Key { key: KeyCode, target: ListenerId },
    Combo { name: String, target: ListenerId },
    Click { zone: String, target: ListenerId },
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    target: ListenerId,
    /// Receives events even while the engine is paused.
    on_pause: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboKind {
    /// All keys held down at once.
    Simultaneous,
    /// Keys pressed in order, ending with the most recent press.
    Consecutive,
}

#[derive(Debug, Clone)]
struct Combo {
    name: String,
    kind: ComboKind,
    keys: Vec<KeyCode>,
    last_fired_ms: f64,
}

/// A clickable screen region, optionally emulating a key press.
#[derive(Debug, Clone)]
pub struct ClickZone {
    pub id: String,
    pub center: Vec2,
    pub size: Vec2,
    pub emulated_key: Option<KeyCode>,
}

impl ClickZone {
    fn contains(&self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.size.x * 0.5
            && (point.y - self.center.y).abs() <= self.size.y * 0.5
    }
}

/// Input routing tables for one scene.
#[derive(Debug, Default)]
pub struct SceneInput {
    key_listeners: HashMap<KeyCode, Vec<Listener>>,
    /// Registration order decides combo precedence: first match wins.
    combos: Vec<Combo>,
    combo_listeners: HashMap<String, Vec<Listener>>,
    click_zones: Vec<ClickZone>,
    click_listeners: Vec<Listener>,
}

impl SceneInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for a key. Use `ANY_KEY` to receive every press. With
    /// `on_pause` the listener also fires while the engine is paused.
    pub fn add_key_listener(&mut self, key: KeyCode, target: ListenerId, on_pause: bool) {
        self.key_listeners
            .entry(key)
            .or_default()
            .push(Listener { target, on_pause });
    }

    pub fn remove_key_listener(&mut self, key: KeyCode, target: ListenerId) {
        if let Some(listeners) = self.key_listeners.get_mut(&key) {
            listeners.retain(|l| l.target != target);
        }
    }

    /// Define a named combo. Redefining a name replaces it and logs.
    pub fn add_combo(&mut self, name: impl Into<String>, kind: ComboKind, keys: Vec<KeyCode>) {
        let name = name.into();
        if let Some(existing) = self.combos.iter_mut().find(|c| c.name == name) {
            log::warn!("combo '{}' redefined", name);
            existing.kind = kind;
            existing.keys = keys;
            return;
        }
        self.combos.push(Combo {
            name,
            kind,
            keys,
            last_fired_ms: 0.0,
        });
    }

    pub fn add_combo_listener(&mut self, name: impl Into<String>, target: ListenerId, on_pause: bool) {
        let name = name.into();
        if !self.combos.iter().any(|c| c.name == name) {
            log::warn!("combo listener for undefined combo '{}'", name);
        }
        self.combo_listeners
            .entry(name)
            .or_default()
            .push(Listener { target, on_pause });
    }

    pub fn add_click_zone(&mut self, zone: ClickZone) {
        self.click_zones.push(zone);
    }

    pub fn add_click_listener(&mut self, target: ListenerId, on_pause: bool) {
        self.click_listeners.push(Listener { target, on_pause });
    }

    /// Dispatch a key press. A key nobody listens for is a silent no-op.
    pub fn notify_key(&self, key: KeyCode, paused: bool) -> Vec<Notification> {
        let mut out = Vec::new();
        for code in [key, ANY_KEY] {
            if let Some(listeners) = self.key_listeners.get(&code) {
                for l in listeners {
                    if paused && !l.on_pause {
                        continue;
                    }
                    out.push(Notification::Key {
                        key,
                        target: l.target,
                    });
                }
            }
        }
        out
    }

    /// Check every combo against the current input state, in definition
    /// order. The first match records its fire time and wins the frame.
    pub fn match_combos(
        &mut self,
        pressed: &HashSet<KeyCode>,
        recent: &VecDeque<KeyCode>,
        now_ms: f64,
    ) -> Option<String> {
        for combo in &mut self.combos {
            if combo.keys.is_empty() {
                continue;
            }
            let matched = match combo.kind {
                ComboKind::Simultaneous => combo.keys.iter().all(|k| pressed.contains(k)),
                ComboKind::Consecutive => {
                    recent.len() >= combo.keys.len()
                        && recent
                            .iter()
                            .skip(recent.len() - combo.keys.len())
                            .eq(combo.keys.iter())
                }
            };
            if matched {
                combo.last_fired_ms = now_ms;
                return Some(combo.name.clone());
            }
        }
        None
    }

    pub fn notify_combo(&self, name: &str, paused: bool) -> Vec<Notification> {
        let mut out = Vec::new();
        if let Some(listeners) = self.combo_listeners.get(name) {
            for l in listeners {
                if paused && !l.on_pause {
                    continue;
                }
                out.push(Notification::Combo {
                    name: name.to_string(),
                    target: l.target,
                });
            }
        }
        out
    }

    /// Every zone containing the point, in registration order. Zones may
    /// overlap; each hit fires its own click and emulated key.
    pub fn detect_click(&self, point: Vec2) -> Vec<&ClickZone> {
        self.click_zones.iter().filter(|z| z.contains(point)).collect()
    }

    pub fn notify_click(&self, zone_id: &str, paused: bool) -> Vec<Notification> {
        let mut out = Vec::new();
        for l in &self.click_listeners {
            if paused && !l.on_pause {
                continue;
            }
            out.push(Notification::Click {
                zone: zone_id.to_string(),
                target: l.target,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keys;

    const TARGET: ListenerId = ListenerId(1);
    const OTHER: ListenerId = ListenerId(2);

    #[test]
    fn key_listener_receives_exact_code() {
        let mut input = SceneInput::new();
        input.add_key_listener(keys::SPACEBAR, TARGET, false);
        let out = input.notify_key(keys::SPACEBAR, false);
        assert_eq!(
            out,
            vec![Notification::Key {
                key: keys::SPACEBAR,
                target: TARGET
            }]
        );
        assert!(input.notify_key(keys::ENTER, false).is_empty());
    }

    #[test]
    fn any_key_listener_receives_everything() {
        let mut input = SceneInput::new();
        input.add_key_listener(ANY_KEY, TARGET, false);
        assert_eq!(input.notify_key(keys::Q, false).len(), 1);
        assert_eq!(input.notify_key(keys::Z, false).len(), 1);
    }

    #[test]
    fn pause_gates_listeners() {
        let mut input = SceneInput::new();
        input.add_key_listener(keys::P, TARGET, false);
        input.add_key_listener(keys::P, OTHER, true);
        let out = input.notify_key(keys::P, true);
        assert_eq!(
            out,
            vec![Notification::Key {
                key: keys::P,
                target: OTHER
            }]
        );
    }

    #[test]
    fn simultaneous_combo_matches_pressed_set() {
        let mut input = SceneInput::new();
        input.add_combo("strafe", ComboKind::Simultaneous, vec![keys::A, keys::B]);

        let mut pressed = HashSet::new();
        pressed.insert(keys::A);
        let recent = VecDeque::new();
        assert_eq!(input.match_combos(&pressed, &recent, 0.0), None);

        pressed.insert(keys::B);
        assert_eq!(
            input.match_combos(&pressed, &recent, 5.0),
            Some("strafe".to_string())
        );
    }

    #[test]
    fn consecutive_combo_matches_ring_tail() {
        let mut input = SceneInput::new();
        input.add_combo("finisher", ComboKind::Consecutive, vec![keys::Y, keys::Z]);

        let pressed = HashSet::new();
        let mut recent: VecDeque<KeyCode> = VecDeque::new();
        recent.extend([keys::X, keys::Y, keys::Z]);
        assert_eq!(
            input.match_combos(&pressed, &recent, 0.0),
            Some("finisher".to_string())
        );

        // Tail must end with the sequence.
        let mut recent: VecDeque<KeyCode> = VecDeque::new();
        recent.extend([keys::Y, keys::Z, keys::X]);
        assert_eq!(input.match_combos(&pressed, &recent, 0.0), None);
    }

    #[test]
    fn first_defined_combo_wins() {
        let mut input = SceneInput::new();
        input.add_combo("long", ComboKind::Consecutive, vec![keys::X, keys::Y]);
        input.add_combo("short", ComboKind::Consecutive, vec![keys::Y]);

        let pressed = HashSet::new();
        let mut recent: VecDeque<KeyCode> = VecDeque::new();
        recent.extend([keys::X, keys::Y]);
        // Both match; definition order decides.
        assert_eq!(
            input.match_combos(&pressed, &recent, 0.0),
            Some("long".to_string())
        );
    }

    #[test]
    fn combo_redefinition_replaces() {
        let mut input = SceneInput::new();
        input.add_combo("c", ComboKind::Consecutive, vec![keys::A]);
        input.add_combo("c", ComboKind::Consecutive, vec![keys::B]);

        let pressed = HashSet::new();
        let mut recent: VecDeque<KeyCode> = VecDeque::new();
        recent.push_back(keys::B);
        assert_eq!(
            input.match_combos(&pressed, &recent, 0.0),
            Some("c".to_string())
        );
    }

    #[test]
    fn click_zone_detection_is_centered() {
        let mut input = SceneInput::new();
        input.add_click_zone(ClickZone {
            id: "fire".to_string(),
            center: Vec2::new(100.0, 100.0),
            size: Vec2::new(40.0, 20.0),
            emulated_key: Some(keys::SPACEBAR),
        });
        assert!(!input.detect_click(Vec2::new(119.0, 109.0)).is_empty());
        assert!(input.detect_click(Vec2::new(121.0, 100.0)).is_empty());
        assert!(input.detect_click(Vec2::new(100.0, 111.0)).is_empty());
    }

    #[test]
    fn overlapping_zones_all_detected() {
        let mut input = SceneInput::new();
        input.add_click_zone(ClickZone {
            id: "outer".to_string(),
            center: Vec2::new(100.0, 100.0),
            size: Vec2::new(200.0, 200.0),
            emulated_key: None,
        });
        input.add_click_zone(ClickZone {
            id: "inner".to_string(),
            center: Vec2::new(100.0, 100.0),
            size: Vec2::new(20.0, 20.0),
            emulated_key: None,
        });
        let hits = input.detect_click(Vec2::new(100.0, 100.0));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "outer");
        assert_eq!(hits[1].id, "inner");
    }

    #[test]
    fn click_listeners_receive_zone_id() {
        let mut input = SceneInput::new();
        input.add_click_listener(TARGET, false);
        let out = input.notify_click("fire", false);
        assert_eq!(
            out,
            vec![Notification::Click {
                zone: "fire".to_string(),
                target: TARGET
            }]
        );
    }
}
