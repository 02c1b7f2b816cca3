use serde::{Deserialize, Serialize};

/// Engine configuration. Games supply a base set and hosts may overlay
/// JSON on top of it; unknown keys in the overlay are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Viewport width in pixels.
    pub viewport_width: f32,
    /// Viewport height in pixels.
    pub viewport_height: f32,
    /// Target frame interval in milliseconds.
    pub frame_interval_ms: f32,
    /// Reserved pause key is honored.
    pub allow_pause: bool,
    /// Reserved halt key is honored.
    pub allow_halt: bool,
    /// Reserved fps-toggle key is honored.
    pub allow_fps_key: bool,
    pub show_fps: bool,
    /// Enter pause when the host window loses focus.
    pub pause_on_focus_loss: bool,
    pub default_language: String,
    // Debug overlays.
    pub draw_bounding_boxes: bool,
    pub draw_collision_radius: bool,
    pub draw_max_radius: bool,
    pub draw_direction_vectors: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            frame_interval_ms: 1000.0 / 60.0,
            allow_pause: true,
            allow_halt: false,
            allow_fps_key: false,
            show_fps: false,
            pause_on_focus_loss: true,
            default_language: "english".to_string(),
            draw_bounding_boxes: false,
            draw_collision_radius: false,
            draw_max_radius: false,
            draw_direction_vectors: false,
        }
    }
}

impl EngineOptions {
    /// Overlay a JSON object onto these options. Keys present in the
    /// overlay replace current values; everything else is kept.
    pub fn merge_json(&mut self, overlay: &str) -> Result<(), serde_json::Error> {
        let mut base = serde_json::to_value(&*self)?;
        let patch: serde_json::Value = serde_json::from_str(overlay)?;
        if let (Some(base_map), Some(patch_map)) = (base.as_object_mut(), patch.as_object()) {
            for (key, value) in patch_map {
                base_map.insert(key.clone(), value.clone());
            }
        }
        *self = serde_json::from_value(base)?;
        Ok(())
    }
}
