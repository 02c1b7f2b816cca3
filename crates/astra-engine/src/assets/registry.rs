use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

/// Metadata for a named sprite or animation strip.
#[derive(Debug, Clone, Deserialize)]
pub struct SpriteDef {
    /// Source image path, resolved by the host.
    pub path: String,
    /// Top-left of the first frame in the source image.
    #[serde(default)]
    pub x_start: f32,
    #[serde(default)]
    pub y_start: f32,
    /// Frame size in pixels.
    pub width: f32,
    pub height: f32,
    /// Number of frames; 1 for static sprites.
    #[serde(default = "one")]
    pub frames: u32,
    #[serde(default)]
    pub init_frame: u32,
    /// Frames advanced per nominal simulation frame.
    #[serde(default)]
    pub frame_speed: f32,
}

fn one() -> u32 {
    1
}

impl SpriteDef {
    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Read access to sprite metadata. The engine only ever needs lookups;
/// how the table is populated is the host's business.
pub trait SpriteRegistry {
    fn sprite(&self, name: &str) -> Option<&SpriteDef>;

    fn exists(&self, name: &str) -> bool {
        self.sprite(name).is_some()
    }
}

/// In-memory sprite table, filled programmatically or from a JSON
/// manifest.
#[derive(Debug, Default)]
pub struct SpriteTable {
    sprites: HashMap<String, SpriteDef>,
}

impl SpriteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `{ "name": { ...def } }` JSON manifest.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let sprites: HashMap<String, SpriteDef> = serde_json::from_str(json)?;
        Ok(Self { sprites })
    }

    /// Register a static, single-frame sprite.
    pub fn add_sprite(&mut self, name: impl Into<String>, path: impl Into<String>, width: f32, height: f32) {
        self.add(name, SpriteDef {
            path: path.into(),
            x_start: 0.0,
            y_start: 0.0,
            width,
            height,
            frames: 1,
            init_frame: 0,
            frame_speed: 0.0,
        });
    }

    /// Register an animation strip.
    pub fn add_animation(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        width: f32,
        height: f32,
        frames: u32,
        frame_speed: f32,
    ) {
        self.add(name, SpriteDef {
            path: path.into(),
            x_start: 0.0,
            y_start: 0.0,
            width,
            height,
            frames,
            init_frame: 0,
            frame_speed,
        });
    }

    pub fn add(&mut self, name: impl Into<String>, def: SpriteDef) {
        let name = name.into();
        if self.sprites.contains_key(&name) {
            log::warn!("sprite '{}' redefined", name);
        }
        self.sprites.insert(name, def);
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl SpriteRegistry for SpriteTable {
    fn sprite(&self, name: &str) -> Option<&SpriteDef> {
        self.sprites.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_json_manifest() {
        let json = r#"{
            "ship": { "path": "ship.png", "width": 64.0, "height": 48.0 },
            "boom": { "path": "boom.png", "width": 32.0, "height": 32.0,
                      "frames": 8, "frame_speed": 0.5 }
        }"#;
        let table = SpriteTable::from_json(json).unwrap();
        let ship = table.sprite("ship").expect("ship should exist");
        assert_eq!(ship.frames, 1);
        assert_eq!(ship.frame_size(), Vec2::new(64.0, 48.0));
        let boom = table.sprite("boom").unwrap();
        assert_eq!(boom.frames, 8);
    }

    #[test]
    fn unknown_returns_none() {
        let table = SpriteTable::new();
        assert!(table.sprite("nonexistent").is_none());
        assert!(!table.exists("nonexistent"));
    }

    #[test]
    fn programmatic_registration() {
        let mut table = SpriteTable::new();
        table.add_sprite("rock", "rock.png", 40.0, 40.0);
        table.add_animation("spin", "spin.png", 40.0, 40.0, 16, 1.0);
        assert!(table.exists("rock"));
        assert_eq!(table.sprite("spin").unwrap().frames, 16);
    }
}
