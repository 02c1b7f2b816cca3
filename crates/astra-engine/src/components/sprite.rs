//! Sprite component with built-in frame animation.
//!
//! Frames advance at a per-frame rate normalized to the nominal 60 fps
//! simulation frame, so animation speed is independent of real frame
//! timing.

/// Sprite state for an entity or effect.
#[derive(Debug, Clone)]
pub struct SpriteComponent {
    /// Name in the sprite registry.
    pub name: String,
    /// Number of frames in the sequence.
    pub frames: u32,
    /// Current frame position, fractional between frame switches.
    pub frame: f32,
    /// Frames advanced per nominal simulation frame.
    pub frame_speed: f32,
    /// Completed loops through the sequence.
    pub loops: u32,
}

impl SpriteComponent {
    pub fn new(name: impl Into<String>, frames: u32) -> Self {
        Self {
            name: name.into(),
            frames: frames.max(1),
            frame: 0.0,
            frame_speed: 0.0,
            loops: 0,
        }
    }

    // -- Builder pattern --

    pub fn with_frame_speed(mut self, frame_speed: f32) -> Self {
        self.frame_speed = frame_speed;
        self
    }

    pub fn with_init_frame(mut self, frame: u32) -> Self {
        self.frame = frame as f32;
        self
    }

    /// Current frame index for rendering.
    pub fn frame_index(&self) -> u32 {
        (self.frame as u32).min(self.frames - 1)
    }

    /// Fraction of the sequence played, 0..1 within the current loop.
    pub fn progress(&self) -> f32 {
        self.frame / self.frames as f32
    }

    /// Advance by `frames_elapsed` nominal simulation frames.
    pub fn step(&mut self, frames_elapsed: f32) {
        if self.frame_speed == 0.0 {
            return;
        }
        self.frame += self.frame_speed * frames_elapsed;
        while self.frame >= self.frames as f32 {
            self.frame -= self.frames as f32;
            self.loops += 1;
        }
    }
}
