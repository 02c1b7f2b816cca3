//! Flat particle pool with a hard cap and off-screen rasterization.
//!
//! Particles live outside the scene graph: thousands of short-lived
//! squares drawn into one pixel buffer and composited in a single blit.

use glam::Vec2;

use crate::core::graph::ParticleSpawn;
use crate::core::scheduler::FRAME_INTERVAL_MS;
use crate::render::{Color, DrawCmd, DrawList, PixelBuffer};

/// Hard limit on live particles.
pub const MAX_PARTICLES: usize = 10_000;

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Units per nominal frame.
    pub speed: Vec2,
    pub color: Color,
    /// Square side in pixels.
    pub size: f32,
    /// Lifetime bound in frames, fractional.
    pub ttl: f32,
    /// Whole frames lived so far.
    pub lived: u32,
}

impl Particle {
    /// Advance one step. Returns false once the particle outlived its
    /// ttl, so it is gone (and no longer drawn) the same step it expires.
    fn tick(&mut self, frames: f32) -> bool {
        self.pos += self.speed * frames;
        self.lived += 1;
        self.lived as f32 <= self.ttl
    }

    /// Render color at the current age: two channels decay linearly.
    fn faded_color(&self) -> Color {
        let lived = self.lived as f32;
        Color::new(
            self.color.r - lived * 3.0,
            self.color.g - lived,
            self.color.b,
            self.color.a,
        )
    }
}

/// All live particles plus the surface they rasterize into.
pub struct ParticleCollection {
    particles: Vec<Particle>,
    max: usize,
    buffer: PixelBuffer,
}

impl ParticleCollection {
    pub fn new(viewport_width: usize, viewport_height: usize) -> Self {
        Self {
            particles: Vec::new(),
            max: MAX_PARTICLES,
            buffer: PixelBuffer::new(viewport_width, viewport_height),
        }
    }

    #[cfg(test)]
    fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// The rasterized particle layer for host compositing.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Add a particle. Requests past the cap are dropped silently; the
    /// pool never exceeds `MAX_PARTICLES`.
    pub fn add(&mut self, particle: Particle) {
        if self.particles.len() >= self.max {
            return;
        }
        self.particles.push(particle);
    }

    /// Add a particle from an emitter spawn request.
    pub fn add_spawn(&mut self, spawn: ParticleSpawn) {
        self.add(Particle {
            pos: spawn.pos,
            speed: spawn.speed,
            color: spawn.color,
            size: spawn.size,
            ttl: spawn.ttl,
            lived: 0,
        });
    }

    /// Advance all particles, evicting the expired.
    pub fn step(&mut self, dt_ms: f32) {
        let frames = dt_ms / FRAME_INTERVAL_MS;
        self.particles.retain_mut(|p| p.tick(frames));
    }

    /// Rasterize every particle into the pixel buffer and emit one
    /// compositing command.
    pub fn draw(&mut self, out: &mut DrawList) {
        self.buffer.clear();
        for p in &self.particles {
            self.buffer.fill_square(p.pos, p.size, p.faded_color());
        }
        out.push(DrawCmd::ParticleLayer);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
