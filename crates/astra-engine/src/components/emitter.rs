use crate::render::Color;

/// Component for spawning particles from an entity's position each frame.
///
/// While started, the owning entity requests `emission_rate` particles per
/// simulation frame, sprayed around its absolute heading within `spread`.
#[derive(Debug, Clone)]
pub struct EmitterComponent {
    /// Whether the emitter is actively spawning.
    pub started: bool,
    /// Initial particle speed magnitude, units per nominal frame.
    pub particle_speed: f32,
    /// Total angular spread around the heading, radians.
    pub spread: f32,
    /// Particles spawned per simulation frame while started.
    pub emission_rate: u32,
    /// Upper bound for the random particle lifetime, in frames.
    pub particle_life: f32,
    /// Base particle color.
    pub color: Color,
    /// Particle square side in pixels.
    pub particle_size: f32,
}

impl Default for EmitterComponent {
    fn default() -> Self {
        Self {
            started: false,
            particle_speed: 2.0,
            spread: std::f32::consts::FRAC_PI_4,
            emission_rate: 3,
            particle_life: 100.0,
            color: Color::WHITE,
            particle_size: 2.0,
        }
    }
}

impl EmitterComponent {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_particle_speed(mut self, speed: f32) -> Self {
        self.particle_speed = speed;
        self
    }

    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_emission_rate(mut self, rate: u32) -> Self {
        self.emission_rate = rate;
        self
    }

    pub fn with_particle_life(mut self, life: f32) -> Self {
        self.particle_life = life;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_particle_size(mut self, size: f32) -> Self {
        self.particle_size = size;
        self
    }

    pub fn started(mut self) -> Self {
        self.started = true;
        self
    }

    /// Begin emitting. Already-started emitters are unaffected.
    pub fn start(&mut self) {
        self.started = true;
    }

    /// Stop emitting. Already-stopped emitters are unaffected.
    pub fn stop(&mut self) {
        self.started = false;
    }
}
