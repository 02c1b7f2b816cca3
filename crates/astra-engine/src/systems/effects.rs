//! One-shot visual effects: animated sprites with lifetime-driven
//! scaling and transparency, outside the scene graph.

use glam::Vec2;

use crate::components::sprite::SpriteComponent;
use crate::core::scheduler::FRAME_INTERVAL_MS;
use crate::render::{DrawCmd, DrawList};

/// How an effect's alpha evolves over its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transparency {
    None,
    /// Fade from invisible to opaque.
    FadeIn,
    /// Fade from opaque to invisible.
    FadeOut,
}

#[derive(Debug, Clone)]
pub struct Effect {
    pub pos: Vec2,
    pub rotation: f32,
    pub sprite: SpriteComponent,
    /// Milliseconds lived so far.
    pub lived: f32,
    /// Lifetime bound in milliseconds. Zero means unbounded by time.
    pub life_time: f32,
    /// Animation loop bound. Zero means unbounded by loops.
    pub max_loops: u32,
    pub initial_scaling: Vec2,
    pub final_scaling: Vec2,
    pub transparency: Transparency,
    pub alpha: f32,
    pub scaling: Vec2,
}

impl Effect {
    pub fn new(pos: Vec2, sprite: SpriteComponent) -> Self {
        Self {
            pos,
            rotation: 0.0,
            sprite,
            lived: 0.0,
            life_time: 0.0,
            max_loops: 0,
            initial_scaling: Vec2::ONE,
            final_scaling: Vec2::ONE,
            transparency: Transparency::None,
            alpha: 1.0,
            scaling: Vec2::ONE,
        }
    }

    // -- Builder pattern --

    pub fn with_life_time(mut self, life_time_ms: f32) -> Self {
        self.life_time = life_time_ms;
        self
    }

    pub fn with_max_loops(mut self, max_loops: u32) -> Self {
        self.max_loops = max_loops;
        self
    }

    pub fn with_scaling(mut self, initial: Vec2, final_scaling: Vec2) -> Self {
        self.initial_scaling = initial;
        self.final_scaling = final_scaling;
        self.scaling = initial;
        self
    }

    pub fn with_transparency(mut self, transparency: Transparency) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Progress through the effect's life, 0..1. Falls back to animation
    /// progress when no time bound is set.
    fn progress(&self) -> f32 {
        if self.life_time > 0.0 {
            (self.lived / self.life_time).clamp(0.0, 1.0)
        } else {
            self.sprite.progress().clamp(0.0, 1.0)
        }
    }

    fn step(&mut self, dt_ms: f32) {
        self.lived += dt_ms;
        self.sprite.step(dt_ms / FRAME_INTERVAL_MS);

        let t = self.progress();
        if self.initial_scaling != self.final_scaling {
            self.scaling = self.initial_scaling + (self.final_scaling - self.initial_scaling) * t;
        }
        self.alpha = match self.transparency {
            Transparency::None => 1.0,
            Transparency::FadeIn => t,
            Transparency::FadeOut => 1.0 - t,
        };
    }

    /// Whether either lifetime bound has been exceeded.
    fn expired(&self) -> bool {
        (self.life_time > 0.0 && self.lived > self.life_time)
            || (self.max_loops > 0 && self.sprite.loops > self.max_loops)
    }
}

/// Container stepping and drawing all live effects.
#[derive(Debug, Default)]
pub struct EffectsCollection {
    effects: Vec<Effect>,
}

impl EffectsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Add an effect, returning it for further configuration.
    pub fn add(&mut self, effect: Effect) -> &mut Effect {
        self.effects.push(effect);
        let last = self.effects.len() - 1;
        &mut self.effects[last]
    }

    /// Step every effect, then evict the expired in one sweep.
    pub fn step(&mut self, dt_ms: f32) {
        for effect in &mut self.effects {
            effect.step(dt_ms);
        }
        self.effects.retain(|e| !e.expired());
    }

    pub fn draw(&self, out: &mut DrawList) {
        for effect in &self.effects {
            out.push(DrawCmd::Sprite {
                name: effect.sprite.name.clone(),
                frame: effect.sprite.frame_index(),
                pos: effect.pos,
                rotation: effect.rotation,
                scale: effect.scaling,
                alpha: effect.alpha,
            });
        }
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sprite() -> SpriteComponent {
        SpriteComponent::new("boom", 4).with_frame_speed(1.0)
    }

    #[test]
    fn time_bounded_effect_expires() {
        let mut effects = EffectsCollection::new();
        effects.add(Effect::new(Vec2::ZERO, sprite()).with_life_time(100.0));
        effects.step(60.0);
        assert_eq!(effects.len(), 1);
        effects.step(60.0);
        // lived 120 > 100
        assert_eq!(effects.len(), 0);
    }

    #[test]
    fn loop_bounded_effect_expires() {
        let mut effects = EffectsCollection::new();
        effects.add(Effect::new(Vec2::ZERO, sprite()).with_max_loops(1));
        // 4 frames per loop; after 9 frames the sprite is past its second
        // loop and the bound of 1 is exceeded.
        effects.step(FRAME_INTERVAL_MS * 9.0);
        assert_eq!(effects.len(), 0);
    }

    #[test]
    fn unbounded_effect_persists() {
        let mut effects = EffectsCollection::new();
        effects.add(Effect::new(Vec2::ZERO, sprite()));
        effects.step(100_000.0);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn scaling_interpolates_over_life() {
        let mut effect = Effect::new(Vec2::ZERO, sprite())
            .with_life_time(100.0)
            .with_scaling(Vec2::ONE, Vec2::splat(3.0));
        effect.step(50.0);
        assert_relative_eq!(effect.scaling.x, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn fade_out_tracks_time_progress() {
        let mut effect = Effect::new(Vec2::ZERO, sprite())
            .with_life_time(200.0)
            .with_transparency(Transparency::FadeOut);
        effect.step(50.0);
        assert_relative_eq!(effect.alpha, 0.75, epsilon = 1e-4);
    }

    #[test]
    fn fade_in_uses_animation_when_untimed() {
        // No time bound: alpha follows frame progress instead.
        let mut effect =
            Effect::new(Vec2::ZERO, sprite()).with_transparency(Transparency::FadeIn);
        effect.step(FRAME_INTERVAL_MS * 2.0);
        assert_relative_eq!(effect.alpha, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn draw_emits_one_sprite_per_effect() {
        let mut effects = EffectsCollection::new();
        effects.add(Effect::new(Vec2::new(5.0, 5.0), sprite()));
        effects.add(Effect::new(Vec2::new(9.0, 9.0), sprite()));
        let mut list = DrawList::new();
        effects.draw(&mut list);
        assert_eq!(list.len(), 2);
    }
}
