use thiserror::Error;

use crate::api::options::EngineOptions;
use crate::assets::audio::AudioRegistry;
use crate::assets::localization::Localization;
use crate::assets::registry::{SpriteRegistry, SpriteTable};
use crate::core::clock::ClockTicks;
use crate::core::graph::TrackerEvent;
use crate::core::rng::Rng;
use crate::core::scene::{Scene, SceneCollection};
use crate::input::router::Notification;
use crate::systems::effects::EffectsCollection;
use crate::systems::particles::ParticleCollection;

/// Fatal engine setup failures. Everything recoverable is logged and
/// survived instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("game registered no scenes")]
    NoScenes,
}

/// Scene navigation requested by the game during a step, applied by the
/// engine after the step returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneNav {
    Set(usize),
    Advance,
    Back,
}

/// Everything that happened since the game last stepped: drained input
/// notifications, tracker completions and timer expiries.
#[derive(Debug, Default)]
pub struct FrameEvents {
    pub notifications: Vec<Notification>,
    pub tracker_events: Vec<TrackerEvent>,
    /// Scene clock subscriptions due this frame, in registration order.
    pub clock_due: Vec<String>,
    pub global_ticks: ClockTicks,
    /// True on the first step after preloading finished.
    pub just_loaded: bool,
}

/// Mutable view of engine state handed to `Game::step`.
pub struct StepContext<'a> {
    pub scene: &'a mut Scene,
    pub scene_index: usize,
    pub particles: &'a mut ParticleCollection,
    pub effects: &'a mut EffectsCollection,
    pub audio: &'a mut dyn AudioRegistry,
    pub sprites: &'a dyn SpriteRegistry,
    pub strings: &'a Localization,
    pub options: &'a EngineOptions,
    pub rng: &'a mut Rng,
    pub dt_ms: f32,
    pub now_ms: f64,
    pub events: &'a FrameEvents,
    /// Request a scene switch; honored after this step.
    pub nav: &'a mut Option<SceneNav>,
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Base configuration. Called once before init; hosts may overlay
    /// JSON on the result.
    fn options(&self) -> EngineOptions {
        EngineOptions::default()
    }

    /// Build scenes, register sprites and texts. Called once.
    fn init(
        &mut self,
        scenes: &mut SceneCollection,
        sprites: &mut SpriteTable,
        strings: &mut Localization,
    );

    /// Per-frame game logic. Not called while paused.
    fn step(&mut self, ctx: &mut StepContext);
}
