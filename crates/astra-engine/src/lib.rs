pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod render;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{EngineError, FrameEvents, Game, SceneNav, StepContext};
pub use api::options::EngineOptions;
pub use api::runner::Engine;
pub use api::types::{EngineEvent, EntityId, ListenerId};
pub use assets::audio::{AudioRegistry, NullAudio};
pub use assets::localization::Localization;
pub use assets::preloader::Preloader;
pub use assets::registry::{SpriteDef, SpriteRegistry, SpriteTable};
pub use components::emitter::EmitterComponent;
pub use components::entity::Entity;
pub use components::sprite::SpriteComponent;
pub use components::tracker::{CubicCurve, LawKind, MotionLaw};
pub use core::clock::{ClockTicks, GlobalClock, UnalignedClock};
pub use core::graph::{ParticleSpawn, SceneGraph, StepOutput, TrackerEvent};
pub use core::math::{Rect, Rotation};
pub use core::rng::Rng;
pub use core::scene::{Background, GuiLayer, NullGui, Scene, SceneCollection};
pub use core::scheduler::{FrameScheduler, TickDecision, FRAME_INTERVAL_MS};
pub use input::controller::InputController;
pub use input::keys::{self, KeyCode, ANY_KEY};
pub use input::router::{ClickZone, ComboKind, Notification, SceneInput};
pub use render::{Color, DrawCmd, DrawList, PixelBuffer};
pub use systems::collision::{
    check_collisions, evict_outside, CollisionResponder, DetachChildrenResponder,
};
pub use systems::effects::{Effect, EffectsCollection, Transparency};
pub use systems::particles::{Particle, ParticleCollection, MAX_PARTICLES};
