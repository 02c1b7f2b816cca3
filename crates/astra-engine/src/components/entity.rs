use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::emitter::EmitterComponent;
use crate::components::sprite::SpriteComponent;
use crate::components::tracker::MotionLaw;
use crate::core::math::Rotation;

/// Fat Entity — a single struct with optional components.
/// Designed for simplicity and rapid prototyping over ECS purity.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier, assigned by the scene graph on spawn.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Position relative to the parent.
    pub pos: Vec2,
    /// Logical size in world units, used for bounds and broad-phase tests.
    pub size: Vec2,
    /// Render scale multiplier.
    pub scaling: Vec2,
    /// Velocity in units per nominal simulation frame.
    pub speed: Vec2,
    /// Orientation relative to the parent.
    pub rotation: Rotation,
    /// Angular velocity in radians per nominal simulation frame.
    pub angular_speed: f32,
    /// Render opacity, 0..1.
    pub alpha: f32,
    pub visible: bool,
    /// Outer radius enclosing this entity and its children.
    pub max_radius: f32,
    /// Radius for collision tests. Zero opts out of collisions.
    pub collision_radius: f32,
    /// Sprite component (optional — entities without sprites are invisible).
    pub sprite: Option<SpriteComponent>,
    /// Motion law (optional — turns the entity into a tracker).
    pub tracker: Option<MotionLaw>,
    /// Particle emitter (optional).
    pub emitter: Option<EmitterComponent>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    /// Children detached this frame, removed at finalize.
    pub(crate) removed: Vec<EntityId>,
}

impl Entity {
    pub fn new() -> Self {
        Self {
            id: EntityId(0),
            tag: String::new(),
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            scaling: Vec2::ONE,
            speed: Vec2::ZERO,
            rotation: Rotation::default(),
            angular_speed: 0.0,
            alpha: 1.0,
            visible: true,
            max_radius: 0.0,
            collision_radius: 0.0,
            sprite: None,
            tracker: None,
            emitter: None,
            parent: None,
            children: Vec::new(),
            removed: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_scaling(mut self, scaling: Vec2) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_speed(mut self, speed: Vec2) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_rotation(mut self, angle: f32) -> Self {
        self.rotation = Rotation::new(angle);
        self
    }

    pub fn with_angular_speed(mut self, angular_speed: f32) -> Self {
        self.angular_speed = angular_speed;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_max_radius(mut self, radius: f32) -> Self {
        self.max_radius = radius;
        self
    }

    pub fn with_collision_radius(mut self, radius: f32) -> Self {
        self.collision_radius = radius;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_tracker(mut self, tracker: MotionLaw) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn with_emitter(mut self, emitter: EmitterComponent) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn invisible(mut self) -> Self {
        self.visible = false;
        self
    }

    // -- Structure accessors (mutation goes through the scene graph) --

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}
