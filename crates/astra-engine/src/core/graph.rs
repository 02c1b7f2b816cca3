// core/graph.rs
//
// Hierarchical scene graph stored as an id-keyed arena. Parent/child
// structure lives on the entities themselves; all structural mutation
// goes through the graph so removal stays two-phase: detach marks, a
// later finalize prunes. Entities detached and never reattached are
// dropped from the arena together with their subtree.

use std::collections::HashMap;

use glam::Vec2;

use crate::api::options::EngineOptions;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::components::tracker::{FollowInfo, LawKind};
use crate::core::math::angle_to_direction;
use crate::core::rng::Rng;
use crate::core::scheduler::FRAME_INTERVAL_MS;
use crate::render::{Color, DrawCmd, DrawList};

/// A tracker reached its terminal state this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerEvent {
    pub entity: EntityId,
    pub kind: LawKind,
}

/// Particle spawn request produced by an emitter during a graph step.
#[derive(Debug, Clone, Copy)]
pub struct ParticleSpawn {
    pub pos: Vec2,
    pub speed: Vec2,
    pub color: Color,
    pub size: f32,
    pub ttl: f32,
}

/// Everything a graph step reports back to the frame loop.
#[derive(Debug, Default)]
pub struct StepOutput {
    pub tracker_events: Vec<TrackerEvent>,
    pub particle_spawns: Vec<ParticleSpawn>,
}

impl StepOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.tracker_events.clear();
        self.particle_spawns.clear();
    }
}

const DEBUG_BOX_COLOR: Color = Color::new(0.0, 255.0, 0.0, 255.0);
const DEBUG_RADIUS_COLOR: Color = Color::new(255.0, 0.0, 0.0, 255.0);
const DEBUG_VECTOR_COLOR: Color = Color::new(255.0, 255.0, 0.0, 255.0);

#[derive(Debug, Default)]
pub struct SceneGraph {
    entities: HashMap<EntityId, Entity>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
        }
    }

    /// Add an entity to the arena. Structure fields are reset; use
    /// `attach` to place it in the hierarchy.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        entity.parent = None;
        entity.children.clear();
        entity.removed.clear();
        self.entities.insert(id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<EntityId> {
        self.entities
            .values()
            .find(|e| e.tag == tag)
            .map(|e| e.id)
    }

    /// Make `child` a child of `parent`. Reattaching an entity that
    /// already has a parent moves it and logs, since it usually means a
    /// missing detach somewhere.
    pub fn attach(&mut self, parent: EntityId, child: EntityId) {
        if !self.entities.contains_key(&parent) || !self.entities.contains_key(&child) {
            log::warn!("attach {:?} -> {:?}: missing entity", child, parent);
            return;
        }
        if let Some(old) = self.entities.get(&child).and_then(|e| e.parent) {
            if old == parent {
                log::debug!("attach {:?} -> {:?}: already attached", child, parent);
                return;
            }
            log::warn!("attach {:?} -> {:?}: moving from {:?}", child, parent, old);
            if let Some(old_parent) = self.entities.get_mut(&old) {
                old_parent.children.retain(|&c| c != child);
            }
        }
        if let Some(p) = self.entities.get_mut(&parent) {
            if !p.children.contains(&child) {
                p.children.push(child);
            }
        }
        if let Some(c) = self.entities.get_mut(&child) {
            c.parent = Some(parent);
        }
    }

    /// Mark `child` for removal from `parent`. The parent link is cleared
    /// immediately; the child leaves the parent's list at finalize.
    pub fn detach(&mut self, parent: EntityId, child: EntityId) {
        let Some(p) = self.entities.get_mut(&parent) else {
            return;
        };
        p.removed.push(child);
        if let Some(c) = self.entities.get_mut(&child) {
            if c.parent == Some(parent) {
                c.parent = None;
            }
        }
    }

    /// Detach every child of `parent`.
    pub fn detach_all(&mut self, parent: EntityId) {
        let children = match self.entities.get(&parent) {
            Some(e) => e.children.clone(),
            None => return,
        };
        for child in children {
            self.detach(parent, child);
        }
    }

    /// Apply pending removals for one entity. Detached children that were
    /// not reattached elsewhere are dropped from the arena with their
    /// whole subtree. Safe to call any number of times.
    pub fn finalize_removed(&mut self, id: EntityId) {
        let removed = match self.entities.get_mut(&id) {
            Some(e) if !e.removed.is_empty() => std::mem::take(&mut e.removed),
            _ => return,
        };
        for r in removed {
            let was_child = self
                .entities
                .get(&id)
                .map_or(false, |e| e.children.contains(&r));
            if !was_child {
                continue;
            }
            if let Some(e) = self.entities.get_mut(&id) {
                e.children.retain(|&c| c != r);
            }
            if self.entities.get(&r).map_or(false, |e| e.parent.is_none()) {
                self.remove_subtree(r);
            }
        }
    }

    fn remove_subtree(&mut self, id: EntityId) {
        let children = match self.entities.get(&id) {
            Some(e) => e.children.clone(),
            None => return,
        };
        for child in children {
            // Children handed to another parent survive; everything still
            // referencing this entity, or referencing nothing, goes.
            let reattached = self
                .entities
                .get(&child)
                .and_then(|e| e.parent)
                .map_or(false, |p| p != id);
            if !reattached {
                self.remove_subtree(child);
            }
        }
        self.entities.remove(&id);
    }

    /// World position, composed up the ancestor chain. Each parent
    /// contributes its own rotation applied to the child's local offset.
    /// Computed per query; nothing is cached.
    pub fn absolute_position(&self, id: EntityId) -> Vec2 {
        let Some(e) = self.entities.get(&id) else {
            return Vec2::ZERO;
        };
        match e.parent {
            Some(p) => {
                let parent_abs = self.absolute_position(p);
                match self.entities.get(&p) {
                    Some(parent) => parent_abs + parent.rotation.apply(e.pos),
                    None => parent_abs + e.pos,
                }
            }
            None => e.pos,
        }
    }

    /// World rotation: the sum of local angles up the ancestor chain.
    pub fn absolute_rotation(&self, id: EntityId) -> f32 {
        let Some(e) = self.entities.get(&id) else {
            return 0.0;
        };
        let own = e.rotation.angle();
        match e.parent {
            Some(p) => own + self.absolute_rotation(p),
            None => own,
        }
    }

    /// Advance the subtree rooted at `root` by `dt_ms`.
    ///
    /// Per entity: motion law first, then velocity and spin normalized to
    /// the nominal frame, sprite animation, emitters, then children from
    /// a snapshot, then this entity's pending removals.
    pub fn step(
        &mut self,
        root: EntityId,
        dt_ms: f32,
        now_ms: f64,
        rng: &mut Rng,
        out: &mut StepOutput,
    ) {
        self.step_entity(root, dt_ms, now_ms, rng, out);
    }

    fn step_entity(
        &mut self,
        id: EntityId,
        dt_ms: f32,
        now_ms: f64,
        rng: &mut Rng,
        out: &mut StepOutput,
    ) {
        if !self.entities.contains_key(&id) {
            return;
        }
        let frames = dt_ms / FRAME_INTERVAL_MS;

        if self.entities.get(&id).map_or(false, |e| e.tracker.is_some()) {
            self.step_tracker(id, dt_ms, now_ms, out);
        }

        if let Some(e) = self.entities.get_mut(&id) {
            e.pos += e.speed * frames;
            e.rotation.rotate(e.angular_speed * frames);
            if let Some(sprite) = &mut e.sprite {
                sprite.step(frames);
            }
        }

        self.run_emitter(id, rng, out);

        let children = match self.entities.get(&id) {
            Some(e) => e.children.clone(),
            None => return,
        };
        for child in children {
            // Skip children reparented away mid-frame (tracker handover).
            if self.entities.get(&child).map_or(false, |e| e.parent == Some(id)) {
                self.step_entity(child, dt_ms, now_ms, rng, out);
            }
        }

        self.finalize_removed(id);
    }

    fn step_tracker(&mut self, id: EntityId, dt_ms: f32, now_ms: f64, out: &mut StepOutput) {
        let Some(mut law) = self.entities.get_mut(&id).and_then(|e| e.tracker.take()) else {
            return;
        };
        let follow = law.follow_target().map(|target| FollowInfo {
            target_abs: self.absolute_position(target),
            my_abs: self.absolute_position(id),
            target_alive: self
                .entities
                .get(&target)
                .map_or(false, |e| e.parent.is_some()),
        });
        let step = law.advance(dt_ms, now_ms, follow);
        if let Some(e) = self.entities.get_mut(&id) {
            if let Some(pos) = step.set_pos {
                e.pos = pos;
            }
            if let Some(delta) = step.translate {
                e.pos += delta;
            }
        }
        if step.terminal {
            self.complete_tracker(id, law.kind(), step.exit_velocity, out);
        } else if let Some(e) = self.entities.get_mut(&id) {
            e.tracker = Some(law);
        }
    }

    /// Hand a finished tracker's children back to its parent, preserving
    /// their absolute positions, then remove the tracker itself.
    fn complete_tracker(
        &mut self,
        id: EntityId,
        kind: LawKind,
        exit_velocity: Option<Vec2>,
        out: &mut StepOutput,
    ) {
        let (parent, children, local_pos) = match self.entities.get(&id) {
            Some(e) => (e.parent, e.children.clone(), e.pos),
            None => return,
        };
        for child in children {
            if let Some(c) = self.entities.get_mut(&child) {
                c.pos += local_pos;
                if let Some(v) = exit_velocity {
                    c.speed = v;
                }
            }
            self.detach(id, child);
            if let Some(p) = parent {
                self.attach(p, child);
            }
        }
        if let Some(p) = parent {
            self.detach(p, id);
        }
        out.tracker_events.push(TrackerEvent { entity: id, kind });
    }

    fn run_emitter(&mut self, id: EntityId, rng: &mut Rng, out: &mut StepOutput) {
        let Some(emitter) = self.entities.get(&id).and_then(|e| e.emitter.clone()) else {
            return;
        };
        if !emitter.started {
            return;
        }
        let pos = self.absolute_position(id);
        let heading = self.absolute_rotation(id);
        for _ in 0..emitter.emission_rate {
            let angle = heading + rng.next_centered(emitter.spread);
            out.particle_spawns.push(ParticleSpawn {
                pos,
                speed: angle_to_direction(angle) * emitter.particle_speed,
                color: emitter.color,
                size: emitter.particle_size,
                ttl: rng.next_range(emitter.particle_life),
            });
        }
    }

    /// Emit draw commands for the subtree rooted at `id`, children before
    /// self, debug overlays last.
    pub fn draw(&self, id: EntityId, out: &mut DrawList, options: &EngineOptions) {
        let Some(e) = self.entities.get(&id) else {
            return;
        };
        for child in &e.children {
            self.draw(*child, out, options);
        }
        let abs = self.absolute_position(id);
        if e.visible {
            if let Some(sprite) = &e.sprite {
                out.push(DrawCmd::Sprite {
                    name: sprite.name.clone(),
                    frame: sprite.frame_index(),
                    pos: abs,
                    rotation: self.absolute_rotation(id),
                    scale: e.scaling,
                    alpha: e.alpha,
                });
            }
        }
        if options.draw_bounding_boxes && e.size != Vec2::ZERO {
            out.push(DrawCmd::DebugRect {
                center: abs,
                size: e.size,
                color: DEBUG_BOX_COLOR,
            });
        }
        if options.draw_collision_radius && e.collision_radius > 0.0 {
            out.push(DrawCmd::DebugCircle {
                center: abs,
                radius: e.collision_radius,
                color: DEBUG_RADIUS_COLOR,
            });
        }
        if options.draw_max_radius && e.max_radius > 0.0 {
            out.push(DrawCmd::DebugCircle {
                center: abs,
                radius: e.max_radius,
                color: DEBUG_BOX_COLOR,
            });
        }
        if options.draw_direction_vectors && e.speed != Vec2::ZERO {
            out.push(DrawCmd::DebugLine {
                from: abs,
                to: abs + e.speed * 10.0,
                color: DEBUG_VECTOR_COLOR,
            });
        }
    }
}
