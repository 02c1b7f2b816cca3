use std::cell::RefCell;
use std::rc::Rc;

use crate::api::options::EngineOptions;
use crate::api::types::{EngineEvent, EntityId};
use crate::components::entity::Entity;
use crate::core::clock::UnalignedClock;
use crate::core::graph::{SceneGraph, StepOutput};
use crate::core::math::Rect;
use crate::core::rng::Rng;
use crate::input::router::SceneInput;
use crate::render::{DrawCmd, DrawList};
use crate::systems::collision::{check_collisions, evict_outside, CollisionResponder};

/// Scrolling backdrop contract. Backgrounds are shared between scenes,
/// hence the shared-ownership handle.
pub trait Background {
    fn step(&mut self, dt_ms: f32);
    fn draw(&self, out: &mut DrawList);
}

pub type SharedBackground = Rc<RefCell<dyn Background>>;

/// Scene-level overlay (score, menus). Steps and draws every frame,
/// paused or not.
pub trait GuiLayer {
    fn step(&mut self, dt_ms: f32);
    fn draw(&self, out: &mut DrawList);
}

/// Default overlay: draws nothing.
#[derive(Debug, Default)]
pub struct NullGui;

impl GuiLayer for NullGui {
    fn step(&mut self, _dt_ms: f32) {}
    fn draw(&self, _out: &mut DrawList) {}
}

/// One screen of the game: an entity hierarchy with its own timers,
/// input routing, backdrop stack and overlay.
pub struct Scene {
    pub name: String,
    pub graph: SceneGraph,
    pub root: EntityId,
    pub clock: UnalignedClock,
    pub input: SceneInput,
    pub backgrounds: Vec<SharedBackground>,
    pub gui: Box<dyn GuiLayer>,
    /// Collision response for this scene's top-level entities. Scenes
    /// without one run no collision pass.
    pub responder: Option<Box<dyn CollisionResponder>>,
    /// Playfield rect; entities drifting outside it are evicted. None
    /// leaves entities unbounded.
    pub bounds: Option<Rect>,
    /// Whether play can resume here. Menus and loaders are not playable.
    pub playable: bool,
    is_current: bool,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.spawn(Entity::new().with_tag("scene_root"));
        Self {
            name: name.into(),
            graph,
            root,
            clock: UnalignedClock::new(),
            input: SceneInput::new(),
            backgrounds: Vec::new(),
            gui: Box::new(NullGui),
            responder: None,
            bounds: None,
            playable: false,
            is_current: false,
        }
    }

    pub fn playable(mut self) -> Self {
        self.playable = true;
        self
    }

    pub fn with_gui(mut self, gui: Box<dyn GuiLayer>) -> Self {
        self.gui = gui;
        self
    }

    pub fn with_responder(mut self, responder: Box<dyn CollisionResponder>) -> Self {
        self.responder = Some(responder);
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn is_current(&self) -> bool {
        self.is_current
    }

    /// Spawn an entity directly under the scene root.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.graph.spawn(entity);
        self.graph.attach(self.root, id);
        id
    }

    /// Advance the simulated part of the scene: backdrops, the entity
    /// hierarchy, then collision and boundary checks over the root's
    /// children. Skipped entirely while paused.
    pub fn step(&mut self, dt_ms: f32, now_ms: f64, rng: &mut Rng, out: &mut StepOutput) {
        for background in &self.backgrounds {
            background.borrow_mut().step(dt_ms);
        }
        self.graph.step(self.root, dt_ms, now_ms, rng, out);
        if let Some(responder) = self.responder.as_mut() {
            check_collisions(&mut self.graph, self.root, responder.as_mut());
        }
        if let Some(bounds) = self.bounds {
            evict_outside(&mut self.graph, self.root, bounds);
        }
    }

    /// Advance scene timers. Runs every frame, paused or not.
    pub fn step_clock(&mut self, dt_ms: f32) -> Vec<String> {
        self.clock.step(dt_ms)
    }

    pub fn draw(&self, out: &mut DrawList, options: &EngineOptions) {
        out.push(DrawCmd::Clear);
        for background in &self.backgrounds {
            background.borrow().draw(out);
        }
        self.graph.draw(self.root, out, options);
    }
}

/// Ordered scene registry with exactly one current scene.
pub struct SceneCollection {
    scenes: Vec<Scene>,
    current: usize,
}

impl SceneCollection {
    pub fn new() -> Self {
        Self {
            scenes: Vec::new(),
            current: 0,
        }
    }

    /// Append a scene. The first scene added becomes current.
    pub fn add(&mut self, mut scene: Scene) -> usize {
        if self.scenes.is_empty() {
            scene.is_current = true;
        }
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    /// Insert a scene at `index`, shifting later scenes. The current
    /// scene stays current even when its index moves.
    pub fn insert(&mut self, index: usize, scene: Scene) -> usize {
        let index = index.min(self.scenes.len());
        self.scenes.insert(index, scene);
        if self.scenes.len() == 1 {
            self.scenes[0].is_current = true;
        } else if index <= self.current {
            self.current += 1;
        }
        index
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Scene> {
        self.scenes.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.get_mut(self.current)
    }

    pub fn get(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Scene> {
        self.scenes.get_mut(index)
    }

    /// Switch to the scene at `index`. Out-of-range requests are logged
    /// and ignored. Returns the event to deliver to the host.
    pub fn set_scene(&mut self, index: usize) -> Option<EngineEvent> {
        if index >= self.scenes.len() {
            log::warn!("set_scene({}) out of range ({})", index, self.scenes.len());
            return None;
        }
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            scene.is_current = i == index;
        }
        self.current = index;
        Some(EngineEvent::SceneChange { index })
    }

    pub fn advance_scene(&mut self) -> Option<EngineEvent> {
        if self.current + 1 >= self.scenes.len() {
            log::warn!("advance_scene past the last scene");
            return None;
        }
        self.set_scene(self.current + 1)
    }

    pub fn go_back_scene(&mut self) -> Option<EngineEvent> {
        if self.current == 0 {
            log::warn!("go_back_scene before the first scene");
            return None;
        }
        self.set_scene(self.current - 1)
    }
}

impl Default for SceneCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::FRAME_INTERVAL_MS;
    use glam::Vec2;

    #[test]
    fn spawn_places_under_root() {
        let mut scene = Scene::new("level");
        let id = scene.spawn(Entity::new().with_tag("ship"));
        assert_eq!(scene.graph.get(id).unwrap().parent(), Some(scene.root));
    }

    #[test]
    fn step_advances_entities() {
        let mut scene = Scene::new("level");
        let id = scene.spawn(Entity::new().with_speed(Vec2::new(2.0, 0.0)));
        let mut rng = Rng::new(1);
        let mut out = StepOutput::new();
        scene.step(FRAME_INTERVAL_MS, 0.0, &mut rng, &mut out);
        assert!((scene.graph.get(id).unwrap().pos.x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn step_runs_collision_pass() {
        struct RemoveOnHit;
        impl CollisionResponder for RemoveOnHit {
            fn collide(
                &mut self,
                _graph: &mut SceneGraph,
                _entity: EntityId,
                _other: EntityId,
            ) -> bool {
                true
            }
        }

        let mut scene = Scene::new("level").with_responder(Box::new(RemoveOnHit));
        let a = scene.spawn(
            Entity::new()
                .with_pos(Vec2::new(0.0, 0.0))
                .with_size(Vec2::splat(40.0))
                .with_collision_radius(10.0),
        );
        let b = scene.spawn(
            Entity::new()
                .with_pos(Vec2::new(5.0, 0.0))
                .with_size(Vec2::splat(40.0))
                .with_collision_radius(10.0),
        );
        let mut rng = Rng::new(1);
        let mut out = StepOutput::new();
        scene.step(FRAME_INTERVAL_MS, 0.0, &mut rng, &mut out);
        assert!(!scene.graph.contains(a));
        assert!(!scene.graph.contains(b));
    }

    #[test]
    fn step_evicts_entities_leaving_the_bounds() {
        let mut scene =
            Scene::new("level").with_bounds(Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0)));
        let runaway = scene.spawn(
            Entity::new()
                .with_pos(Vec2::new(50.0, 50.0))
                .with_speed(Vec2::new(-500.0, 0.0)),
        );
        let resident = scene.spawn(Entity::new().with_pos(Vec2::new(50.0, 50.0)));
        let mut rng = Rng::new(1);
        let mut out = StepOutput::new();
        scene.step(FRAME_INTERVAL_MS, 0.0, &mut rng, &mut out);
        assert!(!scene.graph.contains(runaway));
        assert!(scene.graph.contains(resident));
    }

    #[test]
    fn clock_runs_separately_from_step() {
        let mut scene = Scene::new("level");
        scene.clock.subscribe("spawn", 30.0);
        assert!(scene.step_clock(20.0).is_empty());
        assert_eq!(scene.step_clock(20.0), vec!["spawn".to_string()]);
    }

    #[test]
    fn first_scene_becomes_current() {
        let mut scenes = SceneCollection::new();
        scenes.add(Scene::new("menu"));
        scenes.add(Scene::new("level"));
        assert_eq!(scenes.current_index(), 0);
        assert!(scenes.current().unwrap().is_current());
        assert!(!scenes.get(1).unwrap().is_current());
    }

    #[test]
    fn set_scene_moves_current_flag() {
        let mut scenes = SceneCollection::new();
        scenes.add(Scene::new("menu"));
        scenes.add(Scene::new("level"));
        let event = scenes.set_scene(1);
        assert_eq!(event, Some(EngineEvent::SceneChange { index: 1 }));
        assert!(!scenes.get(0).unwrap().is_current());
        assert!(scenes.get(1).unwrap().is_current());
    }

    #[test]
    fn insert_keeps_current_scene_current() {
        let mut scenes = SceneCollection::new();
        scenes.add(Scene::new("menu"));
        scenes.add(Scene::new("level"));
        scenes.insert(0, Scene::new("intro"));
        assert_eq!(scenes.current_index(), 1);
        assert_eq!(scenes.current().unwrap().name, "menu");
        assert_eq!(scenes.get(0).unwrap().name, "intro");
    }

    #[test]
    fn navigation_is_bounds_checked() {
        let mut scenes = SceneCollection::new();
        scenes.add(Scene::new("only"));
        assert_eq!(scenes.advance_scene(), None);
        assert_eq!(scenes.go_back_scene(), None);
        assert_eq!(scenes.set_scene(5), None);
        assert_eq!(scenes.current_index(), 0);
    }

    #[test]
    fn draw_starts_with_clear() {
        let scene = Scene::new("level");
        let mut list = DrawList::new();
        scene.draw(&mut list, &EngineOptions::default());
        assert_eq!(list.as_slice()[0], DrawCmd::Clear);
    }
}
