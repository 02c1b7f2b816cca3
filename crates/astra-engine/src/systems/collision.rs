//! All-pairs collision detection over a scene's direct children.
//!
//! Broad phase: axis-aligned half-extent overlap. Narrow phase: circle
//! test on absolute positions. Responses are marked, never applied
//! mid-pass; both members of a destroyed pair still count every overlap
//! they were part of this frame.

use crate::api::types::EntityId;
use crate::core::graph::SceneGraph;
use crate::core::math::Rect;

/// Game-side collision response.
pub trait CollisionResponder {
    /// React to `entity` touching `other`. Return true to remove `entity`
    /// from the scene at the end of the pass.
    fn collide(&mut self, graph: &mut SceneGraph, entity: EntityId, other: EntityId) -> bool;
}

/// Default response: shed all children (they survive as the entity's
/// debris) and remove the entity.
pub struct DetachChildrenResponder;

impl CollisionResponder for DetachChildrenResponder {
    fn collide(&mut self, graph: &mut SceneGraph, entity: EntityId, _other: EntityId) -> bool {
        graph.detach_all(entity);
        true
    }
}

/// Run collision detection over the direct children of `root`.
///
/// Every unordered pair is tested once. On a hit the responder is
/// invoked for each side independently; a true return marks that side
/// for removal. All removals are finalized once after the full pass.
pub fn check_collisions(
    graph: &mut SceneGraph,
    root: EntityId,
    responder: &mut dyn CollisionResponder,
) {
    let children: Vec<EntityId> = match graph.get(root) {
        Some(e) => e.children().to_vec(),
        None => return,
    };

    for i in 0..children.len() {
        for j in (i + 1)..children.len() {
            let a = children[i];
            let b = children[j];
            if !overlaps(graph, a, b) {
                continue;
            }
            if responder.collide(graph, a, b) {
                graph.detach(root, a);
            }
            if responder.collide(graph, b, a) {
                graph.detach(root, b);
            }
        }
    }

    graph.finalize_removed(root);
}

fn overlaps(graph: &SceneGraph, a: EntityId, b: EntityId) -> bool {
    let (Some(ea), Some(eb)) = (graph.get(a), graph.get(b)) else {
        return false;
    };
    if ea.collision_radius == 0.0 || eb.collision_radius == 0.0 {
        return false;
    }

    let pa = graph.absolute_position(a);
    let pb = graph.absolute_position(b);

    // Broad phase: box overlap on half extents.
    if (pa.x - pb.x).abs() > ea.size.x * 0.5 + eb.size.x * 0.5 {
        return false;
    }
    if (pa.y - pb.y).abs() > ea.size.y * 0.5 + eb.size.y * 0.5 {
        return false;
    }

    // Narrow phase: circle test, touching counts.
    let radius_sum = ea.collision_radius + eb.collision_radius;
    pa.distance(pb) <= radius_sum
}

/// Detach direct children of `root` that drifted outside `bounds`,
/// where each entity's own size widens the rect before the test.
pub fn evict_outside(graph: &mut SceneGraph, root: EntityId, bounds: Rect) {
    let children: Vec<EntityId> = match graph.get(root) {
        Some(e) => e.children().to_vec(),
        None => return,
    };
    for child in children {
        let Some(e) = graph.get(child) else { continue };
        let allowed = bounds.expanded(e.size);
        if !allowed.contains(graph.absolute_position(child)) {
            graph.detach(root, child);
        }
    }
    graph.finalize_removed(root);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use glam::Vec2;

    struct Recorder {
        calls: Vec<(EntityId, EntityId)>,
        remove: bool,
    }

    impl CollisionResponder for Recorder {
        fn collide(&mut self, _graph: &mut SceneGraph, entity: EntityId, other: EntityId) -> bool {
            self.calls.push((entity, other));
            self.remove
        }
    }

    fn scene() -> (SceneGraph, EntityId) {
        let mut graph = SceneGraph::new();
        let root = graph.spawn(Entity::new());
        (graph, root)
    }

    fn body(pos: Vec2, radius: f32) -> Entity {
        Entity::new()
            .with_pos(pos)
            .with_size(Vec2::splat(radius * 4.0))
            .with_collision_radius(radius)
    }

    #[test]
    fn touching_circles_collide() {
        // Radii 10 and 15, centers 20 apart: 20 <= 25.
        let (mut graph, root) = scene();
        let a = graph.spawn(body(Vec2::new(0.0, 0.0), 10.0));
        let b = graph.spawn(body(Vec2::new(20.0, 0.0), 15.0));
        graph.attach(root, a);
        graph.attach(root, b);

        let mut recorder = Recorder {
            calls: Vec::new(),
            remove: false,
        };
        check_collisions(&mut graph, root, &mut recorder);
        assert_eq!(recorder.calls, vec![(a, b), (b, a)]);
    }

    #[test]
    fn distant_circles_do_not_collide() {
        let (mut graph, root) = scene();
        let a = graph.spawn(body(Vec2::new(0.0, 0.0), 10.0));
        let b = graph.spawn(body(Vec2::new(200.0, 0.0), 15.0));
        graph.attach(root, a);
        graph.attach(root, b);

        let mut recorder = Recorder {
            calls: Vec::new(),
            remove: false,
        };
        check_collisions(&mut graph, root, &mut recorder);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn zero_radius_opts_out() {
        let (mut graph, root) = scene();
        let a = graph.spawn(body(Vec2::ZERO, 10.0));
        let mut ghost = body(Vec2::ZERO, 0.0);
        ghost.size = Vec2::splat(40.0);
        let b = graph.spawn(ghost);
        graph.attach(root, a);
        graph.attach(root, b);

        let mut recorder = Recorder {
            calls: Vec::new(),
            remove: false,
        };
        check_collisions(&mut graph, root, &mut recorder);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn broad_phase_rejects_on_box() {
        // Circles would overlap on radius alone, but the boxes are
        // narrow on y, so the pair is rejected early.
        let (mut graph, root) = scene();
        let mut a = body(Vec2::new(0.0, 0.0), 50.0);
        a.size = Vec2::new(10.0, 10.0);
        let mut b = body(Vec2::new(0.0, 40.0), 50.0);
        b.size = Vec2::new(10.0, 10.0);
        let a = graph.spawn(a);
        let b = graph.spawn(b);
        graph.attach(root, a);
        graph.attach(root, b);

        let mut recorder = Recorder {
            calls: Vec::new(),
            remove: false,
        };
        check_collisions(&mut graph, root, &mut recorder);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn removed_pair_still_counts_later_overlaps() {
        // Three mutually overlapping bodies: every pair reports both
        // sides even though all get removed this same frame.
        let (mut graph, root) = scene();
        let a = graph.spawn(body(Vec2::new(0.0, 0.0), 10.0));
        let b = graph.spawn(body(Vec2::new(5.0, 0.0), 10.0));
        let c = graph.spawn(body(Vec2::new(10.0, 0.0), 10.0));
        graph.attach(root, a);
        graph.attach(root, b);
        graph.attach(root, c);

        let mut recorder = Recorder {
            calls: Vec::new(),
            remove: true,
        };
        check_collisions(&mut graph, root, &mut recorder);
        assert_eq!(
            recorder.calls,
            vec![(a, b), (b, a), (a, c), (c, a), (b, c), (c, b)]
        );
        // Removal applied once, after the whole pass.
        assert!(!graph.contains(a));
        assert!(!graph.contains(b));
        assert!(!graph.contains(c));
    }

    #[test]
    fn default_responder_sheds_children() {
        let (mut graph, root) = scene();
        let a = graph.spawn(body(Vec2::new(0.0, 0.0), 10.0));
        let debris = graph.spawn(Entity::new());
        graph.attach(root, a);
        graph.attach(a, debris);
        let b = graph.spawn(body(Vec2::new(5.0, 0.0), 10.0));
        graph.attach(root, b);

        let mut responder = DetachChildrenResponder;
        check_collisions(&mut graph, root, &mut responder);
        assert!(!graph.contains(a));
        assert!(!graph.contains(b));
        // Shed debris was never reattached, so nothing references it and
        // it goes with its former parent.
        assert!(!graph.contains(debris));
    }

    #[test]
    fn evict_outside_respects_size_margin() {
        let (mut graph, root) = scene();
        let inside = graph.spawn(body(Vec2::new(50.0, 50.0), 5.0));
        let margin = graph.spawn(body(Vec2::new(-10.0, 50.0), 5.0));
        let outside = graph.spawn(body(Vec2::new(-100.0, 50.0), 5.0));
        graph.attach(root, inside);
        graph.attach(root, margin);
        graph.attach(root, outside);

        evict_outside(
            &mut graph,
            root,
            Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0)),
        );
        assert!(graph.contains(inside));
        // Size 20 widens the rect enough to keep the near-edge entity.
        assert!(graph.contains(margin));
        assert!(!graph.contains(outside));
    }
}
