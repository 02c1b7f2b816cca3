/// Unique identifier for an entity in a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Opaque listener handle. Games hand these out when registering input
/// listeners and use them to route drained notifications back to their
/// own objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Lifecycle events delivered to the host callback at the end of a tick,
/// never mid-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Preloading finished and the first scene was activated.
    Loaded,
    /// The current scene changed to the given index.
    SceneChange { index: usize },
}
