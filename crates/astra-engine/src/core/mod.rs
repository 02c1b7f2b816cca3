pub mod clock;
pub mod graph;
pub mod math;
pub mod rng;
pub mod scene;
pub mod scheduler;
