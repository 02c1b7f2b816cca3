pub mod emitter;
pub mod entity;
pub mod sprite;
pub mod tracker;
