pub mod collision;
pub mod effects;
pub mod particles;
