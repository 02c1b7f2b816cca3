pub mod controller;
pub mod keys;
pub mod router;
