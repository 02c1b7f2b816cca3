pub mod game;
pub mod options;
pub mod runner;
pub mod types;
