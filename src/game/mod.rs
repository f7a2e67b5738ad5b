pub mod ai;
pub mod constants;
pub mod engine;
pub mod input;
pub mod manager;
pub mod physics;
pub mod placement;
pub mod powerups;
pub mod rng;
pub mod types;
