pub mod autopilot;
pub mod benchmark;
pub mod frames;
pub mod runner;
pub mod settings;
pub mod store;
pub mod util;
