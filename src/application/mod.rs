mod algorithm;
mod config;
mod simulation;

pub use algorithm::Algorithm;
pub use config::{ConfigError, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS, SimulationConfig};
pub use simulation::Simulation;
