// Domain layer - grid state and the B3/S23 transition rule
pub mod domain;

// Application layer - timed simulation driven by the caller's clock
pub mod application;

// Re-exports for convenience
pub use domain::{AutomatonGrid, Cell, GridError, Pattern, presets};
pub use application::{Algorithm, ConfigError, Simulation, SimulationConfig};
