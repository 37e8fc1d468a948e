use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Algorithm;
use crate::domain::GridError;

/// Shortest allowed delay between generations, in seconds
pub const MIN_INTERVAL_SECS: f32 = 0.01;
/// Longest allowed delay between generations, in seconds
pub const MAX_INTERVAL_SECS: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("step interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f32),
}

/// Settings for a [`Simulation`](super::Simulation).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: i32,
    pub height: i32,
    /// Seconds between generations while running
    pub step_interval_secs: f32,
    pub algorithm: Algorithm,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 30,
            step_interval_secs: 0.1,
            algorithm: Algorithm::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, secs: f32) -> Self {
        self.step_interval_secs = secs;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 0 || self.height < 0 {
            return Err(GridError::InvalidDimension {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        if !self.step_interval_secs.is_finite() || self.step_interval_secs <= 0.0 {
            return Err(ConfigError::InvalidInterval(self.step_interval_secs));
        }
        Ok(())
    }
}
