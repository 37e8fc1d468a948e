//! Selects how a generation is evaluated.

use serde::{Deserialize, Serialize};

/// Evolution strategy used by the simulation loop.
/// Both produce identical generations; they only differ in speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Cell-by-cell on the calling thread
    #[default]
    Serial,
    /// Rows spread over the rayon thread pool
    Parallel,
}

impl Algorithm {
    /// Get all available algorithms
    pub fn all() -> Vec<Algorithm> {
        vec![Algorithm::Serial, Algorithm::Parallel]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Serial => "Serial",
            Algorithm::Parallel => "Parallel",
        }
    }

    /// Short description for logs and benchmark output
    pub fn description(&self) -> &'static str {
        match self {
            Algorithm::Serial => "Cell enum array, single thread",
            Algorithm::Parallel => "Cell enum array, parallel rows",
        }
    }
}
