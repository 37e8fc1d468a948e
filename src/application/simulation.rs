use std::time::Instant;

use rand::Rng;

use super::{Algorithm, ConfigError, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS, SimulationConfig};
use crate::domain::{AutomatonGrid, GridError};

/// Simulation drives one grid on a caller-owned clock.
///
/// The caller feeds elapsed time into [`tick`](Self::tick); the simulation
/// never sleeps or spawns, and holds at most one step in flight.
pub struct Simulation {
    grid: AutomatonGrid,
    algorithm: Algorithm,
    is_running: bool,
    generation: u64,
    update_timer: f32,
    interval_secs: f32,
    /// Duration of the most recent step, for diagnostics
    pub last_step_time_ms: f32,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = AutomatonGrid::new(config.width, config.height)?;
        log::info!(
            "simulation created: {}x{} grid, {}s interval, {} stepping",
            config.width,
            config.height,
            config.step_interval_secs,
            config.algorithm.name()
        );

        Ok(Self {
            grid,
            algorithm: config.algorithm,
            is_running: false,
            generation: 0,
            update_timer: 0.0,
            interval_secs: config.step_interval_secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS),
            last_step_time_ms: 0.0,
        })
    }

    /// Set running state (builder pattern)
    pub fn with_running(mut self, running: bool) -> Self {
        self.is_running = running;
        self
    }

    pub fn grid(&self) -> &AutomatonGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut AutomatonGrid {
        &mut self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn interval(&self) -> f32 {
        self.interval_secs
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Live cell counter
    pub fn alive_count(&self) -> usize {
        self.grid.alive_count()
    }

    /// Start running; the next tick computes a generation straight away
    pub fn play(&mut self) {
        if !self.is_running {
            self.is_running = true;
            self.update_timer = self.interval_secs;
            log::info!("simulation started at generation {}", self.generation);
        }
    }

    pub fn pause(&mut self) {
        if self.is_running {
            self.is_running = false;
            self.update_timer = 0.0;
            log::info!("simulation paused at generation {}", self.generation);
        }
    }

    /// Toggle play/pause state, returning whether it is now running
    pub fn toggle_running(&mut self) -> bool {
        if self.is_running {
            self.pause();
        } else {
            self.play();
        }
        self.is_running
    }

    /// Speed control: seconds between generations, clamped to the allowed range
    pub fn set_interval(&mut self, secs: f32) {
        let clamped = if secs.is_nan() {
            self.interval_secs
        } else {
            secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS)
        };
        log::debug!("step interval set to {clamped}s");
        self.interval_secs = clamped;
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        log::debug!("algorithm set to {}", algorithm.name());
        self.algorithm = algorithm;
    }

    /// Advance the clock by `delta_secs`.
    ///
    /// Returns true when a generation was computed. At most one generation
    /// runs per tick; leftover time is discarded.
    pub fn tick(&mut self, delta_secs: f32) -> bool {
        if !self.is_running {
            return false;
        }

        self.update_timer += delta_secs.max(0.0);
        if self.update_timer < self.interval_secs {
            return false;
        }

        self.step_once();
        self.update_timer = 0.0;
        true
    }

    /// Compute one generation regardless of running state
    pub fn step_once(&mut self) {
        let start = Instant::now();

        match self.algorithm {
            Algorithm::Serial => self.grid.step(),
            Algorithm::Parallel => self.grid.step_parallel(),
        }

        self.last_step_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        self.generation += 1;

        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "generation {}: {} alive ({:.3} ms)",
                self.generation,
                self.grid.alive_count(),
                self.last_step_time_ms
            );
        }
    }

    /// Click handling: flip one cell and return its new state
    pub fn toggle_cell(&mut self, x: i32, y: i32) -> Result<bool, GridError> {
        self.grid
            .toggle(x, y)
            .inspect_err(|err| log::warn!("ignored toggle: {err}"))
    }

    pub fn set_cell(&mut self, x: i32, y: i32, alive: bool) -> Result<(), GridError> {
        self.grid
            .set(x, y, alive)
            .inspect_err(|err| log::warn!("ignored edit: {err}"))
    }

    /// Kill every cell and reset the generation counter.
    /// A running simulation keeps running on the empty board.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
        self.update_timer = 0.0;
        log::info!("grid cleared");
    }

    /// Replace the grid with an empty one of new dimensions
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), GridError> {
        self.grid = AutomatonGrid::new(width, height)?;
        self.generation = 0;
        self.update_timer = 0.0;
        self.is_running = false;
        log::info!("grid resized to {width}x{height}");
        Ok(())
    }

    /// Randomize grid and reset generation counter
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        self.grid.randomize(rng, density);
        self.generation = 0;
        self.update_timer = 0.0;
        log::info!("grid randomized, {} alive", self.grid.alive_count());
    }
}
