mod cell;
mod error;
mod grid;
mod patterns;

pub use cell::Cell;
pub use error::GridError;
pub use grid::AutomatonGrid;
pub use patterns::{Pattern, presets};
